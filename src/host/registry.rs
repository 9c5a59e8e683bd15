//! The in-crate loader: a registry of defined types.
//!
//! Types are defined bottom-up with a [`TypeBuilder`]; array types are never
//! defined, they are synthesized on first request from their descriptor and
//! interned so that one descriptor always yields one handle.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::{debug, trace};

use super::loader::{Loader, Profile};
use super::members::{ConstructorDef, Fault, MethodDef, Object, Parameter, Visibility};
use super::types::{Primitive, TypeHandle, TypeInfo, TypeKind};
use crate::base::constants::{ARRAY_DESCRIPTOR_PREFIX, SYSTEM_REGISTRY_NAME};
use crate::error::{ReflectError, Result};
use crate::signature::descriptor::ParamType;

static SYSTEM: LazyLock<Arc<TypeRegistry>> =
    LazyLock::new(|| Arc::new(TypeRegistry::named(SYSTEM_REGISTRY_NAME)));

// ============================================================================
// REGISTRY
// ============================================================================

/// A [`Loader`] backed by explicitly defined types.
#[derive(Debug)]
pub struct TypeRegistry {
    name: SmolStr,
    profile: Profile,
    types: RwLock<FxHashMap<SmolStr, TypeHandle>>,
    /// Descriptor -> synthesized array type.
    arrays: RwLock<FxHashMap<SmolStr, TypeHandle>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::named("registry")
    }

    /// Create an empty registry; `name` only shows up in logs and debug output.
    pub fn named(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            profile: Profile::Full,
            types: RwLock::new(FxHashMap::default()),
            arrays: RwLock::new(FxHashMap::default()),
        }
    }

    /// Report `profile` as this registry's capability instead of `Full`.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// The process-wide registry backing the default resolver.
    pub fn system() -> Arc<TypeRegistry> {
        Arc::clone(&SYSTEM)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Define a type. Fails if the name is taken or cannot name a defined type.
    pub fn define(&self, builder: TypeBuilder) -> Result<TypeHandle> {
        let name = builder.name.clone();
        if name.is_empty()
            || name.starts_with(ARRAY_DESCRIPTOR_PREFIX)
            || Primitive::from_keyword(&name).is_some()
        {
            return Err(ReflectError::InvalidTypeName {
                name: name.to_string(),
            });
        }

        let mut types = self.types.write();
        if types.contains_key(&name) {
            return Err(ReflectError::DuplicateType {
                name: name.to_string(),
            });
        }
        let handle = builder.build(&types)?;
        debug!(registry = %self.name, name = %name, "defined type");
        types.insert(name, handle.clone());
        Ok(handle)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// Number of defined (non-array) types.
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Resolve an array descriptor such as `[[I` or `[Lpkg.Part;`.
    fn load_array(&self, descriptor: &str) -> Option<TypeHandle> {
        if let Some(found) = self.arrays.read().get(descriptor) {
            return Some(found.clone());
        }

        let dimensions = descriptor
            .chars()
            .take_while(|c| *c == ARRAY_DESCRIPTOR_PREFIX)
            .count();
        let element_descriptor = &descriptor[dimensions..];
        let element = self.load_element(element_descriptor)?;

        let mut arrays = self.arrays.write();
        let mut current = element;
        for dim in 1..=dimensions {
            let mut name = String::with_capacity(dim + element_descriptor.len());
            name.extend(std::iter::repeat_n(ARRAY_DESCRIPTOR_PREFIX, dim));
            name.push_str(element_descriptor);
            let name = SmolStr::from(name);
            current = arrays
                .entry(name.clone())
                .or_insert_with(|| TypeHandle::new(TypeInfo::array(name, current, dim)))
                .clone();
        }
        Some(current)
    }

    /// Element of an array descriptor: one primitive code or `L<name>;`.
    fn load_element(&self, descriptor: &str) -> Option<TypeHandle> {
        let mut chars = descriptor.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => Primitive::from_descriptor(code).map(Primitive::handle),
            (Some('L'), Some(_)) => {
                let name = descriptor.strip_prefix('L')?.strip_suffix(';')?;
                self.types.read().get(name).cloned()
            }
            _ => None,
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader for TypeRegistry {
    fn load_type(&self, name: &str) -> Option<TypeHandle> {
        let found = if name.starts_with(ARRAY_DESCRIPTOR_PREFIX) {
            self.load_array(name)
        } else {
            self.types.read().get(name).cloned()
        };
        trace!(registry = %self.name, name, found = found.is_some(), "load type");
        found
    }

    fn profile(&self) -> Profile {
        self.profile
    }
}

// ============================================================================
// TYPE BUILDER
// ============================================================================

struct PendingConstructor {
    params: Vec<SmolStr>,
    def: Box<dyn FnOnce(Vec<Parameter>) -> ConstructorDef + Send>,
}

struct PendingMethod {
    params: Vec<SmolStr>,
    def: Box<dyn FnOnce(Vec<Parameter>) -> MethodDef + Send>,
}

/// Fluent definition of a class, abstract class or interface.
///
/// Parameter tokens use the signature grammar (`int`, `pkg.Part[]`) and are
/// normalised to canonical names when the type is defined. Reference types
/// are bound to the registry's handle at that point: define them before the
/// types whose members take them. The type being defined may name itself.
pub struct TypeBuilder {
    name: SmolStr,
    kind: TypeKind,
    super_type: Option<TypeHandle>,
    interfaces: Vec<TypeHandle>,
    constructors: Vec<PendingConstructor>,
    methods: Vec<PendingMethod>,
}

impl TypeBuilder {
    fn with_kind(name: impl Into<SmolStr>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            super_type: None,
            interfaces: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn class(name: impl Into<SmolStr>) -> Self {
        Self::with_kind(name, TypeKind::Class)
    }

    pub fn abstract_class(name: impl Into<SmolStr>) -> Self {
        Self::with_kind(name, TypeKind::AbstractClass)
    }

    pub fn interface(name: impl Into<SmolStr>) -> Self {
        Self::with_kind(name, TypeKind::Interface)
    }

    pub fn extends(mut self, parent: &TypeHandle) -> Self {
        self.super_type = Some(parent.clone());
        self
    }

    pub fn implements(mut self, interface: &TypeHandle) -> Self {
        self.interfaces.push(interface.clone());
        self
    }

    /// Public constructor.
    pub fn constructor<F>(self, params: &[&str], body: F) -> Self
    where
        F: Fn(&[Object]) -> std::result::Result<Object, Fault> + Send + Sync + 'static,
    {
        self.constructor_with(params, Visibility::Public, body)
    }

    /// Constructor only reachable through default construction, which rejects it.
    pub fn private_constructor<F>(self, params: &[&str], body: F) -> Self
    where
        F: Fn(&[Object]) -> std::result::Result<Object, Fault> + Send + Sync + 'static,
    {
        self.constructor_with(params, Visibility::Private, body)
    }

    fn constructor_with<F>(mut self, params: &[&str], visibility: Visibility, body: F) -> Self
    where
        F: Fn(&[Object]) -> std::result::Result<Object, Fault> + Send + Sync + 'static,
    {
        self.constructors.push(PendingConstructor {
            params: tokens(params),
            def: Box::new(move |names| ConstructorDef::new(names, visibility, body)),
        });
        self
    }

    /// Public instance method; the body always receives the receiver.
    pub fn method<F>(self, name: &str, params: &[&str], body: F) -> Self
    where
        F: Fn(&Object, &[Object]) -> std::result::Result<Option<Object>, Fault>
            + Send
            + Sync
            + 'static,
    {
        let member = SmolStr::from(name);
        let label = member.clone();
        self.method_with(params, move |names| {
            MethodDef::new(
                member,
                names,
                Visibility::Public,
                false,
                move |this, args| match this {
                    Some(this) => body(this, args),
                    None => Err(Fault::IllegalArgument(format!(
                        "instance method {label} invoked without a receiver"
                    ))),
                },
            )
        })
    }

    /// Public static method.
    pub fn static_method<F>(self, name: &str, params: &[&str], body: F) -> Self
    where
        F: Fn(&[Object]) -> std::result::Result<Option<Object>, Fault> + Send + Sync + 'static,
    {
        let member = SmolStr::from(name);
        self.method_with(params, move |names| {
            MethodDef::new(member, names, Visibility::Public, true, move |_, args| {
                body(args)
            })
        })
    }

    /// Non-public instance method, invisible to method lookup.
    pub fn private_method<F>(self, name: &str, params: &[&str], body: F) -> Self
    where
        F: Fn(Option<&Object>, &[Object]) -> std::result::Result<Option<Object>, Fault>
            + Send
            + Sync
            + 'static,
    {
        let member = SmolStr::from(name);
        self.method_with(params, move |names| {
            MethodDef::new(member, names, Visibility::Private, false, body)
        })
    }

    fn method_with(
        mut self,
        params: &[&str],
        def: impl FnOnce(Vec<Parameter>) -> MethodDef + Send + 'static,
    ) -> Self {
        self.methods.push(PendingMethod {
            params: tokens(params),
            def: Box::new(def),
        });
        self
    }

    fn build(self, types: &FxHashMap<SmolStr, TypeHandle>) -> Result<TypeHandle> {
        let bind = |tokens: &[SmolStr]| -> Result<Vec<Parameter>> {
            tokens
                .iter()
                .map(|t| bind_parameter(&self.name, t, types))
                .collect()
        };
        let mut constructors = Vec::with_capacity(self.constructors.len());
        for pending in self.constructors {
            let params = bind(&pending.params)?;
            constructors.push(Arc::new((pending.def)(params)));
        }
        let mut methods = Vec::with_capacity(self.methods.len());
        for pending in self.methods {
            let params = bind(&pending.params)?;
            methods.push(Arc::new((pending.def)(params)));
        }

        let mut info = TypeInfo::bare(self.name, self.kind);
        info.super_type = self.super_type;
        info.interfaces = self.interfaces;
        info.constructors = constructors;
        info.methods = methods;
        Ok(TypeHandle::new(info))
    }
}

fn tokens(params: &[&str]) -> Vec<SmolStr> {
    params.iter().map(|p| SmolStr::from(*p)).collect()
}

/// Bind one parameter token of a member declared by `owner`.
fn bind_parameter(
    owner: &str,
    token: &str,
    types: &FxHashMap<SmolStr, TypeHandle>,
) -> Result<Parameter> {
    let param = ParamType::parse(token)?;
    let name = param.canonical_name();
    let (element, dimensions) = match param {
        ParamType::Primitive(_) => return Ok(Parameter::by_name(name)),
        ParamType::Array { element, .. } if Primitive::from_keyword(element).is_some() => {
            return Ok(Parameter::by_name(name));
        }
        ParamType::Array {
            element,
            dimensions,
        } => (element, dimensions),
        ParamType::Reference(element) => (element, 0),
    };

    if element == owner {
        return Ok(Parameter::owner(name, dimensions));
    }
    Ok(match types.get(element) {
        Some(handle) => Parameter::bound(name, handle.clone(), dimensions),
        None => {
            trace!(owner, parameter = %name, "parameter type not defined yet");
            Parameter::unbound(name)
        }
    })
}
