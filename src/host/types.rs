//! Type handles and the immutable metadata they point at.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock};

use smol_str::SmolStr;

use super::members::{
    Allocate, ConstructorDef, Fault, MethodDef, Object, Visibility, parameters_match,
};
use crate::base::constants::ARRAY_DESCRIPTOR_PREFIX;

// ============================================================================
// PRIMITIVES
// ============================================================================

/// The eight primitive kinds a signature may name by keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

/// Process-wide primitive handles, indexed by `Primitive as usize`.
static PRIMITIVES: LazyLock<[TypeHandle; 8]> =
    LazyLock::new(|| Primitive::ALL.map(|p| TypeHandle::new(TypeInfo::primitive(p))));

impl Primitive {
    pub const ALL: [Primitive; 8] = [
        Self::Boolean,
        Self::Byte,
        Self::Char,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
    ];

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "boolean" => Self::Boolean,
            "byte" => Self::Byte,
            "char" => Self::Char,
            "short" => Self::Short,
            "int" => Self::Int,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// Single-letter descriptor code.
    pub fn descriptor(self) -> char {
        match self {
            Self::Boolean => 'Z',
            Self::Byte => 'B',
            Self::Char => 'C',
            Self::Short => 'S',
            Self::Int => 'I',
            Self::Long => 'J',
            Self::Float => 'F',
            Self::Double => 'D',
        }
    }

    pub fn from_descriptor(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.descriptor() == code)
    }

    /// The Rust type carrying values of this primitive.
    pub fn rust_type(self) -> TypeId {
        match self {
            Self::Boolean => TypeId::of::<bool>(),
            Self::Byte => TypeId::of::<i8>(),
            Self::Char => TypeId::of::<char>(),
            Self::Short => TypeId::of::<i16>(),
            Self::Int => TypeId::of::<i32>(),
            Self::Long => TypeId::of::<i64>(),
            Self::Float => TypeId::of::<f32>(),
            Self::Double => TypeId::of::<f64>(),
        }
    }

    /// The Rust type carrying one-dimensional arrays of this primitive.
    pub fn array_rust_type(self) -> TypeId {
        match self {
            Self::Boolean => TypeId::of::<Vec<bool>>(),
            Self::Byte => TypeId::of::<Vec<i8>>(),
            Self::Char => TypeId::of::<Vec<char>>(),
            Self::Short => TypeId::of::<Vec<i16>>(),
            Self::Int => TypeId::of::<Vec<i32>>(),
            Self::Long => TypeId::of::<Vec<i64>>(),
            Self::Float => TypeId::of::<Vec<f32>>(),
            Self::Double => TypeId::of::<Vec<f64>>(),
        }
    }

    /// The dedicated handle for this primitive.
    pub fn handle(self) -> TypeHandle {
        PRIMITIVES[self as usize].clone()
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Rust type the host checks arguments against for a canonical type name.
///
/// Only primitives and one-dimensional primitive arrays are checked; every
/// other parameter is handed to the target unchecked.
pub(crate) fn backing_type_of(name: &str) -> Option<TypeId> {
    if let Some(primitive) = Primitive::from_keyword(name) {
        return Some(primitive.rust_type());
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(ARRAY_DESCRIPTOR_PREFIX), Some(code), None) => {
            Primitive::from_descriptor(code).map(Primitive::array_rust_type)
        }
        _ => None,
    }
}

// ============================================================================
// TYPE METADATA
// ============================================================================

/// What sort of type a handle refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Primitive(Primitive),
    Class,
    AbstractClass,
    Interface,
    /// `component` has one dimension less than this array.
    Array {
        component: TypeHandle,
        dimensions: usize,
    },
}

/// Immutable description of one type.
#[derive(Debug)]
pub struct TypeInfo {
    pub(crate) name: SmolStr,
    pub(crate) kind: TypeKind,
    pub(crate) super_type: Option<TypeHandle>,
    pub(crate) interfaces: Vec<TypeHandle>,
    pub(crate) constructors: Vec<Arc<ConstructorDef>>,
    pub(crate) methods: Vec<Arc<MethodDef>>,
}

impl TypeInfo {
    fn primitive(primitive: Primitive) -> Self {
        Self::bare(primitive.keyword(), TypeKind::Primitive(primitive))
    }

    pub(crate) fn array(name: SmolStr, component: TypeHandle, dimensions: usize) -> Self {
        Self::bare(
            name,
            TypeKind::Array {
                component,
                dimensions,
            },
        )
    }

    pub(crate) fn bare(name: impl Into<SmolStr>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            super_type: None,
            interfaces: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    fn is_instantiable(&self) -> bool {
        matches!(self.kind, TypeKind::Class)
    }
}

/// Default construction: the type's own no-argument constructor.
impl Allocate for TypeInfo {
    fn allocate(&self, args: &[Object]) -> Result<Object, Fault> {
        if !self.is_instantiable() {
            return Err(Fault::Instantiation(format!(
                "{} cannot be instantiated",
                self.name
            )));
        }
        let ctor = self
            .constructors
            .iter()
            .find(|c| c.parameters().is_empty())
            .ok_or_else(|| {
                Fault::Instantiation(format!("{} has no default constructor", self.name))
            })?;
        if ctor.visibility() != Visibility::Public {
            return Err(Fault::IllegalAccess(format!(
                "default constructor of {} is not public",
                self.name
            )));
        }
        ctor.allocate(args)
    }
}

// ============================================================================
// TYPE HANDLE
// ============================================================================

/// Opaque, identity-compared reference to a resolved type.
///
/// Two handles are equal only if they point at the same metadata; two types
/// with the same name defined in different loaders are different handles.
#[derive(Clone)]
pub struct TypeHandle(Arc<TypeInfo>);

impl TypeHandle {
    pub(crate) fn new(info: TypeInfo) -> Self {
        Self(Arc::new(info))
    }

    /// Canonical name: keyword for primitives, descriptor for arrays,
    /// qualified name otherwise.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.0.kind
    }

    pub fn super_type(&self) -> Option<&TypeHandle> {
        self.0.super_type.as_ref()
    }

    /// Implemented interfaces in declaration order.
    pub fn interfaces(&self) -> &[TypeHandle] {
        &self.0.interfaces
    }

    pub fn primitive(&self) -> Option<Primitive> {
        match self.0.kind {
            TypeKind::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        self.primitive().is_some()
    }

    pub fn is_array(&self) -> bool {
        matches!(self.0.kind, TypeKind::Array { .. })
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.0.kind, TypeKind::Interface)
    }

    /// Element type of an array with one dimension removed.
    pub fn component_type(&self) -> Option<&TypeHandle> {
        match &self.0.kind {
            TypeKind::Array { component, .. } => Some(component),
            _ => None,
        }
    }

    /// Number of array dimensions, 0 for non-array types.
    pub fn dimensions(&self) -> usize {
        match &self.0.kind {
            TypeKind::Array { dimensions, .. } => *dimensions,
            _ => 0,
        }
    }

    /// Innermost element of an array; the type itself otherwise.
    pub fn element_type(&self) -> &TypeHandle {
        let mut current = self;
        while let Some(component) = current.component_type() {
            current = component;
        }
        current
    }

    /// Whether the host would accept `value` for a parameter of this type.
    pub fn accepts(&self, value: &Object) -> bool {
        backing_type_of(self.name()).is_none_or(|expected| (**value).type_id() == expected)
    }

    pub fn constructors(&self) -> &[Arc<ConstructorDef>] {
        &self.0.constructors
    }

    pub fn methods(&self) -> &[Arc<MethodDef>] {
        &self.0.methods
    }

    /// Public constructor declared with exactly these parameter types.
    pub fn constructor(&self, params: &[TypeHandle]) -> Option<Arc<ConstructorDef>> {
        self.0
            .constructors
            .iter()
            .find(|c| {
                c.visibility() == Visibility::Public
                    && parameters_match(self, c.parameters(), params)
            })
            .cloned()
    }

    /// Public method with this name and parameter types.
    ///
    /// Searches this type, then its super type chain, then its interfaces.
    /// Static methods of an interface are only members of the interface.
    pub fn method(&self, name: &str, params: &[TypeHandle]) -> Option<Arc<MethodDef>> {
        self.find_method(name, params, true)
    }

    fn find_method(
        &self,
        name: &str,
        params: &[TypeHandle],
        with_static: bool,
    ) -> Option<Arc<MethodDef>> {
        let own = self.0.methods.iter().find(|m| {
            m.visibility() == Visibility::Public
                && (with_static || !m.is_static())
                && m.name() == name
                && parameters_match(self, m.parameters(), params)
        });
        if let Some(found) = own {
            return Some(Arc::clone(found));
        }
        if let Some(found) = self
            .super_type()
            .and_then(|s| s.find_method(name, params, with_static))
        {
            return Some(found);
        }
        self.interfaces()
            .iter()
            .find_map(|i| i.find_method(name, params, false))
    }

    /// Allocation capability used for default (no-argument) construction.
    pub fn default_allocator(&self) -> Arc<dyn Allocate> {
        self.0.clone()
    }

    pub fn ptr_eq(&self, other: &TypeHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeHandle").field(&self.name()).finish()
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
