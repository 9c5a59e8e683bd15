//! Constructors and methods declared by host types, and the raw calls that run them.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;
use thiserror::Error;

use super::types::{TypeHandle, backing_type_of};
use crate::error::BoxError;

/// A dynamically typed value passed to or returned from host members.
pub type Object = Arc<dyn Any + Send + Sync>;

/// Wrap a value as an [`Object`].
pub fn object<T: Any + Send + Sync>(value: T) -> Object {
    Arc::new(value)
}

/// Downcast argument `index`, reporting a mismatch as [`Fault::IllegalArgument`].
pub fn arg<T: Any>(args: &[Object], index: usize) -> Result<&T, Fault> {
    let value = args
        .get(index)
        .ok_or_else(|| Fault::IllegalArgument(format!("missing argument {index}")))?;
    value.downcast_ref::<T>().ok_or_else(|| {
        Fault::IllegalArgument(format!(
            "argument {index} is not a {}",
            std::any::type_name::<T>()
        ))
    })
}

// ============================================================================
// FAULTS
// ============================================================================

/// Failure of a raw platform call.
#[derive(Debug, Error)]
pub enum Fault {
    /// The type cannot be instantiated (abstract, interface, no constructor).
    #[error("instantiation failed: {0}")]
    Instantiation(String),

    /// The member exists but is not accessible.
    #[error("illegal access: {0}")]
    IllegalAccess(String),

    /// Arguments or receiver rejected by the host.
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// A failure the target reports as part of its contract; wrapped by handles.
    #[error("target reported: {0}")]
    Declared(#[source] BoxError),

    /// A failure of the target's own logic; handles pass it through unwrapped.
    #[error(transparent)]
    Target(BoxError),
}

impl Fault {
    pub fn declared(err: impl Into<BoxError>) -> Self {
        Self::Declared(err.into())
    }

    pub fn target(err: impl Into<BoxError>) -> Self {
        Self::Target(err.into())
    }
}

// ============================================================================
// RAW INVOCATION
// ============================================================================

/// The single raw allocation primitive a constructor handle forwards to.
pub trait Allocate: Send + Sync {
    fn allocate(&self, args: &[Object]) -> Result<Object, Fault>;
}

/// The single raw execution primitive a method handle forwards to.
///
/// `this` is `None` exactly when the method is static.
pub trait Execute: Send + Sync {
    fn execute(&self, this: Option<&Object>, args: &[Object]) -> Result<Option<Object>, Fault>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

type ConstructorBody = dyn Fn(&[Object]) -> Result<Object, Fault> + Send + Sync;
type MethodBody = dyn Fn(Option<&Object>, &[Object]) -> Result<Option<Object>, Fault> + Send + Sync;

// ============================================================================
// PARAMETERS
// ============================================================================

/// A declared parameter type.
///
/// Reference parameters are bound to the handle the defining registry held
/// for them, so a same-named type from another loader does not match.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: SmolStr,
    binding: Binding,
}

#[derive(Debug, Clone)]
enum Binding {
    /// Primitives and primitive arrays, shared by every loader.
    ByName,
    Type {
        element: TypeHandle,
        dimensions: usize,
    },
    /// The declaring type itself, which has no handle while it is built.
    Owner { dimensions: usize },
    /// A reference type the defining registry did not know; never matches.
    Unbound,
}

impl Parameter {
    pub fn by_name(name: impl Into<SmolStr>) -> Self {
        Self::with(name, Binding::ByName)
    }

    /// `dimensions` arrays of `element`; 0 for `element` itself.
    pub fn bound(name: impl Into<SmolStr>, element: TypeHandle, dimensions: usize) -> Self {
        Self::with(
            name,
            Binding::Type {
                element,
                dimensions,
            },
        )
    }

    pub fn owner(name: impl Into<SmolStr>, dimensions: usize) -> Self {
        Self::with(name, Binding::Owner { dimensions })
    }

    pub fn unbound(name: impl Into<SmolStr>) -> Self {
        Self::with(name, Binding::Unbound)
    }

    fn with(name: impl Into<SmolStr>, binding: Binding) -> Self {
        Self {
            name: name.into(),
            binding,
        }
    }

    /// Canonical type name (`int`, `[I`, `pkg.Part`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_bound(&self) -> bool {
        !matches!(self.binding, Binding::Unbound)
    }

    /// Whether `ty` is this parameter's type, for a member declared by `owner`.
    pub fn matches(&self, owner: &TypeHandle, ty: &TypeHandle) -> bool {
        match &self.binding {
            Binding::ByName => self.name.as_str() == ty.name(),
            Binding::Type {
                element,
                dimensions,
            } => ty.dimensions() == *dimensions && ty.element_type() == element,
            Binding::Owner { dimensions } => {
                ty.dimensions() == *dimensions && ty.element_type() == owner
            }
            Binding::Unbound => false,
        }
    }
}

pub(crate) fn parameters_match(
    owner: &TypeHandle,
    declared: &[Parameter],
    params: &[TypeHandle],
) -> bool {
    declared.len() == params.len()
        && declared
            .iter()
            .zip(params)
            .all(|(declared, param)| declared.matches(owner, param))
}

/// Checks the host performs before running any member body.
fn check_arguments(parameters: &[Parameter], args: &[Object]) -> Result<(), Fault> {
    if parameters.len() != args.len() {
        return Err(Fault::IllegalArgument(format!(
            "wrong number of arguments: expected {}, got {}",
            parameters.len(),
            args.len()
        )));
    }
    for (index, (param, value)) in parameters.iter().zip(args).enumerate() {
        if let Some(expected) = backing_type_of(param.name()) {
            if (**value).type_id() != expected {
                return Err(Fault::IllegalArgument(format!(
                    "argument {index} does not match parameter type {}",
                    param.name()
                )));
            }
        }
    }
    Ok(())
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

/// A constructor declared by a host type.
pub struct ConstructorDef {
    parameters: Vec<Parameter>,
    visibility: Visibility,
    body: Box<ConstructorBody>,
}

impl ConstructorDef {
    pub fn new<F>(parameters: Vec<Parameter>, visibility: Visibility, body: F) -> Self
    where
        F: Fn(&[Object]) -> Result<Object, Fault> + Send + Sync + 'static,
    {
        Self {
            parameters,
            visibility,
            body: Box::new(body),
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }
}

impl Allocate for ConstructorDef {
    fn allocate(&self, args: &[Object]) -> Result<Object, Fault> {
        check_arguments(&self.parameters, args)?;
        (self.body)(args)
    }
}

impl fmt::Debug for ConstructorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDef")
            .field("parameters", &self.parameters)
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// METHODS
// ============================================================================

/// A method declared by a host type.
pub struct MethodDef {
    name: SmolStr,
    parameters: Vec<Parameter>,
    visibility: Visibility,
    is_static: bool,
    body: Box<MethodBody>,
}

impl MethodDef {
    pub fn new<F>(
        name: impl Into<SmolStr>,
        parameters: Vec<Parameter>,
        visibility: Visibility,
        is_static: bool,
        body: F,
    ) -> Self
    where
        F: Fn(Option<&Object>, &[Object]) -> Result<Option<Object>, Fault> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            parameters,
            visibility,
            is_static,
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }
}

impl Execute for MethodDef {
    fn execute(&self, this: Option<&Object>, args: &[Object]) -> Result<Option<Object>, Fault> {
        match (self.is_static, this.is_some()) {
            (true, true) => {
                return Err(Fault::IllegalArgument(format!(
                    "static method {} invoked with a receiver",
                    self.name
                )));
            }
            (false, false) => {
                return Err(Fault::IllegalArgument(format!(
                    "instance method {} invoked without a receiver",
                    self.name
                )));
            }
            _ => {}
        }
        check_arguments(&self.parameters, args)?;
        (self.body)(this, args)
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("visibility", &self.visibility)
            .field("is_static", &self.is_static)
            .finish_non_exhaustive()
    }
}
