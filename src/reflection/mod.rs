//! Resolver facade.
//!
//! [`Reflection`] is the contract every backend fulfils; [`DefaultReflection`]
//! is the backend shipped with the crate. The process-wide backend lives in a
//! replaceable slot (see [`instance`], [`set_instance`], [`configure`]).
//!
//! ```text
//! signature text
//!   ↓ Signature::parse_*          (MalformedSignature → Err)
//! owner + parameter tokens
//!   ↓ get_type / ParamType        (cache → default scope → search scopes)
//! TypeHandle(s)
//!   ↓ TypeHandle::constructor / method
//! Constructor / Method handle     (NotFound anywhere → Ok(None))
//! ```

mod cache;
mod config;
mod default;
mod handles;

use std::fmt::{self, Write};

use crate::base::scratch;
use crate::error::Result;
use crate::host::{SearchScope, TypeHandle};

pub use cache::{Generation, Probe, TypeCache};
pub use config::{
    ReflectionConfig, configure, get_constructor, get_method, instance, set_instance,
};
pub use default::DefaultReflection;
pub use handles::{Constructor, Method};

/// Name-based lookup of types, constructors and methods.
///
/// Lookups that find nothing return `None` (or `Ok(None)`); only malformed
/// signatures are reported as errors.
pub trait Reflection: Send + Sync + fmt::Debug {
    /// Register an additional search scope. Registering the same scope twice
    /// has no effect.
    fn add_search_scope(&self, scope: SearchScope);

    /// Unregister a search scope and drop every cached resolution.
    fn remove_search_scope(&self, scope: &SearchScope);

    /// Resolve a qualified type name or array descriptor.
    fn get_type(&self, name: &str) -> Option<TypeHandle>;

    /// Resolve a type from any displayable name.
    ///
    /// The name is always formatted into a pooled scratch buffer first, even
    /// when it is already a `&str` or `String`; call [`get_type`] to skip the
    /// copy.
    ///
    /// [`get_type`]: Reflection::get_type
    fn get_type_from(&self, name: &dyn fmt::Display) -> Option<TypeHandle> {
        let mut buf = scratch::acquire();
        write!(buf, "{name}").ok()?;
        self.get_type(buf.as_str())
    }

    /// Direct super type; `None` for interfaces, primitives and roots.
    fn super_type(&self, ty: &TypeHandle) -> Option<TypeHandle>;

    /// Directly implemented interfaces in declaration order.
    fn interfaces(&self, ty: &TypeHandle) -> Vec<TypeHandle>;

    /// Constructor for a signature such as `pkg.Widget(int, pkg.Part[])`.
    fn get_constructor(&self, signature: &str) -> Result<Option<Constructor>>;

    /// Method for a signature such as `pkg.Util.compute(double)`.
    fn get_method(&self, signature: &str) -> Result<Option<Method>>;
}
