//! Host type model: the reflective capability the resolver wraps.
//!
//! The resolver core never inspects types directly; it goes through:
//!
//! - [`Loader`]: turns a type name (or array descriptor) into a [`TypeHandle`]
//! - [`TypeHandle`]: super type, interfaces, constructor and method lookup
//! - [`Allocate`] / [`Execute`]: the raw calls a handle forwards to
//!
//! [`TypeRegistry`] is the in-crate loader: types are defined with a
//! [`TypeBuilder`] and members carry Rust closures as bodies.

mod loader;
mod members;
mod registry;
mod types;

pub use loader::{Loader, Profile, SearchScope};
pub use members::{
    Allocate, ConstructorDef, Execute, Fault, MethodDef, Object, Parameter, Visibility, arg,
    object,
};
pub use registry::{TypeBuilder, TypeRegistry};
pub use types::{Primitive, TypeHandle, TypeInfo, TypeKind};
