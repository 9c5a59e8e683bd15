//! # reflect-base
//!
//! Name-based dynamic resolution of types, constructors and methods from
//! textual signatures such as `pkg.Widget(int, pkg.Part[])`.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! reflection → Resolver facade, type cache, constructor/method handles
//!   ↓
//! signature  → Signature grammar, parameter tokens, type descriptors
//!   ↓
//! host       → Host type model: loaders, type handles, raw invocation
//!   ↓
//! error      → ReflectError, Result
//!   ↓
//! base       → Constants, pooled scratch buffers
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use reflect::{DefaultReflection, Reflection, TypeBuilder, TypeRegistry, arg, object};
//!
//! let registry = Arc::new(TypeRegistry::named("app"));
//! registry
//!     .define(TypeBuilder::class("app.Counter").constructor(&["int"], |args| {
//!         Ok(object(*arg::<i32>(args, 0)?))
//!     }))
//!     .unwrap();
//!
//! let reflection = DefaultReflection::new(registry);
//! let ctor = reflection.get_constructor("app.Counter(int)").unwrap().unwrap();
//! let counter = ctor.new_instance1(object(7i32)).unwrap();
//! assert_eq!(counter.downcast_ref::<i32>(), Some(&7));
//!
//! assert!(reflection.get_method("app.Counter.reset()").unwrap().is_none());
//! assert!(reflection.get_constructor("app.Counter(int").is_err());
//! ```

// ============================================================================
// MODULES (dependency order: base → error → host → signature → reflection)
// ============================================================================

/// Foundation: constants, scratch buffer pool
pub mod base;

/// Error types
pub mod error;

/// Host type model the resolver runs against
pub mod host;

/// Signature parsing and type descriptor encoding
pub mod signature;

/// Resolver facade, default backend, handles
pub mod reflection;

// Re-export commonly needed items
pub use error::{ReflectError, Result};
pub use host::{
    Fault, Loader, Object, Primitive, Profile, SearchScope, TypeBuilder, TypeHandle,
    TypeRegistry, arg, object,
};
pub use reflection::{
    Constructor, DefaultReflection, Method, Reflection, ReflectionConfig, configure, instance,
    set_instance,
};
pub use signature::Signature;
