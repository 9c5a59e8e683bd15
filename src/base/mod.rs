//! Foundation pieces for the resolver.
//!
//! - [`constants`] - Grammar limits, configuration keys, pool sizes
//! - [`scratch`] - Pooled scratch text buffers used to normalize names
//!
//! This module has NO dependencies on other reflect modules.

pub mod constants;
pub mod scratch;

pub use scratch::{ScratchBuffer, ScratchPool};
