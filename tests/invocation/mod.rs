//! Constructor and method handle tests
//!
//! - Signature lookup for constructors and methods
//! - Arity checks on the fixed-arity entry points
//! - Failure reporting for platform and target errors

pub mod tests_constructors;
