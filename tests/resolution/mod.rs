//! Type resolution tests
//!
//! - Name and array descriptor resolution
//! - Search scope registration, order and removal
//! - Caching and concurrent resolution

pub mod tests_search_scopes;
pub mod tests_type_resolution;
