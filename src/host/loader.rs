//! Loaders: the contexts a type name is resolved in.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use super::types::TypeHandle;
use crate::base::constants::ENV_PROFILE;
use crate::error::ReflectError;

/// Reflective capability a loader's platform offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Profile {
    /// Type lookup and default construction only.
    Minimal,
    /// Parameterised constructors, methods, super types and interfaces.
    #[default]
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Full => "full",
        }
    }

    pub fn supports_members(&self) -> bool {
        matches!(self, Self::Full)
    }
}

impl FromStr for Profile {
    type Err = ReflectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "full" => Ok(Self::Full),
            _ => Err(ReflectError::InvalidConfig {
                key: ENV_PROFILE,
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A context able to turn a type name into a type handle.
///
/// `name` is either a qualified type name or an array descriptor
/// (`[I`, `[[Lpkg.Part;`). Primitive keywords are never passed here.
pub trait Loader: Send + Sync + fmt::Debug {
    fn load_type(&self, name: &str) -> Option<TypeHandle>;

    /// Capabilities of the platform behind this loader.
    fn profile(&self) -> Profile {
        Profile::Full
    }
}

/// A shared loader registered with a resolver.
///
/// Equality and hashing are by identity, so the same loader registered twice
/// is one scope, and two loaders with the same contents are two scopes.
#[derive(Clone)]
pub struct SearchScope(Arc<dyn Loader>);

impl SearchScope {
    pub fn new(loader: impl Loader + 'static) -> Self {
        Self(Arc::new(loader))
    }

    pub fn loader(&self) -> &dyn Loader {
        self.0.as_ref()
    }

    pub fn load_type(&self, name: &str) -> Option<TypeHandle> {
        self.0.load_type(name)
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast::<()>()
    }
}

impl<L: Loader + 'static> From<Arc<L>> for SearchScope {
    fn from(loader: Arc<L>) -> Self {
        Self(loader)
    }
}

impl From<Arc<dyn Loader>> for SearchScope {
    fn from(loader: Arc<dyn Loader>) -> Self {
        Self(loader)
    }
}

impl PartialEq for SearchScope {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for SearchScope {}

impl Hash for SearchScope {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
