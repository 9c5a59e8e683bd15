//! Resolver configuration and the process-wide backend slot.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use tracing::debug;

use super::Reflection;
use super::default::DefaultReflection;
use super::handles::{Constructor, Method};
use crate::base::constants::{DEFAULT_CACHE_CAPACITY, ENV_CACHE_CAPACITY, ENV_PROFILE};
use crate::error::{ReflectError, Result};
use crate::host::Profile;

// ============================================================================
// CONFIG
// ============================================================================

/// Settings applied when a [`DefaultReflection`] is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionConfig {
    /// Overrides the profile reported by the default loader.
    pub profile: Option<Profile>,
    /// Initial capacity of the type cache.
    pub cache_capacity_hint: usize,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            profile: None,
            cache_capacity_hint: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl ReflectionConfig {
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity_hint = capacity;
        self
    }

    /// Read `REFLECT_PROFILE` and `REFLECT_CACHE_CAPACITY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_PROFILE) {
            config.profile = Some(value.parse()?);
        }
        if let Some(value) = lookup(ENV_CACHE_CAPACITY) {
            config.cache_capacity_hint = match value.trim().parse() {
                Ok(capacity) => capacity,
                Err(_) => {
                    return Err(ReflectError::InvalidConfig {
                        key: ENV_CACHE_CAPACITY,
                        value,
                    });
                }
            };
        }
        Ok(config)
    }
}

// ============================================================================
// PROCESS-WIDE INSTANCE
// ============================================================================

static INSTANCE: LazyLock<RwLock<Arc<dyn Reflection>>> =
    LazyLock::new(|| RwLock::new(Arc::new(DefaultReflection::default())));

/// The active backend.
pub fn instance() -> Arc<dyn Reflection> {
    INSTANCE.read().clone()
}

/// Replace the active backend, returning the previous one.
///
/// Handles obtained from the previous backend stay usable.
pub fn set_instance(reflection: Arc<dyn Reflection>) -> Arc<dyn Reflection> {
    let previous = std::mem::replace(&mut *INSTANCE.write(), reflection);
    debug!(?previous, "replaced reflection backend");
    previous
}

/// Install a fresh `R::default()` as the active backend.
pub fn configure<R: Reflection + Default + 'static>() -> Arc<dyn Reflection> {
    set_instance(Arc::new(R::default()))
}

/// [`Reflection::get_constructor`] on the active backend.
pub fn get_constructor(signature: &str) -> Result<Option<Constructor>> {
    instance().get_constructor(signature)
}

/// [`Reflection::get_method`] on the active backend.
pub fn get_method(signature: &str) -> Result<Option<Method>> {
    instance().get_method(signature)
}
