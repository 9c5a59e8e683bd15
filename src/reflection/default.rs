//! The default resolver backend.

use indexmap::IndexSet;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use super::Reflection;
use super::cache::{Probe, TypeCache};
use super::config::ReflectionConfig;
use super::handles::{Constructor, Method};
use crate::error::Result;
use crate::host::{Profile, SearchScope, TypeHandle, TypeRegistry};
use crate::signature::{ParamType, Signature};

/// Resolver over a default scope plus registered search scopes.
///
/// A miss searches the default scope first, then every registered scope in
/// registration order; the first hit is cached by name. Member lookups are
/// only offered when the profile supports them (see [`Profile`]).
#[derive(Debug)]
pub struct DefaultReflection {
    default_scope: SearchScope,
    scopes: RwLock<IndexSet<SearchScope>>,
    cache: TypeCache,
    profile: Profile,
}

impl DefaultReflection {
    /// Resolver over `scope` with the profile it reports.
    pub fn new(scope: impl Into<SearchScope>) -> Self {
        Self::with_config(scope, &ReflectionConfig::default())
    }

    /// Resolver over `scope`; a profile set in `config` overrides the loader's.
    pub fn with_config(scope: impl Into<SearchScope>, config: &ReflectionConfig) -> Self {
        let default_scope = scope.into();
        let reported = default_scope.loader().profile();
        let profile = config.profile.unwrap_or(reported);
        debug!(%profile, %reported, "creating resolver");
        Self {
            default_scope,
            scopes: RwLock::new(IndexSet::new()),
            cache: TypeCache::with_capacity(config.cache_capacity_hint),
            profile,
        }
    }

    /// Resolver over [`TypeRegistry::system`], configured from the environment.
    pub fn system() -> Self {
        let config = ReflectionConfig::from_env().unwrap_or_else(|err| {
            warn!(%err, "ignoring reflection environment");
            ReflectionConfig::default()
        });
        Self::with_config(TypeRegistry::system(), &config)
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn default_scope(&self) -> &SearchScope {
        &self.default_scope
    }

    /// Registered search scopes in registration order.
    pub fn search_scopes(&self) -> Vec<SearchScope> {
        self.scopes.read().iter().cloned().collect()
    }

    /// Number of cached name resolutions.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    fn search(&self, name: &str) -> Option<TypeHandle> {
        if let Some(found) = self.default_scope.load_type(name) {
            return Some(found);
        }
        // Loaders run outside the lock.
        let scopes = self.search_scopes();
        scopes.iter().enumerate().find_map(|(index, scope)| {
            let found = scope.load_type(name);
            trace!(name, scope = index, found = found.is_some(), "searched scope");
            found
        })
    }

    /// Resolve every parameter; `None` if any one of them is unknown.
    fn resolve_params(&self, params: &[ParamType<'_>]) -> Option<Vec<TypeHandle>> {
        params
            .iter()
            .map(|param| param.resolve(|name| self.get_type(name)))
            .collect()
    }
}

impl Default for DefaultReflection {
    fn default() -> Self {
        Self::system()
    }
}

impl Reflection for DefaultReflection {
    fn add_search_scope(&self, scope: SearchScope) {
        let added = self.scopes.write().insert(scope);
        debug!(added, "add search scope");
    }

    fn remove_search_scope(&self, scope: &SearchScope) {
        let removed = self.scopes.write().shift_remove(scope);
        self.cache.invalidate();
        debug!(removed, "remove search scope, type cache invalidated");
    }

    fn get_type(&self, name: &str) -> Option<TypeHandle> {
        let seen = match self.cache.probe(name) {
            Probe::Hit(handle) => {
                trace!(name, "type cache hit");
                return Some(handle);
            }
            Probe::Miss(seen) => seen,
        };
        trace!(name, "type cache miss");

        let found = self.search(name)?;
        if !self.cache.put_if_current(name, found.clone(), seen) {
            trace!(name, "cache invalidated during resolution, result not stored");
        }
        Some(found)
    }

    fn super_type(&self, ty: &TypeHandle) -> Option<TypeHandle> {
        if !self.profile.supports_members() {
            return None;
        }
        ty.super_type().cloned()
    }

    fn interfaces(&self, ty: &TypeHandle) -> Vec<TypeHandle> {
        if !self.profile.supports_members() {
            return Vec::new();
        }
        ty.interfaces().to_vec()
    }

    fn get_constructor(&self, signature: &str) -> Result<Option<Constructor>> {
        let sig = Signature::parse_constructor(signature)?;
        let params = sig.param_types()?;

        if sig.has_no_params() {
            let Some(owner) = self.get_type(sig.owner()) else {
                return Ok(None);
            };
            let label = format!("{owner} default constructor");
            return Ok(Some(Constructor::new(
                label,
                Vec::new(),
                owner.default_allocator(),
            )));
        }

        if !self.profile.supports_members() {
            trace!(signature, profile = %self.profile, "constructor lookup unsupported");
            return Ok(None);
        }
        let Some(owner) = self.get_type(sig.owner()) else {
            return Ok(None);
        };
        let Some(parameter_types) = self.resolve_params(&params) else {
            return Ok(None);
        };
        Ok(owner.constructor(&parameter_types).map(|def| {
            Constructor::new(format!("{signature} constructor"), parameter_types, def)
        }))
    }

    fn get_method(&self, signature: &str) -> Result<Option<Method>> {
        let sig = Signature::parse_method(signature)?;
        let params = sig.param_types()?;

        if !self.profile.supports_members() {
            trace!(signature, profile = %self.profile, "method lookup unsupported");
            return Ok(None);
        }
        let (Some(owner), Some(member)) = (self.get_type(sig.owner()), sig.member()) else {
            return Ok(None);
        };
        let Some(parameter_types) = self.resolve_params(&params) else {
            return Ok(None);
        };
        Ok(owner
            .method(member, &parameter_types)
            .map(|def| Method::new(format!("{signature} method"), parameter_types, def)))
    }
}
