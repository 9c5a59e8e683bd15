//! Name -> type handle cache shared by all resolution calls.
//!
//! Entries are an optimisation only. The cache carries a generation counter
//! bumped on every invalidation; a resolution started before an invalidation
//! cannot insert its result afterwards.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::host::TypeHandle;

/// Cache state observed by a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

/// Outcome of a cache probe.
#[derive(Debug, Clone)]
pub enum Probe {
    Hit(TypeHandle),
    /// Not cached; carries the generation to hand back to [`TypeCache::put_if_current`].
    Miss(Generation),
}

#[derive(Debug, Default)]
struct CacheState {
    entries: FxHashMap<SmolStr, TypeHandle>,
    generation: u64,
}

/// Thread-safe type cache keyed by name content.
#[derive(Debug, Default)]
pub struct TypeCache {
    state: RwLock<CacheState>,
}

impl TypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(CacheState {
                entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
                generation: 0,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<TypeHandle> {
        self.state.read().entries.get(name).cloned()
    }

    /// Look up `name`, capturing the generation atomically with a miss.
    pub fn probe(&self, name: &str) -> Probe {
        let state = self.state.read();
        match state.entries.get(name) {
            Some(handle) => Probe::Hit(handle.clone()),
            None => Probe::Miss(Generation(state.generation)),
        }
    }

    /// Insert unless the cache was invalidated since `seen` was observed.
    ///
    /// Returns whether the entry was stored.
    pub fn put_if_current(&self, name: &str, handle: TypeHandle, seen: Generation) -> bool {
        let mut state = self.state.write();
        if state.generation != seen.0 {
            return false;
        }
        state.entries.insert(SmolStr::new(name), handle);
        true
    }

    pub fn remove(&self, name: &str) -> Option<TypeHandle> {
        self.state.write().entries.remove(name)
    }

    /// Drop every entry and start a new generation.
    pub fn invalidate(&self) {
        let mut state = self.state.write();
        state.entries.clear();
        state.generation += 1;
    }

    pub fn generation(&self) -> Generation {
        Generation(self.state.read().generation)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.state.read().entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }
}
