//! Resolved scope configuration cache

use crate::config::{resolve, ConfigReader};
use crate::scope::{Dimension, ScopeConfig};
use moka::sync::Cache;
use parking_lot::RwLock;
use rules_common::{AtomicCounter, RuleId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type Key = (Dimension, RuleId);

/// `(clear epoch, per-key invalidation count)` at the time of a read
type Generation = (u64, u64);

/// Memoizes resolved configuration per `(dimension, rule)`
///
/// Owned by the engine and never written back to storage. Writers must
/// call [`ConfigCache::invalidate`] so the next read sees the new value.
///
/// Entries carry the generation observed before storage was read. An
/// entry whose generation no longer matches is treated as a miss, so a
/// resolve that raced with an invalidation can never be served.
pub struct ConfigCache {
    cache: Cache<Key, (Generation, Arc<ScopeConfig>)>,
    generations: RwLock<HashMap<Key, u64>>,
    epoch: AtomicU64,
    hits: AtomicCounter,
    misses: AtomicCounter,
}

impl ConfigCache {
    /// Create cache with capacity
    pub fn new(capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(capacity).build();

        Self {
            cache,
            generations: RwLock::new(HashMap::new()),
            epoch: AtomicU64::new(0),
            hits: AtomicCounter::new(0),
            misses: AtomicCounter::new(0),
        }
    }

    /// Get resolved configuration, reading through `reader` on a miss
    #[inline]
    pub fn get<R>(&self, dimension: Dimension, rule: RuleId, reader: &R) -> Arc<ScopeConfig>
    where
        R: ConfigReader + ?Sized,
    {
        let key = (dimension, rule);
        let generation = self.generation(&key);
        if let Some((cached, config)) = self.cache.get(&key) {
            if cached == generation {
                self.hits.inc();
                return config;
            }
        }

        self.misses.inc();
        tracing::debug!(%dimension, %rule, "Scope config cache miss");
        let config = Arc::new(resolve(dimension, rule, reader));
        self.cache.insert(key, (generation, Arc::clone(&config)));
        config
    }

    /// Drop one entry
    pub fn invalidate(&self, dimension: Dimension, rule: RuleId) {
        let key = (dimension, rule);
        *self.generations.write().entry(key).or_insert(0) += 1;
        self.cache.invalidate(&key);
    }

    /// Drop every dimension of one rule
    pub fn invalidate_rule(&self, rule: RuleId) {
        for dimension in Dimension::ALL {
            self.invalidate(dimension, rule);
        }
    }

    /// Clear cache
    pub fn clear(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate_all();
    }

    /// Cache hits so far
    pub fn hits(&self) -> u64 {
        self.hits.get()
    }

    /// Cache misses so far
    pub fn misses(&self) -> u64 {
        self.misses.get()
    }

    fn generation(&self, key: &Key) -> Generation {
        let epoch = self.epoch.load(Ordering::Acquire);
        let count = self.generations.read().get(key).copied().unwrap_or(0);
        (epoch, count)
    }
}

impl Default for ConfigCache {
    fn default() -> Self {
        Self::new(65536)
    }
}
