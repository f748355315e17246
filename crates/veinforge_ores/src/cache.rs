//! # Region Cache
//!
//! Per-dimension store of generated regions, keyed by exact region
//! coordinate. Each region is generated at most once per session.
//!
//! ## Locking
//!
//! - Cached reads take the read lock only.
//! - Misses generate under the session lock (one generator at a time) and
//!   re-check the cache there, so two racing callers never generate twice.
//! - A region is published with a single write once it is complete; a
//!   failed request publishes nothing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use veinforge_shared::{DimensionId, RegionCoord};

use crate::error::OreResult;
use crate::region::{RegionKey, RegionOre};
use crate::session::{GenerationContext, GenerationSession};

/// Cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered from the cache.
    pub hits: u64,
    /// Regions generated and published.
    pub generated: u64,
    /// Regions currently cached.
    pub cached: usize,
}

/// Generated regions, grouped by dimension.
pub struct RegionCache {
    dimensions: RwLock<HashMap<DimensionId, HashMap<RegionCoord, Arc<RegionOre>>>>,
    capacity: usize,
    hits: AtomicU64,
    generated: AtomicU64,
}

impl Default for RegionCache {
    fn default() -> Self {
        Self::new(64)
    }
}

impl RegionCache {
    /// Creates an empty cache; `capacity` pre-sizes each dimension's map.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            dimensions: RwLock::new(HashMap::new()),
            capacity,
            hits: AtomicU64::new(0),
            generated: AtomicU64::new(0),
        }
    }

    /// Returns the cached region, never generating.
    #[must_use]
    pub fn get(&self, key: RegionKey) -> Option<Arc<RegionOre>> {
        self.dimensions
            .read()
            .get(&key.dimension)
            .and_then(|regions| regions.get(&key.region))
            .cloned()
    }

    /// Returns the cached region or generates it with `generate`.
    ///
    /// `generate` runs with the session context locked; it is not called at
    /// all on a cache hit.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveRandomSource` on a miss while no session is active.
    pub fn get_or_generate<F>(
        &self,
        key: RegionKey,
        session: &GenerationSession,
        generate: F,
    ) -> OreResult<Arc<RegionOre>>
    where
        F: FnOnce(&mut GenerationContext) -> RegionOre,
    {
        if let Some(region) = self.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(region);
        }

        session.with_context(|ctx| {
            // Another caller may have published while we waited for the lock.
            if let Some(region) = self.get(key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return region;
            }
            let region = Arc::new(generate(ctx));
            debug_assert_eq!(region.key(), key);
            self.publish(key, region)
        })
    }

    fn publish(&self, key: RegionKey, region: Arc<RegionOre>) -> Arc<RegionOre> {
        let mut dimensions = self.dimensions.write();
        let regions = dimensions
            .entry(key.dimension)
            .or_insert_with(|| HashMap::with_capacity(self.capacity));
        self.generated.fetch_add(1, Ordering::Relaxed);
        Arc::clone(regions.entry(key.region).or_insert(region))
    }

    /// Regions cached across all dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dimensions.read().values().map(HashMap::len).sum()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Regions cached for one dimension.
    #[must_use]
    pub fn dimension_len(&self, dimension: DimensionId) -> usize {
        self.dimensions.read().get(&dimension).map_or(0, HashMap::len)
    }

    /// Drops every cached region of one dimension (dimension unloaded).
    pub fn clear_dimension(&self, dimension: DimensionId) -> usize {
        self.dimensions
            .write()
            .remove(&dimension)
            .map_or(0, |regions| regions.len())
    }

    /// Drops everything (session ended).
    pub fn clear(&self) {
        self.dimensions.write().clear();
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            generated: self.generated.load(Ordering::Relaxed),
            cached: self.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DepositType, WeightedCatalog};
    use crate::error::OreError;
    use crate::region::generate_region;
    use crate::session::WorldSeed;
    use std::thread;

    fn catalog() -> WeightedCatalog {
        WeightedCatalog::new()
            .with(DimensionId(0), 0, DepositType::new(1, "iron", 2, 5, 3))
            .unwrap()
            .with(DimensionId(0), 0, DepositType::new(2, "tin", 1, 4, 1))
            .unwrap()
    }

    fn key(x: i32, z: i32) -> RegionKey {
        RegionKey::new(RegionCoord::new(x, z), DimensionId(0))
    }

    #[test]
    fn test_generates_once() {
        let cache = RegionCache::default();
        let session = GenerationSession::new();
        session.start(WorldSeed::new(1));
        let catalog = catalog();

        let first = cache
            .get_or_generate(key(0, 0), &session, |ctx| {
                generate_region(key(0, 0), 1, &catalog, ctx)
            })
            .unwrap();
        let second = cache
            .get_or_generate(key(0, 0), &session, |_| unreachable!("cached region regenerated"))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), CacheStats { hits: 1, generated: 1, cached: 1 });
    }

    #[test]
    fn test_miss_without_session_publishes_nothing() {
        let cache = RegionCache::default();
        let session = GenerationSession::new();
        let catalog = catalog();

        let result = cache.get_or_generate(key(0, 0), &session, |ctx| {
            generate_region(key(0, 0), 1, &catalog, ctx)
        });
        assert_eq!(result.err(), Some(OreError::NoActiveRandomSource));
        assert!(cache.is_empty());
        assert!(cache.get(key(0, 0)).is_none());
    }

    #[test]
    fn test_dimensions_are_separate() {
        let cache = RegionCache::default();
        let session = GenerationSession::new();
        session.start(WorldSeed::new(1));
        let catalog = catalog();

        let nether = RegionKey::new(RegionCoord::new(0, 0), DimensionId(-1));
        for k in [key(0, 0), key(1, 0), nether] {
            cache
                .get_or_generate(k, &session, |ctx| generate_region(k, 1, &catalog, ctx))
                .unwrap();
        }

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.dimension_len(DimensionId(0)), 2);
        assert_eq!(cache.dimension_len(DimensionId(-1)), 1);
        assert_eq!(cache.clear_dimension(DimensionId(0)), 2);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_requests_generate_once() {
        let cache = Arc::new(RegionCache::default());
        let session = Arc::new(GenerationSession::new());
        session.start(WorldSeed::new(77));
        let catalog = Arc::new(catalog());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let session = Arc::clone(&session);
                let catalog = Arc::clone(&catalog);
                thread::spawn(move || {
                    cache
                        .get_or_generate(key(2, 2), &session, |ctx| {
                            generate_region(key(2, 2), 1, catalog.as_ref(), ctx)
                        })
                        .unwrap()
                })
            })
            .collect();

        let regions: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(regions.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(cache.stats().generated, 1);
        assert_eq!(cache.stats().hits, 7);
    }
}
