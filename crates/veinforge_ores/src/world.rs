//! # Ore World
//!
//! Entry point for the host: one `OreWorld` per running world. Ties the
//! session random source, the region cache and the region ledger to a
//! deposit catalog.
//!
//! ## Lifecycle
//!
//! ```text
//! world load   -> load_ledger(snapshot)
//! server start -> start_session(world seed)
//! tile queries -> locate / populate_region_at
//! world save   -> save_ledger()
//! server stop  -> end_session()
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use veinforge_shared::{DimensionId, TileCoord};

use crate::cache::{CacheStats, RegionCache};
use crate::catalog::DepositCatalog;
use crate::config::OreConfig;
use crate::error::OreResult;
use crate::ledger::{LedgerSnapshot, RegionLedger};
use crate::lookup::{locate, OreHit};
use crate::placement::{write_region, PlacementOutcome, TileStorage};
use crate::region::{generate_region, RegionKey, RegionOre};
use crate::session::{GenerationSession, WorldSeed};

/// World-level counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Region cache counters.
    pub cache: CacheStats,
    /// Region hashes recorded in the ledger.
    pub recorded_regions: usize,
    /// Whether a session random source is active.
    pub session_active: bool,
}

/// Ore generation and lookup for one world.
pub struct OreWorld<C: DepositCatalog> {
    config: OreConfig,
    catalog: C,
    session: GenerationSession,
    cache: RegionCache,
    ledger: Mutex<RegionLedger>,
}

impl<C: DepositCatalog> OreWorld<C> {
    /// Creates a world with no active session and an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the config fails validation.
    pub fn new(config: OreConfig, catalog: C) -> OreResult<Self> {
        config.validate()?;
        let cache = RegionCache::new(config.region_capacity);
        Ok(Self {
            config,
            catalog,
            session: GenerationSession::new(),
            cache,
            ledger: Mutex::new(RegionLedger::new()),
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &OreConfig {
        &self.config
    }

    /// The deposit catalog.
    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    // ========================================================================
    // Session lifecycle
    // ========================================================================

    /// Starts a session seeded from the world seed. Regions cached by a
    /// previous session are dropped.
    ///
    /// The cache is cleared under the session lock, after any generation
    /// still running on the old source has published.
    pub fn start_session(&self, seed: WorldSeed) {
        self.session.start_with(seed, || self.cache.clear());
    }

    /// Ends the session and drops every cached region.
    pub fn end_session(&self) -> bool {
        self.session.end_with(|| self.cache.clear())
    }

    /// Returns true while a session is active.
    #[must_use]
    pub fn is_session_active(&self) -> bool {
        self.session.is_active()
    }

    // ========================================================================
    // Generation & lookup
    // ========================================================================

    /// Returns the region, generating it on first request.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveRandomSource` if it must be generated outside a session.
    pub fn get_or_generate(&self, key: RegionKey) -> OreResult<Arc<RegionOre>> {
        let layers = self.config.layers;
        self.cache.get_or_generate(key, &self.session, |ctx| {
            generate_region(key, layers, &self.catalog, ctx)
        })
    }

    /// Returns the region only if it was already generated.
    #[must_use]
    pub fn cached_region(&self, key: RegionKey) -> Option<Arc<RegionOre>> {
        self.cache.get(key)
    }

    /// Finds the deposit on a tile, generating its region if needed.
    ///
    /// `Ok(None)` means the tile has no deposit.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveRandomSource` if generation is needed outside a session.
    pub fn locate(
        &self,
        tile_x: i32,
        tile_z: i32,
        dimension: DimensionId,
    ) -> OreResult<Option<OreHit>> {
        let tile = TileCoord::new(tile_x, tile_z);
        let region = self.get_or_generate(RegionKey::containing(tile, dimension))?;
        Ok(locate(&region, tile))
    }

    /// Like `locate`, but never generates: `None` if the region is not cached.
    #[must_use]
    pub fn peek(&self, tile_x: i32, tile_z: i32, dimension: DimensionId) -> Option<OreHit> {
        let tile = TileCoord::new(tile_x, tile_z);
        let region = self.cache.get(RegionKey::containing(tile, dimension))?;
        locate(&region, tile)
    }

    // ========================================================================
    // Placement & ledger
    // ========================================================================

    /// Writes the region containing `tile` into host storage, once per world.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveRandomSource` if generation is needed outside a
    /// session, or `HashCollision` if another region already recorded the
    /// same ledger hash this session (nothing is written in that case).
    pub fn populate_region_at<S: TileStorage + ?Sized>(
        &self,
        tile: TileCoord,
        dimension: DimensionId,
        storage: &mut S,
    ) -> OreResult<PlacementOutcome> {
        let key = RegionKey::containing(tile, dimension);
        let region = self.get_or_generate(key)?;

        let mut ledger = self.ledger.lock();
        ledger.check_region(key)?;
        if !ledger.is_region_unrecorded(key) {
            return Ok(PlacementOutcome::AlreadyRecorded);
        }

        let written = write_region(&region, storage);
        ledger.record_region(key)?;
        Ok(PlacementOutcome::Written(written))
    }

    /// Records a raw region hash. Returns true if it was new.
    pub fn mark_recorded(&self, hash: i32) -> bool {
        self.ledger.lock().mark_recorded(hash)
    }

    /// Returns true if the hash has not been recorded.
    #[must_use]
    pub fn is_unrecorded(&self, hash: i32) -> bool {
        self.ledger.lock().is_unrecorded(hash)
    }

    /// Seeds the ledger from persisted state (world load).
    pub fn load_ledger(&self, snapshot: &LedgerSnapshot) {
        self.ledger.lock().restore(snapshot);
        tracing::info!("Loaded ore ledger with {} regions", snapshot.hashes.len());
    }

    /// Copies the ledger for persistence (world save).
    ///
    /// The ledger stays locked for the whole copy, so no recording
    /// interleaves with the snapshot.
    #[must_use]
    pub fn save_ledger(&self) -> LedgerSnapshot {
        let snapshot = self.ledger.lock().snapshot();
        tracing::info!("Saved ore ledger with {} regions", snapshot.hashes.len());
        snapshot
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        WorldStats {
            cache: self.cache.stats(),
            recorded_regions: self.ledger.lock().len(),
            session_active: self.session.is_active(),
        }
    }
}
