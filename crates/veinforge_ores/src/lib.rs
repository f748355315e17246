//! # VEINFORGE Ore Generation
//!
//! Deterministic placement of resource deposits in a tile world.
//!
//! ## Design Principles
//!
//! 1. **Hierarchical**: region (32x32 tiles) -> vein (4x4 tiles) -> tile
//! 2. **Generate once**: a region is generated at most once per session
//! 3. **Explicit randomness**: one seeded source per session, passed
//!    through generation instead of read from global state
//! 4. **Write once**: the ledger records which regions reached the world
//!
//! ## Core Components
//!
//! - `DepositCatalog`: picks a deposit type per vein slot
//! - `GenerationSession`: owns the session random source
//! - `generate_region`: builds all layers of one region
//! - `RegionCache`: per-dimension store of generated regions
//! - `RegionLedger`: persisted set of already-written region hashes
//! - `OreWorld`: the facade the host talks to
//!
//! ## Example
//!
//! ```rust,ignore
//! use veinforge_ores::{DepositType, OreConfig, OreWorld, WeightedCatalog, WorldSeed};
//! use veinforge_shared::DimensionId;
//!
//! let catalog = WeightedCatalog::new()
//!     .with(DimensionId(0), 0, DepositType::new(1, "iron", 2, 5, 10))?;
//! let world = OreWorld::new(OreConfig::default(), catalog)?;
//! world.start_session(WorldSeed::new(world_seed));
//!
//! if let Some(hit) = world.locate(120, -45, DimensionId(0))? {
//!     println!("deposit {} size {}", hit.deposit_id(), hit.size());
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod lookup;
pub mod placement;
pub mod region;
pub mod session;
pub mod world;

pub use cache::{CacheStats, RegionCache};
pub use catalog::{DepositCatalog, DepositType, WeightedCatalog};
pub use config::OreConfig;
pub use error::{OreError, OreResult};
pub use ledger::{region_hash, LedgerSnapshot, RegionLedger};
pub use lookup::{locate, locate_all, locate_in_layer, tiles_of_vein_containing, OreHit};
pub use placement::{
    region_placements, write_region, MemoryTileStorage, PlacementOutcome, TileStorage,
};
pub use region::{generate_region, RegionKey, RegionOre, TileOre, VeinOre};
pub use session::{GenerationContext, GenerationSession, WorldSeed};
pub use world::{OreWorld, WorldStats};
