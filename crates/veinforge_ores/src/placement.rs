//! Writing generated deposits into the host's tile storage.

use std::collections::HashMap;

use veinforge_shared::{TileCoord, TilePlacement};

use crate::region::RegionOre;

/// Host-side per-tile storage that receives deposits.
pub trait TileStorage {
    /// Stores one deposit. A later write for the same tile and layer replaces
    /// the earlier one.
    fn write_deposit(&mut self, placement: TilePlacement);
}

/// Result of populating a region into tile storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// The region was written; carries the number of tile records.
    Written(usize),
    /// The ledger already had the region; storage was not touched.
    AlreadyRecorded,
}

/// Every tile record of a region, layer by layer in generation order.
pub fn region_placements(region: &RegionOre) -> impl Iterator<Item = TilePlacement> + '_ {
    region.layers().flat_map(|(layer, veins)| {
        veins.iter().flat_map(move |vein| {
            vein.tiles().iter().map(move |tile| {
                TilePlacement::new(tile.coord, layer, vein.deposit_id(), tile.size)
            })
        })
    })
}

/// Writes a whole region into `storage`. Returns the number of records.
pub fn write_region<S: TileStorage + ?Sized>(region: &RegionOre, storage: &mut S) -> usize {
    let mut written = 0;
    for placement in region_placements(region) {
        storage.write_deposit(placement);
        written += 1;
    }
    tracing::debug!(
        "Wrote {} deposit tiles for region ({}, {}) dim {}",
        written,
        region.region().x,
        region.region().z,
        region.dimension().value()
    );
    written
}

/// In-memory tile storage keyed by `(tile, layer)`.
#[derive(Clone, Debug, Default)]
pub struct MemoryTileStorage {
    tiles: HashMap<(TileCoord, u8), TilePlacement>,
    writes: usize,
}

impl MemoryTileStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposit stored for a tile on one layer.
    #[must_use]
    pub fn deposit(&self, tile: TileCoord, layer: u8) -> Option<&TilePlacement> {
        self.tiles.get(&(tile, layer))
    }

    /// Number of distinct `(tile, layer)` entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns true if nothing was stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Total writes received, including overwrites.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl TileStorage for MemoryTileStorage {
    fn write_deposit(&mut self, placement: TilePlacement) {
        self.writes += 1;
        self.tiles.insert((placement.tile(), placement.layer), placement);
    }
}
