//! # Lookup API
//!
//! Answers "what is on this tile" against a generated region, and "which
//! tiles share a vein with this one" without generating anything.

use std::sync::Arc;

use veinforge_shared::TileCoord;

use crate::region::{RegionOre, TileOre, VeinOre};

/// A tile found inside a generated vein.
///
/// Holds a shared, read-only handle to the region; the cache keeps
/// ownership of the generated data.
#[derive(Clone, Debug)]
pub struct OreHit {
    region: Arc<RegionOre>,
    layer: u8,
    vein_index: usize,
    tile_index: usize,
}

impl OreHit {
    /// Region containing the hit.
    #[must_use]
    pub fn region(&self) -> &RegionOre {
        &self.region
    }

    /// Layer the vein belongs to.
    #[must_use]
    pub const fn layer(&self) -> u8 {
        self.layer
    }

    /// The matched vein.
    #[must_use]
    pub fn vein(&self) -> &VeinOre {
        &self.region.veins(self.layer)[self.vein_index]
    }

    /// The matched tile entry.
    #[must_use]
    pub fn tile(&self) -> &TileOre {
        &self.vein().tiles()[self.tile_index]
    }

    /// Deposit id of the vein.
    #[must_use]
    pub fn deposit_id(&self) -> i32 {
        self.vein().deposit_id()
    }

    /// Size of the matched tile.
    #[must_use]
    pub fn size(&self) -> i32 {
        self.tile().size
    }

    /// All 16 tiles of the matched vein.
    #[must_use]
    pub fn extent(&self) -> Vec<TileCoord> {
        self.vein().extent().collect()
    }
}

/// Finds `tile` in one layer of `region`.
#[must_use]
pub fn locate_in_layer(region: &Arc<RegionOre>, layer: u8, tile: TileCoord) -> Option<OreHit> {
    region
        .veins(layer)
        .iter()
        .enumerate()
        .find_map(|(vein_index, vein)| {
            vein.tile_index(tile).map(|tile_index| OreHit {
                region: Arc::clone(region),
                layer,
                vein_index,
                tile_index,
            })
        })
}

/// Finds `tile` in `region`, scanning layers in order. The first layer with
/// a vein over the tile wins.
#[must_use]
pub fn locate(region: &Arc<RegionOre>, tile: TileCoord) -> Option<OreHit> {
    region
        .layers()
        .find_map(|(layer, _)| locate_in_layer(region, layer, tile))
}

/// Every layer's hit for `tile`, in layer order.
#[must_use]
pub fn locate_all(region: &Arc<RegionOre>, tile: TileCoord) -> Vec<OreHit> {
    region
        .layers()
        .filter_map(|(layer, _)| locate_in_layer(region, layer, tile))
        .collect()
}

/// Tile coordinates of the vein that would contain `tile`.
///
/// Re-walks the owning region's veins in generation order, building each
/// coordinate-only vein and stopping at the first one holding `tile`.
/// Needs no session and touches no random source. Empty if no vein
/// contains the tile.
#[must_use]
pub fn tiles_of_vein_containing(tile: TileCoord) -> Vec<TileCoord> {
    tile.region()
        .veins()
        .map(VeinOre::enumerate)
        .find(|vein| vein.tile_index(tile).is_some())
        .map(|vein| vein.extent().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DepositType, WeightedCatalog};
    use crate::region::{generate_region, RegionKey};
    use crate::session::{GenerationContext, WorldSeed};
    use veinforge_shared::{DimensionId, VeinCoord};

    fn region_at(tile: TileCoord, catalog: &WeightedCatalog) -> Arc<RegionOre> {
        let key = RegionKey::containing(tile, DimensionId(0));
        Arc::new(generate_region(key, 2, catalog, &mut GenerationContext::new(WorldSeed::new(21))))
    }

    #[test]
    fn test_locate_finds_vein_and_tile() {
        let catalog = WeightedCatalog::new()
            .with(DimensionId(0), 0, DepositType::new(1, "iron", 2, 5, 1))
            .unwrap();
        let tile = TileCoord::new(-1, -1);
        let region = region_at(tile, &catalog);

        let hit = locate(&region, tile).unwrap();
        assert_eq!(hit.layer(), 0);
        assert_eq!(hit.vein().coord(), VeinCoord::new(-1, -1));
        assert_eq!(hit.tile().coord, tile);
        assert_eq!(hit.deposit_id(), 1);
        assert!((2000..5000).contains(&hit.size()));
        assert_eq!(hit.extent(), tiles_of_vein_containing(tile));
        assert_eq!(locate_all(&region, tile).len(), 1);
    }

    #[test]
    fn test_locate_misses_on_empty_catalog() {
        let catalog = WeightedCatalog::new();
        let region = region_at(TileCoord::new(10, 10), &catalog);
        assert!(locate(&region, TileCoord::new(10, 10)).is_none());
        assert!(locate_in_layer(&region, 0, TileCoord::new(10, 10)).is_none());
    }

    #[test]
    fn test_locate_outside_region() {
        let catalog = WeightedCatalog::new()
            .with(DimensionId(0), 0, DepositType::new(1, "iron", 2, 5, 1))
            .unwrap();
        let region = region_at(TileCoord::new(0, 0), &catalog);
        assert!(locate(&region, TileCoord::new(32, 0)).is_none());
    }

    #[test]
    fn test_tiles_of_vein_containing() {
        let tiles = tiles_of_vein_containing(TileCoord::new(0, 0));
        assert_eq!(tiles.len(), 16);
        assert_eq!(tiles.first(), Some(&TileCoord::new(0, 0)));
        assert_eq!(tiles.last(), Some(&TileCoord::new(3, 3)));

        let negative = tiles_of_vein_containing(TileCoord::new(-5, 6));
        assert_eq!(negative.len(), 16);
        assert!(negative.iter().all(|t| t.vein() == VeinCoord::new(-2, 1)));
        assert!(negative.contains(&TileCoord::new(-5, 6)));
    }
}
