//! # Region Generator
//!
//! A region is the unit of generation: 8x8 vein slots per layer, each vein
//! 4x4 tiles. Generation walks layers in order and, inside a layer, vein
//! slots x-outer/z-inner. Each slot costs one catalog pick; each filled
//! slot then costs 16 size draws. That order is the reproducibility
//! contract with the session random source.

use veinforge_shared::{
    DimensionId, RegionCoord, TileCoord, VeinCoord, NO_DEPOSIT, TILES_PER_VEIN, VEINS_PER_REGION,
};

use crate::catalog::{DepositCatalog, DepositType};
use crate::session::GenerationContext;

/// Exact identity of a region within a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionKey {
    /// Region coordinate.
    pub region: RegionCoord,
    /// Dimension the region belongs to.
    pub dimension: DimensionId,
}

impl RegionKey {
    /// Creates a region key.
    #[inline]
    #[must_use]
    pub const fn new(region: RegionCoord, dimension: DimensionId) -> Self {
        Self { region, dimension }
    }

    /// Key of the region containing `tile`.
    #[inline]
    #[must_use]
    pub const fn containing(tile: TileCoord, dimension: DimensionId) -> Self {
        Self::new(tile.region(), dimension)
    }
}

/// One tile of a vein.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileOre {
    /// Tile coordinate.
    pub coord: TileCoord,
    /// Deposit size, scaled by `SIZE_SCALE` (0 for enumeration-only veins).
    pub size: i32,
}

/// A 4x4 block of tiles sharing one deposit type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VeinOre {
    coord: VeinCoord,
    deposit_id: i32,
    tiles: Vec<TileOre>,
}

impl VeinOre {
    /// Builds a coordinate-only vein (`NO_DEPOSIT`, zero sizes).
    ///
    /// Consumes no randomness; used to reconstruct vein extents.
    #[must_use]
    pub fn enumerate(coord: VeinCoord) -> Self {
        Self {
            coord,
            deposit_id: NO_DEPOSIT,
            tiles: coord.tiles().map(|tile| TileOre { coord: tile, size: 0 }).collect(),
        }
    }

    /// Builds a vein of `deposit`, drawing an independent size per tile.
    fn generate(coord: VeinCoord, deposit: &DepositType, ctx: &mut GenerationContext) -> Self {
        let mut tiles = Vec::with_capacity(TILES_PER_VEIN);
        for tile in coord.tiles() {
            tiles.push(TileOre {
                coord: tile,
                size: deposit.draw_size(ctx.rng()),
            });
        }
        Self {
            coord,
            deposit_id: deposit.id,
            tiles,
        }
    }

    /// Vein coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> VeinCoord {
        self.coord
    }

    /// Deposit type id, or `NO_DEPOSIT`.
    #[inline]
    #[must_use]
    pub const fn deposit_id(&self) -> i32 {
        self.deposit_id
    }

    /// Returns true if a deposit type was assigned.
    #[inline]
    #[must_use]
    pub const fn has_deposit(&self) -> bool {
        self.deposit_id != NO_DEPOSIT
    }

    /// The 16 tile entries, x outer and z inner.
    #[inline]
    #[must_use]
    pub fn tiles(&self) -> &[TileOre] {
        &self.tiles
    }

    /// Index of `tile` in `tiles()`, if the vein contains it.
    #[must_use]
    pub fn tile_index(&self, tile: TileCoord) -> Option<usize> {
        self.tiles.iter().position(|entry| entry.coord == tile)
    }

    /// Tile entry for `tile`, if the vein contains it.
    #[must_use]
    pub fn tile(&self, tile: TileCoord) -> Option<&TileOre> {
        self.tile_index(tile).map(|index| &self.tiles[index])
    }

    /// Tile coordinates covered by this vein.
    pub fn extent(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.tiles.iter().map(|entry| entry.coord)
    }
}

/// All veins of one region, per layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionOre {
    key: RegionKey,
    layers: Vec<Vec<VeinOre>>,
}

impl RegionOre {
    /// Region identity.
    #[inline]
    #[must_use]
    pub const fn key(&self) -> RegionKey {
        self.key
    }

    /// Region coordinate.
    #[inline]
    #[must_use]
    pub const fn region(&self) -> RegionCoord {
        self.key.region
    }

    /// Dimension.
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> DimensionId {
        self.key.dimension
    }

    /// Number of generated layers.
    #[inline]
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Veins of one layer, in generation order. Empty for unknown layers.
    #[must_use]
    pub fn veins(&self, layer: u8) -> &[VeinOre] {
        self.layers
            .get(usize::from(layer))
            .map_or(&[][..], Vec::as_slice)
    }

    /// `(layer, veins)` pairs in layer order.
    pub fn layers(&self) -> impl Iterator<Item = (u8, &[VeinOre])> + '_ {
        (0u8..).zip(self.layers.iter().map(Vec::as_slice))
    }

    /// Total veins across all layers.
    #[must_use]
    pub fn vein_count(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }
}

/// Generates every layer of one region.
///
/// Slots where the catalog has nothing are skipped, not stored as empty
/// placeholders. The region is only returned once complete.
pub fn generate_region<C>(
    key: RegionKey,
    layers: u8,
    catalog: &C,
    ctx: &mut GenerationContext,
) -> RegionOre
where
    C: DepositCatalog + ?Sized,
{
    let mut generated = Vec::with_capacity(usize::from(layers));

    for layer in 0..layers {
        let mut veins = Vec::with_capacity(VEINS_PER_REGION);
        for coord in key.region.veins() {
            if let Some(deposit) = catalog.pick_deposit(layer, key.dimension, ctx.rng()) {
                veins.push(VeinOre::generate(coord, deposit, ctx));
            }
        }
        generated.push(veins);
    }

    ctx.note_region_generated();

    let region = RegionOre {
        key,
        layers: generated,
    };
    tracing::debug!(
        "Generated region ({}, {}) dim {}: {} veins over {} layers",
        key.region.x,
        key.region.z,
        key.dimension.value(),
        region.vein_count(),
        layers
    );
    region
}
