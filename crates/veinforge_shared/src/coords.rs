//! Coordinate spaces of the deposit hierarchy.
//!
//! Free functions work on raw `(x, z)` pairs; the typed wrappers carry the
//! same conversions so callers cannot mix up tile and vein coordinates.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::constants::{
    SHIFT_TILE_FROM_REGION, SHIFT_TILE_FROM_VEIN, SHIFT_VEIN_FROM_REGION, TILES_PER_VEIN_AXIS,
    VEINS_PER_REGION_AXIS,
};

/// Region containing a tile (`>> 5`, floor for negatives).
#[inline]
#[must_use]
pub const fn region_of(tile_x: i32, tile_z: i32) -> (i32, i32) {
    (tile_x >> SHIFT_TILE_FROM_REGION, tile_z >> SHIFT_TILE_FROM_REGION)
}

/// Vein containing a tile (`>> 2`, floor for negatives).
#[inline]
#[must_use]
pub const fn vein_of(tile_x: i32, tile_z: i32) -> (i32, i32) {
    (tile_x >> SHIFT_TILE_FROM_VEIN, tile_z >> SHIFT_TILE_FROM_VEIN)
}

/// Lowest-coordinate tile of a vein.
#[inline]
#[must_use]
pub const fn first_tile_of_vein(vein_x: i32, vein_z: i32) -> (i32, i32) {
    (vein_x << SHIFT_TILE_FROM_VEIN, vein_z << SHIFT_TILE_FROM_VEIN)
}

/// Lowest-coordinate vein of a region.
#[inline]
#[must_use]
pub const fn first_vein_of_region(region_x: i32, region_z: i32) -> (i32, i32) {
    (region_x << SHIFT_VEIN_FROM_REGION, region_z << SHIFT_VEIN_FROM_REGION)
}

/// World dimension identifier (host-assigned, may be negative).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DimensionId(pub i32);

impl DimensionId {
    /// The overworld.
    pub const OVERWORLD: Self = Self(0);

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

/// Tile coordinate (the atomic addressable unit).
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable, Serialize,
    Deserialize,
)]
pub struct TileCoord {
    /// X coordinate (in tiles).
    pub x: i32,
    /// Z coordinate (in tiles).
    pub z: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Vein containing this tile.
    #[inline]
    #[must_use]
    pub const fn vein(self) -> VeinCoord {
        let (x, z) = vein_of(self.x, self.z);
        VeinCoord::new(x, z)
    }

    /// Region containing this tile.
    #[inline]
    #[must_use]
    pub const fn region(self) -> RegionCoord {
        let (x, z) = region_of(self.x, self.z);
        RegionCoord::new(x, z)
    }
}

/// Vein coordinate (4x4 tiles).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VeinCoord {
    /// X coordinate (in veins).
    pub x: i32,
    /// Z coordinate (in veins).
    pub z: i32,
}

impl VeinCoord {
    /// Creates a new vein coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// First (lowest x, lowest z) tile of this vein.
    #[inline]
    #[must_use]
    pub const fn first_tile(self) -> TileCoord {
        let (x, z) = first_tile_of_vein(self.x, self.z);
        TileCoord::new(x, z)
    }

    /// Region containing this vein.
    #[inline]
    #[must_use]
    pub const fn region(self) -> RegionCoord {
        RegionCoord::new(self.x >> SHIFT_VEIN_FROM_REGION, self.z >> SHIFT_VEIN_FROM_REGION)
    }

    /// Returns true if the tile lies inside this vein.
    #[inline]
    #[must_use]
    pub const fn contains(self, tile: TileCoord) -> bool {
        let (x, z) = vein_of(tile.x, tile.z);
        x == self.x && z == self.z
    }

    /// The 16 tiles of this vein, x outer and z inner.
    pub fn tiles(self) -> impl Iterator<Item = TileCoord> {
        let origin = self.first_tile();
        (0..TILES_PER_VEIN_AXIS).flat_map(move |dx| {
            (0..TILES_PER_VEIN_AXIS).map(move |dz| TileCoord::new(origin.x + dx, origin.z + dz))
        })
    }
}

/// Region coordinate (8x8 veins, 32x32 tiles).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionCoord {
    /// X coordinate (in regions).
    pub x: i32,
    /// Z coordinate (in regions).
    pub z: i32,
}

impl RegionCoord {
    /// Creates a new region coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Region containing a tile.
    #[inline]
    #[must_use]
    pub const fn from_tile(tile: TileCoord) -> Self {
        tile.region()
    }

    /// First (lowest x, lowest z) vein of this region.
    #[inline]
    #[must_use]
    pub const fn first_vein(self) -> VeinCoord {
        let (x, z) = first_vein_of_region(self.x, self.z);
        VeinCoord::new(x, z)
    }

    /// The 64 vein slots of this region, x outer and z inner.
    ///
    /// This is the generation order; the shared random source is consumed
    /// in exactly this sequence.
    pub fn veins(self) -> impl Iterator<Item = VeinCoord> {
        let origin = self.first_vein();
        (0..VEINS_PER_REGION_AXIS).flat_map(move |dx| {
            (0..VEINS_PER_REGION_AXIS).map(move |dz| VeinCoord::new(origin.x + dx, origin.z + dz))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_tiles_floor() {
        assert_eq!(vein_of(-1, -1), (-1, -1));
        assert_eq!(region_of(-1, -1), (-1, -1));
        assert_eq!(vein_of(-4, -5), (-1, -2));
        assert_eq!(region_of(-32, -33), (-1, -2));
        assert_eq!(region_of(31, 32), (0, 1));
    }

    #[test]
    fn test_first_tile_and_vein() {
        assert_eq!(first_tile_of_vein(-1, 2), (-4, 8));
        assert_eq!(first_vein_of_region(-1, 2), (-8, 16));
        assert_eq!(RegionCoord::new(1, -1).first_vein().first_tile(), TileCoord::new(32, -32));
    }

    #[test]
    fn test_vein_block_is_stable() {
        for vx in -3..3 {
            for vz in -3..3 {
                let vein = VeinCoord::new(vx, vz);
                let tiles: Vec<_> = vein.tiles().collect();
                assert_eq!(tiles.len(), 16);
                assert!(tiles.iter().all(|t| t.vein() == vein));
                assert!(tiles.iter().all(|t| vein.contains(*t)));
            }
        }
    }

    #[test]
    fn test_enumeration_order() {
        let tiles: Vec<_> = VeinCoord::new(0, 0).tiles().take(5).collect();
        assert_eq!(
            tiles,
            vec![
                TileCoord::new(0, 0),
                TileCoord::new(0, 1),
                TileCoord::new(0, 2),
                TileCoord::new(0, 3),
                TileCoord::new(1, 0),
            ]
        );

        let veins: Vec<_> = RegionCoord::new(-1, 0).veins().collect();
        assert_eq!(veins.len(), 64);
        assert_eq!(veins[0], VeinCoord::new(-8, 0));
        assert_eq!(veins[1], VeinCoord::new(-8, 1));
        assert_eq!(veins[63], VeinCoord::new(-1, 7));
        assert!(veins.iter().all(|v| v.region() == RegionCoord::new(-1, 0)));
    }
}
