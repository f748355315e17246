//! Placement records handed to the host's tile storage.
//!
//! The generator emits one record per deposit-bearing tile. How the host
//! encodes it into per-tile storage is the host's business.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::coords::TileCoord;

/// One deposit written into one tile.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct TilePlacement {
    /// Tile X coordinate.
    pub tile_x: i32,
    /// Tile Z coordinate.
    pub tile_z: i32,
    /// Deposit type id of the owning vein.
    pub deposit_id: i32,
    /// Deposit size (scaled by `SIZE_SCALE`).
    pub size: i32,
    /// Generation layer the deposit belongs to.
    pub layer: u8,
    /// Padding
    pub _pad: [u8; 3],
}

impl TilePlacement {
    /// Creates a placement record.
    #[inline]
    #[must_use]
    pub const fn new(tile: TileCoord, layer: u8, deposit_id: i32, size: i32) -> Self {
        Self {
            tile_x: tile.x,
            tile_z: tile.z,
            deposit_id,
            size,
            layer,
            _pad: [0; 3],
        }
    }

    /// Tile this record targets.
    #[inline]
    #[must_use]
    pub const fn tile(&self) -> TileCoord {
        TileCoord::new(self.tile_x, self.tile_z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<TilePlacement>(), 20);

        let records = [
            TilePlacement::new(TileCoord::new(-1, 2), 1, 7, 2500),
            TilePlacement::new(TileCoord::new(3, -4), 0, 9, 4999),
        ];
        let bytes: &[u8] = bytemuck::cast_slice(&records);
        assert_eq!(bytes.len(), 40);

        let back: &[TilePlacement] = bytemuck::cast_slice(bytes);
        assert_eq!(back[0].tile(), TileCoord::new(-1, 2));
        assert_eq!(back[1].layer, 0);
    }
}
