//! # VEINFORGE Shared
//!
//! Types exchanged between the ore generator and the host world runtime.
//!
//! ## Coordinate hierarchy
//!
//! ```text
//! region (32x32 tiles) = 8x8 veins
//! vein   (4x4 tiles)
//! tile   (atomic unit)
//! ```
//!
//! All conversions are arithmetic shifts, so negative coordinates floor
//! toward negative infinity: tile `-1` lives in vein `-1` and region `-1`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod coords;
pub mod placement;

pub use constants::{
    DEFAULT_LAYERS, NO_DEPOSIT, SHIFT_TILE_FROM_REGION, SHIFT_TILE_FROM_VEIN,
    SHIFT_VEIN_FROM_REGION, SIZE_SCALE, TILES_PER_VEIN, TILES_PER_VEIN_AXIS, VEINS_PER_REGION,
    VEINS_PER_REGION_AXIS,
};
pub use coords::{
    first_tile_of_vein, first_vein_of_region, region_of, vein_of, DimensionId, RegionCoord,
    TileCoord, VeinCoord,
};
pub use placement::TilePlacement;
