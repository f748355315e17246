//! # Hierarchy & Generation Constants
//!
//! **CRITICAL:** These values define the world layout. Changing any shift
//! moves every deposit in every existing world and invalidates saved
//! region ledgers.

// =============================================================================
// COORDINATE HIERARCHY
// =============================================================================

/// Tile -> vein shift (each vein spans 4x4 tiles).
pub const SHIFT_TILE_FROM_VEIN: u32 = 2;

/// Vein -> region shift (each region spans 8x8 veins).
pub const SHIFT_VEIN_FROM_REGION: u32 = 3;

/// Tile -> region shift (each region spans 32x32 tiles).
pub const SHIFT_TILE_FROM_REGION: u32 = SHIFT_TILE_FROM_VEIN + SHIFT_VEIN_FROM_REGION;

/// Tiles along one axis of a vein.
pub const TILES_PER_VEIN_AXIS: i32 = 1 << SHIFT_TILE_FROM_VEIN;

/// Veins along one axis of a region.
pub const VEINS_PER_REGION_AXIS: i32 = 1 << SHIFT_VEIN_FROM_REGION;

/// Tile entries in every vein.
pub const TILES_PER_VEIN: usize = (TILES_PER_VEIN_AXIS * TILES_PER_VEIN_AXIS) as usize;

/// Vein slots per layer in every region.
pub const VEINS_PER_REGION: usize = (VEINS_PER_REGION_AXIS * VEINS_PER_REGION_AXIS) as usize;

// =============================================================================
// GENERATION
// =============================================================================

/// Multiplier applied to catalog size ranges before drawing tile sizes.
pub const SIZE_SCALE: i32 = 1000;

/// Default number of independent generation layers (ores, fluids).
pub const DEFAULT_LAYERS: u8 = 2;

/// Deposit id of a vein built purely for coordinate enumeration.
pub const NO_DEPOSIT: i32 = -1;
