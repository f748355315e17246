//! Generation configuration.
//!
//! Loaded once when the world starts, usually from the host's TOML config:
//!
//! ```toml
//! layers = 2
//! region_capacity = 1024
//! ```

use serde::{Deserialize, Serialize};
use veinforge_shared::DEFAULT_LAYERS;

use crate::error::{OreError, OreResult};

/// Upper bound on generation layers.
pub const MAX_LAYERS: u8 = 16;

/// Ore generation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OreConfig {
    /// Independent generation passes per region (layer 0 = ores, 1 = fluids).
    pub layers: u8,
    /// Initial capacity of each dimension's region cache.
    pub region_capacity: usize,
}

impl Default for OreConfig {
    fn default() -> Self {
        Self {
            layers: DEFAULT_LAYERS,
            region_capacity: 64,
        }
    }
}

impl OreConfig {
    /// Production settings (large servers, many explored regions).
    #[must_use]
    pub fn production() -> Self {
        Self {
            layers: DEFAULT_LAYERS,
            region_capacity: 4096,
        }
    }

    /// Parses and validates a TOML document. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the document does not parse or fails validation.
    pub fn from_toml_str(source: &str) -> OreResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| OreError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `layers` is outside `1..=MAX_LAYERS`.
    pub fn validate(&self) -> OreResult<()> {
        if self.layers == 0 || self.layers > MAX_LAYERS {
            return Err(OreError::InvalidConfig(format!(
                "layers must be in 1..={MAX_LAYERS}, got {}",
                self.layers
            )));
        }
        Ok(())
    }
}
