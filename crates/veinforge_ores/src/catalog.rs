//! # Deposit Catalog
//!
//! The catalog decides which deposit type (if any) fills a vein slot.
//! Definitions come from the host's configuration; this module only holds
//! them and performs the weighted pick.
//!
//! ## Randomness
//!
//! A pick consumes exactly one draw from the session random source, and only
//! when the pool for `(dimension, layer)` is non-empty. Callers rely on that
//! to keep generation reproducible.

use std::collections::HashMap;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use veinforge_shared::{DimensionId, SIZE_SCALE};

use crate::error::{OreError, OreResult};

/// A catalog-defined kind of deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositType {
    /// Stable id stored into every vein of this type.
    pub id: i32,
    /// Display name (host-facing only).
    pub name: String,
    /// Unscaled size range `(min, max)` as configured.
    pub size_range: (i32, i32),
    /// Relative pick weight within its pool.
    pub weight: u32,
}

impl DepositType {
    /// Creates a deposit type.
    #[must_use]
    pub fn new(
        id: i32,
        name: impl Into<String>,
        size_min: i32,
        size_max: i32,
        weight: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            size_range: (size_min, size_max),
            weight,
        }
    }

    /// Scaled size bounds `(low, high)`; tile sizes fall in `[low, high)`.
    ///
    /// A degenerate range (`min == max`) yields `low == high`, in which case
    /// every tile gets exactly `low`.
    #[inline]
    #[must_use]
    pub const fn scaled_range(&self) -> (i32, i32) {
        let (min, max) = self.size_range;
        (min.saturating_mul(SIZE_SCALE), max.saturating_mul(SIZE_SCALE))
    }

    /// Draws one tile size from the scaled range.
    pub fn draw_size(&self, rng: &mut dyn RngCore) -> i32 {
        let (low, high) = self.scaled_range();
        if low >= high {
            low
        } else {
            rng.gen_range(low..high)
        }
    }

    /// Checks the definition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDeposit` for zero weight, negative or inverted ranges.
    pub fn validate(&self) -> OreResult<()> {
        if self.weight == 0 {
            return Err(OreError::InvalidDeposit(format!(
                "deposit {} ({}) has zero weight",
                self.id, self.name
            )));
        }
        let (min, max) = self.size_range;
        if min < 0 || min > max {
            return Err(OreError::InvalidDeposit(format!(
                "deposit {} ({}) has invalid size range [{min}, {max}]",
                self.id, self.name
            )));
        }
        Ok(())
    }
}

/// Source of deposit types for vein slots.
pub trait DepositCatalog: Send + Sync {
    /// Picks a deposit type for one vein slot.
    ///
    /// `None` means "no deposit in this slot" and is a normal outcome.
    fn pick_deposit(
        &self,
        layer: u8,
        dimension: DimensionId,
        rng: &mut dyn RngCore,
    ) -> Option<&DepositType>;
}

/// Weighted pool of deposits for one `(dimension, layer)`.
#[derive(Clone, Debug, Default)]
struct DepositPool {
    entries: Vec<DepositType>,
    total_weight: u64,
}

impl DepositPool {
    fn pick(&self, rng: &mut dyn RngCore) -> Option<&DepositType> {
        if self.total_weight == 0 {
            return None;
        }
        let mut roll = rng.gen_range(0..self.total_weight);
        for entry in &self.entries {
            let weight = u64::from(entry.weight);
            if roll < weight {
                return Some(entry);
            }
            roll -= weight;
        }
        None
    }
}

/// In-memory catalog with weighted picks per dimension and layer.
#[derive(Clone, Debug, Default)]
pub struct WeightedCatalog {
    pools: HashMap<(DimensionId, u8), DepositPool>,
}

impl WeightedCatalog {
    /// Creates an empty catalog (every pick yields `None`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a deposit type to the pool of `(dimension, layer)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDeposit` if the definition fails validation.
    pub fn register(
        &mut self,
        dimension: DimensionId,
        layer: u8,
        deposit: DepositType,
    ) -> OreResult<()> {
        deposit.validate()?;
        let pool = self.pools.entry((dimension, layer)).or_default();
        pool.total_weight += u64::from(deposit.weight);
        pool.entries.push(deposit);
        Ok(())
    }

    /// Builder-style `register`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDeposit` if the definition fails validation.
    pub fn with(
        mut self,
        dimension: DimensionId,
        layer: u8,
        deposit: DepositType,
    ) -> OreResult<Self> {
        self.register(dimension, layer, deposit)?;
        Ok(self)
    }

    /// Deposit types registered for `(dimension, layer)`.
    #[must_use]
    pub fn deposits(&self, dimension: DimensionId, layer: u8) -> &[DepositType] {
        self.pools
            .get(&(dimension, layer))
            .map_or(&[][..], |pool| pool.entries.as_slice())
    }

    /// Looks up a deposit type by id in any pool.
    #[must_use]
    pub fn deposit_by_id(&self, id: i32) -> Option<&DepositType> {
        self.pools
            .values()
            .flat_map(|pool| pool.entries.iter())
            .find(|deposit| deposit.id == id)
    }
}

impl DepositCatalog for WeightedCatalog {
    fn pick_deposit(
        &self,
        layer: u8,
        dimension: DimensionId,
        rng: &mut dyn RngCore,
    ) -> Option<&DepositType> {
        self.pools.get(&(dimension, layer))?.pick(rng)
    }
}
