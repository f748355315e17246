//! # Session Random Source
//!
//! One seeded generator per running world. It is created when the world
//! session starts, consumed strictly in generation order, and dropped when
//! the session ends.
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed` and the same sequence of region requests,
//! every catalog pick and every tile size is reproduced exactly. Requests
//! arriving in a different order produce a different (but equally valid)
//! world; no attempt is made to hide that.

use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{OreError, OreResult};

/// World seed for deterministic generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

/// Sub-seed purpose for ore generation.
const ORE_STREAM: u64 = 0x4f52_4553;

/// Explicit generation context threaded through region generation.
pub struct GenerationContext {
    seed: WorldSeed,
    rng: ChaCha8Rng,
    regions_generated: u64,
}

impl GenerationContext {
    /// Creates a context whose random stream is derived from the world seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed.derive(ORE_STREAM).value()),
            regions_generated: 0,
        }
    }

    /// Seed this context was created from.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// The shared random source.
    #[inline]
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Regions generated with this context.
    #[inline]
    #[must_use]
    pub const fn regions_generated(&self) -> u64 {
        self.regions_generated
    }

    pub(crate) fn note_region_generated(&mut self) {
        self.regions_generated += 1;
    }
}

/// Lifecycle owner of the session random source.
///
/// All generation goes through `with_context`, which holds the session lock
/// for the whole call: generation is serialised, never interleaved.
#[derive(Default)]
pub struct GenerationSession {
    context: Mutex<Option<GenerationContext>>,
}

impl GenerationSession {
    /// Creates an inactive session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the session with a fresh random source.
    pub fn start(&self, seed: WorldSeed) {
        self.start_with(seed, || ());
    }

    /// Like `start`, but runs `reset` while the session lock is held.
    ///
    /// Generation in flight under the old source finishes before `reset`
    /// runs, and no generation under the new source starts until it returns.
    pub fn start_with(&self, seed: WorldSeed, reset: impl FnOnce()) {
        let mut context = self.context.lock();
        if context.is_some() {
            tracing::warn!("Restarting active ore session with seed {}", seed.value());
        }
        reset();
        *context = Some(GenerationContext::new(seed));
        tracing::info!("Ore session started (seed {})", seed.value());
    }

    /// Ends the session. Returns false if none was active.
    pub fn end(&self) -> bool {
        self.end_with(|| ())
    }

    /// Like `end`, but runs `reset` while the session lock is held.
    pub fn end_with(&self, reset: impl FnOnce()) -> bool {
        let ended = {
            let mut context = self.context.lock();
            reset();
            context.take()
        };
        if let Some(context) = &ended {
            tracing::info!(
                "Ore session ended after {} generated regions",
                context.regions_generated()
            );
        }
        ended.is_some()
    }

    /// Returns true while a random source is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.context.lock().is_some()
    }

    /// Seed of the active session.
    #[must_use]
    pub fn seed(&self) -> Option<WorldSeed> {
        self.context.lock().as_ref().map(GenerationContext::seed)
    }

    /// Runs `f` with exclusive access to the session context.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveRandomSource` if no session is running.
    pub fn with_context<T>(&self, f: impl FnOnce(&mut GenerationContext) -> T) -> OreResult<T> {
        let mut guard = self.context.lock();
        let context = guard.as_mut().ok_or(OreError::NoActiveRandomSource)?;
        Ok(f(context))
    }
}
