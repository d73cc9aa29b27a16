//! Deterministic RNG for exogenous stimuli.
//!
//! # Determinism strategy
//!
//! The automaton network itself is deterministic: nothing inside a step
//! draws random numbers.  Randomness only enters through *generated*
//! stimulus schedules (e.g. "an intruder shows up with probability 0.1 each
//! step"), and those are produced up front from a single seeded `SmallRng`.
//! The same seed always yields the same schedule, so a run driven by a
//! generated schedule is exactly as reproducible as a hand-written one.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seeded generator for stimulus schedules.
///
/// Used only in single-threaded contexts.
pub struct StimulusRng(SmallRng);

impl StimulusRng {
    pub fn new(seed: u64) -> Self {
        StimulusRng(SmallRng::seed_from_u64(seed))
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
