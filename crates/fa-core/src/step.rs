//! Discrete global clock shared by every behavior.
//!
//! # Design
//!
//! Execution is lockstep: one `Step` is one synchronous round in which every
//! behavior is evaluated against the same frozen inbox, followed by the
//! mailbox swap.  An event emitted during step `n` is first visible at step
//! `n + 1`.
//!
//! Using an integer step as the canonical time unit keeps traces exactly
//! reproducible and comparisons O(1).  There is no mapping to wall-clock
//! time; a wall-clock timeout, if wanted, wraps the driver.

use std::fmt;

// ── Step ──────────────────────────────────────────────────────────────────────

/// An absolute step counter.  Step 0 is the first evaluated round.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// Return the step `n` rounds after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Step {
        Step(self.0 + n)
    }

    /// The step right after `self`.
    #[inline]
    pub fn next(self) -> Step {
        Step(self.0 + 1)
    }

    /// Steps elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Step) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        Step(self.0 + rhs)
    }
}

impl std::ops::Sub for Step {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Step) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Execution driver configuration.
///
/// Typically built in code or loaded from JSON by the application crate and
/// passed to the driver.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// Step budget.  The run stops after this many steps even if the network
    /// has not settled.
    pub max_steps: u64,

    /// Seed for generated stimulus schedules.  The same seed always produces
    /// the same schedule, and therefore the same trace.
    pub seed: u64,

    /// Worker thread count passed to Rayon when the `parallel` feature of
    /// `fa-sim` is on.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Hand a state snapshot to observers every N steps.  0 disables
    /// snapshots; 1 snapshots after every step.
    pub output_interval_steps: u64,
}

impl RunConfig {
    /// A config with the given budget, seed 0, default threading and no
    /// snapshots.
    pub fn new(max_steps: u64) -> Self {
        Self {
            max_steps,
            seed: 0,
            num_threads: None,
            output_interval_steps: 0,
        }
    }

    /// `true` if observers should receive a snapshot after `step`.
    #[inline]
    pub fn is_snapshot_step(&self, step: Step) -> bool {
        self.output_interval_steps > 0 && step.0.is_multiple_of(self.output_interval_steps)
    }
}
