//! `StimulusSchedule`: sparse per-step queue of exogenous events.
//!
//! Most steps inject nothing, so the schedule only stores the steps that do.
//! `BTreeMap` keeps them ordered, which the driver needs to answer "is
//! anything still coming?" when deciding whether a quiescent step ends the
//! run.

use std::collections::BTreeMap;
use std::ops::Bound;

use fa_core::{Step, StimulusRng};

/// One external event to inject: `event` on `link`, both by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stimulus {
    pub event: String,
    pub link:  String,
}

impl Stimulus {
    pub fn new(event: impl Into<String>, link: impl Into<String>) -> Self {
        Self { event: event.into(), link: link.into() }
    }
}

/// Steps → stimuli injected into the inbox right before that step runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StimulusSchedule {
    inner: BTreeMap<Step, Vec<Stimulus>>,
    /// Cached total stimulus count for O(1) `len()`.
    total: usize,
}

impl StimulusSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// A random schedule over steps `0..steps`: at every step each candidate
    /// is scheduled independently with probability `p`.
    ///
    /// Only `rng` is consumed, so the same seed gives the same schedule.
    pub fn random(rng: &mut StimulusRng, candidates: &[Stimulus], steps: u64, p: f64) -> Self {
        Self::random_from(rng, candidates, Step::ZERO, steps, p)
    }

    /// [`random`](Self::random) over the `steps` steps starting at `start`.
    pub fn random_from(
        rng:        &mut StimulusRng,
        candidates: &[Stimulus],
        start:      Step,
        steps:      u64,
        p:          f64,
    ) -> Self {
        let mut schedule = Self::new();
        for i in 0..steps {
            for candidate in candidates {
                if rng.gen_bool(p) {
                    schedule.push(start.offset(i), candidate.clone());
                }
            }
        }
        schedule
    }

    /// Move every stimulus of `other` into `self`.
    pub fn merge(&mut self, other: StimulusSchedule) {
        for (step, stimuli) in other.inner {
            for stimulus in stimuli {
                self.push(step, stimulus);
            }
        }
    }

    /// Schedule `stimulus` for injection before `step` runs.
    pub fn push(&mut self, step: Step, stimulus: Stimulus) {
        self.inner.entry(step).or_default().push(stimulus);
        self.total += 1;
    }

    /// Builder-style [`push`](Self::push).
    pub fn at(mut self, step: Step, event: impl Into<String>, link: impl Into<String>) -> Self {
        self.push(step, Stimulus::new(event, link));
        self
    }

    /// Remove and return the stimuli for exactly `step`.
    pub fn drain_step(&mut self, step: Step) -> Option<Vec<Stimulus>> {
        let stimuli = self.inner.remove(&step)?;
        self.total -= stimuli.len();
        Some(stimuli)
    }

    /// Stimuli scheduled for `step`, without removing them.
    pub fn get(&self, step: Step) -> &[Stimulus] {
        self.inner.get(&step).map_or(&[], Vec::as_slice)
    }

    /// The earliest step with at least one stimulus.
    pub fn next_step(&self) -> Option<Step> {
        self.inner.keys().next().copied()
    }

    /// `true` if any stimulus is scheduled strictly after `step`.
    pub fn has_after(&self, step: Step) -> bool {
        self.inner
            .range((Bound::Excluded(step), Bound::Unbounded))
            .next()
            .is_some()
    }

    /// Every `(step, stimulus)` pair in step order.
    pub fn iter(&self) -> impl Iterator<Item = (Step, &Stimulus)> {
        self.inner
            .iter()
            .flat_map(|(&step, stimuli)| stimuli.iter().map(move |s| (step, s)))
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct steps with at least one stimulus.
    pub fn step_count(&self) -> usize {
        self.inner.len()
    }
}
