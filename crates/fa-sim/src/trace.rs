//! Per-step and per-run execution records.

use fa_core::{BehaviorId, StateId, Step, TransitionId};
use fa_model::{Diagnostic, Event};

/// One transition firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredTransition {
    pub behavior:    BehaviorId,
    pub transition:  TransitionId,
    pub source:      StateId,
    pub destination: StateId,
    /// Output events posted for the next step, in declaration order.
    pub emitted:     Vec<Event>,
}

/// What happened during one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTrace {
    pub step:        Step,
    /// Indexed by `BehaviorId`; `None` means the behavior idled.
    pub firings:     Vec<Option<FiredTransition>>,
    /// The inbox this step evaluated against, whether or not anything read it.
    pub inbox:       Vec<Event>,
    /// Every event emitted this step, in behavior order.
    pub emitted:     Vec<Event>,
    pub diagnostics: Vec<Diagnostic>,
}

impl StepTrace {
    /// Firings that actually happened, in behavior order.
    pub fn fired(&self) -> impl Iterator<Item = &FiredTransition> {
        self.firings.iter().flatten()
    }

    pub fn fired_count(&self) -> usize {
        self.fired().count()
    }

    /// The firing of one behavior this step, if it fired.
    pub fn firing_of(&self, behavior: BehaviorId) -> Option<&FiredTransition> {
        self.firings.get(behavior.index()).and_then(Option::as_ref)
    }

    /// Nothing fired and nothing was pending.
    pub fn is_quiescent(&self) -> bool {
        self.inbox.is_empty() && self.firings.iter().all(Option::is_none)
    }

    /// `true` if this step records the same activity as `other`, ignoring
    /// the step number.
    pub fn same_activity(&self, other: &StepTrace) -> bool {
        self.firings == other.firings
            && self.inbox == other.inbox
            && self.emitted == other.emitted
            && self.diagnostics == other.diagnostics
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The step `at` was quiescent and no stimulus was scheduled after it.
    Quiescent { at: Step },
    /// The step budget ran out before the network settled.
    BudgetExhausted { steps: u64 },
}

impl Termination {
    pub fn is_quiescent(&self) -> bool {
        matches!(self, Termination::Quiescent { .. })
    }
}

/// The ordered step records of one run plus how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionTrace {
    pub steps:       Vec<StepTrace>,
    pub termination: Termination,
}

impl ExecutionTrace {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Every firing of the run, in step then behavior order.
    pub fn firings(&self) -> impl Iterator<Item = (Step, &FiredTransition)> {
        self.steps.iter().flat_map(|s| s.fired().map(move |f| (s.step, f)))
    }

    /// `true` if `transition` of `behavior` fired at least once.
    pub fn has_fired(&self, behavior: BehaviorId, transition: TransitionId) -> bool {
        self.firings()
            .any(|(_, f)| f.behavior == behavior && f.transition == transition)
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = (Step, &Diagnostic)> {
        self.steps.iter().flat_map(|s| s.diagnostics.iter().map(move |d| (s.step, d)))
    }
}
