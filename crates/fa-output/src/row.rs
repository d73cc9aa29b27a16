//! Plain data row types written by output backends.

use fa_core::Step;
use fa_model::NetworkModel;
use fa_sim::{FiredTransition, StepTrace};

/// One transition firing, with every id resolved to its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiringRow {
    pub step:           u64,
    pub behavior:       String,
    pub transition:     String,
    pub source:         String,
    pub destination:    String,
    /// `event(link)`, or empty for an unconditional transition.
    pub required_event: String,
    /// Space-separated `event(link)` list.
    pub output_events:  String,
    pub observability:  String,
    pub relevance:      String,
}

impl FiringRow {
    pub fn new(model: &NetworkModel, step: Step, firing: &FiredTransition) -> Self {
        let behavior = model.behavior(firing.behavior);
        let t = behavior.transition(firing.transition);
        let label = |e: &fa_model::Event| format!("{}({})", e.name, model.links.name(e.link));
        Self {
            step:           step.0,
            behavior:       behavior.name.clone(),
            transition:     t.name.clone(),
            source:         behavior.state_name(firing.source).to_owned(),
            destination:    behavior.state_name(firing.destination).to_owned(),
            required_event: t.required.as_ref().map(label).unwrap_or_default(),
            output_events:  firing.emitted.iter().map(label).collect::<Vec<_>>().join(" "),
            observability:  t.observability.clone(),
            relevance:      t.relevance.clone(),
        }
    }

    /// Rows for every firing of one step, in behavior order.
    pub fn from_step(model: &NetworkModel, trace: &StepTrace) -> Vec<Self> {
        trace.fired().map(|f| Self::new(model, trace.step, f)).collect()
    }
}

/// Counts for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummaryRow {
    pub step:    u64,
    pub fired:   u64,
    pub emitted: u64,
    /// Events pending in the inbox the step evaluated against.
    pub pending: u64,
}

impl From<&StepTrace> for StepSummaryRow {
    fn from(trace: &StepTrace) -> Self {
        Self {
            step:    trace.step.0,
            fired:   trace.fired_count() as u64,
            emitted: trace.emitted.len() as u64,
            pending: trace.inbox.len() as u64,
        }
    }
}

/// The current state of one behavior after a snapshot step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshotRow {
    pub step:     u64,
    pub behavior: String,
    pub state:    String,
}
