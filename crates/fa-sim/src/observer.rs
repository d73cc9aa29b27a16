//! Driver observer trait for progress reporting and data collection.

use fa_core::Step;
use fa_model::{Diagnostic, NetworkModel};

use crate::{StepTrace, Termination};

/// Callbacks invoked by [`Driver::run`][crate::Driver::run] at key points of
/// the step loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: firing counter
///
/// ```rust,ignore
/// struct FiringCounter(usize);
///
/// impl NetworkObserver for FiringCounter {
///     fn on_step_end(&mut self, _model: &NetworkModel, trace: &StepTrace) {
///         self.0 += trace.fired_count();
///     }
/// }
/// ```
pub trait NetworkObserver {
    /// Called before stimuli are injected for `step`.
    fn on_step_start(&mut self, _step: Step) {}

    /// Called once per non-fatal diagnostic raised during `step`.
    fn on_diagnostic(&mut self, _step: Step, _diagnostic: &Diagnostic) {}

    /// Called after the mailbox swap that ends a step.
    fn on_step_end(&mut self, _model: &NetworkModel, _trace: &StepTrace) {}

    /// Called every `config.output_interval_steps` steps with the
    /// `(behavior, state)` names after the step.
    fn on_snapshot(&mut self, _step: Step, _states: &[(&str, &str)]) {}

    /// Called once when the run stops.  `next_step` is the first step not
    /// executed.
    fn on_run_end(&mut self, _next_step: Step, _termination: Termination) {}
}

/// A [`NetworkObserver`] that does nothing.
pub struct NoopObserver;

impl NetworkObserver for NoopObserver {}
