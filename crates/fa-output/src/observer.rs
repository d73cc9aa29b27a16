//! `TraceOutputObserver<W>`: bridges `NetworkObserver` to a `TraceWriter`.

use fa_core::Step;
use fa_model::NetworkModel;
use fa_sim::{NetworkObserver, StepTrace, Termination};

use crate::row::{FiringRow, StateSnapshotRow, StepSummaryRow};
use crate::writer::TraceWriter;
use crate::{OutputError, OutputResult};

/// A [`NetworkObserver`] that writes firings, step summaries and state
/// snapshots to any [`TraceWriter`] backend.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After `driver.run()` returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct TraceOutputObserver<W: TraceWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: TraceWriter> TraceOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `driver.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TraceWriter> NetworkObserver for TraceOutputObserver<W> {
    fn on_step_end(&mut self, model: &NetworkModel, trace: &StepTrace) {
        let firings = FiringRow::from_step(model, trace);
        if !firings.is_empty() {
            let result = self.writer.write_firings(&firings);
            self.store_err(result);
        }
        let result = self.writer.write_step_summary(&StepSummaryRow::from(trace));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, step: Step, states: &[(&str, &str)]) {
        let rows: Vec<StateSnapshotRow> = states
            .iter()
            .map(|&(behavior, state)| StateSnapshotRow {
                step:     step.0,
                behavior: behavior.to_owned(),
                state:    state.to_owned(),
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_run_end(&mut self, _next_step: Step, _termination: Termination) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
