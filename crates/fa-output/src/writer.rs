//! The `TraceWriter` trait implemented by all backend writers.

use fa_model::NetworkModel;
use fa_sim::ExecutionTrace;

use crate::{FiringRow, OutputResult, StateSnapshotRow, StepSummaryRow};

/// Trait implemented by trace writers.
///
/// When driven by an observer, write errors are kept by the observer and
/// retrieved with
/// [`TraceOutputObserver::take_error`](crate::TraceOutputObserver::take_error).
pub trait TraceWriter {
    /// Write the firings of one step.
    fn write_firings(&mut self, rows: &[FiringRow]) -> OutputResult<()>;

    /// Write one step summary row.
    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()>;

    /// Write a batch of state snapshot rows.
    fn write_snapshots(&mut self, rows: &[StateSnapshotRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Write a finished run: firings and a summary for every step, then finish.
pub fn write_trace<W: TraceWriter>(
    writer: &mut W,
    model:  &NetworkModel,
    trace:  &ExecutionTrace,
) -> OutputResult<()> {
    for step in &trace.steps {
        let firings = FiringRow::from_step(model, step);
        if !firings.is_empty() {
            writer.write_firings(&firings)?;
        }
        writer.write_step_summary(&StepSummaryRow::from(step))?;
    }
    writer.finish()
}
