//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `firings.csv`
//! - `step_summaries.csv`
//! - `state_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::TraceWriter;
use crate::{FiringRow, OutputResult, StateSnapshotRow, StepSummaryRow};

/// Writes trace output to CSV files.
pub struct CsvWriter {
    firings:   Writer<File>,
    summaries: Writer<File>,
    snapshots: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut firings = Writer::from_path(dir.join("firings.csv"))?;
        firings.write_record([
            "step",
            "behavior",
            "transition",
            "source",
            "destination",
            "required_event",
            "output_events",
            "observability",
            "relevance",
        ])?;

        let mut summaries = Writer::from_path(dir.join("step_summaries.csv"))?;
        summaries.write_record(["step", "fired", "emitted", "pending"])?;

        let mut snapshots = Writer::from_path(dir.join("state_snapshots.csv"))?;
        snapshots.write_record(["step", "behavior", "state"])?;

        Ok(Self { firings, summaries, snapshots, finished: false })
    }
}

impl TraceWriter for CsvWriter {
    fn write_firings(&mut self, rows: &[FiringRow]) -> OutputResult<()> {
        for row in rows {
            self.firings.write_record(&[
                row.step.to_string(),
                row.behavior.clone(),
                row.transition.clone(),
                row.source.clone(),
                row.destination.clone(),
                row.required_event.clone(),
                row.output_events.clone(),
                row.observability.clone(),
                row.relevance.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_step_summary(&mut self, row: &StepSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.step.to_string(),
            row.fired.to_string(),
            row.emitted.to_string(),
            row.pending.to_string(),
        ])?;
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[StateSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots
                .write_record(&[row.step.to_string(), row.behavior.clone(), row.state.clone()])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.firings.flush()?;
        self.summaries.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
