//! `fa-output`: trace writers and diagram export for fa-net.
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`csv`]      | `CsvWriter`: `firings.csv`, `step_summaries.csv`, `state_snapshots.csv` |
//! | [`observer`] | `TraceOutputObserver`, a `fa_sim::NetworkObserver`          |
//! | [`writer`]   | `TraceWriter` trait, `write_trace` for finished runs        |
//! | [`dot`]      | `network_dot`, `trace_dot`, `space_dot`, `diagnoser_dot` (Graphviz) |
//!
//! # Usage
//!
//! ```rust,ignore
//! use fa_output::{CsvWriter, TraceOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = TraceOutputObserver::new(writer);
//! driver.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod dot;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use crate::csv::CsvWriter;
pub use dot::{diagnoser_dot, network_dot, space_dot, trace_dot};
pub use error::{OutputError, OutputResult};
pub use observer::TraceOutputObserver;
pub use row::{FiringRow, StateSnapshotRow, StepSummaryRow};
pub use writer::{TraceWriter, write_trace};
