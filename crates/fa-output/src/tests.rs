//! Unit tests for fa-output.

use fa_model::{BehaviorDescription, NetworkDescription, NetworkModel, TransitionDescription};
use fa_sim::{DriverBuilder, Network, StimulusSchedule};
use tempfile::TempDir;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn garden() -> NetworkDescription {
    NetworkDescription::new("garden")
        .behavior(
            BehaviorDescription::new("Mangiare", "Pancia_vuota")
                .state("Cerca_cibo")
                .state("Mangia")
                .transition(TransitionDescription::new("cerca", "Pancia_vuota", "Cerca_cibo"))
                .transition(
                    TransitionDescription::new("mangia", "Cerca_cibo", "Mangia")
                        .emits("cibo", "L1")
                        .observable("o1")
                        .relevant("r1"),
                ),
        )
        .behavior(
            BehaviorDescription::new("Dormire", "Sveglio")
                .state("Addormentato")
                .transition(
                    TransitionDescription::new("dormi", "Sveglio", "Addormentato")
                        .requires("soddisfazione", "L2"),
                ),
        )
        .link("L1", "Mangiare", "Dormire")
        .link("L2", "Mangiare", "Dormire")
}

fn model() -> NetworkModel {
    NetworkModel::build(&garden()).unwrap()
}

fn read_rows(path: &std::path::Path) -> Vec<csv::StringRecord> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.records().map(|r| r.unwrap()).collect()
}

// ── CSV backend ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::*;
    use crate::{CsvWriter, FiringRow, StepSummaryRow, TraceWriter};

    fn firing_row(step: u64) -> FiringRow {
        FiringRow {
            step,
            behavior:       "Mangiare".into(),
            transition:     "mangia".into(),
            source:         "Cerca_cibo".into(),
            destination:    "Mangia".into(),
            required_event: String::new(),
            output_events:  "cibo(L1)".into(),
            observability:  "o1".into(),
            relevance:      "r1".into(),
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("firings.csv").exists());
        assert!(dir.path().join("step_summaries.csv").exists());
        assert!(dir.path().join("state_snapshots.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("firings.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers,
            [
                "step",
                "behavior",
                "transition",
                "source",
                "destination",
                "required_event",
                "output_events",
                "observability",
                "relevance",
            ]
        );

        let mut rdr2 = csv::Reader::from_path(dir.path().join("step_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["step", "fired", "emitted", "pending"]);
    }

    #[test]
    fn firing_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_firings(&[firing_row(1), firing_row(4)]).unwrap();
        w.finish().unwrap();

        let rows = read_rows(&dir.path().join("firings.csv"));
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "4");
        assert_eq!(&rows[0][5], ""); // unconditional
        assert_eq!(&rows[0][6], "cibo(L1)");
    }

    #[test]
    fn summary_row_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_step_summary(&StepSummaryRow { step: 3, fired: 2, emitted: 1, pending: 0 })
            .unwrap();
        w.finish().unwrap();

        let rows = read_rows(&dir.path().join("step_summaries.csv"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].iter().collect::<Vec<_>>(), ["3", "2", "1", "0"]);
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_errors() {
        let dir = tmp();
        assert!(CsvWriter::new(&dir.path().join("missing")).is_err());
    }
}

// ── Observer integration ──────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;
    use fa_core::RunConfig;

    use crate::{CsvWriter, TraceOutputObserver, write_trace};

    #[test]
    fn driver_run_writes_csv() {
        let mut config = RunConfig::new(50);
        config.output_interval_steps = 2;
        let network = Network::from_description(&garden()).unwrap();
        let mut driver = DriverBuilder::new(network).config(config).build().unwrap();

        let dir = tmp();
        let mut obs = TraceOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        let trace = driver.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // cerca at S0, mangia at S1; quiescent at S3.
        let firings = read_rows(&dir.path().join("firings.csv"));
        assert_eq!(firings.len(), 2);
        assert_eq!(&firings[0][2], "cerca");
        assert_eq!(&firings[1][2], "mangia");
        assert_eq!(&firings[1][7], "o1");
        assert_eq!(&firings[1][8], "r1");

        let summaries = read_rows(&dir.path().join("step_summaries.csv"));
        assert_eq!(summaries.len(), trace.len());
        assert_eq!(&summaries[2][3], "1"); // cibo pending at S2

        // Snapshots at S0 and S2, two behaviors each.
        let snapshots = read_rows(&dir.path().join("state_snapshots.csv"));
        assert_eq!(snapshots.len(), 4);
        assert_eq!(&snapshots[2][2], "Mangia");
    }

    #[test]
    fn write_trace_matches_observer_output() {
        let mut network = Network::from_description(&garden()).unwrap();
        let trace = fa_sim::run(&mut network, 50, &StimulusSchedule::new()).unwrap();

        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        write_trace(&mut w, network.model(), &trace).unwrap();

        let firings = read_rows(&dir.path().join("firings.csv"));
        assert_eq!(firings.len(), 2);
        assert_eq!(&firings[1][3], "Cerca_cibo");
        assert_eq!(&firings[1][4], "Mangia");
    }
}

// ── DOT export ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dot_tests {
    use super::*;
    use fa_space::{Diagnoser, ExploreConfig, explore};

    use crate::{diagnoser_dot, network_dot, space_dot, trace_dot};

    #[test]
    fn network_dot_structure() {
        let dot = network_dot(&model());
        assert!(dot.starts_with("digraph \"garden\" {"));
        assert!(dot.contains("subgraph cluster_0"));
        assert!(dot.contains("subgraph cluster_1"));
        assert!(dot.contains("b0_start -> b1_start [label=\"L1\" ltail=cluster_0 lhead=cluster_1]"));
        assert!(dot.contains("b0_start -> b0_s0"));
        assert!(dot.contains("<font color=\"green4\">o1</font>"));
        assert!(dot.contains("<font color=\"red\">r1</font>"));
        assert!(dot.contains("mangia: /{cibo(L1)}"));
        assert!(dot.contains("dormi: soddisfazione(L2)"));
        assert!(!dot.contains("style=bold"));
    }

    #[test]
    fn trace_dot_bolds_fired_transitions() {
        let mut network = Network::from_description(&garden()).unwrap();
        let trace = fa_sim::run(&mut network, 50, &StimulusSchedule::new()).unwrap();
        let dot = trace_dot(network.model(), &trace);
        assert_eq!(dot.matches("style=bold").count(), 2);
        assert!(dot.contains("b1_s0 -> b1_s1 [label=<dormi>]"));
    }

    #[test]
    fn space_dot_marks_final_nodes() {
        let model = model();
        let space = explore(&model, &ExploreConfig::default()).unwrap();
        let dot = space_dot(&space, &model);
        assert!(dot.contains("start -> n0"));
        assert_eq!(dot.matches("peripheries=2").count(), space.final_count());
        assert!(dot.contains("ε(L1)"));
        assert!(dot.contains("cibo(L1)"));
        assert_eq!(dot.matches(" -> n").count(), space.arc_count() + 1);
    }

    #[test]
    fn diagnoser_dot_closures_and_arcs() {
        let model = model();
        let space = explore(&model, &ExploreConfig::default()).unwrap();
        let diagnoser = Diagnoser::build(&space, &model).unwrap();
        let dot = diagnoser_dot(&diagnoser, &model.name);
        assert!(dot.starts_with("digraph \"garden diagnoser\" {"));
        assert!(dot.contains("start -> c0"));
        assert!(dot.contains("c0 [label=<<b>0</b><br/>entry 0<br/><font color=\"red\">ε</font>> peripheries=2]"));
        assert!(dot.contains("c1 [label=<<b>1</b><br/>entry 2>]"));
        assert!(dot.contains(
            "c0 -> c1 [label=<<br/><font color=\"green4\">o1</font><br/><font color=\"red\">r1</font>>]"
        ));
        assert_eq!(dot.matches("peripheries=2").count(), 1);
    }

    #[test]
    fn labels_are_escaped() {
        let desc = NetworkDescription::new("n").behavior(
            BehaviorDescription::new("A<B>", "s&t")
                .transition(TransitionDescription::new("go", "s&t", "s&t")),
        );
        let dot = network_dot(&NetworkModel::build(&desc).unwrap());
        assert!(dot.contains("A&lt;B&gt;"));
        assert!(dot.contains("s&amp;t"));
        assert!(!dot.contains("<b>A<B></b>"));
    }
}
