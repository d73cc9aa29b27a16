//! garden: a small animal modeled as three coupled automata.
//!
//! Mangiare (eating) cycles through hunger, foraging and eating, leaving
//! `cibo` on L1 after each meal.  Dormire (sleeping) falls asleep on `cibo`
//! and is woken by `allarme` on L3, which Guardia (guarding) raises when an
//! `intruso` shows up on X.  Intruders are the only exogenous stimulus; they
//! are drawn from a seeded schedule.
//!
//! Pass a path to run another JSON description instead of the embedded one.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use fa_core::RunConfig;
use fa_model::{load_description_json, load_description_reader};
use fa_output::{CsvWriter, TraceOutputObserver, diagnoser_dot, network_dot, space_dot, trace_dot};
use fa_sim::{DriverBuilder, Network, Stimulus};
use fa_space::relevance::EPSILON;
use fa_space::{Diagnoser, ExploreConfig, diagnosis, explore, explore_observation, prune};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                  u64   = 42;
const MAX_STEPS:             u64   = 60;
const OUTPUT_INTERVAL_STEPS: u64   = 5;
const INTRUDER_PROBABILITY:  f64   = 0.05;
const OUTPUT_DIR:            &str  = "output/garden";
const OBSERVATION:           [&str; 2] = ["o1", "o2"];

// ── Network description ───────────────────────────────────────────────────────

const GARDEN_JSON: &str = r#"{
  "name": "garden",
  "behaviors": [
    {
      "name": "Mangiare",
      "initial_state": "Pancia_vuota",
      "states": ["Pancia_vuota", "Cerca_cibo", "Mangia"],
      "transitions": [
        { "name": "cerca", "source": "Pancia_vuota", "destination": "Cerca_cibo" },
        {
          "name": "mangia", "source": "Cerca_cibo", "destination": "Mangia",
          "output_events": [{ "name": "cibo", "link": "L1" }],
          "observability": "o1"
        },
        {
          "name": "digerisci", "source": "Mangia", "destination": "Pancia_vuota",
          "relevance": "fame"
        }
      ]
    },
    {
      "name": "Dormire",
      "initial_state": "Sveglio",
      "states": ["Sveglio", "Addormentato"],
      "transitions": [
        {
          "name": "dormi", "source": "Sveglio", "destination": "Addormentato",
          "required_event": { "name": "cibo", "link": "L1" },
          "observability": "o2"
        },
        {
          "name": "sveglia", "source": "Addormentato", "destination": "Sveglio",
          "required_event": { "name": "allarme", "link": "L3" },
          "observability": "o3",
          "relevance": "disturbo"
        }
      ]
    },
    {
      "name": "Guardia",
      "initial_state": "Calma",
      "states": ["Calma", "Allerta"],
      "transitions": [
        {
          "name": "allerta", "source": "Calma", "destination": "Allerta",
          "required_event": { "name": "intruso", "link": "X" },
          "output_events": [{ "name": "allarme", "link": "L3" }]
        },
        { "name": "calma", "source": "Allerta", "destination": "Calma" }
      ]
    }
  ],
  "links": [
    { "name": "L1", "comp0": "Mangiare", "comp1": "Dormire" },
    { "name": "L3", "comp0": "Guardia", "comp1": "Dormire" },
    { "name": "X",  "comp0": "Guardia", "comp1": "Guardia" }
  ]
}"#;

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== garden: fa-net automaton network ===");
    println!("Steps: {MAX_STEPS}  |  Seed: {SEED}  |  Intruder p: {INTRUDER_PROBABILITY}");
    println!();

    // 1. Load and compile the description.
    let description = match std::env::args().nth(1) {
        Some(path) => load_description_json(Path::new(&path))?,
        None => load_description_reader(Cursor::new(GARDEN_JSON))?,
    };
    let network = Network::from_description(&description)?;
    let model = network.model().clone();
    println!(
        "Network {:?}: {} behaviors, {} states, {} transitions, {} links",
        model.name,
        model.behaviors.len(),
        model.state_count(),
        model.transition_count(),
        model.links.len(),
    );
    for warning in &model.warnings {
        println!("  warning: {warning}");
    }

    // 2. Driver, with random intruders only if the network has their link.
    let mut config = RunConfig::new(MAX_STEPS);
    config.seed = SEED;
    config.output_interval_steps = OUTPUT_INTERVAL_STEPS;

    let mut builder = DriverBuilder::new(network).config(config);
    if model.links.resolve("X").is_some() {
        builder = builder.random_stimuli([Stimulus::new("intruso", "X")], INTRUDER_PROBABILITY);
    }
    let mut driver = builder.build()?;
    println!("Scheduled {} intruder stimuli", driver.schedule.len());
    println!();

    // 3. Output.

    let out = Path::new(OUTPUT_DIR);
    std::fs::create_dir_all(out)?;
    let mut obs = TraceOutputObserver::new(CsvWriter::new(out)?);

    // 4. Run.
    let t0 = Instant::now();
    let trace = driver.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    println!("Run complete in {:.3} s: {:?}", elapsed.as_secs_f64(), trace.termination);
    println!("  steps       : {}", trace.len());
    println!("  firings     : {}", trace.firings().count());
    println!("  diagnostics : {}", trace.diagnostics().count());
    println!();

    // 5. Diagrams.
    std::fs::write(out.join("network.dot"), network_dot(&model))?;
    std::fs::write(out.join("trace.dot"), trace_dot(&model, &trace))?;

    // 6. Behavioral space and its diagnosis, unconstrained and under the
    //    observation.
    let explore_config = ExploreConfig::default();
    let space = explore(&model, &explore_config)?;
    println!(
        "Behavioral space: {} nodes ({} final), {} arcs",
        space.node_count(),
        space.final_count(),
        space.arc_count(),
    );
    let diagnoser = match prune(space) {
        Ok(pruned) => {
            println!("  after pruning: {} nodes, {} arcs", pruned.node_count(), pruned.arc_count());
            std::fs::write(out.join("space.dot"), space_dot(&pruned, &model))?;
            println!("  diagnosis    : {}", show(&diagnosis(&pruned, &model)?));

            let diagnoser = Diagnoser::build(&pruned, &model)?;
            println!(
                "  diagnoser    : {} closures, {} arcs",
                diagnoser.closure_count(),
                diagnoser.arcs.len(),
            );
            std::fs::write(out.join("diagnoser.dot"), diagnoser_dot(&diagnoser, &model.name))?;
            Some(diagnoser)
        }
        Err(e) => {
            println!("  pruning failed: {e}");
            None
        }
    };

    if model.check_observation(&OBSERVATION).is_ok() {
        let observed = explore_observation(&model, &OBSERVATION, &explore_config)?;
        println!(
            "Observation {:?}: {} nodes ({} final), {} arcs",
            OBSERVATION,
            observed.node_count(),
            observed.final_count(),
            observed.arc_count(),
        );
        match prune(observed) {
            Ok(pruned) => {
                println!("  after pruning: {} nodes, {} arcs", pruned.node_count(), pruned.arc_count());
                std::fs::write(out.join("space_observation.dot"), space_dot(&pruned, &model))?;
                println!("  diagnosis    : {}", show(&diagnosis(&pruned, &model)?));
            }
            Err(e) => println!("  pruning failed: {e}"),
        }
        if let Some(diagnoser) = &diagnoser {
            match diagnoser.diagnose(&OBSERVATION) {
                Some(expr) => println!("  linear       : {}", show(&expr)),
                None => println!("  linear       : observation not explained"),
            }
        }
    }
    println!();

    // 7. Final states table.
    println!("{:<12} {:<14}", "Behavior", "State");
    println!("{}", "-".repeat(26));
    for (behavior, state) in driver.network.snapshot() {
        println!("{behavior:<12} {state:<14}");
    }

    tracing::info!(dir = OUTPUT_DIR, "outputs written");
    Ok(())
}

/// Relevance expressions with ε spelled out.
fn show(expr: &str) -> &str {
    if expr.is_empty() { EPSILON } else { expr }
}
