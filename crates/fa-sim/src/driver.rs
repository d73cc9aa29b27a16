//! Execution driver: runs a network for a step budget or until it settles.

use fa_core::{RunConfig, Step, StimulusRng};

use crate::{
    ExecutionTrace, Network, NetworkObserver, NoopObserver, SimError, SimResult, Stimulus,
    StimulusSchedule, Termination,
};

// ── Driver ────────────────────────────────────────────────────────────────────

/// Owns a [`Network`], its [`RunConfig`] and the [`StimulusSchedule`] to
/// inject.  Create via [`DriverBuilder`].
///
/// # Step loop
///
/// ```text
/// repeat up to config.max_steps times:
///   ① inject the stimuli scheduled for this step into the inbox
///   ② network.step()
///   ③ observer hooks (diagnostics, step end, snapshot)
///   ④ stop if the step was quiescent and nothing is scheduled later
/// ```
pub struct Driver {
    pub config:   RunConfig,
    pub network:  Network,
    pub schedule: StimulusSchedule,
}

impl Driver {
    /// Run from the network's current step.
    ///
    /// Use [`NoopObserver`] if you don't need callbacks.
    pub fn run<O: NetworkObserver>(&mut self, observer: &mut O) -> SimResult<ExecutionTrace> {
        drive(&mut self.network, &self.config, &mut self.schedule, observer)
    }

    /// Step the driver's network would execute next.
    pub fn current_step(&self) -> Step {
        self.network.current_step()
    }

    pub fn into_network(self) -> Network {
        self.network
    }
}

/// Run `network` for at most `max_steps` steps, injecting `schedule`.
///
/// Stops early at quiescence when no stimulus is scheduled after the
/// quiescent step.  The schedule is not consumed, so the same schedule can
/// drive a reset network again.
pub fn run(
    network:   &mut Network,
    max_steps: u64,
    schedule:  &StimulusSchedule,
) -> SimResult<ExecutionTrace> {
    validate_schedule(network, schedule)?;
    let mut schedule = schedule.clone();
    drive(network, &RunConfig::new(max_steps), &mut schedule, &mut NoopObserver)
}

fn drive<O: NetworkObserver>(
    network:  &mut Network,
    config:   &RunConfig,
    schedule: &mut StimulusSchedule,
    observer: &mut O,
) -> SimResult<ExecutionTrace> {
    #[cfg(feature = "parallel")]
    if let Some(n) = config.num_threads {
        // Only the first global pool wins; later runs reuse it.
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(n).build_global() {
            tracing::debug!("rayon pool already initialised: {e}");
        }
    }

    let mut steps = Vec::new();
    let mut termination = Termination::BudgetExhausted { steps: config.max_steps };

    for _ in 0..config.max_steps {
        let now = network.current_step();
        observer.on_step_start(now);

        if let Some(stimuli) = schedule.drain_step(now) {
            for stimulus in stimuli {
                network.inject(&stimulus.event, &stimulus.link)?;
            }
        }

        let trace = network.step();
        for diagnostic in &trace.diagnostics {
            observer.on_diagnostic(now, diagnostic);
        }
        observer.on_step_end(network.model(), &trace);
        if config.is_snapshot_step(now) {
            observer.on_snapshot(now, &network.snapshot());
        }

        let settled = trace.is_quiescent() && !schedule.has_after(now);
        steps.push(trace);
        if settled {
            termination = Termination::Quiescent { at: now };
            break;
        }
    }

    let next = network.current_step();
    tracing::info!(
        network     = %network.model().name,
        steps       = steps.len(),
        termination = ?termination,
        "run finished",
    );
    observer.on_run_end(next, termination);

    Ok(ExecutionTrace { steps, termination })
}

/// Every stimulus must name a known link, and should not be scheduled in the
/// network's past.
fn validate_schedule(network: &Network, schedule: &StimulusSchedule) -> SimResult<()> {
    let now = network.current_step();
    for (step, stimulus) in schedule.iter() {
        if network.model().links.resolve(&stimulus.link).is_none() {
            return Err(SimError::UnknownStimulusLink {
                step,
                event: stimulus.event.clone(),
                link:  stimulus.link.clone(),
            });
        }
        if step < now {
            tracing::warn!(
                %step, current = %now, event = %stimulus.event,
                "stimulus scheduled before the current step is never injected",
            );
        }
    }
    Ok(())
}

// ── DriverBuilder ─────────────────────────────────────────────────────────────

/// Fluent builder for [`Driver`].
///
/// | Method                  | Default               |
/// |-------------------------|-----------------------|
/// | `.config(c)`            | `RunConfig::new(100)` |
/// | `.max_steps(n)`         | overrides `config`'s  |
/// | `.schedule(s)`          | empty schedule        |
/// | `.random_stimuli(c, p)` | none                  |
///
/// Random stimuli are drawn at build time from a `StimulusRng` seeded with
/// `config.seed`, over the `config.max_steps` steps starting at the
/// network's current step, and merged into the schedule.
///
/// # Example
///
/// ```rust,ignore
/// let network = Network::from_description(&description)?;
/// let mut driver = DriverBuilder::new(network)
///     .max_steps(50)
///     .schedule(StimulusSchedule::new().at(Step(3), "intruder", "L3"))
///     .build()?;
/// let trace = driver.run(&mut NoopObserver)?;
/// ```
pub struct DriverBuilder {
    network:  Network,
    config:   RunConfig,
    schedule: StimulusSchedule,
    random:   Option<(Vec<Stimulus>, f64)>,
}

impl DriverBuilder {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            config:   RunConfig::new(100),
            schedule: StimulusSchedule::new(),
            random:   None,
        }
    }

    pub fn config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_steps(mut self, max_steps: u64) -> Self {
        self.config.max_steps = max_steps;
        self
    }

    pub fn schedule(mut self, schedule: StimulusSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Each step, schedule each of `candidates` with probability `p`.
    pub fn random_stimuli(mut self, candidates: impl IntoIterator<Item = Stimulus>, p: f64) -> Self {
        self.random = Some((candidates.into_iter().collect(), p));
        self
    }

    /// Validate the configuration and the schedule's link names.
    pub fn build(mut self) -> SimResult<Driver> {
        if self.config.num_threads == Some(0) {
            return Err(SimError::Config("num_threads must be at least 1".into()));
        }
        if let Some((candidates, p)) = self.random.take() {
            let mut rng = StimulusRng::new(self.config.seed);
            let generated = StimulusSchedule::random_from(
                &mut rng,
                &candidates,
                self.network.current_step(),
                self.config.max_steps,
                p,
            );
            tracing::debug!(seed = self.config.seed, stimuli = generated.len(), "random stimuli drawn");
            self.schedule.merge(generated);
        }
        validate_schedule(&self.network, &self.schedule)?;

        Ok(Driver {
            config:   self.config,
            network:  self.network,
            schedule: self.schedule,
        })
    }
}
