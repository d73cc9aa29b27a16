//! The runtime `Network` and its step function.

use fa_core::{BehaviorId, FaError, StateId, Step, TransitionId};
use fa_model::{Behavior, Diagnostic, Evaluation, Event, NetworkDescription, NetworkModel};

use crate::{EventBus, FiredTransition, SimError, SimResult, StepTrace};

// ── Network ───────────────────────────────────────────────────────────────────

/// A compiled network plus its mutable runtime state.
///
/// Topology lives in the immutable [`NetworkModel`].  Only two things change
/// during execution: the current state of each behavior and the event bus.
///
/// # Step phases
///
/// 1. **Evaluate** every behavior against the frozen inbox (on Rayon with the
///    `parallel` feature).  Nothing is mutated.
/// 2. **Apply** the results in ascending `BehaviorId` order: move to the
///    destination, post outputs to the outbox, record nondeterminism.
/// 3. **Swap** the mailboxes.
///
/// Because phase 1 only reads, an event emitted at step `n` is first visible
/// at step `n + 1`, and the trace is the same whether or not phase 1 ran in
/// parallel.
#[derive(Debug, Clone)]
pub struct Network {
    model:   NetworkModel,
    /// Current state per behavior, indexed by `BehaviorId`.
    current: Vec<StateId>,
    bus:     EventBus,
    step:    Step,
}

impl Network {
    /// Wrap a validated model, every behavior in its initial state.
    pub fn new(model: NetworkModel) -> Self {
        let current = model.initial_states();
        let bus = EventBus::new(model.links.len());
        Self { model, current, bus, step: Step::ZERO }
    }

    /// Build and validate `description`, then wrap it.
    pub fn from_description(description: &NetworkDescription) -> SimResult<Self> {
        Ok(Self::new(NetworkModel::build(description)?))
    }

    pub fn model(&self) -> &NetworkModel {
        &self.model
    }

    /// The step the next call to [`step`](Self::step) will execute.
    pub fn current_step(&self) -> Step {
        self.step
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Advance the whole network by one synchronous round.
    pub fn step(&mut self) -> StepTrace {
        let now = self.step;
        let inbox = self.bus.pending();
        let evaluations = self.evaluate_all();

        let mut firings = Vec::with_capacity(evaluations.len());
        let mut emitted = Vec::new();
        let mut diagnostics = Vec::new();

        for (i, evaluation) in evaluations.into_iter().enumerate() {
            let behavior = &self.model.behaviors[i];
            let from = self.current[i];

            if evaluation.is_nondeterministic() {
                let diagnostic = nondeterminism(behavior, from, &evaluation);
                tracing::warn!(step = %now, "{diagnostic}");
                diagnostics.push(diagnostic);
            }

            let Some(tid) = evaluation.fired else {
                firings.push(None);
                continue;
            };
            let transition = behavior.transition(tid);
            self.current[i] = transition.destination;
            for event in &transition.outputs {
                self.bus.post(event.clone());
            }
            emitted.extend(transition.outputs.iter().cloned());

            tracing::debug!(
                step       = %now,
                behavior   = %behavior.name,
                transition = %transition.name,
                from       = behavior.state_name(from),
                to         = behavior.state_name(transition.destination),
                "fired",
            );
            firings.push(Some(FiredTransition {
                behavior:    behavior.id,
                transition:  tid,
                source:      from,
                destination: transition.destination,
                emitted:     transition.outputs.clone(),
            }));
        }

        self.bus.swap();
        self.step = now.next();

        StepTrace { step: now, firings, inbox, emitted, diagnostics }
    }

    /// Evaluate every behavior against the current inbox.
    ///
    /// With the `parallel` feature, runs on Rayon's thread pool.  Results
    /// come back indexed by `BehaviorId` either way.
    fn evaluate_all(&self) -> Vec<Evaluation> {
        let behaviors = self.model.behaviors.as_slice();
        let current = self.current.as_slice();
        let bus = &self.bus;

        #[cfg(not(feature = "parallel"))]
        {
            behaviors
                .iter()
                .zip(current)
                .map(|(b, &state)| b.evaluate(state, bus))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            behaviors
                .par_iter()
                .zip(current.par_iter())
                .map(|(b, &state)| b.evaluate(state, bus))
                .collect()
        }
    }

    /// Place event `event` on link `link` into the current inbox, so the
    /// next step sees it.
    pub fn inject(&mut self, event: &str, link: &str) -> SimResult<()> {
        let event = self.model.resolve_event(event, link)?;
        self.bus.inject(event);
        Ok(())
    }

    /// Like [`inject`](Self::inject) with an already resolved event.
    pub fn inject_event(&mut self, event: Event) -> SimResult<()> {
        if !self.bus.has_link(event.link) {
            return Err(FaError::LinkNotFound(event.link.to_string()).into());
        }
        self.bus.inject(event);
        Ok(())
    }

    /// Back to step zero: initial states, empty mailboxes.
    pub fn reset(&mut self) {
        self.current = self.model.initial_states();
        self.bus.clear();
        self.step = Step::ZERO;
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// Current state of `id`.
    ///
    /// # Panics
    /// Panics if `id` did not come from this network's model.
    #[inline]
    pub fn state_of(&self, id: BehaviorId) -> StateId {
        self.current[id.index()]
    }

    /// Name of the current state of the behavior called `behavior`.
    pub fn current_state(&self, behavior: &str) -> SimResult<&str> {
        let b = self
            .model
            .behavior_by_name(behavior)
            .ok_or_else(|| SimError::Core(FaError::BehaviorNotFound(behavior.to_owned())))?;
        Ok(b.state_name(self.current[b.id.index()]))
    }

    /// `(behavior, current state)` names in declaration order.
    pub fn snapshot(&self) -> Vec<(&str, &str)> {
        self.model
            .behaviors
            .iter()
            .zip(&self.current)
            .map(|(b, &s)| (b.name.as_str(), b.state_name(s)))
            .collect()
    }

    /// The inbox the next step will evaluate against.
    pub fn pending(&self) -> Vec<Event> {
        self.bus.pending()
    }
}

fn nondeterminism(behavior: &Behavior, from: StateId, evaluation: &Evaluation) -> Diagnostic {
    let name = |t: TransitionId| behavior.transition(t).name.clone();
    Diagnostic::Nondeterminism {
        behavior: behavior.name.clone(),
        state:    behavior.state_name(from).to_owned(),
        fired:    evaluation.fired.map(name).unwrap_or_default(),
        shadowed: evaluation.shadowed.iter().copied().map(name).collect(),
    }
}
