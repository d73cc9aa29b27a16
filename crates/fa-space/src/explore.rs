//! Depth-first construction of a behavioral space.
//!
//! # Semantics
//!
//! Unlike the lockstep engine in `fa-sim`, exploration is asynchronous: one
//! transition of one behavior fires per arc, and every link is a buffer of
//! capacity one.
//!
//! A transition `t` of behavior `b` is feasible from node `n` when
//!
//! - `t.source` is `b`'s state in `n`;
//! - its required event `e(L)`, if any, is exactly what slot `L` holds (the
//!   slot is emptied);
//! - every output link's slot is empty once the required event has been
//!   consumed (each output then fills its slot);
//! - under an observation, `t` is unobservable or its tag is the next label.
//!
//! A node is final when every slot is empty and, under an observation, every
//! label has been matched.

#[cfg(not(feature = "fx-hash"))]
use std::collections::HashMap;

use fa_model::{Behavior, NetworkModel, Transition};
#[cfg(feature = "fx-hash")]
use rustc_hash::FxHashMap as HashMap;

use crate::{BehavioralSpace, NodeIndex, SpaceArc, SpaceError, SpaceNode, SpaceResult};

/// Exploration limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExploreConfig {
    /// Abort with [`SpaceError::NodeLimit`] past this many nodes.
    pub max_nodes: usize,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self { max_nodes: 100_000 }
    }
}

/// Explore every configuration reachable from the initial one.
pub fn explore(model: &NetworkModel, config: &ExploreConfig) -> SpaceResult<BehavioralSpace> {
    Explorer::new(model, None, config).run()
}

/// Explore the configurations compatible with a linear `observation`.
///
/// Each label must be the observability tag of at least one transition.
pub fn explore_observation<S: AsRef<str>>(
    model:       &NetworkModel,
    observation: &[S],
    config:      &ExploreConfig,
) -> SpaceResult<BehavioralSpace> {
    let observation: Vec<String> = observation.iter().map(|s| s.as_ref().to_owned()).collect();
    model.check_observation(&observation).map_err(|e| match e {
        fa_model::ModelError::UnknownObservation(label) => SpaceError::UnknownObservation(label),
        other => SpaceError::Model(other),
    })?;
    Explorer::new(model, Some(observation), config).run()
}

// ── Explorer ──────────────────────────────────────────────────────────────────

struct Explorer<'a> {
    model:       &'a NetworkModel,
    observation: Option<Vec<String>>,
    max_nodes:   usize,
    nodes:       Vec<SpaceNode>,
    arcs:        Vec<SpaceArc>,
    index:       HashMap<SpaceNode, NodeIndex>,
}

impl<'a> Explorer<'a> {
    fn new(model: &'a NetworkModel, observation: Option<Vec<String>>, config: &ExploreConfig) -> Self {
        Self {
            model,
            observation,
            max_nodes: config.max_nodes,
            nodes: Vec::new(),
            arcs: Vec::new(),
            index: HashMap::default(),
        }
    }

    fn run(mut self) -> SpaceResult<BehavioralSpace> {
        let mut initial = SpaceNode {
            states:            self.model.initial_states(),
            buffers:           vec![None; self.model.links.len()],
            observation_index: 0,
            is_final:          false,
        };
        initial.is_final = self.is_final(&initial);
        let (start, _) = self.intern(initial)?;

        let model = self.model;
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            for behavior in &model.behaviors {
                let state = self.nodes[current].states[behavior.id.index()];
                for t in behavior.outgoing(state) {
                    let Some(next) = self.fire(current, behavior, t) else {
                        continue;
                    };
                    let (to, fresh) = self.intern(next)?;
                    if fresh {
                        stack.push(to);
                    }
                    self.arcs.push(SpaceArc {
                        from:       current,
                        to,
                        behavior:   behavior.id,
                        transition: t.id,
                    });
                }
            }
        }

        let space = BehavioralSpace {
            nodes:       self.nodes,
            arcs:        self.arcs,
            observation: self.observation,
        };
        tracing::info!(
            network = %model.name,
            nodes   = space.node_count(),
            finals  = space.final_count(),
            arcs    = space.arc_count(),
            "behavioral space explored",
        );
        Ok(space)
    }

    /// The node reached by firing `t` from `from`, or `None` if infeasible.
    fn fire(&self, from: NodeIndex, behavior: &Behavior, t: &Transition) -> Option<SpaceNode> {
        let node = &self.nodes[from];
        let mut observation_index = node.observation_index;

        if let Some(observation) = &self.observation {
            if t.is_observable() {
                if observation.get(observation_index) != Some(&t.observability) {
                    return None;
                }
                observation_index += 1;
            }
        }

        let mut buffers = node.buffers.clone();
        if let Some(required) = &t.required {
            let slot = &mut buffers[required.link.index()];
            if slot.as_deref() != Some(required.name.as_str()) {
                return None;
            }
            *slot = None;
        }
        for output in &t.outputs {
            let slot = &mut buffers[output.link.index()];
            if slot.is_some() {
                return None;
            }
            *slot = Some(output.name.clone());
        }

        let mut states = node.states.clone();
        states[behavior.id.index()] = t.destination;

        let mut next = SpaceNode { states, buffers, observation_index, is_final: false };
        next.is_final = self.is_final(&next);
        Some(next)
    }

    fn is_final(&self, node: &SpaceNode) -> bool {
        let observed = self
            .observation
            .as_ref()
            .is_none_or(|o| node.observation_index == o.len());
        node.buffers_empty() && observed
    }

    /// Look `node` up, inserting it if new.  Returns its index and whether
    /// it was inserted.
    fn intern(&mut self, node: SpaceNode) -> SpaceResult<(NodeIndex, bool)> {
        if let Some(&i) = self.index.get(&node) {
            return Ok((i, false));
        }
        if self.nodes.len() >= self.max_nodes {
            return Err(SpaceError::NodeLimit { limit: self.max_nodes });
        }
        let i = self.nodes.len();
        self.index.insert(node.clone(), i);
        self.nodes.push(node);
        Ok((i, true))
    }
}
