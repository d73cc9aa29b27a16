//! Diagnoser: a compiled form of a behavioral space that answers
//! diagnosis queries for any linear observation without re-exploring.
//!
//! The space is cut into *silent closures*: the nodes reachable from an
//! entry node through unobservable arcs only.  Entries are the initial node
//! and every target of an observable arc.  Each closure node that an
//! observable arc leaves, or that is final, is *decorated* with the
//! relevance expression of the silent paths from the entry to it.  The
//! diagnoser's arcs connect closures along observable arcs, labelled with
//! the decoration of the exit node followed by the arc's own relevance.

use std::collections::{BTreeMap, HashMap};

use fa_model::NetworkModel;

use crate::diagnosis::{LabeledArc, reduce};
use crate::relevance::{alternative, any_of, concat};
use crate::{BehavioralSpace, NodeIndex, SpaceError, SpaceResult};

/// Index of a closure inside its [`Diagnoser`].
pub type ClosureIndex = usize;

/// Space nodes reachable from `entry` through unobservable arcs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Closure {
    pub entry:       NodeIndex,
    /// Space nodes in discovery order, `entry` first.
    pub nodes:       Vec<NodeIndex>,
    /// Nodes with at least one observable outgoing arc.
    pub exits:       Vec<NodeIndex>,
    /// Relevance of the silent paths from `entry`, per exit or final node.
    pub decorations: BTreeMap<NodeIndex, String>,
    /// Alternative of the final nodes' decorations; `None` without finals.
    pub diagnosis:   Option<String>,
}

impl Closure {
    pub fn decoration(&self, node: NodeIndex) -> Option<&str> {
        self.decorations.get(&node).map(String::as_str)
    }
}

/// An observable step between two closures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnoserArc {
    pub from:        ClosureIndex,
    pub to:          ClosureIndex,
    pub observation: String,
    pub relevance:   String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnoser {
    /// Closures in entry discovery order; closure 0 starts at the initial node.
    pub closures: Vec<Closure>,
    pub arcs:     Vec<DiagnoserArc>,
}

impl Diagnoser {
    /// Compile `space`, normally the full (pruned) space of `model`.
    ///
    /// Fails with [`SpaceError::NoFinal`] if the space has no final node.
    pub fn build(space: &BehavioralSpace, model: &NetworkModel) -> SpaceResult<Self> {
        if space.final_count() == 0 {
            return Err(SpaceError::NoFinal);
        }

        let mut entries: Vec<NodeIndex> = vec![0];
        for node in 0..space.node_count() {
            for arc in space.arcs_from(node) {
                if arc.observation(model).is_some() && !entries.contains(&arc.to) {
                    entries.push(arc.to);
                }
            }
        }

        let closures: Vec<Closure> = entries.iter().map(|&e| closure(space, model, e)).collect();
        let by_entry: HashMap<NodeIndex, ClosureIndex> =
            closures.iter().enumerate().map(|(i, c)| (c.entry, i)).collect();

        let mut arcs = Vec::new();
        for (from, c) in closures.iter().enumerate() {
            for &exit in &c.exits {
                let decoration = c.decoration(exit).unwrap_or_default();
                for arc in space.arcs_from(exit) {
                    let Some(observation) = arc.observation(model) else {
                        continue;
                    };
                    arcs.push(DiagnoserArc {
                        from,
                        to:          by_entry[&arc.to],
                        observation: observation.to_owned(),
                        relevance:   concat(decoration, arc.relevance(model).unwrap_or_default()),
                    });
                }
            }
        }

        tracing::info!(
            network  = %model.name,
            closures = closures.len(),
            arcs     = arcs.len(),
            "diagnoser built",
        );
        Ok(Self { closures, arcs })
    }

    pub fn closure_count(&self) -> usize {
        self.closures.len()
    }

    /// Arcs leaving closure `from`, in build order.
    pub fn arcs_from(&self, from: ClosureIndex) -> impl Iterator<Item = &DiagnoserArc> {
        self.arcs.iter().filter(move |a| a.from == from)
    }

    /// Relevance expression explaining `observation`, or `None` if no run
    /// of the network produces it and ends with every link empty.
    pub fn diagnose<S: AsRef<str>>(&self, observation: &[S]) -> Option<String> {
        let mut frontier: BTreeMap<ClosureIndex, String> = BTreeMap::from([(0, String::new())]);
        for label in observation {
            let label = label.as_ref();
            let mut next: BTreeMap<ClosureIndex, String> = BTreeMap::new();
            for (&x, expr) in &frontier {
                for arc in self.arcs_from(x).filter(|a| a.observation == label) {
                    let step = concat(expr, &arc.relevance);
                    next.entry(arc.to)
                        .and_modify(|e| *e = alternative(e, &step))
                        .or_insert(step);
                }
            }
            frontier = next;
        }

        let explained = frontier.iter().filter_map(|(&x, expr)| {
            let tail = self.closures[x].diagnosis.as_deref()?;
            Some(concat(expr, tail))
        });
        let result = any_of(explained);
        tracing::debug!(labels = observation.len(), found = result.is_some(), "linear diagnosis");
        result
    }
}

/// The silent closure of `entry`, with its decorations.
fn closure(space: &BehavioralSpace, model: &NetworkModel, entry: NodeIndex) -> Closure {
    let mut nodes = vec![entry];
    let mut silent: Vec<(NodeIndex, NodeIndex, &str)> = Vec::new();
    let mut stack = vec![entry];
    while let Some(current) = stack.pop() {
        for arc in space.arcs_from(current) {
            if arc.observation(model).is_some() {
                continue;
            }
            silent.push((arc.from, arc.to, arc.relevance(model).unwrap_or_default()));
            if !nodes.contains(&arc.to) {
                nodes.push(arc.to);
                stack.push(arc.to);
            }
        }
    }

    let exits: Vec<NodeIndex> = nodes
        .iter()
        .copied()
        .filter(|&n| space.arcs_from(n).any(|a| a.observation(model).is_some()))
        .collect();

    let local = |n: NodeIndex| nodes.iter().position(|&m| m == n).unwrap_or_default();
    let local_arcs: Vec<LabeledArc> = silent
        .iter()
        .map(|&(from, to, label)| LabeledArc::new(local(from), local(to), label))
        .collect();

    let mut decorations = BTreeMap::new();
    for &n in &nodes {
        if !exits.contains(&n) && !space.nodes[n].is_final {
            continue;
        }
        if let Some(expr) = reduce(nodes.len(), local_arcs.clone(), 0, &[local(n)]) {
            decorations.insert(n, expr);
        }
    }

    let diagnosis = any_of(
        nodes
            .iter()
            .filter(|&&n| space.nodes[n].is_final)
            .filter_map(|n| decorations.get(n)),
    );

    Closure { entry, nodes, exits, decorations, diagnosis }
}
