//! Diagnosis of a behavioral space: the relevance expression that labels
//! every path from the initial node to a final node.
//!
//! # Reduction
//!
//! The space is treated as an automaton whose arcs carry relevance labels.
//! It gets a fresh initial node if any arc enters the real one, and a fresh
//! final node (joined by ε arcs) unless there is exactly one final node
//! with no outgoing arcs.  The reducer then repeats, until none applies:
//!
//! 1. **series**: a chain through nodes with one arc in and one arc out
//!    becomes a single arc labelled by the concatenation;
//! 2. **parallel**: arcs sharing both ends become one arc labelled by the
//!    alternative;
//! 3. **elimination**: the first node other than the two ends is removed,
//!    every in/out arc pair through it replaced by `in loop* out`.
//!
//! What remains is one arc from the initial to the final node.

use fa_model::NetworkModel;

use crate::relevance::{alternative, concat, star};
use crate::{BehavioralSpace, NodeIndex, SpaceError, SpaceResult};

/// The relevance expression of `space`, which should already be pruned.
///
/// Fails with [`SpaceError::NoFinal`] if no final node is reachable.
pub fn diagnosis(space: &BehavioralSpace, model: &NetworkModel) -> SpaceResult<String> {
    let arcs = space
        .arcs
        .iter()
        .map(|a| LabeledArc::new(a.from, a.to, a.relevance(model).unwrap_or_default()))
        .collect();
    let finals: Vec<NodeIndex> = (0..space.node_count()).filter(|&i| space.nodes[i].is_final).collect();

    let expr = reduce(space.node_count(), arcs, 0, &finals).ok_or(SpaceError::NoFinal)?;
    tracing::info!(
        network  = %model.name,
        nodes    = space.node_count(),
        arcs     = space.arc_count(),
        expr_len = expr.chars().count(),
        "diagnosis computed",
    );
    Ok(expr)
}

// ── Reducer ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LabeledArc {
    pub from:  usize,
    pub to:    usize,
    pub label: String,
}

impl LabeledArc {
    pub(crate) fn new(from: usize, to: usize, label: impl Into<String>) -> Self {
        Self { from, to, label: label.into() }
    }
}

/// Reduce the graph of `node_count` nodes to the expression labelling its
/// paths from `start` to any of `finals`.  `None` if `finals` is empty or
/// none of them is reachable.
pub(crate) fn reduce(
    node_count: usize,
    arcs:       Vec<LabeledArc>,
    start:      usize,
    finals:     &[usize],
) -> Option<String> {
    Reducer::new(node_count, arcs, start, finals)?.run()
}

struct Reducer {
    alive: Vec<bool>,
    arcs:  Vec<LabeledArc>,
    start: usize,
    end:   usize,
}

impl Reducer {
    fn new(node_count: usize, arcs: Vec<LabeledArc>, start: usize, finals: &[usize]) -> Option<Self> {
        let (&first_final, _) = finals.split_first()?;
        let mut r = Self { alive: vec![true; node_count], arcs, start, end: first_final };

        if r.arcs.iter().any(|a| a.to == start) {
            let fresh = r.add_node();
            r.arcs.push(LabeledArc::new(fresh, start, ""));
            r.start = fresh;
        }
        if finals.len() > 1 || r.arcs.iter().any(|a| a.from == first_final) {
            let fresh = r.add_node();
            for &f in finals {
                r.arcs.push(LabeledArc::new(f, fresh, ""));
            }
            r.end = fresh;
        }
        Some(r)
    }

    fn add_node(&mut self) -> usize {
        self.alive.push(true);
        self.alive.len() - 1
    }

    fn run(mut self) -> Option<String> {
        while self.series() || self.parallel() || self.eliminate() {}
        if self.start == self.end {
            return Some(String::new());
        }
        self.arcs
            .iter()
            .find(|a| a.from == self.start && a.to == self.end)
            .map(|a| a.label.clone())
    }

    fn degrees(&self) -> (Vec<usize>, Vec<usize>) {
        let mut inbound = vec![0; self.alive.len()];
        let mut outbound = vec![0; self.alive.len()];
        for a in &self.arcs {
            outbound[a.from] += 1;
            inbound[a.to] += 1;
        }
        (inbound, outbound)
    }

    fn remove_arcs(&mut self, indices: &[usize]) {
        let mut i = 0;
        self.arcs.retain(|_| {
            let keep = !indices.contains(&i);
            i += 1;
            keep
        });
    }

    fn series(&mut self) -> bool {
        let (inbound, outbound) = self.degrees();
        for node in 0..self.alive.len() {
            if !self.alive[node] {
                continue;
            }
            for first in 0..self.arcs.len() {
                if self.arcs[first].from != node {
                    continue;
                }
                let mut chain = vec![first];
                let mut visited = vec![node];
                let mut current = first;
                loop {
                    let to = self.arcs[current].to;
                    if inbound[to] != 1 || outbound[to] != 1 || visited.contains(&to) {
                        break;
                    }
                    visited.push(to);
                    let Some(next) = self.arcs.iter().position(|a| a.from == to) else {
                        break;
                    };
                    chain.push(next);
                    current = next;
                }
                if chain.len() < 2 {
                    continue;
                }

                let label = chain
                    .iter()
                    .fold(String::new(), |acc, &k| concat(&acc, &self.arcs[k].label));
                let from = self.arcs[chain[0]].from;
                let to = self.arcs[current].to;
                for &k in &chain[..chain.len() - 1] {
                    self.alive[self.arcs[k].to] = false;
                }
                self.remove_arcs(&chain);
                self.arcs.push(LabeledArc::new(from, to, label));
                return true;
            }
        }
        false
    }

    fn parallel(&mut self) -> bool {
        for node in 0..self.alive.len() {
            if !self.alive[node] {
                continue;
            }
            let mut seen: Vec<usize> = Vec::new();
            let repeated = self.arcs.iter().filter(|a| a.from == node).find_map(|a| {
                if seen.contains(&a.to) {
                    return Some(a.to);
                }
                seen.push(a.to);
                None
            });
            let Some(target) = repeated else {
                continue;
            };

            let bundle: Vec<usize> = (0..self.arcs.len())
                .filter(|&k| self.arcs[k].from == node && self.arcs[k].to == target)
                .collect();
            let label = bundle[1..]
                .iter()
                .fold(self.arcs[bundle[0]].label.clone(), |acc, &k| alternative(&acc, &self.arcs[k].label));
            self.remove_arcs(&bundle);
            self.arcs.push(LabeledArc::new(node, target, label));
            return true;
        }
        false
    }

    fn eliminate(&mut self) -> bool {
        let Some(node) =
            (0..self.alive.len()).find(|&n| self.alive[n] && n != self.start && n != self.end)
        else {
            return false;
        };

        let self_loop = self
            .arcs
            .iter()
            .find(|a| a.from == node && a.to == node)
            .map_or_else(String::new, |a| star(&a.label));

        let mut bypass = Vec::new();
        for inbound in self.arcs.iter().filter(|a| a.to == node && a.from != node) {
            for outbound in self.arcs.iter().filter(|a| a.from == node && a.to != node) {
                let label = concat(&concat(&inbound.label, &self_loop), &outbound.label);
                bypass.push(LabeledArc::new(inbound.from, outbound.to, label));
            }
        }
        self.arcs.retain(|a| a.from != node && a.to != node);
        self.arcs.extend(bypass);
        self.alive[node] = false;
        true
    }
}
