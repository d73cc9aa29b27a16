//! Behavioral space: the graph of network configurations reachable under
//! single-slot link semantics.

use fa_core::{BehaviorId, StateId, TransitionId};
use fa_model::{NetworkModel, Transition};

/// Index of a node inside its [`BehavioralSpace`].
pub type NodeIndex = usize;

/// One network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpaceNode {
    /// Current state per behavior, indexed by `BehaviorId`.
    pub states:            Vec<StateId>,
    /// Buffer slot per link, indexed by `LinkId`: the event name held, if any.
    pub buffers:           Vec<Option<String>>,
    /// How many labels of the observation have been matched.  Always 0 for
    /// an unconstrained exploration.
    pub observation_index: usize,
    pub is_final:          bool,
}

impl SpaceNode {
    /// `true` if every link slot is empty.
    pub fn buffers_empty(&self) -> bool {
        self.buffers.iter().all(Option::is_none)
    }
}

/// One feasible firing between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpaceArc {
    pub from:       NodeIndex,
    pub to:         NodeIndex,
    pub behavior:   BehaviorId,
    pub transition: TransitionId,
}

impl SpaceArc {
    /// The transition this arc fires.
    ///
    /// # Panics
    /// Panics if `model` is not the one the space was explored from.
    pub fn transition<'m>(&self, model: &'m NetworkModel) -> &'m Transition {
        model.behavior(self.behavior).transition(self.transition)
    }

    /// Observability tag of the fired transition, if it is observable.
    pub fn observation<'m>(&self, model: &'m NetworkModel) -> Option<&'m str> {
        let t = self.transition(model);
        t.is_observable().then_some(t.observability.as_str())
    }

    /// Relevance tag of the fired transition, if it is relevant.
    pub fn relevance<'m>(&self, model: &'m NetworkModel) -> Option<&'m str> {
        let t = self.transition(model);
        t.is_relevant().then_some(t.relevance.as_str())
    }
}

/// Nodes in exploration order (node 0 is the initial node) and the arcs
/// between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BehavioralSpace {
    pub nodes:       Vec<SpaceNode>,
    pub arcs:        Vec<SpaceArc>,
    /// The observation the space was constrained by, if any.
    pub observation: Option<Vec<String>>,
}

impl BehavioralSpace {
    /// The initial node, if the space has any nodes.
    pub fn initial(&self) -> Option<&SpaceNode> {
        self.nodes.first()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn final_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_final).count()
    }

    /// Arcs leaving `node`, in exploration order.
    pub fn arcs_from(&self, node: NodeIndex) -> impl Iterator<Item = &SpaceArc> {
        self.arcs.iter().filter(move |a| a.from == node)
    }

    /// Arcs entering `node`, in exploration order.
    pub fn arcs_into(&self, node: NodeIndex) -> impl Iterator<Item = &SpaceArc> {
        self.arcs.iter().filter(move |a| a.to == node)
    }

    /// Position of the node equal to `node`, if it was explored.
    pub fn find(&self, node: &SpaceNode) -> Option<NodeIndex> {
        self.nodes.iter().position(|n| n == node)
    }
}
