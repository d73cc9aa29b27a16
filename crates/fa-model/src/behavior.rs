//! Behaviors (finite automata), their states and transition rules, and the
//! per-step evaluation rule.

use fa_core::{BehaviorId, StateId, TransitionId};

use crate::{Event, Inbox, LinkRegistry};

/// A state: a label in the automaton's state space, nothing more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub id:   StateId,
    pub name: String,
}

/// A transition rule.
///
/// `observability` and `relevance` are tags read by behavioral-space
/// diagnosis and diagrams.  Evaluation never reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub id:            TransitionId,
    pub name:          String,
    pub source:        StateId,
    pub destination:   StateId,
    /// `None` means unconditional.
    pub required:      Option<Event>,
    pub outputs:       Vec<Event>,
    pub observability: String,
    pub relevance:     String,
}

impl Transition {
    #[inline]
    pub fn is_unconditional(&self) -> bool {
        self.required.is_none()
    }

    #[inline]
    pub fn is_observable(&self) -> bool {
        !self.observability.is_empty()
    }

    #[inline]
    pub fn is_relevant(&self) -> bool {
        !self.relevance.is_empty()
    }

    /// Input/output label in `event(link)/{event(link) ...}` notation.
    ///
    /// Unconditional transitions have no input part; transitions without
    /// outputs have no `/{...}` part.
    pub fn io_label(&self, links: &LinkRegistry) -> String {
        let mut out = String::new();
        if let Some(req) = &self.required {
            out.push_str(&format!("{}({})", req.name, links.name(req.link)));
        }
        if !self.outputs.is_empty() {
            let outputs = self
                .outputs
                .iter()
                .map(|e| format!("{}({})", e.name, links.name(e.link)))
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&format!("/{{{outputs}}}"));
        }
        out
    }
}

/// Result of evaluating one behavior against one inbox.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Evaluation {
    /// The transition that fires, if any.
    pub fired:    Option<TransitionId>,
    /// Other candidates of the same priority tier that lost the
    /// declaration-order tie-break.  Non-empty means nondeterminism.
    pub shadowed: Vec<TransitionId>,
}

impl Evaluation {
    #[inline]
    pub fn is_nondeterministic(&self) -> bool {
        !self.shadowed.is_empty()
    }
}

/// One finite-state automaton.
///
/// The behavior is immutable topology.  Its *current* state is runtime data
/// owned by the network (`fa-sim`), which keeps evaluation a pure function.
#[derive(Debug, Clone)]
pub struct Behavior {
    pub id:          BehaviorId,
    pub name:        String,
    pub initial:     StateId,
    pub states:      Vec<State>,
    pub transitions: Vec<Transition>,
    /// Outgoing transitions per state (indexed by `StateId`), each list in
    /// declaration order.
    pub outgoing:    Vec<Vec<TransitionId>>,
}

impl Behavior {
    /// Resolve a state name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states.iter().find(|s| s.name == name).map(|s| s.id)
    }

    /// The state's name, or `"?"` for an id outside this behavior.
    pub fn state_name(&self, id: StateId) -> &str {
        self.states.get(id.index()).map_or("?", |s| s.name.as_str())
    }

    /// # Panics
    /// Panics if `id` does not belong to this behavior.
    #[inline]
    pub fn transition(&self, id: TransitionId) -> &Transition {
        &self.transitions[id.index()]
    }

    pub fn transition_by_name(&self, name: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.name == name)
    }

    /// Transitions leaving `state`, in declaration order.
    pub fn outgoing(&self, state: StateId) -> impl Iterator<Item = &Transition> {
        self.outgoing
            .get(state.index())
            .into_iter()
            .flatten()
            .map(|&t| &self.transitions[t.index()])
    }

    /// Decide which transition (if any) fires from `current` given `inbox`.
    ///
    /// Conditional transitions whose required event is pending take priority
    /// over unconditional ones.  Within a tier, declaration order breaks
    /// ties and every loser is reported in [`Evaluation::shadowed`].
    pub fn evaluate<I: Inbox + ?Sized>(&self, current: StateId, inbox: &I) -> Evaluation {
        let mut conditional: Vec<TransitionId> = Vec::new();
        let mut unconditional: Vec<TransitionId> = Vec::new();

        for t in self.outgoing(current) {
            match &t.required {
                Some(event) if inbox.contains(event) => conditional.push(t.id),
                Some(_) => {}
                None => unconditional.push(t.id),
            }
        }

        let mut tier = if conditional.is_empty() { unconditional } else { conditional };
        if tier.is_empty() {
            return Evaluation::default();
        }
        let fired = tier.remove(0);
        Evaluation { fired: Some(fired), shadowed: tier }
    }
}
