//! Declarative network description: the input side of the engine.
//!
//! These types mirror the document schema one-to-one and are what the
//! [`loader`](crate::loader) deserializes.  Nothing here is validated; call
//! [`NetworkModel::build`](crate::NetworkModel::build) to resolve names and
//! collect structural errors.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "name": "garden",
//!   "behaviors": [{
//!     "name": "Mangiare",
//!     "initial_state": "Pancia_vuota",
//!     "states": ["Pancia_vuota", "Cerca_cibo", "Mangia"],
//!     "transitions": [{
//!       "name": "cerca",
//!       "source": "Pancia_vuota",
//!       "destination": "Cerca_cibo"
//!     }, {
//!       "name": "mangia",
//!       "source": "Cerca_cibo",
//!       "destination": "Mangia",
//!       "output_events": [{ "name": "cibo", "link": "L1" }],
//!       "observability": "o1",
//!       "relevance": "r1"
//!     }]
//!   }],
//!   "links": [{ "name": "L1", "comp0": "Mangiare", "comp1": "Dormire" }]
//! }
//! ```
//!
//! `required_event`, `output_events`, `observability` and `relevance` are
//! optional and default to absent / empty.

use serde::{Deserialize, Serialize};

/// A named network: ordered behaviors plus ordered links.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkDescription {
    pub name:      String,
    #[serde(default)]
    pub behaviors: Vec<BehaviorDescription>,
    #[serde(default)]
    pub links:     Vec<LinkDescription>,
}

/// One automaton: its states (declaration order) and transitions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BehaviorDescription {
    pub name:          String,
    pub initial_state: String,
    #[serde(default)]
    pub states:        Vec<String>,
    #[serde(default)]
    pub transitions:   Vec<TransitionDescription>,
}

/// One transition rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransitionDescription {
    pub name:           String,
    pub source:         String,
    pub destination:    String,
    /// Absent (or present with an empty name) means unconditional.
    #[serde(default)]
    pub required_event: Option<EventDescription>,
    #[serde(default)]
    pub output_events:  Vec<EventDescription>,
    #[serde(default)]
    pub observability:  String,
    #[serde(default)]
    pub relevance:      String,
}

/// An `event(link)` reference by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EventDescription {
    pub name: String,
    pub link: String,
}

/// A named channel between two behaviors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinkDescription {
    pub name:  String,
    pub comp0: String,
    pub comp1: String,
}

// ── Fluent construction ───────────────────────────────────────────────────────
//
// Handy for tests and for applications that build networks in code rather
// than from a document.

impl NetworkDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn behavior(mut self, behavior: BehaviorDescription) -> Self {
        self.behaviors.push(behavior);
        self
    }

    pub fn link(
        mut self,
        name:  impl Into<String>,
        comp0: impl Into<String>,
        comp1: impl Into<String>,
    ) -> Self {
        self.links.push(LinkDescription {
            name:  name.into(),
            comp0: comp0.into(),
            comp1: comp1.into(),
        });
        self
    }
}

impl BehaviorDescription {
    /// A behavior whose state list starts with `initial_state`.
    pub fn new(name: impl Into<String>, initial_state: impl Into<String>) -> Self {
        let initial_state = initial_state.into();
        Self {
            name: name.into(),
            states: vec![initial_state.clone()],
            initial_state,
            transitions: Vec::new(),
        }
    }

    /// Declare another state.  Re-declaring the initial state is a
    /// structural error, as is any other duplicate.
    pub fn state(mut self, name: impl Into<String>) -> Self {
        self.states.push(name.into());
        self
    }

    pub fn transition(mut self, transition: TransitionDescription) -> Self {
        self.transitions.push(transition);
        self
    }
}

impl TransitionDescription {
    /// An unconditional transition with no outputs and no tags.
    pub fn new(
        name:        impl Into<String>,
        source:      impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            name:        name.into(),
            source:      source.into(),
            destination: destination.into(),
            ..Self::default()
        }
    }

    pub fn requires(mut self, event: impl Into<String>, link: impl Into<String>) -> Self {
        self.required_event = Some(EventDescription::new(event, link));
        self
    }

    pub fn emits(mut self, event: impl Into<String>, link: impl Into<String>) -> Self {
        self.output_events.push(EventDescription::new(event, link));
        self
    }

    pub fn observable(mut self, tag: impl Into<String>) -> Self {
        self.observability = tag.into();
        self
    }

    pub fn relevant(mut self, tag: impl Into<String>) -> Self {
        self.relevance = tag.into();
        self
    }

    /// The required event, with the schema's "empty name means absent" rule
    /// applied.
    pub fn effective_required(&self) -> Option<&EventDescription> {
        self.required_event.as_ref().filter(|e| !e.name.is_empty())
    }
}

impl EventDescription {
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self { name: name.into(), link: link.into() }
    }
}
