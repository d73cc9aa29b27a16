//! Structural errors, non-fatal diagnostics, and the lint pass.
//!
//! Structural errors make execution undefined and abort construction.
//! Diagnostics describe legal but suspicious descriptions (or, at runtime,
//! a nondeterministic choice) and never stop anything.

use std::fmt;

use thiserror::Error;

use crate::{NetworkDescription, NetworkModel};

// ── Structural errors ─────────────────────────────────────────────────────────

/// Role of a link reference inside a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRole {
    Required,
    Output,
}

impl fmt::Display for LinkRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkRole::Required => f.write_str("required event"),
            LinkRole::Output => f.write_str("output event"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("network name is empty")]
    EmptyNetworkName,

    #[error("duplicate behavior {0:?}")]
    DuplicateBehavior(String),

    #[error("duplicate link {0:?}")]
    DuplicateLink(String),

    #[error("behavior {behavior:?}: duplicate state {state:?}")]
    DuplicateState { behavior: String, state: String },

    #[error("behavior {behavior:?}: duplicate transition {transition:?}")]
    DuplicateTransition { behavior: String, transition: String },

    #[error("behavior {behavior:?}: initial state {state:?} is not among its states")]
    UnknownInitialState { behavior: String, state: String },

    #[error("behavior {behavior:?}, transition {transition:?}: unknown state {state:?}")]
    UnknownState { behavior: String, transition: String, state: String },

    #[error(
        "behavior {behavior:?}, transition {transition:?}: {role} {event:?} refers to unknown link {link:?}"
    )]
    UnknownLink {
        behavior:   String,
        transition: String,
        event:      String,
        link:       String,
        role:       LinkRole,
    },

    #[error("behavior {behavior:?}, transition {transition:?}: output event on link {link:?} has no name")]
    EmptyOutputEvent { behavior: String, transition: String, link: String },

    #[error("link {link:?}: endpoint behavior {behavior:?} does not exist")]
    UnknownEndpoint { link: String, behavior: String },
}

// ── Diagnostics ───────────────────────────────────────────────────────────────

/// A non-fatal finding about a description or a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Several transitions leave the same state on the same trigger (the same
    /// required event, or none).  Only the first by declaration order can
    /// ever win.
    AmbiguousTransitions {
        behavior:    String,
        state:       String,
        trigger:     Option<String>,
        transitions: Vec<String>,
    },

    /// At runtime, more than one transition was enabled from the same state
    /// in the same priority tier; `fired` won by declaration order.
    Nondeterminism {
        behavior: String,
        state:    String,
        fired:    String,
        shadowed: Vec<String>,
    },

    /// A link no transition listens on or emits to.
    UnusedLink { link: String },

    /// A behavior requires an event on a link it is not an endpoint of.
    NonEndpointListener { link: String, behavior: String, transition: String },

    /// A behavior emits on a link it is not an endpoint of.
    NonEndpointEmitter { link: String, behavior: String, transition: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::AmbiguousTransitions { behavior, state, trigger, transitions } => {
                let trigger = trigger.as_deref().unwrap_or("no event");
                write!(
                    f,
                    "behavior {behavior:?}, state {state:?}: transitions {} all fire on {trigger}",
                    transitions.join(", "),
                )
            }
            Diagnostic::Nondeterminism { behavior, state, fired, shadowed } => write!(
                f,
                "behavior {behavior:?}, state {state:?}: {fired:?} fired by declaration order over {}",
                shadowed.join(", "),
            ),
            Diagnostic::UnusedLink { link } => {
                write!(f, "link {link:?} is never referenced by any transition")
            }
            Diagnostic::NonEndpointListener { link, behavior, transition } => write!(
                f,
                "behavior {behavior:?}, transition {transition:?} listens on link {link:?} \
                 but is not one of its endpoints",
            ),
            Diagnostic::NonEndpointEmitter { link, behavior, transition } => write!(
                f,
                "behavior {behavior:?}, transition {transition:?} emits on link {link:?} \
                 but is not one of its endpoints",
            ),
        }
    }
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Validate a description without keeping the compiled model.
///
/// Returns the non-fatal diagnostics on success, or *every* structural error.
pub fn validate(description: &NetworkDescription) -> Result<Vec<Diagnostic>, Vec<StructuralError>> {
    match NetworkModel::build(description) {
        Ok(model) => Ok(model.warnings),
        Err(e) => Err(e.structural().to_vec()),
    }
}

/// Lint a compiled model: unused links, non-endpoint listeners/emitters, and
/// statically ambiguous transitions.
pub fn lint(model: &NetworkModel) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let mut referenced = vec![false; model.links.len()];

    for behavior in &model.behaviors {
        for t in &behavior.transitions {
            if let Some(req) = &t.required {
                referenced[req.link.index()] = true;
                if !model.links.get(req.link).is_endpoint(behavior.id) {
                    out.push(Diagnostic::NonEndpointListener {
                        link:       model.links.name(req.link).to_owned(),
                        behavior:   behavior.name.clone(),
                        transition: t.name.clone(),
                    });
                }
            }
            for output in &t.outputs {
                referenced[output.link.index()] = true;
                if !model.links.get(output.link).is_endpoint(behavior.id) {
                    out.push(Diagnostic::NonEndpointEmitter {
                        link:       model.links.name(output.link).to_owned(),
                        behavior:   behavior.name.clone(),
                        transition: t.name.clone(),
                    });
                }
            }
        }

        // Group each state's outgoing transitions by trigger, keeping
        // declaration order within and across groups.
        for state in &behavior.states {
            let mut groups: Vec<(Option<&crate::Event>, Vec<&str>)> = Vec::new();
            for t in behavior.outgoing(state.id) {
                match groups.iter().position(|(trigger, _)| *trigger == t.required.as_ref()) {
                    Some(i) => groups[i].1.push(t.name.as_str()),
                    None => groups.push((t.required.as_ref(), vec![t.name.as_str()])),
                }
            }
            for (trigger, names) in groups {
                if names.len() > 1 {
                    out.push(Diagnostic::AmbiguousTransitions {
                        behavior:    behavior.name.clone(),
                        state:       state.name.clone(),
                        trigger:     trigger
                            .map(|e| format!("{}({})", e.name, model.links.name(e.link))),
                        transitions: names.into_iter().map(str::to_owned).collect(),
                    });
                }
            }
        }
    }

    for link in model.links.iter() {
        if !referenced[link.id.index()] {
            out.push(Diagnostic::UnusedLink { link: link.name.clone() });
        }
    }

    out
}
