//! `NetworkModel`: the compiled, validated, immutable network topology.

use std::collections::HashMap;

use fa_core::{BehaviorId, FaError, LinkId, StateId, TransitionId};

use crate::validate::{LinkRole, lint};
use crate::{
    Behavior, BehaviorDescription, Diagnostic, Event, EventDescription, LinkRegistry, ModelError, ModelResult,
    NetworkDescription, State, StructuralError, Transition,
};

/// A network whose every name reference has been resolved.
///
/// Built once with [`build`](Self::build); topology never changes after
/// that.  Runtime state (current states, mailboxes) lives in `fa-sim`.
#[derive(Debug, Clone)]
pub struct NetworkModel {
    pub name:      String,
    /// Behaviors in declaration order (`behaviors[id.index()]`).
    pub behaviors: Vec<Behavior>,
    pub links:     LinkRegistry,
    /// Non-fatal findings from the lint pass run at construction.
    pub warnings:  Vec<Diagnostic>,
    by_name:       HashMap<String, BehaviorId>,
}

impl NetworkModel {
    /// Resolve and validate `description`.
    ///
    /// Every structural error is collected before giving up, so the
    /// returned [`ModelError::Structural`] lists all problems at once.
    pub fn build(description: &NetworkDescription) -> ModelResult<Self> {
        let mut errors: Vec<StructuralError> = Vec::new();

        if description.name.trim().is_empty() {
            errors.push(StructuralError::EmptyNetworkName);
        }

        // ── Behavior names ────────────────────────────────────────────────
        //
        // Duplicates keep the first declaration; later ones are reported and
        // skipped so the rest of the description still gets checked.
        let mut by_name: HashMap<String, BehaviorId> = HashMap::new();
        let mut unique: Vec<&BehaviorDescription> = Vec::new();
        for b in &description.behaviors {
            if by_name.contains_key(&b.name) {
                errors.push(StructuralError::DuplicateBehavior(b.name.clone()));
                continue;
            }
            by_name.insert(b.name.clone(), BehaviorId(unique.len() as u32));
            unique.push(b);
        }

        // ── Links ─────────────────────────────────────────────────────────
        let mut links = LinkRegistry::new();
        for l in &description.links {
            let mut endpoint = |name: &str| match by_name.get(name) {
                Some(&id) => id,
                None => {
                    errors.push(StructuralError::UnknownEndpoint {
                        link:     l.name.clone(),
                        behavior: name.to_owned(),
                    });
                    BehaviorId::INVALID
                }
            };
            let endpoints = [endpoint(&l.comp0), endpoint(&l.comp1)];
            if links.insert(&l.name, endpoints).is_none() {
                errors.push(StructuralError::DuplicateLink(l.name.clone()));
            }
        }

        // ── Behaviors ─────────────────────────────────────────────────────
        let behaviors: Vec<Behavior> = unique
            .iter()
            .enumerate()
            .map(|(i, b)| compile_behavior(BehaviorId(i as u32), b, &links, &mut errors))
            .collect();

        if !errors.is_empty() {
            return Err(ModelError::Structural(errors));
        }

        let mut model = Self {
            name: description.name.clone(),
            behaviors,
            links,
            warnings: Vec::new(),
            by_name,
        };
        model.warnings = lint(&model);
        for warning in &model.warnings {
            tracing::warn!(network = %model.name, "{warning}");
        }
        tracing::info!(
            network     = %model.name,
            behaviors   = model.behaviors.len(),
            states      = model.state_count(),
            transitions = model.transition_count(),
            links       = model.links.len(),
            "network model built",
        );

        Ok(model)
    }

    /// # Panics
    /// Panics if `id` did not come from this model.
    #[inline]
    pub fn behavior(&self, id: BehaviorId) -> &Behavior {
        &self.behaviors[id.index()]
    }

    pub fn behavior_id(&self, name: &str) -> Option<BehaviorId> {
        self.by_name.get(name).copied()
    }

    pub fn behavior_by_name(&self, name: &str) -> Option<&Behavior> {
        self.behavior_id(name).map(|id| self.behavior(id))
    }

    /// The initial state of every behavior, indexed by `BehaviorId`.
    pub fn initial_states(&self) -> Vec<StateId> {
        self.behaviors.iter().map(|b| b.initial).collect()
    }

    /// Build an [`Event`] from names, resolving the link.
    pub fn resolve_event(&self, name: &str, link: &str) -> ModelResult<Event> {
        let link_id = self
            .links
            .resolve(link)
            .ok_or_else(|| FaError::LinkNotFound(link.to_owned()))?;
        Ok(Event::new(name, link_id))
    }

    /// Total number of states across all behaviors.
    pub fn state_count(&self) -> usize {
        self.behaviors.iter().map(|b| b.states.len()).sum()
    }

    /// Total number of transitions across all behaviors.
    pub fn transition_count(&self) -> usize {
        self.behaviors.iter().map(|b| b.transitions.len()).sum()
    }

    /// Check that every label of a linear observation is the observability
    /// tag of at least one transition.
    pub fn check_observation<S: AsRef<str>>(&self, observation: &[S]) -> ModelResult<()> {
        for label in observation {
            let label = label.as_ref();
            let known = self
                .behaviors
                .iter()
                .flat_map(|b| b.transitions.iter())
                .any(|t| t.observability == label);
            if !known {
                return Err(ModelError::UnknownObservation(label.to_owned()));
            }
        }
        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn compile_behavior(
    id:     BehaviorId,
    desc:   &BehaviorDescription,
    links:  &LinkRegistry,
    errors: &mut Vec<StructuralError>,
) -> Behavior {
    let mut states: Vec<State> = Vec::with_capacity(desc.states.len());
    for name in &desc.states {
        if states.iter().any(|s| &s.name == name) {
            errors.push(StructuralError::DuplicateState {
                behavior: desc.name.clone(),
                state:    name.clone(),
            });
            continue;
        }
        states.push(State { id: StateId(states.len() as u32), name: name.clone() });
    }
    let state_id = |name: &str| states.iter().find(|s| s.name == name).map(|s| s.id);

    let initial = state_id(&desc.initial_state).unwrap_or_else(|| {
        errors.push(StructuralError::UnknownInitialState {
            behavior: desc.name.clone(),
            state:    desc.initial_state.clone(),
        });
        StateId::INVALID
    });

    let mut transitions: Vec<Transition> = Vec::with_capacity(desc.transitions.len());
    for t in &desc.transitions {
        if transitions.iter().any(|existing| existing.name == t.name) {
            errors.push(StructuralError::DuplicateTransition {
                behavior:   desc.name.clone(),
                transition: t.name.clone(),
            });
            continue;
        }

        let mut resolve_state = |name: &str| {
            state_id(name).unwrap_or_else(|| {
                errors.push(StructuralError::UnknownState {
                    behavior:   desc.name.clone(),
                    transition: t.name.clone(),
                    state:      name.to_owned(),
                });
                StateId::INVALID
            })
        };
        let source = resolve_state(&t.source);
        let destination = resolve_state(&t.destination);

        let required = t.effective_required().map(|e| {
            let link = resolve_link(links, errors, desc, &t.name, e, LinkRole::Required);
            Event::new(e.name.clone(), link)
        });

        let mut outputs = Vec::with_capacity(t.output_events.len());
        for e in &t.output_events {
            let link = resolve_link(links, errors, desc, &t.name, e, LinkRole::Output);
            if e.name.is_empty() {
                errors.push(StructuralError::EmptyOutputEvent {
                    behavior:   desc.name.clone(),
                    transition: t.name.clone(),
                    link:       e.link.clone(),
                });
            }
            outputs.push(Event::new(e.name.clone(), link));
        }

        transitions.push(Transition {
            id: TransitionId(transitions.len() as u32),
            name: t.name.clone(),
            source,
            destination,
            required,
            outputs,
            observability: t.observability.clone(),
            relevance: t.relevance.clone(),
        });
    }

    let mut outgoing: Vec<Vec<TransitionId>> = vec![Vec::new(); states.len()];
    for t in &transitions {
        if let Some(list) = outgoing.get_mut(t.source.index()) {
            list.push(t.id);
        }
    }

    Behavior {
        id,
        name: desc.name.clone(),
        initial,
        states,
        transitions,
        outgoing,
    }
}

fn resolve_link(
    links:      &LinkRegistry,
    errors:     &mut Vec<StructuralError>,
    behavior:   &BehaviorDescription,
    transition: &str,
    event:      &EventDescription,
    role:       LinkRole,
) -> LinkId {
    links.resolve(&event.link).unwrap_or_else(|| {
        errors.push(StructuralError::UnknownLink {
            behavior:   behavior.name.clone(),
            transition: transition.to_owned(),
            event:      event.name.clone(),
            link:       event.link.clone(),
            role,
        });
        LinkId::INVALID
    })
}
