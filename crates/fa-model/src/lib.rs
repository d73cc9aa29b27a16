//! `fa-model`: the static side of an automaton network.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`description`] | `NetworkDescription` and friends (serde, declarative input)   |
//! | [`loader`]      | JSON loading of descriptions                                  |
//! | [`event`]       | `Event` (name + link) and the `Inbox` trait                   |
//! | [`link`]        | `Link`, `LinkRegistry`                                        |
//! | [`behavior`]    | `State`, `Transition`, `Behavior`, `Evaluation`               |
//! | [`model`]       | `NetworkModel`: compiled, validated, immutable topology      |
//! | [`validate`]    | `StructuralError`, `Diagnostic`, `validate`                   |
//! | [`error`]       | `ModelError`, `ModelResult<T>`                                |
//!
//! # Design notes
//!
//! A behavior never references another behavior, only link names.  The
//! model resolves every name to a dense id once, at construction, so the
//! runtime works on indices: links index the event bus, behaviors index the
//! current-state vector.
//!
//! Evaluation is a pure function of `(current state, inbox)`.  It lives here
//! behind the [`Inbox`] seam so `fa-sim` can evaluate every behavior against
//! the same frozen inbox (sequentially or on Rayon) and apply the results
//! afterwards.

pub mod behavior;
pub mod description;
pub mod error;
pub mod event;
pub mod link;
pub mod loader;
pub mod model;
pub mod validate;


pub use behavior::{Behavior, Evaluation, State, Transition};
pub use description::{
    BehaviorDescription, EventDescription, LinkDescription, NetworkDescription,
    TransitionDescription,
};
pub use error::{ModelError, ModelResult};
pub use event::{Event, Inbox};
pub use link::{Link, LinkRegistry};
pub use loader::{load_description_json, load_description_reader};
pub use model::NetworkModel;
pub use validate::{Diagnostic, LinkRole, StructuralError, lint, validate};
