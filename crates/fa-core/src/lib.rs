//! `fa-core`: foundational types for the `fa-net` automaton network engine.
//!
//! This crate is a dependency of every other `fa-*` crate.  It intentionally
//! has no `fa-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `BehaviorId`, `StateId`, `TransitionId`, `LinkId`     |
//! | [`step`]        | `Step`, `RunConfig`                                   |
//! | [`rng`]         | `StimulusRng` (seeded exogenous-event generator)      |
//! | [`error`]       | `FaError`, `FaResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod step;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{FaError, FaResult};
pub use ids::{BehaviorId, LinkId, StateId, TransitionId};
pub use rng::StimulusRng;
pub use step::{RunConfig, Step};
