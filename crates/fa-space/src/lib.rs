//! `fa-space`: behavioral-space analysis of automaton networks.
//!
//! Where `fa-sim` runs a network forward in lockstep, this crate enumerates
//! every configuration the network can reach when behaviors fire one at a
//! time and each link buffers at most one event.  The result is a graph
//! whose nodes are configurations and whose arcs are transition firings.
//! The space can then be diagnosed: reduced to the regular expression of
//! relevance labels along its complete runs, either directly or through a
//! [`Diagnoser`] that answers queries for any linear observation.
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`space`]     | `SpaceNode`, `SpaceArc`, `BehavioralSpace`                 |
//! | [`explore`]   | `explore`, `explore_observation`, `ExploreConfig`          |
//! | [`prune`]     | `prune` (keep only nodes that can reach a final node)      |
//! | [`relevance`] | `concat`, `alternative`, `star` over relevance expressions |
//! | [`diagnosis`] | `diagnosis` (series, parallel and elimination reduction)   |
//! | [`diagnoser`] | `Diagnoser`, `Closure`, `DiagnoserArc`                     |
//! | [`error`]     | `SpaceError`, `SpaceResult<T>`                             |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                    |
//! |-----------|-----------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the visited-node index.     |

pub mod diagnoser;
pub mod diagnosis;
pub mod error;
pub mod explore;
pub mod prune;
pub mod relevance;
pub mod space;


pub use diagnoser::{Closure, ClosureIndex, Diagnoser, DiagnoserArc};
pub use diagnosis::diagnosis;
pub use error::{SpaceError, SpaceResult};
pub use explore::{ExploreConfig, explore, explore_observation};
pub use prune::prune;
pub use space::{BehavioralSpace, NodeIndex, SpaceArc, SpaceNode};
