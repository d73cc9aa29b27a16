//! `fa-sim`: lockstep execution engine for automaton networks.
//!
//! # One step
//!
//! ```text
//! step n:
//!   ① Evaluate  every behavior picks at most one transition from its
//!               current state, reading only the frozen inbox
//!               (parallel with the `parallel` feature).
//!   ② Apply     in ascending BehaviorId order, move to the destination
//!               and post output events to the outbox.
//!   ③ Swap      inbox ← outbox, outbox cleared.
//! ```
//!
//! An event emitted at step `n` is therefore first seen at step `n + 1`.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the evaluate phase on Rayon's thread pool.        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fa_sim::{DriverBuilder, Network, NoopObserver};
//!
//! let network = Network::from_description(&description)?;
//! let mut driver = DriverBuilder::new(network).max_steps(20).build()?;
//! let trace = driver.run(&mut NoopObserver)?;
//! ```

pub mod bus;
pub mod driver;
pub mod error;
pub mod network;
pub mod observer;
pub mod schedule;
pub mod trace;

#[cfg(test)]
mod tests;

pub use bus::EventBus;
pub use driver::{Driver, DriverBuilder, run};
pub use error::{SimError, SimResult};
pub use network::Network;
pub use observer::{NetworkObserver, NoopObserver};
pub use schedule::{Stimulus, StimulusSchedule};
pub use trace::{ExecutionTrace, FiredTransition, StepTrace, Termination};
