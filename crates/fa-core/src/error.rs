//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `FaError` as one variant
//! where they need to surface a core failure.

use thiserror::Error;

/// The top-level error type for `fa-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum FaError {
    #[error("behavior {0:?} not found")]
    BehaviorNotFound(String),

    #[error("link {0:?} not found")]
    LinkNotFound(String),
}

/// Shorthand result type for all `fa-*` crates.
pub type FaResult<T> = Result<T, FaError>;
