use fa_core::FaError;
use thiserror::Error;

use crate::StructuralError;

#[derive(Debug, Error)]
pub enum ModelError {
    /// The description violates one or more structural rules.  All of them
    /// are listed so a description can be fixed in one pass.
    #[error("{} structural error(s): {}", .0.len(), join_errors(.0))]
    Structural(Vec<StructuralError>),

    #[error("description parse error: {0}")]
    Parse(String),

    #[error("observability label {0:?} is not carried by any transition")]
    UnknownObservation(String),

    #[error(transparent)]
    Core(#[from] FaError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModelError {
    /// The structural errors carried by this error, or an empty slice.
    pub fn structural(&self) -> &[StructuralError] {
        match self {
            ModelError::Structural(errors) => errors,
            _ => &[],
        }
    }
}

fn join_errors(errors: &[StructuralError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type ModelResult<T> = Result<T, ModelError>;
