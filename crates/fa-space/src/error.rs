use fa_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpaceError {
    #[error("exploration exceeded the node limit of {limit}")]
    NodeLimit { limit: usize },

    #[error("observation label {0:?} is not the observability tag of any transition")]
    UnknownObservation(String),

    #[error("behavioral space is empty {when} pruning")]
    Empty { when: &'static str },

    #[error("no final node is reachable in the behavioral space")]
    NoFinal,

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type SpaceResult<T> = Result<T, SpaceError>;
