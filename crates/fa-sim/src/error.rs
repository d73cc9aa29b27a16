use fa_core::{FaError, Step};
use fa_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("driver configuration error: {0}")]
    Config(String),

    #[error("stimulus {event:?} scheduled at {step} targets unknown link {link:?}")]
    UnknownStimulusLink { step: Step, event: String, link: String },

    #[error(transparent)]
    Core(#[from] FaError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type SimResult<T> = Result<T, SimError>;
