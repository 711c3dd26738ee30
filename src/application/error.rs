use thiserror::Error;

use crate::domain::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Persistence error: {0:#}")]
    Persistence(#[from] anyhow::Error),
}

impl AppError {
    /// The validation failure behind this error, if that is what it is.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            AppError::Validation(err) => Some(err),
            AppError::Persistence(_) => None,
        }
    }
}
