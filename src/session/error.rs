use thiserror::Error;

use crate::lookup::LookupError;

/// Every failure the controller can see. None of them is fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    #[error("authentication required")]
    AuthenticationRequired,
    #[error("{0}")]
    LookupFailed(String),
    #[error("update carries no position")]
    MalformedUpdate,
}

impl From<LookupError> for TrackError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Unauthorized => TrackError::AuthenticationRequired,
            LookupError::NotFound(message) => TrackError::LookupFailed(message),
            LookupError::Http(message) | LookupError::Decode(message) => TrackError::LookupFailed(
                format!("An error occurred: {}. Please try again.", message),
            ),
        }
    }
}
