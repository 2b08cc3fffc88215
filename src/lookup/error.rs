use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("not authenticated")]
    Unauthorized,
    #[error("{0}")]
    NotFound(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("invalid response: {0}")]
    Decode(String),
}
