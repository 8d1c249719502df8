use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

/// Failure of an outbound notification transport. Never escapes the
/// notification dispatcher.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid address: {0}")]
    Address(String),
    #[error("Message build failed: {0}")]
    Message(String),
    #[error("Transport failed: {0}")]
    Transport(String),
}
