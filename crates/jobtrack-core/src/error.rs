//! Error types for `jobtrack-core`.
//!
//! Every failure the gateway can surface maps onto one of these kinds. Backend
//! crates convert their own errors into [`Error`] so callers only ever match
//! on this enum.

use thiserror::Error;
use uuid::Uuid;

/// A required field was missing or a value was not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
  /// Name of the offending form field, e.g. `"company"`.
  pub field:   &'static str,
  pub message: String,
}

impl ValidationError {
  pub fn new(field: &'static str, message: impl Into<String>) -> Self {
    Self { field, message: message.into() }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// Connection settings are missing or malformed. Nothing was sent.
  #[error("configuration error: {0}")]
  Configuration(String),

  /// No valid session accompanies the request.
  #[error("not authenticated")]
  Unauthenticated,

  /// The session provider rejected the supplied credentials.
  #[error("{0}")]
  Auth(String),

  #[error(transparent)]
  Validation(#[from] ValidationError),

  /// No record with this id is owned by the caller.
  #[error("job application not found: {0}")]
  NotFound(Uuid),

  /// The record store rejected the operation; the message is shown verbatim.
  #[error("{0}")]
  Store(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
