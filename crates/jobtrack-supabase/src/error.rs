//! Error type for `jobtrack-supabase`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Settings failed validation; no request was built.
  #[error("configuration error: {0}")]
  Config(String),

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The table API answered with a non-success status.
  #[error("{message}")]
  Api { status: u16, message: String },

  /// The auth service rejected the request.
  #[error("{0}")]
  Auth(String),

  #[error("unexpected response body: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for jobtrack_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Config(msg) => Self::Configuration(msg),
      // An expired or revoked token surfaces as 401 from the table API.
      Error::Api { status: 401, .. } => Self::Unauthenticated,
      Error::Auth(msg) => Self::Auth(msg),
      other => Self::Store(other.to_string()),
    }
  }
}
