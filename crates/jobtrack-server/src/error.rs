//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use jobtrack_core::{Error, gateway::View};
use serde_json::json;

/// An error returned by an API handler. Every gateway error kind maps to
/// exactly one status code; requests axum could not decode keep the status
/// its extractor chose.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] Error),

  #[error("{message}")]
  Rejected { status: StatusCode, message: String },
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::Core(Error::Configuration(_)) => StatusCode::SERVICE_UNAVAILABLE,
      Self::Core(Error::Unauthenticated | Error::Auth(_)) => StatusCode::UNAUTHORIZED,
      Self::Core(Error::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
      Self::Core(Error::NotFound(_)) => StatusCode::NOT_FOUND,
      Self::Core(Error::Store(_)) => StatusCode::BAD_GATEWAY,
      Self::Rejected { status, .. } => *status,
    }
  }
}

impl From<jobtrack_core::ValidationError> for ApiError {
  fn from(e: jobtrack_core::ValidationError) -> Self { Self::Core(e.into()) }
}

macro_rules! from_rejection {
  ($($rejection:ty),*) => {$(
    impl From<$rejection> for ApiError {
      fn from(r: $rejection) -> Self {
        Self::Rejected { status: r.status(), message: r.body_text() }
      }
    }
  )*};
}

from_rejection!(JsonRejection, QueryRejection, PathRejection);

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = match &self {
      Self::Core(Error::Unauthenticated) => json!({
        "error":    self.to_string(),
        "redirect": View::Login,
      }),
      Self::Core(Error::Validation(v)) => json!({ "error": v.message, "field": v.field }),
      Self::Core(Error::Configuration(_)) => {
        tracing::error!("backend misconfigured: {self}");
        json!({ "error": self.to_string() })
      }
      Self::Core(Error::Store(msg)) => {
        tracing::warn!("store error: {msg}");
        json!({ "error": msg })
      }
      Self::Rejected { message, .. } => {
        tracing::debug!(%status, "rejected request: {message}");
        json!({ "error": message })
      }
      other => json!({ "error": other.to_string() }),
    };
    (status, Json(body)).into_response()
  }
}
