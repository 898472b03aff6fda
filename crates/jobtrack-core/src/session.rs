//! Identity types and the [`SessionProvider`] boundary.
//!
//! The provider owns credentials and session issuance. The rest of the system
//! only ever asks it "who is calling" for a given access token.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated user as reported by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:    Uuid,
  pub email: Option<String>,
}

/// A freshly issued session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  /// Opaque bearer token; presented on every later request.
  pub access_token: String,
  pub user:         User,
  pub expires_at:   Option<DateTime<Utc>>,
}

/// The resolved identity behind a request, handed to the store on every call.
///
/// Carries the access token so that remote stores can enforce row-level
/// permissions on their side as well.
#[derive(Debug, Clone)]
pub struct Caller {
  pub user:         User,
  pub access_token: String,
}

impl Caller {
  pub fn id(&self) -> Uuid { self.user.id }
}

/// Abstraction over an identity service.
pub trait SessionProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Exchange email and password for a session.
  fn sign_in<'a>(
    &'a self,
    email: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + 'a;

  /// End the session identified by `access_token`. Ending an unknown or
  /// already-ended session is not an error.
  fn sign_out<'a>(
    &'a self,
    access_token: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Resolve `access_token` to its user, or `None` if the token is not a
  /// live session.
  fn current_user<'a>(
    &'a self,
    access_token: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;
}
