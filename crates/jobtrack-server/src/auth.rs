//! Session plumbing: reading the caller's token off a request, and the
//! single-account [`LocalSessions`] provider used with the SQLite backend.

use std::{collections::HashMap, convert::Infallible};

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::{DateTime, Duration, Utc};
use jobtrack_core::{
  Error,
  session::{Session, SessionProvider, User},
};
use rand_core::{OsRng, RngCore as _};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

/// Name of the cookie carrying the access token.
pub const SESSION_COOKIE: &str = "jobtrack_session";

/// How long a local session stays valid.
pub const SESSION_TTL_DAYS: i64 = 7;

// ─── Token extraction ─────────────────────────────────────────────────────────

/// The access token presented with a request, if any. Never rejects; the
/// gateway decides what a missing token means.
pub struct Token(pub Option<String>);

impl Token {
  pub fn as_deref(&self) -> Option<&str> { self.0.as_deref() }
}

/// `Authorization: Bearer` wins over the session cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
  let bearer = headers
    .get(AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty());
  if let Some(token) = bearer {
    return Some(token.to_owned());
  }

  CookieJar::from_headers(headers)
    .get(SESSION_COOKIE)
    .map(|c| c.value().to_owned())
    .filter(|v| !v.is_empty())
}

impl<St: Send + Sync> FromRequestParts<St> for Token {
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _: &St) -> Result<Self, Self::Rejection> {
    Ok(Token(token_from_headers(&parts.headers)))
  }
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
  Cookie::build((SESSION_COOKIE, token))
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .secure(secure)
    .build()
}

/// A cookie that, once removed from a jar, clears the session cookie.
pub fn cleared_session_cookie() -> Cookie<'static> {
  Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

// ─── Local single-account provider ────────────────────────────────────────────

/// Credentials for the one account a local install serves.
#[derive(Clone)]
pub struct LocalAccount {
  pub email:         String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

impl LocalAccount {
  /// Stable id derived from the email, so records survive restarts.
  pub fn user(&self) -> User {
    let digest = Sha256::digest(self.email.trim().to_lowercase().as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    User {
      id:    uuid::Builder::from_random_bytes(bytes).into_uuid(),
      email: Some(self.email.clone()),
    }
  }
}

/// In-memory session table keyed by the SHA-256 of each token, so the raw
/// tokens never sit in memory after issue.
pub struct LocalSessions {
  account:  Option<LocalAccount>,
  sessions: RwLock<HashMap<String, (User, DateTime<Utc>)>>,
}

impl LocalSessions {
  /// With no account every sign-in fails with a configuration error.
  pub fn new(account: Option<LocalAccount>) -> Self {
    Self { account, sessions: RwLock::new(HashMap::new()) }
  }

  fn account(&self) -> Result<&LocalAccount, Error> {
    self.account.as_ref().ok_or_else(|| {
      Error::Configuration("local account email and password hash are not set".into())
    })
  }
}

fn token_key(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

fn new_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  B64.encode(bytes)
}

const INVALID_CREDENTIALS: &str = "Invalid login credentials";

impl SessionProvider for LocalSessions {
  type Error = Error;

  async fn sign_in(&self, email: &str, password: &str) -> Result<Session, Error> {
    let account = self.account()?;

    if !email.trim().eq_ignore_ascii_case(account.email.trim()) {
      return Err(Error::Auth(INVALID_CREDENTIALS.into()));
    }
    let parsed = PasswordHash::new(&account.password_hash).map_err(|e| {
      Error::Configuration(format!("local password hash is not a valid PHC string: {e}"))
    })?;
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .map_err(|_| Error::Auth(INVALID_CREDENTIALS.into()))?;

    let user = account.user();
    let token = new_token();
    let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);

    let mut sessions = self.sessions.write().await;
    sessions.retain(|_, (_, exp)| *exp > Utc::now());
    sessions.insert(token_key(&token), (user.clone(), expires_at));
    tracing::info!(user = %user.id, "signed in");

    Ok(Session { access_token: token, user, expires_at: Some(expires_at) })
  }

  async fn sign_out(&self, access_token: &str) -> Result<(), Error> {
    self.sessions.write().await.remove(&token_key(access_token));
    Ok(())
  }

  async fn current_user(&self, access_token: &str) -> Result<Option<User>, Error> {
    let sessions = self.sessions.read().await;
    Ok(
      sessions
        .get(&token_key(access_token))
        .filter(|(_, exp)| *exp > Utc::now())
        .map(|(user, _)| user.clone()),
    )
  }
}

/// Convenience for tests and the `--hash-password` helper.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  use argon2::{PasswordHasher, password_hash::SaltString};
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}
