//! HTTP surface for jobtrack.
//!
//! Exposes an axum [`Router`] serving the JSON API over any
//! [`Gateway`], i.e. any pairing of a [`JobStore`] with a
//! [`SessionProvider`]. The binary wires it to either the local SQLite store
//! or the hosted backend.

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use jobtrack_core::{
  config::BackendConfig, gateway::Gateway, session::SessionProvider, store::JobStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{dashboard, jobs, session};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which record store and session provider the server runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  /// Local SQLite file with a single argon2-protected account.
  #[default]
  Sqlite,
  /// Hosted table and auth APIs.
  Supabase,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `JOBTRACK_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  #[serde(default)]
  pub backend:             Backend,
  #[serde(default = "default_store_path")]
  pub store_path:          PathBuf,
  #[serde(default)]
  pub supabase_url:        Option<String>,
  #[serde(default)]
  pub supabase_anon_key:   Option<String>,
  #[serde(default)]
  pub local_email:         Option<String>,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  #[serde(default)]
  pub local_password_hash: Option<String>,
  /// Mark the session cookie `Secure`. Enable behind TLS.
  #[serde(default)]
  pub secure_cookies:      bool,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 3000 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/jobtrack/jobs.db") }

impl ServerConfig {
  /// Settings for the hosted backend, unvalidated.
  pub fn backend_config(&self) -> BackendConfig {
    BackendConfig {
      url:     self.supabase_url.clone(),
      api_key: self.supabase_anon_key.clone(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, P> {
  pub gateway: Gateway<S, P>,
  pub config:  Arc<ServerConfig>,
}

impl<S, P> Clone for AppState<S, P> {
  fn clone(&self) -> Self {
    Self { gateway: self.gateway.clone(), config: Arc::clone(&self.config) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
///
/// | Method | Path | Notes |
/// |--------|------|-------|
/// | `POST` | `/api/login` | Body `{"email","password"}`; sets the session cookie |
/// | `POST` | `/api/logout` | Clears the session cookie |
/// | `GET`  | `/api/me` | The signed-in user |
/// | `GET`  | `/api/dashboard` | Summary and recent applications |
/// | `GET`  | `/api/jobs` | `?status=&search=&limit=` |
/// | `POST` | `/api/jobs` | 201 with `Location` |
/// | `GET`  | `/api/jobs/{id}` | One application |
/// | `PUT`  | `/api/jobs/{id}` | Replace every editable field |
/// | `DELETE` | `/api/jobs/{id}` | |
/// | `GET`  | `/api/jobs/new` | Blank create form |
/// | `GET`  | `/api/jobs/{id}/form` | Edit-form prefill |
/// | `GET`  | `/health` | Liveness |
pub fn router<S, P>(state: AppState<S, P>) -> Router
where
  S: JobStore + 'static,
  P: SessionProvider + 'static,
  jobtrack_core::Error: From<S::Error> + From<P::Error>,
{
  Router::new()
    .route("/health", get(handlers::health))
    // Session
    .route("/api/login", post(session::login::<S, P>))
    .route("/api/logout", post(session::logout::<S, P>))
    .route("/api/me", get(session::me::<S, P>))
    // Dashboard
    .route("/api/dashboard", get(dashboard::show::<S, P>))
    // Jobs
    .route("/api/jobs", get(jobs::list::<S, P>).post(jobs::create::<S, P>))
    .route(
      "/api/jobs/{id}",
      get(jobs::get_one::<S, P>)
        .put(jobs::update::<S, P>)
        .delete(jobs::delete_one::<S, P>),
    )
    .route("/api/jobs/new", get(jobs::new_form::<S, P>))
    .route("/api/jobs/{id}/form", get(jobs::edit_form::<S, P>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests;
