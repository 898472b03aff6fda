//! Handlers for sign-in, sign-out and the current user.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/login` | Body: `{"email":"…","password":"…"}` |
//! | `POST` | `/api/logout` | Always succeeds |
//! | `GET`  | `/api/me` | 401 without a live session |

use axum::{Json, extract::State};
use axum_extra::extract::{CookieJar, WithRejection};
use jobtrack_core::{
  ValidationError,
  gateway::View,
  session::{SessionProvider, User},
  store::JobStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  auth::{Token, cleared_session_cookie, session_cookie},
  error::ApiError,
};

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  #[serde(default)]
  pub email:    String,
  #[serde(default)]
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub user:         User,
  /// Also set as the session cookie; returned for bearer-token clients.
  pub access_token: String,
  pub redirect:     View,
}

/// `POST /api/login`
pub async fn login<S, P>(
  State(state): State<AppState<S, P>>,
  jar: CookieJar,
  WithRejection(Json(body), _): WithRejection<Json<LoginBody>, ApiError>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError>
where
  S: JobStore,
  P: SessionProvider,
  jobtrack_core::Error: From<S::Error> + From<P::Error>,
{
  let email = body.email.trim();
  if email.is_empty() {
    return Err(ValidationError::new("email", "email is required").into());
  }
  if body.password.is_empty() {
    return Err(ValidationError::new("password", "password is required").into());
  }

  let session = state.gateway.sign_in(email, &body.password).await?;
  let jar = jar.add(session_cookie(session.access_token.clone(), state.config.secure_cookies));

  Ok((
    jar,
    Json(LoginResponse {
      user:         session.user,
      access_token: session.access_token,
      redirect:     View::Dashboard,
    }),
  ))
}

// ─── Logout ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
  pub redirect: View,
}

/// `POST /api/logout`
pub async fn logout<S, P>(
  State(state): State<AppState<S, P>>,
  jar: CookieJar,
  token: Token,
) -> Result<(CookieJar, Json<LogoutResponse>), ApiError>
where
  S: JobStore,
  P: SessionProvider,
  jobtrack_core::Error: From<S::Error> + From<P::Error>,
{
  let redirect = state.gateway.sign_out(token.as_deref()).await?;
  Ok((jar.remove(cleared_session_cookie()), Json(LogoutResponse { redirect })))
}

// ─── Me ───────────────────────────────────────────────────────────────────────

/// `GET /api/me`
pub async fn me<S, P>(
  State(state): State<AppState<S, P>>,
  token: Token,
) -> Result<Json<User>, ApiError>
where
  S: JobStore,
  P: SessionProvider,
  jobtrack_core::Error: From<S::Error> + From<P::Error>,
{
  Ok(Json(state.gateway.current_user(token.as_deref()).await?))
}
