//! `GET /api/dashboard`: totals per status, response rate, and the five
//! newest applications.

use axum::{Json, extract::State};
use jobtrack_core::{
  session::SessionProvider, store::JobStore, summary::Dashboard,
};

use crate::{AppState, auth::Token, error::ApiError};

pub async fn show<S, P>(
  State(state): State<AppState<S, P>>,
  token: Token,
) -> Result<Json<Dashboard>, ApiError>
where
  S: JobStore,
  P: SessionProvider,
  jobtrack_core::Error: From<S::Error> + From<P::Error>,
{
  Ok(Json(state.gateway.dashboard(token.as_deref()).await?))
}
