//! Handlers for `/api/jobs` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/jobs` | Optional `?status=<status\|all>&search=<text>&limit=<n>` |
//! | `POST`   | `/api/jobs` | Body: job form; 201 |
//! | `GET`    | `/api/jobs/{id}` | 404 if missing or not yours |
//! | `PUT`    | `/api/jobs/{id}` | Body: job form; replaces every field |
//! | `DELETE` | `/api/jobs/{id}` | |
//! | `GET`    | `/api/jobs/new` | The blank create form |
//! | `GET`    | `/api/jobs/{id}/form` | The record as a prefilled form |
//!
//! Bodies, query strings and ids that fail to decode answer with the same
//! JSON error shape as every other failure.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{StatusCode, header::LOCATION},
  response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use jobtrack_core::{
  date,
  gateway::{FormView, Mutation},
  job::{JobApplication, JobForm},
  query::JobQuery,
  session::SessionProvider,
  store::JobStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::Token, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub status: Option<String>,
  pub search: Option<String>,
  pub limit:  Option<usize>,
}

/// `GET /api/jobs[?status=…&search=…&limit=…]`
pub async fn list<S, P>(
  State(state): State<AppState<S, P>>,
  token: Token,
  WithRejection(Query(params), _): WithRejection<Query<ListParams>, ApiError>,
) -> Result<Json<Vec<JobApplication>>, ApiError>
where
  S: JobStore,
  P: SessionProvider,
  jobtrack_core::Error: From<S::Error> + From<P::Error>,
{
  let mut query = JobQuery::compose(params.status.as_deref(), params.search.as_deref())?;
  if let Some(limit) = params.limit {
    query = query.with_limit(limit);
  }
  let jobs = state.gateway.list(token.as_deref(), &query).await?;
  Ok(Json(jobs))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /api/jobs`
pub async fn create<S, P>(
  State(state): State<AppState<S, P>>,
  token: Token,
  WithRejection(Json(form), _): WithRejection<Json<JobForm>, ApiError>,
) -> Result<impl IntoResponse, ApiError>
where
  S: JobStore,
  P: SessionProvider,
  jobtrack_core::Error: From<S::Error> + From<P::Error>,
{
  let outcome = state.gateway.create(token.as_deref(), form).await?;
  if let Some(job) = &outcome.job {
    tracing::info!(id = %job.id, company = %job.company, "job application created");
  }
  let location = outcome.redirect.path();
  Ok((StatusCode::CREATED, [(LOCATION, location)], Json(outcome)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// A record plus the display strings the detail view shows.
#[derive(Debug, Serialize)]
pub struct JobDetail {
  #[serde(flatten)]
  pub job:          JobApplication,
  pub status_label: &'static str,
  /// `dd/mm/yyyy`, absent when no date was recorded.
  pub applied_on:   Option<String>,
}

impl From<JobApplication> for JobDetail {
  fn from(job: JobApplication) -> Self {
    Self {
      status_label: job.status.label(),
      applied_on:   job.applied_date.map(date::to_display),
      job,
    }
  }
}

/// `GET /api/jobs/{id}`
pub async fn get_one<S, P>(
  State(state): State<AppState<S, P>>,
  token: Token,
  WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<JobDetail>, ApiError>
where
  S: JobStore,
  P: SessionProvider,
  jobtrack_core::Error: From<S::Error> + From<P::Error>,
{
  let job = state.gateway.get(token.as_deref(), id).await?;
  Ok(Json(job.into()))
}

// ─── Forms ────────────────────────────────────────────────────────────────────

/// `GET /api/jobs/new`
pub async fn new_form<S, P>(
  State(state): State<AppState<S, P>>,
  token: Token,
) -> Result<Json<FormView>, ApiError>
where
  S: JobStore,
  P: SessionProvider,
  jobtrack_core::Error: From<S::Error> + From<P::Error>,
{
  Ok(Json(state.gateway.new_form(token.as_deref()).await?))
}

/// `GET /api/jobs/{id}/form`
pub async fn edit_form<S, P>(
  State(state): State<AppState<S, P>>,
  token: Token,
  WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<FormView>, ApiError>
where
  S: JobStore,
  P: SessionProvider,
  jobtrack_core::Error: From<S::Error> + From<P::Error>,
{
  Ok(Json(state.gateway.edit_form(token.as_deref(), id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /api/jobs/{id}`
pub async fn update<S, P>(
  State(state): State<AppState<S, P>>,
  token: Token,
  WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
  WithRejection(Json(form), _): WithRejection<Json<JobForm>, ApiError>,
) -> Result<Json<Mutation>, ApiError>
where
  S: JobStore,
  P: SessionProvider,
  jobtrack_core::Error: From<S::Error> + From<P::Error>,
{
  let outcome = state.gateway.update(token.as_deref(), id, form).await?;
  tracing::info!(%id, "job application updated");
  Ok(Json(outcome))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /api/jobs/{id}`
pub async fn delete_one<S, P>(
  State(state): State<AppState<S, P>>,
  token: Token,
  WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<Mutation>, ApiError>
where
  S: JobStore,
  P: SessionProvider,
  jobtrack_core::Error: From<S::Error> + From<P::Error>,
{
  let outcome = state.gateway.delete(token.as_deref(), id).await?;
  tracing::info!(%id, "job application deleted");
  Ok(Json(outcome))
}
