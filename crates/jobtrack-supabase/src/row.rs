//! Wire shapes for the `jobs` table and the auth endpoints.
//!
//! The table names its owner column `user_id`; the domain calls it
//! `owner_id`. Everything else maps one to one.

use chrono::{DateTime, NaiveDate, Utc};
use jobtrack_core::{
  job::{JobApplication, JobStatus, NewJob},
  session::{Session, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── jobs ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JobRow {
  pub id:           Uuid,
  pub user_id:      Uuid,
  pub company:      String,
  pub position:     String,
  pub status:       JobStatus,
  pub applied_date: Option<NaiveDate>,
  pub location:     Option<String>,
  pub salary_range: Option<String>,
  pub job_url:      Option<String>,
  pub notes:        Option<String>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

impl From<JobRow> for JobApplication {
  fn from(row: JobRow) -> Self {
    Self {
      id:           row.id,
      owner_id:     row.user_id,
      company:      row.company,
      position:     row.position,
      status:       row.status,
      applied_date: row.applied_date,
      location:     row.location,
      salary_range: row.salary_range,
      job_url:      row.job_url,
      notes:        row.notes,
      created_at:   row.created_at,
      updated_at:   row.updated_at,
    }
  }
}

/// Body of an insert or update. Absent optionals are sent as `null` so an
/// update clears them.
#[derive(Debug, Serialize)]
pub struct JobPayload<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_id:      Option<Uuid>,
  pub company:      &'a str,
  pub position:     &'a str,
  pub status:       JobStatus,
  pub applied_date: Option<NaiveDate>,
  pub location:     Option<&'a str>,
  pub salary_range: Option<&'a str>,
  pub job_url:      Option<&'a str>,
  pub notes:        Option<&'a str>,
}

impl<'a> JobPayload<'a> {
  pub fn insert(owner: Uuid, job: &'a NewJob) -> Self {
    Self { user_id: Some(owner), ..Self::update(job) }
  }

  pub fn update(job: &'a NewJob) -> Self {
    Self {
      user_id:      None,
      company:      &job.company,
      position:     &job.position,
      status:       job.status,
      applied_date: job.applied_date,
      location:     job.location.as_deref(),
      salary_range: job.salary_range.as_deref(),
      job_url:      job.job_url.as_deref(),
      notes:        job.notes.as_deref(),
    }
  }
}

// ─── auth ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PasswordGrant<'a> {
  pub email:    &'a str,
  pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct AuthUser {
  pub id:    Uuid,
  #[serde(default)]
  pub email: Option<String>,
}

impl From<AuthUser> for User {
  fn from(u: AuthUser) -> Self { Self { id: u.id, email: u.email } }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  /// Seconds since the epoch.
  #[serde(default)]
  pub expires_at:   Option<i64>,
  pub user:         AuthUser,
}

impl From<TokenResponse> for Session {
  fn from(t: TokenResponse) -> Self {
    Self {
      access_token: t.access_token,
      user:         t.user.into(),
      expires_at:   t.expires_at.and_then(|s| DateTime::from_timestamp(s, 0)),
    }
  }
}

/// Error bodies differ between the table API (`message`) and the auth
/// service (`error_description`, `msg`). Take whichever is present.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
  message:           Option<String>,
  msg:               Option<String>,
  error_description: Option<String>,
  error:             Option<String>,
}

impl ErrorBody {
  pub fn into_message(self) -> Option<String> {
    self.message.or(self.error_description).or(self.msg).or(self.error)
  }
}
