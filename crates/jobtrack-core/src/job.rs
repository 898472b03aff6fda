//! The job-application record and its validation rules.
//!
//! A [`JobForm`] is raw user input. [`JobForm::validate`] turns it into a
//! [`NewJob`], the only payload the store accepts. The store returns fully
//! populated [`JobApplication`] rows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{date, error::ValidationError};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Where an application currently stands.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
  #[default]
  Applied,
  Interviewing,
  Offer,
  Rejected,
  Withdrawn,
}

impl JobStatus {
  /// Capitalised label for display, e.g. `"Interviewing"`.
  pub fn label(self) -> &'static str {
    match self {
      Self::Applied => "Applied",
      Self::Interviewing => "Interviewing",
      Self::Offer => "Offer",
      Self::Rejected => "Rejected",
      Self::Withdrawn => "Withdrawn",
    }
  }

  /// Whether the employer has answered the application in any way.
  pub fn is_response(self) -> bool {
    matches!(self, Self::Interviewing | Self::Offer | Self::Rejected)
  }

  /// Parse the wire form, rejecting anything outside the closed set.
  pub fn parse(raw: &str) -> Result<Self, ValidationError> {
    raw.parse().map_err(|_| {
      ValidationError::new("status", format!("unknown status {raw:?}"))
    })
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A stored job application. `id`, `owner_id` and `created_at` never change
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
  pub id:           Uuid,
  pub owner_id:     Uuid,
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

impl JobApplication {
  /// The ownership guard: a record is visible and mutable only to its owner.
  pub fn is_owned_by(&self, user_id: Uuid) -> bool { self.owner_id == user_id }
}

// ─── Validated payload ───────────────────────────────────────────────────────

/// A validated create/update payload. Empty optional strings have already
/// been normalised to `None`; `company` and `position` are trimmed and
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJob {
  pub company:      String,
  pub position:     String,
  pub status:       JobStatus,
  pub applied_date: Option<NaiveDate>,
  pub location:     Option<String>,
  pub salary_range: Option<String>,
  pub job_url:      Option<String>,
  pub notes:        Option<String>,
}

impl NewJob {
  /// Convenience constructor with every optional field absent.
  pub fn new(company: impl Into<String>, position: impl Into<String>) -> Self {
    Self {
      company:      company.into(),
      position:     position.into(),
      status:       JobStatus::default(),
      applied_date: None,
      location:     None,
      salary_range: None,
      job_url:      None,
      notes:        None,
    }
  }
}

// ─── Raw form input ──────────────────────────────────────────────────────────

/// Raw form input as submitted by a client. Every field is free text; missing
/// fields deserialise as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobForm {
  pub company:      String,
  pub position:     String,
  /// Wire form of [`JobStatus`]; empty means `applied`.
  pub status:       String,
  /// `yyyy-mm-dd` or `dd/mm/yyyy`; empty means no date.
  pub applied_date: String,
  pub location:     String,
  pub salary_range: String,
  pub job_url:      String,
  pub notes:        String,
}

impl JobForm {
  /// Prefill a form from an existing record, as the edit view does.
  pub fn from_job(job: &JobApplication) -> Self {
    Self {
      company:      job.company.clone(),
      position:     job.position.clone(),
      status:       job.status.to_string(),
      applied_date: job.applied_date.map(date::to_iso).unwrap_or_default(),
      location:     job.location.clone().unwrap_or_default(),
      salary_range: job.salary_range.clone().unwrap_or_default(),
      job_url:      job.job_url.clone().unwrap_or_default(),
      notes:        job.notes.clone().unwrap_or_default(),
    }
  }

  /// Check required fields and normalise the rest.
  ///
  /// Fails on the first offending field, in form order.
  pub fn validate(self) -> Result<NewJob, ValidationError> {
    let company = required("company", &self.company)?;
    let position = required("position", &self.position)?;

    let status = match self.status.trim() {
      "" => JobStatus::default(),
      raw => JobStatus::parse(raw)?,
    };

    let applied_date = date::parse_input(&self.applied_date)?;

    Ok(NewJob {
      company,
      position,
      status,
      applied_date,
      location: optional(self.location),
      salary_range: optional(self.salary_range),
      job_url: optional(self.job_url),
      notes: optional(self.notes),
    })
  }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(ValidationError::new(field, format!("{field} is required")));
  }
  Ok(trimmed.to_owned())
}

/// Empty string means absent; anything else is kept exactly as typed.
fn optional(value: String) -> Option<String> {
  if value.is_empty() { None } else { Some(value) }
}
