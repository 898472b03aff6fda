//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings with a fixed microsecond precision and a
//! `Z` suffix, so lexical order equals chronological order. Dates are ISO
//! `yyyy-mm-dd`. UUIDs are hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use jobtrack_core::{
  date,
  job::{JobApplication, JobStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { date::to_iso(d) }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  date::from_iso(s).ok_or_else(|| Error::DateParse(format!("bad date: {s:?}")))
}

// ─── JobStatus ────────────────────────────────────────────────────────────────

pub fn encode_status(s: JobStatus) -> &'static str { s.into() }

pub fn decode_status(s: &str) -> Result<JobStatus> {
  s.parse()
    .map_err(|_| Error::Corrupt(format!("unknown status: {s:?}")))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Column list matching [`RawJob::from_row`]'s positional reads.
pub const JOB_COLUMNS: &str = "id, owner_id, company, position, status, applied_date, \
   location, salary_range, job_url, notes, created_at, updated_at";

/// Raw strings read directly from a `jobs` row.
pub struct RawJob {
  pub id:           String,
  pub owner_id:     String,
  pub company:      String,
  pub position:     String,
  pub status:       String,
  pub applied_date: Option<String>,
  pub location:     Option<String>,
  pub salary_range: Option<String>,
  pub job_url:      Option<String>,
  pub notes:        Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawJob {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:           row.get(0)?,
      owner_id:     row.get(1)?,
      company:      row.get(2)?,
      position:     row.get(3)?,
      status:       row.get(4)?,
      applied_date: row.get(5)?,
      location:     row.get(6)?,
      salary_range: row.get(7)?,
      job_url:      row.get(8)?,
      notes:        row.get(9)?,
      created_at:   row.get(10)?,
      updated_at:   row.get(11)?,
    })
  }

  pub fn into_job(self) -> Result<JobApplication> {
    Ok(JobApplication {
      id:           decode_uuid(&self.id)?,
      owner_id:     decode_uuid(&self.owner_id)?,
      company:      self.company,
      position:     self.position,
      status:       decode_status(&self.status)?,
      applied_date: self.applied_date.as_deref().map(decode_date).transpose()?,
      location:     self.location,
      salary_range: self.salary_range,
      job_url:      self.job_url,
      notes:        self.notes,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}
