//! [`SqliteStore`]: the SQLite implementation of [`JobStore`].

use std::path::Path;

use chrono::{DateTime, Duration, SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use jobtrack_core::{
  job::{JobApplication, NewJob},
  query::{JobQuery, StatusFilter},
  session::Caller,
  store::JobStore,
};

use crate::{
  Result,
  encode::{JOB_COLUMNS, RawJob, encode_date, encode_dt, encode_status, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A job-application store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Current time at the precision the `jobs` table keeps.
fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch(&self, owner_id: Uuid, id: Uuid) -> Result<Option<JobApplication>> {
    let owner_str = encode_uuid(owner_id);
    let id_str    = encode_uuid(id);

    let raw: Option<RawJob> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?1 AND owner_id = ?2"),
              rusqlite::params![id_str, owner_str],
              RawJob::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawJob::into_job).transpose()
  }
}

// ─── JobStore impl ───────────────────────────────────────────────────────────

impl JobStore for SqliteStore {
  type Error = crate::Error;

  async fn insert(&self, caller: &Caller, job: NewJob) -> Result<JobApplication> {
    let at = now();
    let record = JobApplication {
      id:           Uuid::new_v4(),
      owner_id:     caller.id(),
      company:      job.company,
      position:     job.position,
      status:       job.status,
      applied_date: job.applied_date,
      location:     job.location,
      salary_range: job.salary_range,
      job_url:      job.job_url,
      notes:        job.notes,
      created_at:   at,
      updated_at:   at,
    };

    let id_str       = encode_uuid(record.id);
    let owner_str    = encode_uuid(record.owner_id);
    let company      = record.company.clone();
    let position     = record.position.clone();
    let status       = encode_status(record.status);
    let applied_date = record.applied_date.map(encode_date);
    let location     = record.location.clone();
    let salary_range = record.salary_range.clone();
    let job_url      = record.job_url.clone();
    let notes        = record.notes.clone();
    let at_str       = encode_dt(at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO jobs (
             id, owner_id, company, position, status, applied_date,
             location, salary_range, job_url, notes, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
          rusqlite::params![
            id_str,
            owner_str,
            company,
            position,
            status,
            applied_date,
            location,
            salary_range,
            job_url,
            notes,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn get(&self, caller: &Caller, id: Uuid) -> Result<Option<JobApplication>> {
    self.fetch(caller.id(), id).await
  }

  async fn update(
    &self,
    caller: &Caller,
    id:     Uuid,
    job:    NewJob,
  ) -> Result<Option<JobApplication>> {
    let Some(existing) = self.fetch(caller.id(), id).await? else {
      return Ok(None);
    };

    // Two updates inside one clock tick must still move `updated_at` forward.
    let updated_at = now().max(existing.updated_at + Duration::microseconds(1));

    let record = JobApplication {
      id,
      owner_id:     existing.owner_id,
      company:      job.company,
      position:     job.position,
      status:       job.status,
      applied_date: job.applied_date,
      location:     job.location,
      salary_range: job.salary_range,
      job_url:      job.job_url,
      notes:        job.notes,
      created_at:   existing.created_at,
      updated_at,
    };

    let id_str       = encode_uuid(id);
    let owner_str    = encode_uuid(record.owner_id);
    let company      = record.company.clone();
    let position     = record.position.clone();
    let status       = encode_status(record.status);
    let applied_date = record.applied_date.map(encode_date);
    let location     = record.location.clone();
    let salary_range = record.salary_range.clone();
    let job_url      = record.job_url.clone();
    let notes        = record.notes.clone();
    let at_str       = encode_dt(updated_at);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE jobs SET
             company = ?3, position = ?4, status = ?5, applied_date = ?6,
             location = ?7, salary_range = ?8, job_url = ?9, notes = ?10,
             updated_at = ?11
           WHERE id = ?1 AND owner_id = ?2",
          rusqlite::params![
            id_str,
            owner_str,
            company,
            position,
            status,
            applied_date,
            location,
            salary_range,
            job_url,
            notes,
            at_str,
          ],
        )?)
      })
      .await?;

    // Deleted between the read and the write.
    if changed == 0 {
      return Ok(None);
    }
    Ok(Some(record))
  }

  async fn delete(&self, caller: &Caller, id: Uuid) -> Result<bool> {
    let id_str    = encode_uuid(id);
    let owner_str = encode_uuid(caller.id());

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM jobs WHERE id = ?1 AND owner_id = ?2",
          rusqlite::params![id_str, owner_str],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }

  async fn list(&self, caller: &Caller, query: &JobQuery) -> Result<Vec<JobApplication>> {
    let owner_str = encode_uuid(caller.id());
    let status    = match query.status {
      StatusFilter::All => None,
      StatusFilter::Only(s) => Some(encode_status(s)),
    };
    // SQLite's LIKE and lower() only fold ASCII, so the search term is
    // matched after decoding and the limit has to wait for it.
    let limit_val = match (query.search.is_some(), query.limit) {
      (false, Some(n)) => i64::try_from(n).unwrap_or(i64::MAX),
      _ => -1,
    };

    let raws: Vec<RawJob> = self
      .conn
      .call(move |conn| {
        // Unused parameters bind as NULL.
        let status_cond = if status.is_some() { "AND status = ?2" } else { "" };
        let sql = format!(
          "SELECT {JOB_COLUMNS}
           FROM jobs
           WHERE owner_id = ?1 {status_cond}
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?3"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str, status, limit_val], RawJob::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    let jobs = raws
      .into_iter()
      .map(RawJob::into_job)
      .collect::<Result<Vec<_>>>()?;
    Ok(query.apply(jobs))
  }
}
