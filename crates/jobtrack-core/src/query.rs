//! The list query: optional status filter, optional free-text search, optional
//! "most recent N" limit.
//!
//! Owner scoping and the newest-first order are not part of the query; every
//! [`crate::store::JobStore`] applies them unconditionally.

use crate::{
  error::ValidationError,
  job::{JobApplication, JobStatus},
};

// ─── Status filter ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
  #[default]
  All,
  Only(JobStatus),
}

impl StatusFilter {
  /// Parse the `status` query parameter. Absent, empty, and `"all"` all mean
  /// no filter.
  pub fn parse(raw: Option<&str>) -> Result<Self, ValidationError> {
    match raw.map(str::trim) {
      None | Some("") | Some("all") => Ok(Self::All),
      Some(s) => JobStatus::parse(s).map(Self::Only),
    }
  }

  pub fn admits(self, status: JobStatus) -> bool {
    match self {
      Self::All => true,
      Self::Only(wanted) => wanted == status,
    }
  }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::JobStore::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
  pub status: StatusFilter,
  /// Trimmed, never empty. Matched case-insensitively as a substring of
  /// `company` or `position`.
  pub search: Option<String>,
  pub limit:  Option<usize>,
}

impl JobQuery {
  /// Build a query from raw list-view parameters.
  pub fn compose(
    status: Option<&str>,
    search: Option<&str>,
  ) -> Result<Self, ValidationError> {
    Ok(Self::default().with_status(StatusFilter::parse(status)?).with_search(search))
  }

  pub fn with_status(mut self, status: StatusFilter) -> Self {
    self.status = status;
    self
  }

  pub fn with_search(mut self, search: Option<&str>) -> Self {
    self.search = search
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_owned);
    self
  }

  pub fn with_limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }

  /// Whether `job` passes both filters. Ownership is not checked here.
  pub fn matches(&self, job: &JobApplication) -> bool {
    if !self.status.admits(job.status) {
      return false;
    }
    match &self.search {
      None => true,
      Some(term) => {
        let term = term.to_lowercase();
        job.company.to_lowercase().contains(&term)
          || job.position.to_lowercase().contains(&term)
      }
    }
  }

  /// Filter, order newest first, and truncate an in-memory record set.
  pub fn apply(&self, mut jobs: Vec<JobApplication>) -> Vec<JobApplication> {
    jobs.retain(|j| self.matches(j));
    jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    if let Some(limit) = self.limit {
      jobs.truncate(limit);
    }
    jobs
  }
}
