//! Dashboard aggregation over the caller's full record set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;

use crate::job::{JobApplication, JobStatus};

/// How many records the dashboard lists under "recent".
pub const RECENT_LIMIT: usize = 5;

/// Counts derived from a record set. Recomputed on every dashboard load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
  pub total:         usize,
  /// Every status is present, with zero for those not seen.
  pub by_status:     BTreeMap<JobStatus, usize>,
  /// Share of applications that got any response, as a percentage with one
  /// decimal place, or `"0"` when there are no applications.
  pub response_rate: String,
}

impl Summary {
  pub fn compute(jobs: &[JobApplication]) -> Self {
    let mut by_status: BTreeMap<JobStatus, usize> =
      JobStatus::iter().map(|s| (s, 0)).collect();
    for job in jobs {
      *by_status.entry(job.status).or_default() += 1;
    }

    let total = jobs.len();
    let responded: usize = by_status
      .iter()
      .filter(|(status, _)| status.is_response())
      .map(|(_, n)| n)
      .sum();

    Self { total, by_status, response_rate: response_rate(responded, total) }
  }

  pub fn count(&self, status: JobStatus) -> usize {
    self.by_status.get(&status).copied().unwrap_or(0)
  }
}

fn response_rate(responded: usize, total: usize) -> String {
  if total == 0 {
    return "0".to_owned();
  }
  format!("{:.1}", responded as f64 / total as f64 * 100.0)
}

/// Everything the dashboard view renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
  pub summary: Summary,
  /// The newest [`RECENT_LIMIT`] records, newest first.
  pub recent:  Vec<JobApplication>,
}
