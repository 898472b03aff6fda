//! The `JobStore` trait, the record-store boundary.
//!
//! Implemented by `jobtrack-store-sqlite` and `jobtrack-supabase`. Every
//! method is scoped to the [`Caller`]: a store never returns, changes, or
//! removes a row whose `owner_id` differs from `caller.id()`.

use std::future::Future;

use uuid::Uuid;

use crate::{
  job::{JobApplication, NewJob},
  query::JobQuery,
  session::Caller,
};

/// Abstraction over a job-application table.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait JobStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert a row owned by `caller`. The store assigns `id`, `created_at`
  /// and `updated_at`.
  fn insert<'a>(
    &'a self,
    caller: &'a Caller,
    job: NewJob,
  ) -> impl Future<Output = Result<JobApplication, Self::Error>> + Send + 'a;

  /// Fetch one of the caller's rows. `None` if absent or owned by someone
  /// else.
  fn get<'a>(
    &'a self,
    caller: &'a Caller,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<JobApplication>, Self::Error>> + Send + 'a;

  /// Replace every editable field of one of the caller's rows and refresh
  /// `updated_at`. `None` if no such row is owned by the caller.
  fn update<'a>(
    &'a self,
    caller: &'a Caller,
    id: Uuid,
    job: NewJob,
  ) -> impl Future<Output = Result<Option<JobApplication>, Self::Error>> + Send + 'a;

  /// Permanently remove one of the caller's rows. Returns whether a row was
  /// removed.
  fn delete<'a>(
    &'a self,
    caller: &'a Caller,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// The caller's rows matching `query`, newest `created_at` first.
  fn list<'a>(
    &'a self,
    caller: &'a Caller,
    query: &'a JobQuery,
  ) -> impl Future<Output = Result<Vec<JobApplication>, Self::Error>> + Send + 'a;
}
