//! [`Gateway`] composes a [`SessionProvider`] and a [`JobStore`] into the
//! operations a view invokes.
//!
//! Every operation resolves the caller from an access token first (after any
//! local validation), and every record that leaves the gateway has passed the
//! ownership guard. Mutations report which views are now stale and where the
//! client should navigate next.

use std::{fmt, sync::Arc};

use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  job::{JobApplication, JobForm, JobStatus},
  query::JobQuery,
  session::{Caller, Session, SessionProvider, User},
  store::JobStore,
  summary::{Dashboard, RECENT_LIMIT, Summary},
};

// ─── Views ───────────────────────────────────────────────────────────────────

/// A navigation destination whose rendered data can go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum View {
  Login,
  Dashboard,
  List,
  New,
  Detail(Uuid),
  Edit(Uuid),
}

impl View {
  pub fn path(&self) -> String {
    match self {
      Self::Login => "/login".to_owned(),
      Self::Dashboard => "/dashboard".to_owned(),
      Self::List => "/jobs".to_owned(),
      Self::New => "/jobs/new".to_owned(),
      Self::Detail(id) => format!("/jobs/{id}"),
      Self::Edit(id) => format!("/jobs/{id}/edit"),
    }
  }
}

impl fmt::Display for View {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.path())
  }
}

impl From<View> for String {
  fn from(view: View) -> Self { view.path() }
}

/// The result of a successful mutation.
#[derive(Debug, Clone, Serialize)]
pub struct Mutation {
  /// The record as stored after the mutation; `None` after a delete.
  pub job:         Option<JobApplication>,
  /// Views that must be refreshed before they are shown again.
  pub invalidated: Vec<View>,
  pub redirect:    View,
}

/// A form ready to render, with the view it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
  #[serde(flatten)]
  pub form: JobForm,
  pub view: View,
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

pub struct Gateway<S, P> {
  store:    Arc<S>,
  sessions: Arc<P>,
}

impl<S, P> Clone for Gateway<S, P> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), sessions: Arc::clone(&self.sessions) }
  }
}

impl<S, P> Gateway<S, P>
where
  S: JobStore,
  P: SessionProvider,
  Error: From<S::Error> + From<P::Error>,
{
  pub fn new(store: Arc<S>, sessions: Arc<P>) -> Self { Self { store, sessions } }

  // ── Sessions ────────────────────────────────────────────────────────────

  pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
    Ok(self.sessions.sign_in(email, password).await?)
  }

  /// End the session, if any. Always lands on the login view.
  pub async fn sign_out(&self, token: Option<&str>) -> Result<View> {
    if let Some(token) = token {
      self.sessions.sign_out(token).await?;
    }
    Ok(View::Login)
  }

  pub async fn current_user(&self, token: Option<&str>) -> Result<User> {
    Ok(self.authenticate(token).await?.user)
  }

  /// Resolve the caller behind `token`, or fail with
  /// [`Error::Unauthenticated`].
  pub async fn authenticate(&self, token: Option<&str>) -> Result<Caller> {
    let token = token.filter(|t| !t.is_empty()).ok_or(Error::Unauthenticated)?;
    let user = self
      .sessions
      .current_user(token)
      .await?
      .ok_or(Error::Unauthenticated)?;
    Ok(Caller { user, access_token: token.to_owned() })
  }

  // ── Reads ───────────────────────────────────────────────────────────────

  pub async fn list(&self, token: Option<&str>, query: &JobQuery) -> Result<Vec<JobApplication>> {
    let caller = self.authenticate(token).await?;
    let mut jobs = self.store.list(&caller, query).await?;
    jobs.retain(|j| j.is_owned_by(caller.id()));
    Ok(jobs)
  }

  pub async fn get(&self, token: Option<&str>, id: Uuid) -> Result<JobApplication> {
    let caller = self.authenticate(token).await?;
    self.owned(&caller, id).await
  }

  pub async fn dashboard(&self, token: Option<&str>) -> Result<Dashboard> {
    let jobs = self.list(token, &JobQuery::default()).await?;
    let summary = Summary::compute(&jobs);
    let recent = jobs.into_iter().take(RECENT_LIMIT).collect();
    Ok(Dashboard { summary, recent })
  }

  /// The empty create form. Status starts at `applied`.
  pub async fn new_form(&self, token: Option<&str>) -> Result<FormView> {
    self.authenticate(token).await?;
    let form = JobForm { status: JobStatus::Applied.to_string(), ..JobForm::default() };
    Ok(FormView { form, view: View::New })
  }

  /// The edit form prefilled from the caller's record.
  pub async fn edit_form(&self, token: Option<&str>, id: Uuid) -> Result<FormView> {
    let job = self.get(token, id).await?;
    Ok(FormView { form: JobForm::from_job(&job), view: View::Edit(id) })
  }

  // ── Mutations ───────────────────────────────────────────────────────────

  pub async fn create(&self, token: Option<&str>, form: JobForm) -> Result<Mutation> {
    let payload = form.validate()?;
    let caller = self.authenticate(token).await?;

    let job = self.store.insert(&caller, payload).await?;
    guard(&caller, job.id, &job)?;

    Ok(Mutation {
      job:         Some(job),
      invalidated: vec![View::List, View::Dashboard],
      redirect:    View::List,
    })
  }

  pub async fn update(&self, token: Option<&str>, id: Uuid, form: JobForm) -> Result<Mutation> {
    let payload = form.validate()?;
    let caller = self.authenticate(token).await?;

    let job = self
      .store
      .update(&caller, id, payload)
      .await?
      .ok_or(Error::NotFound(id))?;
    guard(&caller, id, &job)?;

    Ok(Mutation {
      job:         Some(job),
      invalidated: vec![View::Detail(id), View::List, View::Dashboard],
      redirect:    View::Detail(id),
    })
  }

  pub async fn delete(&self, token: Option<&str>, id: Uuid) -> Result<Mutation> {
    let caller = self.authenticate(token).await?;

    self.owned(&caller, id).await?;
    if !self.store.delete(&caller, id).await? {
      return Err(Error::NotFound(id));
    }

    Ok(Mutation {
      job:         None,
      invalidated: vec![View::List, View::Dashboard],
      redirect:    View::List,
    })
  }

  /// Existence and ownership check in one.
  async fn owned(&self, caller: &Caller, id: Uuid) -> Result<JobApplication> {
    let job = self.store.get(caller, id).await?.ok_or(Error::NotFound(id))?;
    guard(caller, id, &job)?;
    Ok(job)
  }
}

/// The single ownership predicate, applied to every record the gateway hands
/// out. A foreign row is indistinguishable from a missing one.
fn guard(caller: &Caller, id: Uuid, job: &JobApplication) -> Result<()> {
  if job.is_owned_by(caller.id()) { Ok(()) } else { Err(Error::NotFound(id)) }
}
