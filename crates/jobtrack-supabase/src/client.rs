//! [`SupabaseClient`]: the hosted implementation of [`JobStore`] and
//! [`SessionProvider`].

use std::time::Duration;

use jobtrack_core::{
  config::{BackendConfig, Endpoint},
  job::{JobApplication, NewJob},
  query::JobQuery,
  session::{Caller, Session, SessionProvider, User},
  store::JobStore,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
  Error, Result,
  params::{list_params, row_filter},
  row::{AuthUser, ErrorBody, JobPayload, JobRow, PasswordGrant, TokenResponse},
};

const JOBS: &str = "rest/v1/jobs";
const TOKEN: &str = "auth/v1/token";
const USER: &str = "auth/v1/user";
const LOGOUT: &str = "auth/v1/logout";

/// Async client for the hosted table and auth APIs.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct SupabaseClient {
  http:     Client,
  endpoint: std::result::Result<Endpoint, String>,
}

impl SupabaseClient {
  /// Build a client. Invalid settings do not fail here; they fail every
  /// later operation with [`Error::Config`].
  pub fn new(config: &BackendConfig) -> Result<Self> {
    let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
    let endpoint = config.validate().map_err(|e| match e {
      jobtrack_core::Error::Configuration(msg) => msg,
      other => other.to_string(),
    });
    if let Err(msg) = &endpoint {
      tracing::warn!("hosted backend is misconfigured: {msg}");
    }
    Ok(Self { http, endpoint })
  }

  pub fn is_configured(&self) -> bool { self.endpoint.is_ok() }

  fn endpoint(&self) -> Result<&Endpoint> {
    self.endpoint.as_ref().map_err(|msg| Error::Config(msg.clone()))
  }

  /// A request carrying the public key, and the caller's token if known.
  fn request(&self, method: Method, path: &str, token: Option<&str>) -> Result<RequestBuilder> {
    let endpoint = self.endpoint()?;
    let req = self
      .http
      .request(method, endpoint.join(path))
      .header("apikey", endpoint.api_key());
    Ok(match token {
      Some(token) => req.bearer_auth(token),
      None => req,
    })
  }

  fn table(&self, method: Method, caller: &Caller) -> Result<RequestBuilder> {
    self.request(method, JOBS, Some(&caller.access_token))
  }

  async fn rows(&self, req: RequestBuilder) -> Result<Vec<JobApplication>> {
    let rows: Vec<JobRow> = decode(check(req.send().await?).await?).await?;
    Ok(rows.into_iter().map(JobApplication::from).collect())
  }
}

/// Pass a success response through; turn anything else into [`Error::Api`].
async fn check(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  let message = serde_json::from_str::<ErrorBody>(&body)
    .ok()
    .and_then(ErrorBody::into_message)
    .unwrap_or_else(|| format!("request failed with status {status}"));
  tracing::debug!(%status, %message, "backend rejected request");
  Err(Error::Api { status: status.as_u16(), message })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
  let body = resp.bytes().await?;
  serde_json::from_slice(&body).map_err(|e| Error::Decode(e.to_string()))
}

fn single(mut jobs: Vec<JobApplication>) -> Option<JobApplication> {
  if jobs.is_empty() { None } else { Some(jobs.swap_remove(0)) }
}

// ─── JobStore impl ───────────────────────────────────────────────────────────

impl JobStore for SupabaseClient {
  type Error = Error;

  async fn insert(&self, caller: &Caller, job: NewJob) -> Result<JobApplication> {
    let req = self
      .table(Method::POST, caller)?
      .query(&[("select", "*")])
      .header("Prefer", "return=representation")
      .json(&JobPayload::insert(caller.id(), &job));
    single(self.rows(req).await?)
      .ok_or_else(|| Error::Decode("insert returned no row".into()))
  }

  async fn get(&self, caller: &Caller, id: Uuid) -> Result<Option<JobApplication>> {
    let req = self
      .table(Method::GET, caller)?
      .query(&[("select", "*")])
      .query(&row_filter(caller.id(), id));
    Ok(single(self.rows(req).await?))
  }

  async fn update(
    &self,
    caller: &Caller,
    id: Uuid,
    job: NewJob,
  ) -> Result<Option<JobApplication>> {
    let req = self
      .table(Method::PATCH, caller)?
      .query(&[("select", "*")])
      .query(&row_filter(caller.id(), id))
      .header("Prefer", "return=representation")
      .json(&JobPayload::update(&job));
    Ok(single(self.rows(req).await?))
  }

  async fn delete(&self, caller: &Caller, id: Uuid) -> Result<bool> {
    let req = self
      .table(Method::DELETE, caller)?
      .query(&[("select", "id")])
      .query(&row_filter(caller.id(), id))
      .header("Prefer", "return=representation");
    let resp = check(req.send().await?).await?;
    let removed: Vec<serde_json::Value> = decode(resp).await?;
    Ok(!removed.is_empty())
  }

  async fn list(&self, caller: &Caller, query: &JobQuery) -> Result<Vec<JobApplication>> {
    let req = self
      .table(Method::GET, caller)?
      .query(&list_params(caller.id(), query));
    self.rows(req).await
  }
}

// ─── SessionProvider impl ────────────────────────────────────────────────────

impl SessionProvider for SupabaseClient {
  type Error = Error;

  async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
    let resp = self
      .request(Method::POST, TOKEN, None)?
      .query(&[("grant_type", "password")])
      .json(&PasswordGrant { email, password })
      .send()
      .await?;
    let token: TokenResponse = match check(resp).await {
      Ok(resp) => decode(resp).await?,
      Err(Error::Api { message, .. }) => return Err(Error::Auth(message)),
      Err(e) => return Err(e),
    };
    Ok(token.into())
  }

  async fn sign_out(&self, access_token: &str) -> Result<()> {
    let resp = self
      .request(Method::POST, LOGOUT, Some(access_token))?
      .send()
      .await?;
    match check(resp).await {
      Ok(_) => Ok(()),
      // Already ended or never valid.
      Err(Error::Api { status, .. })
        if status == StatusCode::UNAUTHORIZED.as_u16()
          || status == StatusCode::NOT_FOUND.as_u16() =>
      {
        Ok(())
      }
      Err(e) => Err(e),
    }
  }

  async fn current_user(&self, access_token: &str) -> Result<Option<User>> {
    let resp = self
      .request(Method::GET, USER, Some(access_token))?
      .send()
      .await?;
    match check(resp).await {
      Ok(resp) => Ok(Some(decode::<AuthUser>(resp).await?.into())),
      Err(Error::Api { status, .. })
        if status == StatusCode::UNAUTHORIZED.as_u16()
          || status == StatusCode::FORBIDDEN.as_u16() =>
      {
        Ok(None)
      }
      Err(e) => Err(e),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn caller() -> Caller {
    Caller {
      user:         User { id: Uuid::new_v4(), email: None },
      access_token: "token".into(),
    }
  }

  fn assert_config_err<T: std::fmt::Debug>(result: Result<T>) {
    match result {
      Err(Error::Config(_)) => {}
      other => panic!("expected configuration error, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn unconfigured_client_fails_fast_on_every_operation() {
    let client = SupabaseClient::new(&BackendConfig::default()).unwrap();
    assert!(!client.is_configured());
    let me = caller();

    assert_config_err(client.insert(&me, NewJob::new("Acme", "Dev")).await);
    assert_config_err(client.get(&me, Uuid::new_v4()).await);
    assert_config_err(client.update(&me, Uuid::new_v4(), NewJob::new("Acme", "Dev")).await);
    assert_config_err(client.delete(&me, Uuid::new_v4()).await);
    assert_config_err(client.list(&me, &JobQuery::default()).await);
    assert_config_err(client.sign_in("a@example.com", "pw").await);
    assert_config_err(client.sign_out("token").await);
    assert_config_err(client.current_user("token").await);
  }

  #[tokio::test]
  async fn placeholder_settings_fail_fast() {
    let cfg = BackendConfig::new(
      "https://placeholder.supabase.co",
      "placeholder-anon-key-placeholder-anon-key-placeholder-anon-key",
    );
    let client = SupabaseClient::new(&cfg).unwrap();
    assert_config_err(client.list(&caller(), &JobQuery::default()).await);
  }

  #[test]
  fn configuration_errors_map_to_core_kind() {
    let err: jobtrack_core::Error = Error::Config("backend URL is not set".into()).into();
    assert!(matches!(err, jobtrack_core::Error::Configuration(ref m) if m.contains("URL")));

    let err: jobtrack_core::Error =
      Error::Api { status: 401, message: "JWT expired".into() }.into();
    assert!(matches!(err, jobtrack_core::Error::Unauthenticated));

    let err: jobtrack_core::Error =
      Error::Api { status: 400, message: "violates check constraint".into() }.into();
    assert!(matches!(err, jobtrack_core::Error::Store(ref m) if m == "violates check constraint"));
  }
}
