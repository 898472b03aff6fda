//! Router tests against an in-memory SQLite store and a local account.

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  body::Body,
  http::{HeaderMap, Request, StatusCode, header},
};
use jobtrack_core::{config::BackendConfig, gateway::Gateway};
use jobtrack_store_sqlite::SqliteStore;
use jobtrack_supabase::SupabaseClient;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{
  AppState, Backend, ServerConfig,
  auth::{LocalAccount, LocalSessions, SESSION_COOKIE, hash_password},
  router,
};

const EMAIL: &str = "me@example.com";
const PASSWORD: &str = "correct horse";

fn config() -> ServerConfig {
  ServerConfig {
    host:                "127.0.0.1".to_owned(),
    port:                3000,
    backend:             Backend::Sqlite,
    store_path:          PathBuf::from(":memory:"),
    supabase_url:        None,
    supabase_anon_key:   None,
    local_email:         Some(EMAIL.to_owned()),
    local_password_hash: None,
    secure_cookies:      false,
  }
}

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let sessions = LocalSessions::new(Some(LocalAccount {
    email:         EMAIL.to_owned(),
    password_hash: hash_password(PASSWORD).unwrap(),
  }));
  router(AppState {
    gateway: Gateway::new(Arc::new(store), Arc::new(sessions)),
    config:  Arc::new(config()),
  })
}

struct Reply {
  status:  StatusCode,
  headers: HeaderMap,
  body:    Value,
}

async fn send(
  app: &Router,
  method: &str,
  uri: &str,
  cookie: Option<&str>,
  body: Option<Value>,
) -> Reply {
  send_raw(app, method, uri, cookie, body.map(|b| b.to_string())).await
}

/// Like [`send`], with the request body passed through untouched.
async fn send_raw(
  app: &Router,
  method: &str,
  uri: &str,
  cookie: Option<&str>,
  body: Option<String>,
) -> Reply {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(cookie) = cookie {
    builder = builder.header(header::COOKIE, cookie);
  }
  let req = match body {
    Some(body) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let headers = resp.headers().clone();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  Reply { status, headers, body }
}

/// Sign in and return the `name=value` pair to send back as a cookie.
async fn login(app: &Router) -> String {
  let reply = send(
    app,
    "POST",
    "/api/login",
    None,
    Some(json!({ "email": EMAIL, "password": PASSWORD })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
  let set_cookie = reply.headers[header::SET_COOKIE].to_str().unwrap();
  set_cookie.split(';').next().unwrap().to_owned()
}

async fn create(app: &Router, cookie: &str, body: Value) -> Value {
  let reply = send(app, "POST", "/api/jobs", Some(cookie), Some(body)).await;
  assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
  reply.body["job"].clone()
}

// ── Health / session ──────────────────────────────────────────────────────────

#[tokio::test]
async fn health_is_public() {
  let app = app().await;
  let reply = send(&app, "GET", "/health", None, None).await;
  assert_eq!(reply.status, StatusCode::OK);
  assert_eq!(reply.body["status"], "ok");
}

#[tokio::test]
async fn unauthenticated_requests_redirect_to_login() {
  let app = app().await;
  for (method, uri) in [("GET", "/api/jobs"), ("GET", "/api/dashboard"), ("GET", "/api/me")] {
    let reply = send(&app, method, uri, None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    assert_eq!(reply.body["redirect"], "/login");
  }

  let reply = send(&app, "GET", "/api/jobs", Some("jobtrack_session=forged"), None).await;
  assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_sets_an_http_only_cookie() {
  let app = app().await;
  let reply = send(
    &app,
    "POST",
    "/api/login",
    None,
    Some(json!({ "email": EMAIL, "password": PASSWORD })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::OK);
  assert_eq!(reply.body["redirect"], "/dashboard");
  assert_eq!(reply.body["user"]["email"], EMAIL);

  let set_cookie = reply.headers[header::SET_COOKIE].to_str().unwrap();
  assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE}=")), "{set_cookie}");
  assert!(set_cookie.contains("HttpOnly"), "{set_cookie}");
  assert!(set_cookie.contains("SameSite=Lax"), "{set_cookie}");
}

#[tokio::test]
async fn bearer_token_from_login_body_is_accepted() {
  let app = app().await;
  let reply = send(
    &app,
    "POST",
    "/api/login",
    None,
    Some(json!({ "email": EMAIL, "password": PASSWORD })),
  )
  .await;
  let token = reply.body["access_token"].as_str().unwrap().to_owned();

  let req = Request::builder()
    .uri("/api/me")
    .header(header::AUTHORIZATION, format!("Bearer {token}"))
    .body(Body::empty())
    .unwrap();
  let resp = app.clone().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_is_rejected_verbatim() {
  let app = app().await;
  let reply = send(
    &app,
    "POST",
    "/api/login",
    None,
    Some(json!({ "email": EMAIL, "password": "nope" })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
  assert_eq!(reply.body["error"], "Invalid login credentials");
  assert!(reply.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn login_requires_email() {
  let app = app().await;
  let reply = send(&app, "POST", "/api/login", None, Some(json!({ "password": PASSWORD }))).await;
  assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(reply.body["field"], "email");
}

#[tokio::test]
async fn logout_ends_the_session() {
  let app = app().await;
  let cookie = login(&app).await;

  let me = send(&app, "GET", "/api/me", Some(&cookie), None).await;
  assert_eq!(me.status, StatusCode::OK);
  assert_eq!(me.body["email"], EMAIL);

  let reply = send(&app, "POST", "/api/logout", Some(&cookie), None).await;
  assert_eq!(reply.status, StatusCode::OK);
  assert_eq!(reply.body["redirect"], "/login");
  let cleared = reply.headers[header::SET_COOKIE].to_str().unwrap();
  assert!(cleared.starts_with(&format!("{SESSION_COOKIE}=;")), "{cleared}");

  let me = send(&app, "GET", "/api/me", Some(&cookie), None).await;
  assert_eq!(me.status, StatusCode::UNAUTHORIZED);

  // Signing out twice, or with no session at all, still lands on login.
  let reply = send(&app, "POST", "/api/logout", None, None).await;
  assert_eq!(reply.status, StatusCode::OK);
}

// ── Jobs ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get() {
  let app = app().await;
  let cookie = login(&app).await;

  let reply = send(
    &app,
    "POST",
    "/api/jobs",
    Some(&cookie),
    Some(json!({
      "company": "  Google ",
      "position": "SRE",
      "applied_date": "2024-03-05",
      "salary_range": "$150k - $200k",
    })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::CREATED);
  assert_eq!(reply.headers[header::LOCATION], "/jobs");
  assert_eq!(reply.body["redirect"], "/jobs");
  assert_eq!(reply.body["invalidated"], json!(["/jobs", "/dashboard"]));

  let id = reply.body["job"]["id"].as_str().unwrap().to_owned();
  let detail = send(&app, "GET", &format!("/api/jobs/{id}"), Some(&cookie), None).await;
  assert_eq!(detail.status, StatusCode::OK);
  assert_eq!(detail.body["company"], "Google");
  assert_eq!(detail.body["status"], "applied");
  assert_eq!(detail.body["status_label"], "Applied");
  assert_eq!(detail.body["applied_date"], "2024-03-05");
  assert_eq!(detail.body["applied_on"], "05/03/2024");
  assert_eq!(detail.body["location"], Value::Null);

  let form = send(&app, "GET", &format!("/api/jobs/{id}/form"), Some(&cookie), None).await;
  assert_eq!(form.status, StatusCode::OK);
  assert_eq!(form.body["applied_date"], "2024-03-05");
  assert_eq!(form.body["location"], "");
  assert_eq!(form.body["view"], format!("/jobs/{id}/edit"));
}

#[tokio::test]
async fn new_form_is_blank_and_starts_at_applied() {
  let app = app().await;

  let reply = send(&app, "GET", "/api/jobs/new", None, None).await;
  assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

  let cookie = login(&app).await;
  let reply = send(&app, "GET", "/api/jobs/new", Some(&cookie), None).await;
  assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
  assert_eq!(reply.body["view"], "/jobs/new");
  assert_eq!(reply.body["status"], "applied");
  assert_eq!(reply.body["company"], "");
}

#[tokio::test]
async fn undecodable_requests_get_json_errors() {
  let app = app().await;
  let cookie = login(&app).await;

  let reply = send_raw(&app, "POST", "/api/jobs", Some(&cookie), Some("{\"company\":".into())).await;
  assert_eq!(reply.status, StatusCode::BAD_REQUEST);
  assert!(reply.body["error"].is_string(), "{}", reply.body);

  let reply = send(
    &app,
    "POST",
    "/api/jobs",
    Some(&cookie),
    Some(json!({ "company": null, "position": "Dev" })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
  assert!(reply.body["error"].is_string(), "{}", reply.body);

  let reply = send(&app, "GET", "/api/jobs?limit=abc", Some(&cookie), None).await;
  assert_eq!(reply.status, StatusCode::BAD_REQUEST);
  assert!(reply.body["error"].is_string(), "{}", reply.body);

  let reply = send(&app, "GET", "/api/jobs/not-a-uuid", Some(&cookie), None).await;
  assert_eq!(reply.status, StatusCode::BAD_REQUEST);
  assert!(reply.body["error"].is_string(), "{}", reply.body);

  let reply = send_raw(&app, "POST", "/api/login", None, Some("email=me".into())).await;
  assert_eq!(reply.status, StatusCode::BAD_REQUEST);
  assert!(reply.body["error"].is_string(), "{}", reply.body);

  let list = send(&app, "GET", "/api/jobs", Some(&cookie), None).await;
  assert_eq!(list.body, json!([]));
}

#[tokio::test]
async fn invalid_form_is_422_and_writes_nothing() {
  let app = app().await;
  let cookie = login(&app).await;

  let reply = send(
    &app,
    "POST",
    "/api/jobs",
    Some(&cookie),
    Some(json!({ "company": "", "position": "SRE" })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(reply.body["field"], "company");

  let reply = send(
    &app,
    "POST",
    "/api/jobs",
    Some(&cookie),
    Some(json!({ "company": "Acme", "position": "Dev", "applied_date": "next tuesday" })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(reply.body["field"], "applied_date");

  let list = send(&app, "GET", "/api/jobs", Some(&cookie), None).await;
  assert_eq!(list.body, json!([]));
}

#[tokio::test]
async fn list_filters_and_searches() {
  let app = app().await;
  let cookie = login(&app).await;

  create(&app, &cookie, json!({ "company": "Google", "position": "SRE", "status": "offer" })).await;
  create(&app, &cookie, json!({ "company": "Amazon", "position": "SDE" })).await;
  create(&app, &cookie, json!({ "company": "Initech", "position": "Dev", "status": "offer" })).await;

  let offers = send(&app, "GET", "/api/jobs?status=offer", Some(&cookie), None).await;
  let names: Vec<_> = offers.body.as_array().unwrap().iter().map(|j| j["company"].clone()).collect();
  assert_eq!(names, [json!("Initech"), json!("Google")]);

  let hits = send(&app, "GET", "/api/jobs?status=all&search=GOOG", Some(&cookie), None).await;
  assert_eq!(hits.body.as_array().unwrap().len(), 1);
  assert_eq!(hits.body[0]["company"], "Google");

  let newest = send(&app, "GET", "/api/jobs?limit=1", Some(&cookie), None).await;
  assert_eq!(newest.body.as_array().unwrap().len(), 1);
  assert_eq!(newest.body[0]["company"], "Initech");

  let bad = send(&app, "GET", "/api/jobs?status=ghosted", Some(&cookie), None).await;
  assert_eq!(bad.status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(bad.body["field"], "status");
}

#[tokio::test]
async fn update_and_delete() {
  let app = app().await;
  let cookie = login(&app).await;
  let job = create(&app, &cookie, json!({ "company": "Acme", "position": "Dev" })).await;
  let id = job["id"].as_str().unwrap().to_owned();
  let uri = format!("/api/jobs/{id}");

  let reply = send(
    &app,
    "PUT",
    &uri,
    Some(&cookie),
    Some(json!({ "company": "Acme", "position": "Lead Dev", "status": "interviewing" })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::OK);
  assert_eq!(reply.body["redirect"], format!("/jobs/{id}"));
  assert_eq!(reply.body["job"]["position"], "Lead Dev");
  assert_eq!(reply.body["job"]["status"], "interviewing");

  let dash = send(&app, "GET", "/api/dashboard", Some(&cookie), None).await;
  assert_eq!(dash.status, StatusCode::OK);
  assert_eq!(dash.body["summary"]["total"], 1);
  assert_eq!(dash.body["summary"]["by_status"]["interviewing"], 1);
  assert_eq!(dash.body["summary"]["response_rate"], "100.0");

  let reply = send(&app, "DELETE", &uri, Some(&cookie), None).await;
  assert_eq!(reply.status, StatusCode::OK);
  assert_eq!(reply.body["redirect"], "/jobs");
  assert_eq!(reply.body["job"], Value::Null);

  let gone = send(&app, "GET", &uri, Some(&cookie), None).await;
  assert_eq!(gone.status, StatusCode::NOT_FOUND);
  let again = send(&app, "DELETE", &uri, Some(&cookie), None).await;
  assert_eq!(again.status, StatusCode::NOT_FOUND);

  let dash = send(&app, "GET", "/api/dashboard", Some(&cookie), None).await;
  assert_eq!(dash.body["summary"]["total"], 0);
  assert_eq!(dash.body["summary"]["response_rate"], "0");
}

#[tokio::test]
async fn update_of_missing_record_is_404() {
  let app = app().await;
  let cookie = login(&app).await;
  let reply = send(
    &app,
    "PUT",
    &format!("/api/jobs/{}", uuid::Uuid::new_v4()),
    Some(&cookie),
    Some(json!({ "company": "Acme", "position": "Dev" })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn misconfigured_hosted_backend_is_503() {
  let client = Arc::new(SupabaseClient::new(&BackendConfig::default()).unwrap());
  let app = router(AppState {
    gateway: Gateway::new(Arc::clone(&client), client),
    config:  Arc::new(ServerConfig { backend: Backend::Supabase, ..config() }),
  });

  let reply = send(&app, "GET", "/api/jobs", Some("jobtrack_session=anything"), None).await;
  assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);
  assert!(reply.body["error"].as_str().unwrap().contains("not set"));

  let reply = send(
    &app,
    "POST",
    "/api/login",
    None,
    Some(json!({ "email": EMAIL, "password": PASSWORD })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::SERVICE_UNAVAILABLE);

  // Local validation still runs first.
  let reply = send(
    &app,
    "POST",
    "/api/jobs",
    Some("jobtrack_session=anything"),
    Some(json!({ "company": "", "position": "Dev" })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
}
