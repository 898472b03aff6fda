//! Query-string construction for the PostgREST table API.
//!
//! Filters use PostgREST's `column=op.value` syntax. Search terms are quoted
//! so that reserved characters (`,` `.` `(` `)`) inside a term do not break
//! the `or=(...)` grouping.

use jobtrack_core::query::{JobQuery, StatusFilter};
use uuid::Uuid;

pub type Params = Vec<(&'static str, String)>;

/// Filters that pin a request to one of `owner`'s rows.
pub fn row_filter(owner: Uuid, id: Uuid) -> Params {
  vec![("id", format!("eq.{id}")), ("user_id", format!("eq.{owner}"))]
}

/// Full parameter set for a list request.
pub fn list_params(owner: Uuid, query: &JobQuery) -> Params {
  let mut params = vec![("select", "*".to_owned()), ("user_id", format!("eq.{owner}"))];

  if let StatusFilter::Only(status) = query.status {
    params.push(("status", format!("eq.{status}")));
  }

  if let Some(term) = &query.search {
    let value = quote(&format!("*{}*", escape_like(term)));
    params.push(("or", format!("(company.ilike.{value},position.ilike.{value})")));
  }

  params.push(("order", "created_at.desc".to_owned()));

  if let Some(limit) = query.limit {
    params.push(("limit", limit.to_string()));
  }
  params
}

/// Escape `%` and `_` so they match literally. `*` is PostgREST's own
/// wildcard and cannot be escaped.
fn escape_like(term: &str) -> String {
  let mut out = String::with_capacity(term.len());
  for c in term.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}

/// Wrap a filter value in double quotes, escaping `"` and `\`.
fn quote(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  for c in value.chars() {
    if matches!(c, '"' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('"');
  out
}
