//! Hosted backend for jobtrack: a PostgREST table API for the `jobs` table
//! and a GoTrue-style auth service, both reached over HTTPS.
//!
//! [`SupabaseClient`] implements both [`jobtrack_core::store::JobStore`] and
//! [`jobtrack_core::session::SessionProvider`]. Connection settings are
//! checked on every call, so a misconfigured client still constructs and
//! fails each operation with a configuration error before touching the
//! network.
//!
//! `schema.sql` in this crate holds the table definition and the row-level
//! security policies the backend is expected to enforce.

mod client;
mod params;
mod row;

pub mod error;

pub use client::SupabaseClient;
pub use error::{Error, Result};
