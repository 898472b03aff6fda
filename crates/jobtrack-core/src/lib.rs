//! Core types and trait definitions for the jobtrack application tracker.
//!
//! This crate has no HTTP or database dependencies.
//! Backends implement [`store::JobStore`] and [`session::SessionProvider`];
//! the server drives everything through [`gateway::Gateway`].

pub mod config;
pub mod date;
pub mod error;
pub mod gateway;
pub mod job;
pub mod query;
pub mod session;
pub mod store;
pub mod summary;

pub use error::{Error, Result, ValidationError};
