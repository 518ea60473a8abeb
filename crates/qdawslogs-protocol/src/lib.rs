//! Data model for CloudWatch Logs Insights queries.
//!
//! This crate defines the request/result types and the service seam the
//! poll loop talks to.

mod query;
mod service;

pub use query::*;
pub use service::*;
