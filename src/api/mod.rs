//! HTTP client module for the remote leaderboard data source.
//!
//! The data source is a plain read-only HTTP GET: a single JSON document
//! containing the flat runs array. No authentication, no pagination.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
