//! Upstream data sources

pub mod traffic;

pub use traffic::{GithubTrafficClient, TrafficSource, fetch_snapshot};
