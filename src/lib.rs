//! trafficsheet - GitHub traffic accumulation into Google Sheets
//!
//! GitHub only exposes a trailing 14-day window of traffic data. This crate
//! runs as a daily batch job that keeps a permanent record of it in a
//! spreadsheet: closed days of clones/views are appended, and popular paths
//! and referrers are folded into running totals by diffing each snapshot
//! against the previous one.
//!
//! # Architecture
//! - `services::traffic`: traffic source models and the GitHub REST client
//! - `storage`: `SheetStore` contract, Google Sheets and in-memory backends
//! - `analytics`: bootstrap, daily appender and snapshot reconciler
//! - `runtime`: context construction and the job run
//! - `config`: static configuration
//! - `system`: logging

pub mod analytics;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
