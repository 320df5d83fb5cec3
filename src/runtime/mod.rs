//! Job lifecycle: context construction and the run itself

pub mod job;
pub mod lifetime;

pub use job::{RunReport, TrafficJob};
pub use lifetime::startup::{RunTarget, StartupContext, prepare_startup};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::config::StaticConfig;

/// Build the context from `config` and run the job once
pub fn run(config: &StaticConfig, target: &RunTarget, today: NaiveDate) -> Result<RunReport> {
    let ctx = prepare_startup(config, target)?;
    let report = TrafficJob::new(&ctx.store, &ctx.source)
        .run(today)
        .context("Traffic job failed")?;
    Ok(report)
}
