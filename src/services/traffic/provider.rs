//! 流量数据源抽象层

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::models::{TrafficMetric, TrafficSnapshot};
use crate::errors::{Result, TrafficError};

/// Traffic data source
pub trait TrafficSource {
    /// Raw JSON payload of `metric`
    ///
    /// `Ok(None)` when the source answered but did not report success; an
    /// `Err` is a transport failure and aborts the run.
    fn fetch_metric(&self, metric: TrafficMetric) -> Result<Option<Value>>;

    /// 数据源名称（用于日志）
    fn name(&self) -> &'static str;
}

/// Pull all four metrics, keeping whichever succeeded
///
/// No retries: a metric missing this run is picked up again by the next run.
pub fn fetch_snapshot(source: &dyn TrafficSource) -> Result<TrafficSnapshot> {
    let mut snapshot = TrafficSnapshot::default();

    for metric in TrafficMetric::ALL {
        let Some(payload) = source.fetch_metric(metric)? else {
            warn!(
                "{}: {} unavailable this run, skipping",
                source.name(),
                metric.key()
            );
            continue;
        };
        debug!("{}: fetched {}", source.name(), metric.key());

        match metric {
            TrafficMetric::Clones => snapshot.clones = Some(decode(metric, payload)?),
            TrafficMetric::Views => snapshot.views = Some(decode(metric, payload)?),
            TrafficMetric::PopularPaths => snapshot.paths = Some(decode(metric, payload)?),
            TrafficMetric::PopularReferrers => {
                snapshot.referrers = Some(decode(metric, payload)?)
            }
        }
    }

    info!(
        "Fetched traffic snapshot from {}: [{}]",
        source.name(),
        snapshot.available_keys().join(", ")
    );
    Ok(snapshot)
}

fn decode<T: DeserializeOwned>(metric: TrafficMetric, payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| {
        TrafficError::serialization(format!("Unexpected {} payload: {}", metric.key(), e))
    })
}
