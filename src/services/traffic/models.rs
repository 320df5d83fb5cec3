use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TrafficError};

/// The four metrics pulled on every run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficMetric {
    Clones,
    PopularPaths,
    PopularReferrers,
    Views,
}

impl TrafficMetric {
    /// Request order of a run
    pub const ALL: [TrafficMetric; 4] = [
        TrafficMetric::Clones,
        TrafficMetric::PopularPaths,
        TrafficMetric::PopularReferrers,
        TrafficMetric::Views,
    ];

    /// Fixed result key of the metric
    pub fn key(&self) -> &'static str {
        match self {
            TrafficMetric::Clones => "clone_stats",
            TrafficMetric::PopularPaths => "path_stats",
            TrafficMetric::PopularReferrers => "referrers_stats",
            TrafficMetric::Views => "views_stats",
        }
    }

    /// Path relative to the repository traffic API
    pub fn endpoint(&self) -> &'static str {
        match self {
            TrafficMetric::Clones => "traffic/clones?per=day",
            TrafficMetric::PopularPaths => "traffic/popular/paths",
            TrafficMetric::PopularReferrers => "traffic/popular/referrers",
            TrafficMetric::Views => "traffic/views?per=day",
        }
    }
}

/// 单日的 clone / view 数据点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficDatapoint {
    /// ISO-8601, e.g. `2024-01-05T00:00:00Z`
    pub timestamp: String,
    pub count: u64,
    pub uniques: u64,
}

impl TrafficDatapoint {
    /// Calendar date of the datapoint (the date portion of its timestamp)
    pub fn date(&self) -> Result<NaiveDate> {
        let date = self.timestamp.get(..10).ok_or_else(|| {
            TrafficError::parse(format!("Invalid datapoint timestamp: '{}'", self.timestamp))
        })?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
            TrafficError::parse(format!(
                "Invalid datapoint timestamp '{}': {}",
                self.timestamp, e
            ))
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClonesPayload {
    #[serde(default)]
    pub clones: Vec<TrafficDatapoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewsPayload {
    #[serde(default)]
    pub views: Vec<TrafficDatapoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStat {
    pub path: String,
    pub count: u64,
    pub uniques: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferrerStat {
    pub referrer: String,
    pub count: u64,
    pub uniques: u64,
}

/// Partial result of one fetch: `None` means the metric is unavailable this run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrafficSnapshot {
    pub clones: Option<ClonesPayload>,
    pub views: Option<ViewsPayload>,
    pub paths: Option<Vec<PathStat>>,
    pub referrers: Option<Vec<ReferrerStat>>,
}

impl TrafficSnapshot {
    /// Result keys present in this snapshot
    pub fn available_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.clones.is_some() {
            keys.push(TrafficMetric::Clones.key());
        }
        if self.paths.is_some() {
            keys.push(TrafficMetric::PopularPaths.key());
        }
        if self.referrers.is_some() {
            keys.push(TrafficMetric::PopularReferrers.key());
        }
        if self.views.is_some() {
            keys.push(TrafficMetric::Views.key());
        }
        keys
    }
}
