//! 仓库流量数据源
//!
//! 每次运行从数据源拉取四项指标（clones、views、popular paths、
//! popular referrers），任何一项失败都只会让该项缺席，不影响其他项。

mod github_api;
mod models;
mod provider;

pub use github_api::GithubTrafficClient;
pub use models::{
    ClonesPayload, PathStat, ReferrerStat, TrafficDatapoint, TrafficMetric, TrafficSnapshot,
    ViewsPayload,
};
pub use provider::{TrafficSource, fetch_snapshot};
