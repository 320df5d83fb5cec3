//! GitHub REST 流量 API 实现
//!
//! `GET /repos/{owner}/{repo}/traffic/...`，需要对仓库有 push 权限的 token。
//! 只有 200 视为成功；其它状态码仅记录日志并跳过该指标。

use serde_json::Value;
use tracing::{trace, warn};
use ureq::Agent;

use super::models::TrafficMetric;
use super::provider::TrafficSource;
use crate::config::GithubConfig;
use crate::errors::Result;
use crate::utils::http;

const ACCEPT: &str = "application/vnd.github+json";
/// 让 GitHub 以 UTC 划分每日数据
const TIME_ZONE: &str = "Etc/UCT";

pub struct GithubTrafficClient {
    agent: Agent,
    api_url: String,
    token: String,
    api_version: String,
    user_agent: String,
    owner: String,
    repo: String,
}

impl GithubTrafficClient {
    pub fn new(agent: Agent, config: &GithubConfig, owner: &str, repo: &str) -> Self {
        Self {
            agent,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            api_version: config.api_version.clone(),
            user_agent: config.user_agent.clone(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    pub fn metric_url(&self, metric: TrafficMetric) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url,
            urlencoding::encode(&self.owner),
            urlencoding::encode(&self.repo),
            metric.endpoint()
        )
    }
}

impl TrafficSource for GithubTrafficClient {
    fn fetch_metric(&self, metric: TrafficMetric) -> Result<Option<Value>> {
        let url = self.metric_url(metric);
        trace!("GET {}", url);

        let mut resp = self
            .agent
            .get(&url)
            .header("Accept", ACCEPT)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("X-GitHub-Api-Version", &self.api_version)
            .header("Time-Zone", TIME_ZONE)
            .header("User-Agent", &self.user_agent)
            .call()?;

        let status = resp.status().as_u16();
        if status != 200 {
            warn!(
                "GitHub {} returned HTTP {}: {}",
                metric.key(),
                status,
                http::error_body(&mut resp)
            );
            return Ok(None);
        }

        Ok(Some(http::read_json(&mut resp)?))
    }

    fn name(&self) -> &'static str {
        "GitHub"
    }
}
