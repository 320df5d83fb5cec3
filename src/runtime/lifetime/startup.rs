//! Builds the run context from configuration
//!
//! Credentials are loaded once here and shared by every call of the run.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::traffic::GithubTrafficClient;
use crate::storage::{GoogleSheetsStore, ServiceAccountKey, ServiceAccountTokenProvider};
use crate::utils::http::build_agent;

/// 目标仓库与表格
#[derive(Debug, Clone)]
pub struct RunTarget {
    pub spreadsheet_id: String,
    pub owner: String,
    pub repo: String,
}

pub struct StartupContext {
    pub store: GoogleSheetsStore,
    pub source: GithubTrafficClient,
}

/// 准备一次运行所需的存储与数据源
pub fn prepare_startup(config: &StaticConfig, target: &RunTarget) -> Result<StartupContext> {
    let agent = build_agent();

    let key = ServiceAccountKey::from_file(&config.google.credentials_file)
        .context("Failed to load Google service account credentials")?;
    debug!("Using service account {}", key.client_email);

    let tokens = ServiceAccountTokenProvider::new(agent.clone(), key, config.google.scope.clone())
        .context("Failed to initialize Google token provider")?;

    let store = GoogleSheetsStore::new(
        agent.clone(),
        &config.google.sheets_api_url,
        &target.spreadsheet_id,
        Box::new(tokens),
    );
    let source = GithubTrafficClient::new(agent, &config.github, &target.owner, &target.repo);

    info!(
        "Tracking {}/{} into spreadsheet {}",
        target.owner, target.repo, target.spreadsheet_id
    );
    Ok(StartupContext { store, source })
}
