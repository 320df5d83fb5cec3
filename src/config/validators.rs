//! 配置值验证模块
//!
//! 在发起任何网络请求之前检查必需的配置项。

use super::StaticConfig;
use crate::errors::{Result, TrafficError};

const VALID_LOG_FORMATS: [&str; 2] = ["text", "json"];

/// 验证运行一次任务所需的配置
///
/// - github.token 不能为空
/// - google.credentials_file 不能为空
/// - API 地址必须是 http(s) URL
/// - logging.format 只能是 text 或 json
pub fn validate(config: &StaticConfig) -> Result<()> {
    if config.github.token.trim().is_empty() {
        return Err(TrafficError::config(
            "GitHub token is not set (github.token, TS__GITHUB__TOKEN or GITHUB_TOKEN)",
        ));
    }
    if config.google.credentials_file.trim().is_empty() {
        return Err(TrafficError::config(
            "Google credentials file is not set (google.credentials_file, TS__GOOGLE__CREDENTIALS_FILE or GOOGLE_APPLICATION_CREDENTIALS)",
        ));
    }
    validate_http_url("github.api_url", &config.github.api_url)?;
    validate_http_url("google.sheets_api_url", &config.google.sheets_api_url)?;

    if !VALID_LOG_FORMATS.contains(&config.logging.format.as_str()) {
        return Err(TrafficError::config(format!(
            "Invalid logging.format: '{}'. Valid: text, json",
            config.logging.format
        )));
    }
    Ok(())
}

fn validate_http_url(key: &str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(TrafficError::config(format!(
            "Invalid {}: '{}'. Expected an http:// or https:// URL",
            key, value
        )))
    }
}
