use serde::{Deserialize, Serialize};

use crate::errors::{Result, TrafficError};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "trafficsheet.toml";

/// 覆盖配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "TRAFFICSHEET_CONFIG";

/// 静态配置（从 TOML 加载，进程启动时读取一次）
///
/// 包含：
/// - github: 流量数据源（GitHub REST API）
/// - google: 表格存储（Google Sheets API）与服务账号凭据
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从默认路径（或 `TRAFFICSHEET_CONFIG`）和环境变量加载配置
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let mut config = Self::load_from(&path)?;
        config.apply_env_fallbacks(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// 从指定 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML 文件 > 默认值
    /// ENV 前缀：TS，分隔符：__
    /// 示例：TS__GITHUB__TOKEN=ghp_xxx
    pub fn load_from(path: &str) -> Result<Self> {
        use config::{Config, Environment, File, FileFormat};

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::new(path, FileFormat::Toml).required(false))
            // 2. 从环境变量覆盖
            .add_source(
                Environment::with_prefix("TS")
                    .separator("__")
                    .try_parsing(true),
            );

        let settings = builder
            .build()
            .map_err(|e| TrafficError::config(format!("Failed to build config: {}", e)))?;
        let config = settings
            .try_deserialize::<StaticConfig>()
            .map_err(|e| TrafficError::config(format!("Failed to deserialize config: {}", e)))?;

        if std::path::Path::new(path).exists() {
            eprintln!("[INFO] Configuration loaded from: {}", path);
        }
        Ok(config)
    }

    /// 兼容原部署方式使用的环境变量（仅在未配置时生效）
    ///
    /// - `GITHUB_TOKEN` → github.token
    /// - `GOOGLE_APPLICATION_CREDENTIALS` → google.credentials_file
    /// - `RUST_LOG` → logging.level
    pub fn apply_env_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.github.token.is_empty()
            && let Some(token) = lookup("GITHUB_TOKEN")
        {
            self.github.token = token;
        }
        if self.google.credentials_file.is_empty()
            && let Some(path) = lookup("GOOGLE_APPLICATION_CREDENTIALS")
        {
            self.google.credentials_file = path;
        }
        if let Some(level) = lookup("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// GitHub 流量数据源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Bearer token with read access to the repository traffic
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_github_api_url")]
    pub api_url: String,
    #[serde(default = "default_github_api_version")]
    pub api_version: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Google Sheets 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// 服务账号 JSON 密钥文件路径
    #[serde(default)]
    pub credentials_file: String,
    #[serde(default = "default_sheets_api_url")]
    pub sheets_api_url: String,
    #[serde(default = "default_sheets_scope")]
    pub scope: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_github_api_version() -> String {
    "2022-11-28".to_string()
}

fn default_user_agent() -> String {
    concat!("trafficsheet/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_sheets_api_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_sheets_scope() -> String {
    "https://www.googleapis.com/auth/spreadsheets".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_github_api_url(),
            api_version: default_github_api_version(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            credentials_file: String::new(),
            sheets_api_url: default_sheets_api_url(),
            scope: default_sheets_scope(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.api_version, "2022-11-28");
        assert_eq!(config.google.sheets_api_url, "https://sheets.googleapis.com");
        assert_eq!(config.logging.level, "info");
        assert!(config.github.token.is_empty());
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        let config = StaticConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("trafficsheet.toml");
        std::fs::write(
            &path,
            r#"
[github]
token = "ghp_from_file"
api_url = "http://127.0.0.1:9999"

[google]
credentials_file = "/etc/trafficsheet/sa.json"

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = StaticConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.github.token, "ghp_from_file");
        assert_eq!(config.github.api_url, "http://127.0.0.1:9999");
        assert_eq!(config.github.api_version, "2022-11-28");
        assert_eq!(config.google.credentials_file, "/etc/trafficsheet/sa.json");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_env_fallbacks_only_fill_empty_values() {
        let env: HashMap<&str, &str> = [
            ("GITHUB_TOKEN", "ghp_env"),
            ("GOOGLE_APPLICATION_CREDENTIALS", "/tmp/sa.json"),
        ]
        .into_iter()
        .collect();

        let mut config = StaticConfig::default();
        config.github.token = "ghp_configured".into();
        config.apply_env_fallbacks(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.github.token, "ghp_configured");
        assert_eq!(config.google.credentials_file, "/tmp/sa.json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_sample_config_is_valid_toml() {
        let sample = StaticConfig::generate_sample_config();
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.github.api_version, "2022-11-28");
    }
}
