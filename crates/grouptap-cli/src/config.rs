//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use grouptap_graph::ClientSettings;
use grouptap_graph::api::{DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use grouptap_graph::fetch::{DEFAULT_COMMENT_ORDER, DEFAULT_PAGE_SIZE};
use serde::Deserialize;

/// Environment fallback for the access token
pub const TOKEN_ENV: &str = "FB_ACCESS_TOKEN";

/// Global configuration for grouptap
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub graph: GraphConfig,
    pub export: ExportDefaults,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub base_url: String,
    pub api_version: String,
    /// Literal token or `${VAR}` reference
    #[serde(deserialize_with = "deserialize_env_var")]
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            access_token: None,
            timeout_secs: 30,
        }
    }
}

impl GraphConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            api_version: self.api_version.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    pub page_size: u32,
    pub comment_order: String,
    pub output: PathBuf,
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            comment_order: DEFAULT_COMMENT_ORDER.to_string(),
            output: PathBuf::from("comments.csv"),
        }
    }
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

/// First non-blank token of: command-line flag, environment, config file
///
/// The chosen value is returned unchanged.
pub fn resolve_access_token(
    flag: Option<&str>,
    env: Option<&str>,
    config: Option<&str>,
) -> Option<String> {
    [flag, env, config]
        .into_iter()
        .flatten()
        .find(|token| !token.trim().is_empty())
        .map(String::from)
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./grouptap.toml (current directory)
    /// 2. ~/.config/grouptap/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("grouptap.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "grouptap") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
