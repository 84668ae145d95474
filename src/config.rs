//! Startup configuration.
//!
//! Layered resolution: an optional `config.toml` under the platform
//! config directory supplies defaults, environment variables override
//! it, and CLI flags (applied by `main`) win over both. `SERVER_CONFIG`
//! carries the MCP server launch spec as JSON, matching the
//! `{"command", "args", "env"}` shape most MCP clients use.

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gpt-4.1";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Launch spec for the MCP server child process.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl ServerConfig {
    /// Environment for the child process: the configured map with the
    /// parent process environment overlaid (parent wins on conflicts).
    pub fn merged_env(&self) -> HashMap<String, String> {
        let mut merged = self.env.clone();
        merged.extend(std::env::vars());
        merged
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    model: Option<String>,
    base_url: Option<String>,
    server: Option<ServerConfig>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub server: ServerConfig,
}

#[derive(Debug, Default)]
struct EnvOverrides {
    api_key: Option<String>,
    server_config: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
}

impl EnvOverrides {
    fn capture() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            server_config: std::env::var("SERVER_CONFIG").ok(),
            model: std::env::var("TOOLCHAT_MODEL").ok(),
            base_url: std::env::var("TOOLCHAT_BASE_URL").ok(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let file = match config_file_path() {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(&path)?;
                toml::from_str(&raw).map_err(|error| ConfigError::Parse {
                    source_name: "config.toml",
                    message: error.to_string(),
                })?
            }
            _ => FileConfig::default(),
        };

        Self::resolve(file, EnvOverrides::capture())
    }

    fn resolve(file: FileConfig, env: EnvOverrides) -> Result<Self, ConfigError> {
        let api_key = env
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let server = match env.server_config {
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|error| ConfigError::Parse {
                    source_name: "SERVER_CONFIG",
                    message: error.to_string(),
                })?
            }
            None => file.server.ok_or(ConfigError::MissingServer)?,
        };

        Ok(Self {
            api_key,
            model: env
                .model
                .or(file.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: env
                .base_url
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            server,
        })
    }
}

fn config_file_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "toolchat")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
