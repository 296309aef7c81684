//! Configuration management for the BlogSpace client
//!
//! Values come from the environment (`BLOGSPACE_` prefix, `__` between
//! sections, e.g. `BLOGSPACE_API__BLOG_BASE_URL`) layered over built-in
//! defaults. A `.env` file is honoured when present.

use std::path::PathBuf;

use blog_types::ClientError;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};
use serde::Deserialize;

pub const DEFAULT_AUTH_BASE_URL: &str = "https://apiblog-omega.vercel.app/api";
pub const DEFAULT_BLOG_BASE_URL: &str = "https://blog-web-backend-1-dkyg.onrender.com/api";
pub const DEFAULT_WEB_BASE_URL: &str = "http://localhost:5173";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub web: WebConfig,
    pub session: SessionConfig,
    pub log: LogConfig,
}

/// Remote API endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub auth_base_url: String,
    pub blog_base_url: String,
}

/// Public site address, used to build share links
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// File holding the bearer credential between runs
    pub token_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset
    pub filter: String,
}

fn default_token_path() -> String {
    std::env::var("HOME")
        .map(|home| format!("{}/.blogspace/token", home))
        .unwrap_or_else(|_| ".blogspace/token".to_string())
}

impl Config {
    /// Load configuration from `.env`, the environment and defaults
    pub fn load() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let config = Self::defaults()
            .and_then(|builder| {
                builder
                    .add_source(
                        Environment::with_prefix("BLOGSPACE")
                            .prefix_separator("_")
                            .separator("__"),
                    )
                    .build()
            })
            .map_err(|e| ClientError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Builder pre-populated with every default
    pub(crate) fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("api.auth_base_url", DEFAULT_AUTH_BASE_URL)?
            .set_default("api.blog_base_url", DEFAULT_BLOG_BASE_URL)?
            .set_default("web.base_url", DEFAULT_WEB_BASE_URL)?
            .set_default("session.token_path", default_token_path())?
            .set_default("log.format", "pretty")?
            .set_default("log.filter", "blogspace=info")
    }
}
