//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, command-line overrides, or defaults.
//! It is built once at startup and passed explicitly to everything that
//! needs it.

use super::transport::TransportConfig;
use crate::domains::tools::Mode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default base URL of a locally running ABP application.
pub const DEFAULT_BASE_URL: &str = "http://localhost:44300";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// ABP REST API configuration.
    pub api: ApiConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for the ABP REST API the tools forward to.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the ABP application, without a trailing `/api`.
    pub base_url: String,

    /// API key sent as a bearer token. Without it only
    /// information tools are available.
    pub api_key: Option<String>,

    /// Force information-only mode even when an API key is present.
    pub info_only: bool,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("info_only", &self.info_only)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            info_only: false,
        }
    }
}

impl ApiConfig {
    /// The tool visibility mode implied by this configuration.
    pub fn mode(&self) -> Mode {
        if self.info_only || self.api_key.is_none() {
            Mode::InformationOnly
        } else {
            Mode::Full
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "abp-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_TRANSPORT`), ABP settings use `ABP_`
    /// (`ABP_API_KEY`, `ABP_BASE_URL`, `ABP_INFO_ONLY`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        if let Ok(base_url) = std::env::var("ABP_BASE_URL") {
            config.api.base_url = base_url;
        }

        config.api.api_key = std::env::var("ABP_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        if let Ok(info_only) = std::env::var("ABP_INFO_ONLY") {
            config.api.info_only = parse_flag(&info_only);
        }

        config
    }

    /// The tool visibility mode for this process.
    pub fn mode(&self) -> Mode {
        self.api.mode()
    }

    /// Log a summary of the effective ABP configuration.
    pub fn log_summary(&self) {
        info!("ABP API base URL: {}", self.api.base_url);
        match self.mode() {
            Mode::Full => info!("API key configured - all tools available"),
            Mode::InformationOnly if self.api.info_only => {
                info!("Information-only mode requested - remote tools hidden")
            }
            Mode::InformationOnly => warn!(
                "ABP_API_KEY not set - running in information-only mode. \
                 Set ABP_API_KEY or pass --api-key to enable remote tools."
            ),
        }
    }
}

/// Parse a boolean-ish environment value (`1`, `true`, `yes`, `on`).
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
