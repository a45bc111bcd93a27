//! ABP MCP server entry point.
//!
//! Resolves configuration (environment, `.env`, then command-line flags),
//! initializes logging on stderr and runs the server on the selected
//! transport until it ends or Ctrl-C is pressed.

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use abp_mcp_server::core::config::LoggingConfig;
use abp_mcp_server::core::{Config, McpServer, TransportConfig, TransportService};

#[derive(Parser, Debug)]
#[clap(version, about = "MCP server for the ABP Framework management API")]
struct CliArgs {
    /// ABP API key, sent as a bearer token. Overrides ABP_API_KEY.
    /// Without a key only information tools are available.
    #[clap(long)]
    pub api_key: Option<String>,

    /// Base URL of the ABP application. Overrides ABP_BASE_URL.
    #[clap(long)]
    pub base_url: Option<String>,

    /// Only expose tools that work without an API key.
    #[clap(long)]
    pub info_only: bool,

    /// Transport to serve on: stdio, tcp or http. Overrides MCP_TRANSPORT.
    #[clap(long)]
    pub transport: Option<String>,

    /// Log level (trace, debug, info, warn, error). Overrides MCP_LOG_LEVEL.
    #[clap(long)]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Apply command-line overrides on top of the environment configuration.
    fn apply(self, config: &mut Config) -> Result<()> {
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(base_url) = self.base_url {
            config.api.base_url = base_url;
        }
        if let Some(key) = self.api_key.filter(|k| !k.trim().is_empty()) {
            config.api.api_key = Some(key);
        }
        if self.info_only {
            config.api.info_only = true;
        }
        if let Some(name) = self.transport {
            config.transport = TransportConfig::from_name(&name).ok_or_else(|| {
                anyhow!(
                    "unknown transport '{}' (available: {})",
                    name,
                    TransportConfig::available().join(", ")
                )
            })?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    let mut config = Config::from_env();
    let overrides = args.apply(&mut config);

    init_logging(&config.logging);

    if let Err(e) = overrides {
        error!("Invalid command line: {:#}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    info!("Starting {} v{}", config.server.name, config.server.version);
    config.log_summary();

    let server = McpServer::new(config.clone())?;
    let transport = TransportService::new(config.transport);

    tokio::select! {
        result = transport.run(server) => result?,
        _ = tokio::signal::ctrl_c() => info!("Received Ctrl-C"),
    }

    info!("Server shutting down");
    Ok(())
}

/// Initialize tracing on stderr; stdout carries the MCP protocol.
fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("abp-mcp-server").chain(args.iter().copied()))
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        parse(&["--api-key", "secret", "--base-url", "https://abp.example.com"])
            .apply(&mut config)
            .unwrap();
        assert_eq!(config.api.api_key.as_deref(), Some("secret"));
        assert_eq!(config.api.base_url, "https://abp.example.com");
        assert_eq!(config.mode(), abp_mcp_server::domains::tools::Mode::Full);
    }

    #[test]
    fn test_info_only_flag() {
        let mut config = Config::default();
        config.api.api_key = Some("from-env".to_string());
        parse(&["--info-only"]).apply(&mut config).unwrap();
        assert_eq!(
            config.mode(),
            abp_mcp_server::domains::tools::Mode::InformationOnly
        );
    }

    #[test]
    fn test_unknown_transport_is_rejected() {
        let mut config = Config::default();
        let err = parse(&["--transport", "smoke-signals"])
            .apply(&mut config)
            .unwrap_err();
        assert!(err.to_string().contains("smoke-signals"));
    }
}
