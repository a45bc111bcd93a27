//! ABP Framework MCP server.
//!
//! Exposes the management API of an ABP Framework application as Model
//! Context Protocol tools. With an API key every tool is available; without
//! one the server runs in information-only mode and offers only the tools
//! that answer from built-in reference data.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, the ABP REST client, the MCP server
//!   handler and transports
//! - **domains::tools**: tool definitions, the registry, the mode gate and
//!   dispatch
//!
//! # Example
//!
//! ```rust,no_run
//! use abp_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
