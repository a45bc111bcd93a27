//! Core infrastructure: configuration, errors, the ABP API client, the MCP
//! server handler and the transports it runs on.

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
