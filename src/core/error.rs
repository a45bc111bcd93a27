//! Error types and handling for the MCP server.
//!
//! A unified error for startup and lifecycle failures. Per-call failures are
//! [`ToolError`](crate::domains::tools::ToolError)s and never reach this type
//! at runtime.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid tool registry (e.g. duplicate names).
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    /// The ABP API client could not be created.
    #[error("ABP API error: {0}")]
    Api(#[from] super::api::ApiError),

    /// A transport failed to start or ended with an error.
    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolError;

    #[test]
    fn test_wraps_domain_errors() {
        let err: Error = ToolError::DuplicateName("abp_get_users".to_string()).into();
        assert!(matches!(err, Error::Tool(_)));
        assert!(err.to_string().contains("abp_get_users"));
    }
}
