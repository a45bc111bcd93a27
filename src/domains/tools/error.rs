//! Tool-specific error types.

use thiserror::Error;

use crate::core::api::ApiError;

/// Errors that can occur during tool registration and execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Unknown tool: {0}")]
    NotFound(String),

    /// Two tool definitions share a name.
    #[error("Duplicate tool name: {0}")]
    DuplicateName(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool needs the ABP API key, which is not configured.
    #[error(
        "Tool '{0}' requires an ABP API key. Set ABP_API_KEY (or pass --api-key) to enable it, \
         or use the information tools available in information-only mode."
    )]
    CredentialRequired(String),

    /// The ABP API call failed.
    #[error("{0}")]
    Remote(#[from] ApiError),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "credential required" error.
    pub fn credential_required(name: impl Into<String>) -> Self {
        Self::CredentialRequired(name.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_message_mentions_api_key() {
        let msg = ToolError::credential_required("abp_get_users").to_string();
        assert!(msg.contains("abp_get_users"));
        assert!(msg.contains("API key"));
        assert!(msg.contains("ABP_API_KEY"));
    }

    #[test]
    fn test_missing_credential_from_client_maps_to_remote() {
        let err: ToolError = ApiError::MissingCredential.into();
        assert_eq!(err.to_string(), "No ABP API key configured");
    }
}
