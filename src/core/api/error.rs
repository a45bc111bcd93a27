//! ABP API error types.

use thiserror::Error;

/// Result type for calls to the ABP REST API.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while talking to the ABP REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No API key is configured, so no authenticated call can be made.
    #[error("No ABP API key configured")]
    MissingCredential,

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced an HTTP response.
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("ABP API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not valid JSON.
    #[error("Invalid JSON in ABP API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The query string could not be encoded.
    #[error("Failed to encode query string: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),
}

impl ApiError {
    /// Create a network error for the given URL.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Create a status error from an HTTP status and a raw response body.
    ///
    /// ABP reports failures as `{"error": {"message": "..."}}`; when the body
    /// has that shape only the message is kept.
    pub fn status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.pointer("/error/message")
                    .and_then(|m| m.as_str())
                    .map(|m| m.to_string())
            })
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    "empty response body".to_string()
                } else {
                    trimmed.chars().take(500).collect()
                }
            });

        Self::Status { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_extracts_abp_error_message() {
        let body = r#"{"error":{"code":null,"message":"There is no entity User with id = 42!"}}"#;
        let err = ApiError::status(404, body);
        assert_eq!(
            err.to_string(),
            "ABP API returned 404: There is no entity User with id = 42!"
        );
    }

    #[test]
    fn test_status_falls_back_to_raw_body() {
        let err = ApiError::status(502, "Bad Gateway\n");
        assert_eq!(err.to_string(), "ABP API returned 502: Bad Gateway");
    }

    #[test]
    fn test_status_empty_body() {
        let err = ApiError::status(500, "");
        assert!(err.to_string().contains("empty response body"));
    }
}
