//! reqwest-backed client for the ABP REST API.

use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::error::{ApiError, ApiResult};
use super::request::{AbpApi, ApiRequest};
use crate::core::config::ApiConfig;

/// Client for the ABP REST API.
///
/// Holds one connection pool for the lifetime of the process and attaches the
/// configured API key as a bearer token to every request.
pub struct AbpClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AbpClient {
    /// Create a new client from the API configuration.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("abp-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// The base URL every request path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for a request, including its query string.
    pub fn url_for(&self, request: &ApiRequest) -> ApiResult<String> {
        let mut url = format!("{}{}", self.base_url, request.path);
        if !request.query.is_empty() {
            url.push('?');
            url.push_str(&serde_urlencoded::to_string(&request.query)?);
        }
        Ok(url)
    }
}

#[async_trait]
impl AbpApi for AbpClient {
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        let api_key = self.api_key.as_deref().ok_or(ApiError::MissingCredential)?;
        let url = self.url_for(&request)?;

        debug!("Sending ABP API request");

        let mut builder = self
            .http_client
            .request(request.method, &url)
            .bearer_auth(api_key)
            .header(header::ACCEPT, "application/json");

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::network(&url, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::network(&url, e))?;

        if !status.is_success() {
            warn!("ABP API returned {} for {}", status, url);
            return Err(ApiError::status(status.as_u16(), &text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&text)?)
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_err;

    fn api_config(api_key: Option<&str>) -> ApiConfig {
        ApiConfig {
            base_url: "http://localhost:44300/".to_string(),
            api_key: api_key.map(str::to_string),
            info_only: false,
        }
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = AbpClient::new(&api_config(None)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:44300");
    }

    #[test]
    fn test_url_for_encodes_query() {
        let client = AbpClient::new(&api_config(Some("key"))).unwrap();
        let request = ApiRequest::get("/api/identity/users")
            .query("filter", "john doe")
            .query("maxResultCount", 5);

        let url = client.url_for(&request).unwrap();
        assert_eq!(
            url,
            "http://localhost:44300/api/identity/users?filter=john+doe&maxResultCount=5"
        );
    }

    #[test]
    fn test_url_for_without_query() {
        let client = AbpClient::new(&api_config(Some("key"))).unwrap();
        let url = client.url_for(&ApiRequest::get("/api/ui/themes")).unwrap();
        assert_eq!(url, "http://localhost:44300/api/ui/themes");
    }

    #[tokio::test]
    async fn test_send_without_credential_fails_before_network() {
        let client = AbpClient::new(&api_config(None)).unwrap();
        assert!(!client.has_credential());

        let result = client.send(ApiRequest::get("/api/identity/users")).await;
        assert!(matches!(result, Err(ApiError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_send_to_closed_port_is_network_error() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: Some("key".to_string()),
            info_only: false,
        };
        let client = AbpClient::new(&config).unwrap();

        let result = client.send(ApiRequest::get("/api/ui/themes")).await;
        assert_err!(&result);
        assert!(matches!(result, Err(ApiError::Network { .. })));
    }
}
