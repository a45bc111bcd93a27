//! Request description and the `AbpApi` seam.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::error::ApiResult;

/// One outbound call to the ABP REST API.
///
/// Paths are relative to the configured base URL and always start with `/api/`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter only when a value is present.
    pub fn query_opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Attach a JSON body.
    ///
    /// Serializing the tool parameter structs cannot fail; a value that does
    /// is sent as `null` and rejected by the server.
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        self.body = Some(serde_json::to_value(body).unwrap_or(Value::Null));
        self
    }
}

/// The ABP REST API as seen by the tools.
///
/// `AbpClient` is the real implementation; tests substitute a recording fake.
#[async_trait]
pub trait AbpApi: Send + Sync {
    /// Send a request and return the decoded JSON body (`Null` when empty).
    async fn send(&self, request: ApiRequest) -> ApiResult<Value>;

    /// Whether this API has a credential to authenticate with.
    fn has_credential(&self) -> bool;
}

/// Normalize a list response into `{"items": [...], "totalCount": n}`.
///
/// ABP list endpoints return either a paged envelope or a bare array.
pub fn normalize_list(value: Value) -> Value {
    match value {
        Value::Array(items) => {
            let total = items.len();
            serde_json::json!({ "items": items, "totalCount": total })
        }
        Value::Object(mut map) if map.get("items").is_some_and(Value::is_array) => {
            let items = map.remove("items").unwrap_or_else(|| Value::Array(Vec::new()));
            let total = map
                .get("totalCount")
                .and_then(Value::as_u64)
                .unwrap_or_else(|| items.as_array().map_or(0, |a| a.len() as u64));
            serde_json::json!({ "items": items, "totalCount": total })
        }
        Value::Null => serde_json::json!({ "items": [], "totalCount": 0 }),
        other => other,
    }
}
