//! Call forwarder for the ABP REST API.
//!
//! - `request.rs` - `ApiRequest` and the `AbpApi` trait tools call through
//! - `client.rs` - reqwest implementation with bearer-token auth
//! - `error.rs` - `ApiError`

mod client;
mod error;
mod request;

pub use client::AbpClient;
pub use error::{ApiError, ApiResult};
pub use request::{AbpApi, ApiRequest, normalize_list};

#[cfg(test)]
pub mod testing {
    //! In-memory `AbpApi` used by tool and dispatch tests.

    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::{AbpApi, ApiError, ApiRequest, ApiResult};

    /// How the fake answers every request.
    pub enum Reply {
        Json(Value),
        Status(u16, &'static str),
    }

    /// Records every request and answers with a fixed reply.
    pub struct RecordingApi {
        credential: bool,
        reply: Reply,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl RecordingApi {
        pub fn new(credential: bool, reply: Reply) -> Self {
            Self {
                credential,
                reply,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// A credentialed API answering `value` to everything.
        pub fn ok(value: Value) -> Self {
            Self::new(true, Reply::Json(value))
        }

        /// A credentialed API failing every call with the given status.
        pub fn failing(status: u16) -> Self {
            Self::new(true, Reply::Status(status, "upstream unavailable"))
        }

        /// An API without a credential.
        pub fn anonymous() -> Self {
            Self::new(false, Reply::Json(Value::Null))
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AbpApi for RecordingApi {
        async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
            self.requests.lock().unwrap().push(request);
            if !self.credential {
                return Err(ApiError::MissingCredential);
            }
            match &self.reply {
                Reply::Json(value) => Ok(value.clone()),
                Reply::Status(status, body) => Err(ApiError::status(*status, body)),
            }
        }

        fn has_credential(&self) -> bool {
            self.credential
        }
    }
}
