//! Hybrid execution: ABP API when available, built-in data otherwise.

use serde_json::Value;
use tracing::{info, warn};

use super::handlers::{ToolContext, ToolOutput, ToolResult};
use crate::core::api::ApiRequest;

/// Run `request` against the ABP API, falling back to `local` data.
///
/// Without remote access the local data is returned and no request is made.
/// A failed remote call never surfaces as an error: the local data is
/// returned with `mode: "static"` and a `warning` describing the failure.
pub async fn run_hybrid<F>(ctx: &ToolContext, request: ApiRequest, local: F) -> ToolResult
where
    F: FnOnce() -> Value,
{
    if !ctx.remote_enabled() {
        info!("Remote access disabled, using built-in data");
        return Ok(ToolOutput::local(local()));
    }

    match ctx.api().send(request).await {
        Ok(data) => Ok(ToolOutput::api(data)),
        Err(e) => {
            warn!("ABP API call failed, falling back to built-in data: {}", e);
            Ok(ToolOutput::local(local())
                .with_warning(format!("ABP API unavailable ({}); returned built-in data", e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::testing::RecordingApi;
    use crate::core::config::Config;
    use crate::domains::tools::ExecutionMode;
    use serde_json::json;
    use std::sync::Arc;

    fn context(api: Arc<RecordingApi>, api_key: Option<&str>) -> ToolContext {
        let mut config = Config::default();
        config.api.api_key = api_key.map(str::to_string);
        ToolContext::new(Arc::new(config), api)
    }

    #[tokio::test]
    async fn test_no_credential_uses_local_without_network() {
        let api = Arc::new(RecordingApi::anonymous());
        let ctx = context(api.clone(), None);

        let output = run_hybrid(&ctx, ApiRequest::get("/api/ui/themes"), || json!("local"))
            .await
            .unwrap();

        assert_eq!(output.mode, ExecutionMode::Static);
        assert_eq!(output.data, json!("local"));
        assert!(output.warning.is_none());
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_remote_success_uses_api() {
        let api = Arc::new(RecordingApi::ok(json!({ "remote": true })));
        let ctx = context(api.clone(), Some("key"));

        let output = run_hybrid(&ctx, ApiRequest::get("/api/ui/themes"), || json!("local"))
            .await
            .unwrap();

        assert_eq!(output.mode, ExecutionMode::Api);
        assert_eq!(output.data["remote"], true);
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_with_warning() {
        let api = Arc::new(RecordingApi::failing(503));
        let ctx = context(api.clone(), Some("key"));

        let output = run_hybrid(&ctx, ApiRequest::get("/api/ui/themes"), || json!("local"))
            .await
            .unwrap();

        assert_eq!(output.mode, ExecutionMode::Static);
        assert_eq!(output.data, json!("local"));
        let warning = output.warning.unwrap();
        assert!(warning.contains("503"));
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_info_only_skips_remote_even_with_key() {
        let api = Arc::new(RecordingApi::ok(json!({})));
        let mut config = Config::default();
        config.api.api_key = Some("key".to_string());
        config.api.info_only = true;
        let ctx = ToolContext::new(Arc::new(config), api.clone());

        let output = run_hybrid(&ctx, ApiRequest::get("/api/ui/themes"), || json!(1))
            .await
            .unwrap();

        assert_eq!(output.mode, ExecutionMode::Static);
        assert_eq!(api.call_count(), 0);
    }
}
