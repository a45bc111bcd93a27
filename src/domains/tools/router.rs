//! Tool dispatch.
//!
//! Resolves a tool call against the registry and the mode gate, validates
//! the arguments and runs the handler. Every per-call failure except an
//! unknown tool name comes back as an `isError` result instead of an error.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::error::ToolError;
use super::handlers::{ToolContext, ToolCounts, error_result};
use super::mode::{Mode, filter_visible};
use super::registry::ToolRegistry;

/// Dispatches tool calls for one server instance.
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    context: ToolContext,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>, context: ToolContext) -> Self {
        let counts = ToolCounts {
            visible: filter_visible(&registry, context.mode()).len(),
            total: registry.len(),
        };
        let context = context.with_counts(counts);
        Self { registry, context }
    }

    /// The context handed to every tool call.
    pub fn context(&self) -> &ToolContext {
        &self.context
    }

    pub fn mode(&self) -> Mode {
        self.context.mode()
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Metadata for every tool visible in the current mode.
    pub fn list_tools(&self) -> Vec<Tool> {
        filter_visible(&self.registry, self.mode())
            .into_values()
            .map(|def| def.to_tool())
            .collect()
    }

    /// Call a tool by name.
    ///
    /// Returns `Err(ToolError::NotFound)` only when no tool has this name;
    /// all other failures, including arguments that are not an object, are
    /// reported in the returned result.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Value>,
    ) -> Result<CallToolResult, ToolError> {
        let Some(definition) = self.registry.get(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        if !self.mode().permits(definition.access()) {
            warn!("Tool {} hidden in information-only mode", name);
            return Ok(error_result(&ToolError::credential_required(name)));
        }

        let call = match definition.prepare(arguments.unwrap_or(Value::Null), self.context.clone()) {
            Ok(call) => call,
            Err(e) => {
                warn!("Rejected arguments for {}: {}", name, e);
                return Ok(error_result(&e));
            }
        };

        info!("Executing tool {}", name);

        let outcome = AssertUnwindSafe(call)
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(ToolError::internal(format!("tool {} panicked", name))));

        match outcome {
            Ok(output) => Ok(output.into_call_result()),
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                Ok(error_result(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::testing::RecordingApi;
    use crate::core::config::Config;
    use crate::domains::tools::build_registry;
    use rmcp::model::RawContent;
    use serde_json::{Value, json};

    fn dispatcher(api: Arc<RecordingApi>, api_key: Option<&str>) -> ToolDispatcher {
        let mut config = Config::default();
        config.api.api_key = api_key.map(str::to_string);
        let context = ToolContext::new(Arc::new(config), api);
        ToolDispatcher::new(Arc::new(build_registry().unwrap()), context)
    }

    fn args(value: Value) -> Option<Value> {
        Some(value)
    }

    fn text_of(result: &CallToolResult) -> String {
        match &result.content[0].raw {
            RawContent::Text(text) => text.text.clone(),
            _ => panic!("expected text content"),
        }
    }

    fn envelope_of(result: &CallToolResult) -> Value {
        serde_json::from_str(&text_of(result)).unwrap()
    }

    #[test]
    fn test_list_tools_is_idempotent() {
        let dispatcher = dispatcher(Arc::new(RecordingApi::anonymous()), None);
        let first = serde_json::to_value(dispatcher.list_tools()).unwrap();
        let second = serde_json::to_value(dispatcher.list_tools()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_list_tools_respects_mode() {
        let restricted = dispatcher(Arc::new(RecordingApi::anonymous()), None);
        let full = dispatcher(Arc::new(RecordingApi::ok(json!(null))), Some("key"));

        let restricted_names: Vec<_> = restricted
            .list_tools()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        assert!(restricted_names.contains(&"abp_get_themes".to_string()));
        assert!(!restricted_names.contains(&"abp_get_users".to_string()));

        assert_eq!(full.list_tools().len(), full.registry().len());
    }

    #[tokio::test]
    async fn test_unknown_tool_in_any_mode() {
        for (api, key) in [
            (Arc::new(RecordingApi::anonymous()), None),
            (Arc::new(RecordingApi::ok(json!(null))), Some("key")),
        ] {
            let err = dispatcher(api, key)
                .call_tool("abp_does_not_exist", None)
                .await
                .unwrap_err();
            assert!(err.to_string().contains("Unknown tool"));
        }
    }

    #[tokio::test]
    async fn test_themes_without_credential_is_static() {
        let api = Arc::new(RecordingApi::anonymous());
        let result = dispatcher(api.clone(), None)
            .call_tool("abp_get_themes", None)
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        let envelope = envelope_of(&result);
        assert_eq!(envelope["success"], true);
        assert_eq!(envelope["mode"], "static");
        assert!(envelope["data"]["availableThemes"].as_array().is_some_and(|t| !t.is_empty()));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_hidden_tool_reports_credential_requirement() {
        let api = Arc::new(RecordingApi::anonymous());
        let result = dispatcher(api.clone(), None)
            .call_tool("abp_get_users", None)
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("requires an ABP API key"));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_hybrid_tools_absorb_remote_failure() {
        let api = Arc::new(RecordingApi::failing(500));
        let dispatcher = dispatcher(api.clone(), Some("key"));

        let calls = [
            ("abp_get_themes", json!({})),
            ("abp_generate_page", json!({ "entityName": "Book" })),
            ("abp_generate_form", json!({ "entityName": "Book", "fields": [{ "name": "Title" }] })),
        ];
        for (name, arguments) in calls {
            let result = dispatcher.call_tool(name, args(arguments)).await.unwrap();
            assert_eq!(result.is_error, Some(false), "{name}");
            let envelope = envelope_of(&result);
            assert_eq!(envelope["success"], true);
            assert_eq!(envelope["mode"], "static");
            assert!(envelope["warning"].is_string());
        }
        assert_eq!(api.call_count(), 3);
    }

    #[tokio::test]
    async fn test_invalid_provider_name_fails_before_network() {
        let api = Arc::new(RecordingApi::ok(json!(null)));
        let result = dispatcher(api.clone(), Some("key"))
            .call_tool(
                "abp_grant_permission",
                args(json!({
                    "providerName": "T",
                    "providerKey": "admin",
                    "permissionName": "AbpIdentity.Users"
                })),
            )
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("Invalid arguments"));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_remote_error_is_reported_as_result() {
        let api = Arc::new(RecordingApi::failing(404));
        let result = dispatcher(api.clone(), Some("key"))
            .call_tool("abp_get_user", args(json!({ "id": "42" })))
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("404"));
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_list_call_forwards_and_normalizes() {
        let api = Arc::new(RecordingApi::ok(json!([{ "userName": "admin" }])));
        let result = dispatcher(api.clone(), Some("key"))
            .call_tool("abp_get_users", args(json!({ "filter": "adm" })))
            .await
            .unwrap();

        let envelope = envelope_of(&result);
        assert_eq!(envelope["mode"], "api");
        assert_eq!(envelope["data"]["totalCount"], 1);
        assert_eq!(envelope["data"]["items"][0]["userName"], "admin");

        let requests = api.requests();
        assert_eq!(requests[0].path, "/api/identity/users");
        assert!(requests[0].query.contains(&("Filter".to_string(), "adm".to_string())));
    }

    #[tokio::test]
    async fn test_dot_identifiers_never_reach_the_api() {
        let api = Arc::new(RecordingApi::ok(json!(null)));
        let dispatcher = dispatcher(api.clone(), Some("key"));

        let calls = [
            ("abp_get_user_roles", json!({ "id": ".." })),
            ("abp_delete_tenant", json!({ "id": ".." })),
            ("abp_delete_user", json!({ "id": "." })),
            ("abp_uninstall_module", json!({ "name": ".." })),
        ];
        for (name, arguments) in calls {
            let result = dispatcher.call_tool(name, args(arguments)).await.unwrap();
            assert_eq!(result.is_error, Some(true), "{name}");
            assert!(text_of(&result).contains("Invalid arguments"), "{name}");
        }
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_name_and_gate_are_checked_before_argument_shape() {
        let restricted = dispatcher(Arc::new(RecordingApi::anonymous()), None);

        let err = restricted
            .call_tool("abp_does_not_exist", Some(json!("x")))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));

        let hidden = restricted
            .call_tool("abp_get_users", Some(json!(5)))
            .await
            .unwrap();
        assert_eq!(hidden.is_error, Some(true));
        assert!(text_of(&hidden).contains("requires an ABP API key"));

        let api = Arc::new(RecordingApi::ok(json!(null)));
        let full = dispatcher(api.clone(), Some("key"));
        let result = full
            .call_tool("abp_get_users", Some(json!([1, 2])))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("must be an object"));
        assert_eq!(api.call_count(), 0);
    }

    #[test]
    fn test_context_carries_tool_counts() {
        let restricted = dispatcher(Arc::new(RecordingApi::anonymous()), None);
        let counts = restricted.context().counts();
        assert_eq!(counts.visible, restricted.list_tools().len());
        assert_eq!(counts.total, restricted.registry().len());
        assert!(counts.visible < counts.total);
    }
}
