//! Tool definitions and execution types.
//!
//! A [`ToolDefinition`] pairs tool metadata with a type-erased async handler.
//! Argument validation happens here, once, for every tool: the raw JSON
//! arguments are deserialized into the tool's params type before the handler
//! runs, so an invalid call never reaches the ABP API.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::{
    handler::server::tool::cached_schema_for_type,
    model::{CallToolResult, Content, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ToolError;
use super::mode::{Access, Mode};
use crate::core::api::{AbpApi, ApiRequest, normalize_list};
use crate::core::config::Config;

/// Result of executing a tool.
pub type ToolResult = Result<ToolOutput, ToolError>;

/// Where a tool's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Returned by the ABP API.
    Api,
    /// Computed locally from built-in reference data.
    Static,
}

/// Successful tool output.
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
    pub mode: ExecutionMode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Set when a remote call failed and local data was used instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,

    pub data: Value,
}

impl ToolOutput {
    /// Output returned by the ABP API.
    pub fn api(data: Value) -> Self {
        Self {
            mode: ExecutionMode::Api,
            message: None,
            warning: None,
            data,
        }
    }

    /// Output computed from local data.
    pub fn local(data: Value) -> Self {
        Self {
            mode: ExecutionMode::Static,
            message: None,
            warning: None,
            data,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    /// The JSON envelope sent to clients.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(Envelope {
            success: true,
            output: self,
        })
        .unwrap_or_default()
    }

    /// Convert into an MCP tool result with the envelope as text content.
    pub fn into_call_result(self) -> CallToolResult {
        let envelope = self.to_json();
        let text = serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| envelope.to_string());
        CallToolResult::success(vec![Content::text(text)])
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    success: bool,
    #[serde(flatten)]
    output: &'a ToolOutput,
}

/// Convert a tool error into a non-fatal MCP error result.
pub fn error_result(error: &ToolError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {}", error))])
}

/// Number of tools served by the dispatcher a context belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ToolCounts {
    /// Tools reachable in the current mode.
    pub visible: usize,
    /// Tools in the registry.
    pub total: usize,
}

/// Everything a tool handler may use while executing.
#[derive(Clone)]
pub struct ToolContext {
    config: Arc<Config>,
    api: Arc<dyn AbpApi>,
    counts: ToolCounts,
}

impl ToolContext {
    pub fn new(config: Arc<Config>, api: Arc<dyn AbpApi>) -> Self {
        Self {
            config,
            api,
            counts: ToolCounts::default(),
        }
    }

    /// Attach the tool counts of the serving registry.
    pub fn with_counts(mut self, counts: ToolCounts) -> Self {
        self.counts = counts;
        self
    }

    pub fn counts(&self) -> ToolCounts {
        self.counts
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode()
    }

    /// Whether hybrid tools should try the ABP API at all.
    pub fn remote_enabled(&self) -> bool {
        self.mode().allows_remote() && self.api.has_credential()
    }

    pub fn api(&self) -> &dyn AbpApi {
        self.api.as_ref()
    }

    /// Forward a request and return the response body as API output.
    pub async fn forward(&self, request: ApiRequest) -> ToolResult {
        let data = self.api.send(request).await?;
        Ok(ToolOutput::api(data))
    }

    /// Forward a list request, normalizing the response envelope.
    pub async fn forward_list(&self, request: ApiRequest) -> ToolResult {
        let data = self.api.send(request).await?;
        Ok(ToolOutput::api(normalize_list(data)))
    }
}

type PreparedCall = BoxFuture<'static, ToolResult>;
type ErasedHandler =
    Arc<dyn Fn(Value, ToolContext) -> Result<PreparedCall, ToolError> + Send + Sync>;

/// A named, schema-described tool.
#[derive(Clone)]
pub struct ToolDefinition {
    name: &'static str,
    description: &'static str,
    access: Access,
    input_schema: Arc<JsonObject>,
    handler: ErasedHandler,
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

impl ToolDefinition {
    /// Define a tool whose arguments deserialize into `P`.
    ///
    /// The input schema is generated from `P`, and the same type is used to
    /// validate incoming arguments.
    pub fn new<P, F, Fut>(
        name: &'static str,
        description: &'static str,
        access: Access,
        handler: F,
    ) -> Self
    where
        P: DeserializeOwned + JsonSchema + Send + 'static,
        F: Fn(P, ToolContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        let erased: ErasedHandler = Arc::new(move |arguments: Value, ctx: ToolContext| {
            let arguments = match arguments {
                Value::Null => Value::Object(JsonObject::new()),
                Value::Object(map) => Value::Object(map),
                _ => return Err(ToolError::invalid_arguments("arguments must be an object")),
            };
            let params: P = serde_json::from_value(arguments)
                .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
            Ok(handler(params, ctx).boxed())
        });

        Self {
            name,
            description,
            access,
            input_schema: cached_schema_for_type::<P>(),
            handler: erased,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn input_schema(&self) -> &Arc<JsonObject> {
        &self.input_schema
    }

    /// Validate arguments and return the pending execution.
    ///
    /// `Null` counts as no arguments; any other non-object is rejected.
    /// Nothing is sent to the ABP API until the returned future is polled.
    pub fn prepare(
        &self,
        arguments: Value,
        ctx: ToolContext,
    ) -> Result<PreparedCall, ToolError> {
        (self.handler)(arguments, ctx)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.into(),
            description: Some(self.description.into()),
            input_schema: self.input_schema.clone(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, JsonSchema)]
    struct EchoParams {
        value: u32,
    }

    fn echo_tool() -> ToolDefinition {
        ToolDefinition::new(
            "echo",
            "Echo a number",
            Access::Public,
            |p: EchoParams, _ctx: ToolContext| async move { Ok(ToolOutput::local(json!(p.value))) },
        )
    }

    #[test]
    fn test_schema_is_generated_from_params() {
        let tool = echo_tool().to_tool();
        assert_eq!(tool.name, "echo");
        let properties = tool.input_schema.get("properties").unwrap();
        assert!(properties.get("value").is_some());
    }

    #[test]
    fn test_envelope_shape() {
        let output = ToolOutput::local(json!({ "a": 1 })).with_warning("fell back");
        let envelope = output.to_json();
        assert_eq!(envelope["success"], true);
        assert_eq!(envelope["mode"], "static");
        assert_eq!(envelope["warning"], "fell back");
        assert_eq!(envelope["data"]["a"], 1);
        assert!(envelope.get("message").is_none());
    }

    #[test]
    fn test_api_envelope_has_no_warning() {
        let envelope = ToolOutput::api(json!([])).to_json();
        assert_eq!(envelope["mode"], "api");
        assert!(envelope.get("warning").is_none());
    }

    #[test]
    fn test_prepare_argument_shapes() {
        use crate::core::api::testing::RecordingApi;

        let ctx = ToolContext::new(
            Arc::new(Config::default()),
            Arc::new(RecordingApi::anonymous()),
        );
        let tool = echo_tool();

        assert!(tool.prepare(json!({ "value": 3 }), ctx.clone()).is_ok());
        for bad in [json!("x"), json!(5), json!([1]), Value::Null] {
            let err = tool.prepare(bad, ctx.clone()).err().unwrap();
            assert!(matches!(err, ToolError::InvalidArguments(_)));
        }
        let err = tool.prepare(json!(5), ctx).err().unwrap();
        assert!(err.to_string().contains("must be an object"));
    }

    #[test]
    fn test_error_result_is_flagged() {
        let result = error_result(&ToolError::invalid_arguments("missing field `value`"));
        assert_eq!(result.is_error, Some(true));
    }
}
