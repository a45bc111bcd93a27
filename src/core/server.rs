//! MCP server handler.
//!
//! [`McpServer`] owns the configuration, the ABP API client and the tool
//! dispatcher. It implements rmcp's `ServerHandler` for the stdio and TCP
//! transports and exposes JSON helpers for the HTTP transport, so every
//! transport lists and calls tools through the same dispatcher.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::api::AbpClient;
use super::config::Config;
use super::error::Result;
use crate::domains::tools::{Mode, ToolContext, ToolDispatcher, ToolError, build_registry};

const FULL_INSTRUCTIONS: &str = "Manage an ABP Framework application: applications, modules, \
    entities, users, roles, tenants, permissions, audit logs, background jobs, localization and \
    ABP Suite code generation. Reference tools (documentation, CLI, best practices, themes, page \
    and form templates) are also available.";

const INFO_ONLY_INSTRUCTIONS: &str = "Information-only mode: no ABP API key is configured, so \
    only reference tools (documentation, CLI, best practices, server status) and template tools \
    (themes, pages, forms) are available. Set ABP_API_KEY to enable management tools.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    config: Arc<Config>,
    dispatcher: ToolDispatcher,
}

impl McpServer {
    /// Create a server for the given configuration.
    ///
    /// Fails if the HTTP client cannot be built or two tools share a name.
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let client = AbpClient::new(&config.api)?;
        let registry = Arc::new(build_registry()?);

        let context = ToolContext::new(config.clone(), Arc::new(client));
        let dispatcher = ToolDispatcher::new(registry, context);

        info!(
            "{} of {} tools available",
            dispatcher.list_tools().len(),
            dispatcher.registry().len()
        );

        Ok(Self { config, dispatcher })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.dispatcher.mode()
    }

    /// Usage instructions sent to clients on initialize.
    pub fn instructions(&self) -> &'static str {
        match self.mode() {
            Mode::Full => FULL_INSTRUCTIONS,
            Mode::InformationOnly => INFO_ONLY_INSTRUCTIONS,
        }
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// Visible tools as JSON (for HTTP transport).
    pub fn list_tools_json(&self) -> Vec<serde_json::Value> {
        self.dispatcher
            .list_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool and return the MCP result as JSON (for HTTP transport).
    ///
    /// `Err` only for an unknown tool name; failed calls are `isError` results.
    pub async fn call_tool_json(
        &self,
        name: &str,
        arguments: Option<serde_json::Value>,
    ) -> std::result::Result<serde_json::Value, ToolError> {
        let result = self.dispatcher.call_tool(name, arguments).await?;
        serde_json::to_value(result).map_err(|e| ToolError::internal(e.to_string()))
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.instructions().to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _request, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.dispatcher.list_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.dispatcher
            .call_tool(&request.name, request.arguments.map(serde_json::Value::Object))
            .await
            .map_err(|e| match e {
                ToolError::NotFound(_) => McpError::invalid_params(e.to_string(), None),
                other => McpError::internal_error(other.to_string(), None),
            })
    }
}
