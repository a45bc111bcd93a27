//! ABP Suite tools.
//!
//! Solution discovery and CRUD page generation (`/api/suite`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::NoParams;
use super::entities::is_pascal_identifier;
use super::ui::UiStack;
use crate::core::api::ApiRequest;
use crate::domains::tools::{Access, ToolContext, ToolDefinition, ToolError, ToolResult};

/// Property of a generated entity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrudProperty {
    /// Property name in PascalCase.
    pub name: String,

    /// C# type, e.g. "string", "int", "DateTime", "Guid".
    #[serde(rename = "type")]
    pub property_type: String,

    /// Whether the property is required.
    #[serde(default)]
    pub is_required: bool,

    /// Maximum length, for strings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

/// Parameters for generating CRUD pages.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCrudParams {
    /// Solution id from `abp_get_suite_solutions`.
    pub solution_id: String,

    /// Entity name in PascalCase, e.g. "Book".
    pub entity_name: String,

    /// Plural name; derived by the server when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural_name: Option<String>,

    /// Entity properties.
    pub properties: Vec<CrudProperty>,

    /// UI stack (default: mvc).
    #[serde(default = "default_ui")]
    pub ui_framework: UiStack,

    /// Make the entity multi-tenant.
    #[serde(default)]
    pub is_multi_tenant: bool,

    /// Add audit properties (CreationTime, CreatorId, ...).
    #[serde(default = "default_true")]
    pub is_audited: bool,
}

fn default_ui() -> UiStack {
    UiStack::Mvc
}

fn default_true() -> bool {
    true
}

impl GenerateCrudParams {
    fn validate(&self) -> Result<(), ToolError> {
        if self.solution_id.trim().is_empty() {
            return Err(ToolError::invalid_arguments("solutionId must not be empty"));
        }
        if !is_pascal_identifier(&self.entity_name) {
            return Err(ToolError::invalid_arguments(format!(
                "entityName '{}' must be a PascalCase identifier",
                self.entity_name
            )));
        }
        if self.properties.is_empty() {
            return Err(ToolError::invalid_arguments(
                "properties must contain at least one property",
            ));
        }
        for property in &self.properties {
            if !is_pascal_identifier(&property.name) {
                return Err(ToolError::invalid_arguments(format!(
                    "property name '{}' must be a PascalCase identifier",
                    property.name
                )));
            }
        }
        Ok(())
    }
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "abp_get_suite_solutions",
            "List solutions registered in ABP Suite.",
            Access::Credential,
            get_solutions,
        ),
        ToolDefinition::new(
            "abp_generate_crud",
            "Generate entity, application service and CRUD pages for a Suite solution.",
            Access::Credential,
            generate_crud,
        ),
    ]
}

async fn get_solutions(_: NoParams, ctx: ToolContext) -> ToolResult {
    ctx.forward_list(ApiRequest::get("/api/suite/solutions"))
        .await
}

async fn generate_crud(p: GenerateCrudParams, ctx: ToolContext) -> ToolResult {
    p.validate()?;
    let output = ctx
        .forward(ApiRequest::post("/api/suite/crud-pages").json(&p))
        .await?;
    Ok(output.with_message(format!(
        "CRUD pages for '{}' generated in solution {}",
        p.entity_name, p.solution_id
    )))
}
