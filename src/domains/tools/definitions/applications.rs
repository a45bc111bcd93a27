//! Application tools.
//!
//! CRUD over the ABP applications endpoint (`/api/applications`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{IdParams, PageParams, path_segment};
use crate::core::api::ApiRequest;
use crate::domains::tools::{Access, ToolContext, ToolDefinition, ToolResult};

/// Parameters for listing applications.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListApplicationsParams {
    /// Text matched against application name and description.
    pub filter: Option<String>,

    #[serde(flatten)]
    pub page: PageParams,
}

/// Solution template an application is generated from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationTemplate {
    App,
    AppNolayers,
    Microservice,
    Module,
}

/// UI framework of the generated application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum UiFramework {
    Mvc,
    Angular,
    Blazor,
    BlazorServer,
    BlazorWebapp,
    NoUi,
}

/// Database provider of the generated application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseProvider {
    Ef,
    Mongodb,
}

/// Parameters for creating an application.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationParams {
    /// Application name, e.g. "Acme.BookStore".
    pub name: String,

    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Solution template (default: app).
    #[serde(default = "default_template")]
    pub template: ApplicationTemplate,

    /// UI framework (default: mvc).
    #[serde(default = "default_ui_framework")]
    pub ui_framework: UiFramework,

    /// Database provider (default: ef).
    #[serde(default = "default_database_provider")]
    pub database_provider: DatabaseProvider,

    /// Create a tiered solution with a separate auth server.
    #[serde(default)]
    pub tiered: bool,
}

fn default_template() -> ApplicationTemplate {
    ApplicationTemplate::App
}

fn default_ui_framework() -> UiFramework {
    UiFramework::Mvc
}

fn default_database_provider() -> DatabaseProvider {
    DatabaseProvider::Ef
}

/// Parameters for updating an application.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationParams {
    /// Application id.
    #[serde(skip_serializing)]
    pub id: String,

    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "abp_get_applications",
            "List ABP applications with optional filter, paging and sorting.",
            Access::Credential,
            list_applications,
        ),
        ToolDefinition::new(
            "abp_get_application",
            "Get a single ABP application by id.",
            Access::Credential,
            get_application,
        ),
        ToolDefinition::new(
            "abp_create_application",
            "Create a new ABP application from a solution template.",
            Access::Credential,
            create_application,
        ),
        ToolDefinition::new(
            "abp_update_application",
            "Update the name or description of an ABP application.",
            Access::Credential,
            update_application,
        ),
        ToolDefinition::new(
            "abp_delete_application",
            "Delete an ABP application by id.",
            Access::Credential,
            delete_application,
        ),
    ]
}

async fn list_applications(p: ListApplicationsParams, ctx: ToolContext) -> ToolResult {
    let request = ApiRequest::get("/api/applications").query_opt("Filter", p.filter);
    ctx.forward_list(p.page.apply(request)).await
}

async fn get_application(p: IdParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    ctx.forward(ApiRequest::get(format!("/api/applications/{}", id)))
        .await
}

async fn create_application(p: CreateApplicationParams, ctx: ToolContext) -> ToolResult {
    let output = ctx
        .forward(ApiRequest::post("/api/applications").json(&p))
        .await?;
    Ok(output.with_message(format!("Application '{}' created", p.name)))
}

async fn update_application(p: UpdateApplicationParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    ctx.forward(ApiRequest::put(format!("/api/applications/{}", id)).json(&p))
        .await
}

async fn delete_application(p: IdParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    let output = ctx
        .forward(ApiRequest::delete(format!("/api/applications/{}", id)))
        .await?;
    Ok(output.with_message(format!("Application {} deleted", id)))
}
