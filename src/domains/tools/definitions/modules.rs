//! Module tools.
//!
//! Browse, install and uninstall ABP application modules.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{PageParams, path_segment};
use crate::core::api::ApiRequest;
use crate::domains::tools::{Access, ToolContext, ToolDefinition, ToolResult};

/// Parameters for listing modules.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListModulesParams {
    /// Text matched against module name and display name.
    pub filter: Option<String>,

    /// Only return modules installed in the current solution.
    #[serde(default)]
    pub installed_only: bool,

    #[serde(flatten)]
    pub page: PageParams,
}

/// Parameters addressing one module by name.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ModuleNameParams {
    /// Module name, e.g. "Volo.Blogging".
    pub name: String,
}

/// Parameters for installing a module.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallModuleParams {
    /// Module name, e.g. "Volo.Blogging".
    #[serde(skip_serializing)]
    pub name: String,

    /// Module version; the latest compatible version when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Also add the module's source code to the solution.
    #[serde(default)]
    pub with_source_code: bool,

    /// Skip database migrations after installing.
    #[serde(default)]
    pub skip_db_migrations: bool,
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "abp_get_modules",
            "List ABP modules available to or installed in the solution.",
            Access::Credential,
            list_modules,
        ),
        ToolDefinition::new(
            "abp_get_module",
            "Get details of an ABP module by name, including its dependencies.",
            Access::Credential,
            get_module,
        ),
        ToolDefinition::new(
            "abp_install_module",
            "Install an ABP module into the solution.",
            Access::Credential,
            install_module,
        ),
        ToolDefinition::new(
            "abp_uninstall_module",
            "Uninstall an ABP module from the solution.",
            Access::Credential,
            uninstall_module,
        ),
    ]
}

async fn list_modules(p: ListModulesParams, ctx: ToolContext) -> ToolResult {
    let mut request = ApiRequest::get("/api/modules").query_opt("Filter", p.filter);
    if p.installed_only {
        request = request.query("InstalledOnly", true);
    }
    ctx.forward_list(p.page.apply(request)).await
}

async fn get_module(p: ModuleNameParams, ctx: ToolContext) -> ToolResult {
    let name = path_segment(&p.name)?;
    ctx.forward(ApiRequest::get(format!("/api/modules/{}", name)))
        .await
}

async fn install_module(p: InstallModuleParams, ctx: ToolContext) -> ToolResult {
    let name = path_segment(&p.name)?;
    let output = ctx
        .forward(ApiRequest::post(format!("/api/modules/{}/install", name)).json(&p))
        .await?;
    Ok(output.with_message(format!("Module {} installed", name)))
}

async fn uninstall_module(p: ModuleNameParams, ctx: ToolContext) -> ToolResult {
    let name = path_segment(&p.name)?;
    let output = ctx
        .forward(ApiRequest::post(format!("/api/modules/{}/uninstall", name)))
        .await?;
    Ok(output.with_message(format!("Module {} uninstalled", name)))
}
