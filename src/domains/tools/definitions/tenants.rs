//! Tenant tools.
//!
//! Tenants of the ABP SaaS module (`/api/saas/tenants`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{IdParams, PageParams, path_segment};
use crate::core::api::ApiRequest;
use crate::domains::tools::{Access, ToolContext, ToolDefinition, ToolResult};

/// Parameters for listing tenants.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListTenantsParams {
    /// Text matched against the tenant name.
    pub filter: Option<String>,

    /// Include the edition name of each tenant.
    #[serde(default)]
    pub get_edition_names: bool,

    #[serde(flatten)]
    pub page: PageParams,
}

/// Tenant activation state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub enum ActivationState {
    Active,
    ActiveWithLimitedTime,
    Passive,
}

/// Parameters for creating a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantParams {
    /// Unique tenant name.
    pub name: String,

    /// Email of the tenant's admin user.
    pub admin_email_address: String,

    /// Password of the tenant's admin user.
    pub admin_password: String,

    /// Edition to assign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edition_id: Option<String>,

    /// Activation state (default: Active).
    #[serde(default = "default_activation_state")]
    pub activation_state: ActivationState,

    /// End date for ActiveWithLimitedTime, ISO 8601.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_end_date: Option<String>,
}

/// Parameters for updating a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenantParams {
    /// Tenant id.
    #[serde(skip_serializing)]
    pub id: String,

    /// Tenant name.
    pub name: String,

    /// Edition to assign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edition_id: Option<String>,

    /// Activation state (default: Active).
    #[serde(default = "default_activation_state")]
    pub activation_state: ActivationState,

    /// End date for ActiveWithLimitedTime, ISO 8601.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_end_date: Option<String>,

    /// Concurrency stamp from `abp_get_tenant`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency_stamp: Option<String>,
}

fn default_activation_state() -> ActivationState {
    ActivationState::Active
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "abp_get_tenants",
            "List SaaS tenants with optional filter, paging and sorting.",
            Access::Credential,
            list_tenants,
        ),
        ToolDefinition::new(
            "abp_get_tenant",
            "Get a SaaS tenant by id.",
            Access::Credential,
            get_tenant,
        ),
        ToolDefinition::new(
            "abp_create_tenant",
            "Create a SaaS tenant together with its admin user.",
            Access::Credential,
            create_tenant,
        ),
        ToolDefinition::new(
            "abp_update_tenant",
            "Update a SaaS tenant's name, edition or activation state.",
            Access::Credential,
            update_tenant,
        ),
        ToolDefinition::new(
            "abp_delete_tenant",
            "Delete a SaaS tenant by id.",
            Access::Credential,
            delete_tenant,
        ),
    ]
}

async fn list_tenants(p: ListTenantsParams, ctx: ToolContext) -> ToolResult {
    let mut request = ApiRequest::get("/api/saas/tenants").query_opt("Filter", p.filter);
    if p.get_edition_names {
        request = request.query("GetEditionNames", true);
    }
    ctx.forward_list(p.page.apply(request)).await
}

async fn get_tenant(p: IdParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    ctx.forward(ApiRequest::get(format!("/api/saas/tenants/{}", id)))
        .await
}

async fn create_tenant(p: CreateTenantParams, ctx: ToolContext) -> ToolResult {
    let output = ctx
        .forward(ApiRequest::post("/api/saas/tenants").json(&p))
        .await?;
    Ok(output.with_message(format!("Tenant '{}' created", p.name)))
}

async fn update_tenant(p: UpdateTenantParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    ctx.forward(ApiRequest::put(format!("/api/saas/tenants/{}", id)).json(&p))
        .await
}

async fn delete_tenant(p: IdParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    let output = ctx
        .forward(ApiRequest::delete(format!("/api/saas/tenants/{}", id)))
        .await?;
    Ok(output.with_message(format!("Tenant {} deleted", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_tenant_body() {
        let p: CreateTenantParams = serde_json::from_value(json!({
            "name": "acme",
            "adminEmailAddress": "admin@acme.com",
            "adminPassword": "1q2w3E*"
        }))
        .unwrap();
        let body = serde_json::to_value(&p).unwrap();
        assert_eq!(body["activationState"], "Active");
        assert!(body.get("editionId").is_none());
    }

    #[test]
    fn test_unknown_activation_state_rejected() {
        let result = serde_json::from_value::<UpdateTenantParams>(json!({
            "id": "t1",
            "name": "acme",
            "activationState": "Suspended"
        }));
        assert!(result.is_err());
    }
}
