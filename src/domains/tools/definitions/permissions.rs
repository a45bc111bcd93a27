//! Permission tools.
//!
//! Read and change grants through the ABP permission management API
//! (`/api/permission-management/permissions`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::core::api::ApiRequest;
use crate::domains::tools::{Access, ToolContext, ToolDefinition, ToolError, ToolResult};

const PERMISSIONS_PATH: &str = "/api/permission-management/permissions";

/// Who a permission is granted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ProviderName {
    /// A role; `providerKey` is the role name.
    R,
    /// A user; `providerKey` is the user id.
    U,
}

impl ProviderName {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderName::R => "R",
            ProviderName::U => "U",
        }
    }
}

/// Parameters for reading the permissions of a role or user.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPermissionsParams {
    /// "R" for a role, "U" for a user.
    pub provider_name: ProviderName,

    /// Role name or user id.
    pub provider_key: String,
}

impl GetPermissionsParams {
    fn request(&self) -> Result<ApiRequest, ToolError> {
        let provider_key = self.provider_key.trim();
        if provider_key.is_empty() {
            return Err(ToolError::invalid_arguments("providerKey must not be empty"));
        }

        Ok(ApiRequest::get(PERMISSIONS_PATH)
            .query("providerName", self.provider_name.as_str())
            .query("providerKey", provider_key))
    }
}

/// Parameters for granting or revoking one permission.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePermissionParams {
    /// "R" for a role, "U" for a user.
    pub provider_name: ProviderName,

    /// Role name or user id.
    pub provider_key: String,

    /// Permission name, e.g. "AbpIdentity.Users.Create".
    pub permission_name: String,
}

impl ChangePermissionParams {
    fn request(&self, is_granted: bool) -> Result<ApiRequest, ToolError> {
        if self.provider_key.trim().is_empty() {
            return Err(ToolError::invalid_arguments("providerKey must not be empty"));
        }
        if self.permission_name.trim().is_empty() {
            return Err(ToolError::invalid_arguments("permissionName must not be empty"));
        }

        Ok(ApiRequest::put(PERMISSIONS_PATH)
            .query("providerName", self.provider_name.as_str())
            .query("providerKey", self.provider_key.trim())
            .json(&json!({
                "permissions": [
                    { "name": self.permission_name.trim(), "isGranted": is_granted }
                ]
            })))
    }
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "abp_get_permissions",
            "Get the permission groups and grants of a role (R) or user (U).",
            Access::Credential,
            get_permissions,
        ),
        ToolDefinition::new(
            "abp_grant_permission",
            "Grant a permission to a role (providerName R) or user (providerName U).",
            Access::Credential,
            grant_permission,
        ),
        ToolDefinition::new(
            "abp_revoke_permission",
            "Revoke a permission from a role (providerName R) or user (providerName U).",
            Access::Credential,
            revoke_permission,
        ),
    ]
}

async fn get_permissions(p: GetPermissionsParams, ctx: ToolContext) -> ToolResult {
    ctx.forward(p.request()?).await
}

async fn grant_permission(p: ChangePermissionParams, ctx: ToolContext) -> ToolResult {
    let output = ctx.forward(p.request(true)?).await?;
    Ok(output.with_message(format!(
        "Granted {} to {} {}",
        p.permission_name,
        p.provider_name.as_str(),
        p.provider_key
    )))
}

async fn revoke_permission(p: ChangePermissionParams, ctx: ToolContext) -> ToolResult {
    let output = ctx.forward(p.request(false)?).await?;
    Ok(output.with_message(format!(
        "Revoked {} from {} {}",
        p.permission_name,
        p.provider_name.as_str(),
        p.provider_key
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name_accepts_only_r_and_u() {
        assert!(serde_json::from_value::<ProviderName>(json!("R")).is_ok());
        assert!(serde_json::from_value::<ProviderName>(json!("U")).is_ok());
        assert!(serde_json::from_value::<ProviderName>(json!("T")).is_err());
        assert!(serde_json::from_value::<ProviderName>(json!("r")).is_err());
    }

    #[test]
    fn test_grant_request_shape() {
        let p: ChangePermissionParams = serde_json::from_value(json!({
            "providerName": "R",
            "providerKey": "admin",
            "permissionName": "AbpIdentity.Users.Create"
        }))
        .unwrap();

        let request = p.request(true).unwrap();
        assert_eq!(request.method, reqwest::Method::PUT);
        assert_eq!(request.path, PERMISSIONS_PATH);
        assert_eq!(
            request.query,
            vec![
                ("providerName".to_string(), "R".to_string()),
                ("providerKey".to_string(), "admin".to_string()),
            ]
        );
        let body = request.body.unwrap();
        assert_eq!(body["permissions"][0]["name"], "AbpIdentity.Users.Create");
        assert_eq!(body["permissions"][0]["isGranted"], true);
    }

    #[test]
    fn test_revoke_sets_is_granted_false() {
        let p: ChangePermissionParams = serde_json::from_value(json!({
            "providerName": "U",
            "providerKey": "3a0f",
            "permissionName": "Saas.Tenants"
        }))
        .unwrap();
        let body = p.request(false).unwrap().body.unwrap();
        assert_eq!(body["permissions"][0]["isGranted"], false);
    }

    #[test]
    fn test_blank_permission_name_rejected() {
        let p: ChangePermissionParams = serde_json::from_value(json!({
            "providerName": "R",
            "providerKey": "admin",
            "permissionName": "  "
        }))
        .unwrap();
        assert!(p.request(true).is_err());
    }

    #[test]
    fn test_get_request_trims_and_rejects_blank_key() {
        let p: GetPermissionsParams = serde_json::from_value(json!({
            "providerName": "U",
            "providerKey": " 3a0f "
        }))
        .unwrap();
        let request = p.request().unwrap();
        assert_eq!(request.method, reqwest::Method::GET);
        assert_eq!(
            request.query,
            vec![
                ("providerName".to_string(), "U".to_string()),
                ("providerKey".to_string(), "3a0f".to_string()),
            ]
        );

        let blank: GetPermissionsParams = serde_json::from_value(json!({
            "providerName": "R",
            "providerKey": "   "
        }))
        .unwrap();
        let err = blank.request().unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(err.to_string().contains("providerKey"));
    }

    #[test]
    fn test_schema_enumerates_provider_names() {
        let tool = tools().into_iter().find(|t| t.name() == "abp_grant_permission").unwrap();
        let schema = serde_json::Value::Object((**tool.input_schema()).clone());
        let text = schema.to_string();
        assert!(text.contains("\"R\""));
        assert!(text.contains("\"U\""));
    }
}
