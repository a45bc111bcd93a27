//! Identity tools.
//!
//! Users and roles of the ABP Identity module (`/api/identity/...`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{IdParams, PageParams, path_segment};
use crate::core::api::ApiRequest;
use crate::domains::tools::{Access, ToolContext, ToolDefinition, ToolError, ToolResult};

/// Parameters for listing users.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersParams {
    /// Text matched against user name, email, name and surname.
    pub filter: Option<String>,

    #[serde(flatten)]
    pub page: PageParams,
}

/// Parameters for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserParams {
    /// Login name.
    pub user_name: String,

    /// Email address.
    pub email: String,

    /// Initial password.
    pub password: String,

    /// First name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,

    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    /// Whether the user can sign in (default: true).
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Lock the account after repeated failed sign-ins (default: true).
    #[serde(default = "default_true")]
    pub lockout_enabled: bool,

    /// Role names to assign.
    #[serde(default)]
    pub role_names: Vec<String>,
}

/// Parameters for updating a user.
///
/// ABP replaces the whole user on update, so `userName` and `email` are required.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserParams {
    /// User id.
    #[serde(skip_serializing)]
    pub id: String,

    /// Login name.
    pub user_name: String,

    /// Email address.
    pub email: String,

    /// First name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,

    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    /// Whether the user can sign in.
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Role names; replaces the user's current roles when given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_names: Option<Vec<String>>,

    /// Concurrency stamp from `abp_get_user`, guards against lost updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency_stamp: Option<String>,
}

/// Parameters for listing roles.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListRolesParams {
    /// Text matched against the role name.
    pub filter: Option<String>,

    #[serde(flatten)]
    pub page: PageParams,
}

fn default_true() -> bool {
    true
}

/// Minimal shape check; ABP performs the real validation.
fn validate_email(email: &str) -> Result<(), ToolError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ToolError::invalid_arguments(format!(
            "'{}' is not a valid email address",
            email
        ))),
    }
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "abp_get_users",
            "List identity users with optional filter, paging and sorting.",
            Access::Credential,
            list_users,
        ),
        ToolDefinition::new(
            "abp_get_user",
            "Get an identity user by id.",
            Access::Credential,
            get_user,
        ),
        ToolDefinition::new(
            "abp_create_user",
            "Create an identity user, optionally assigning roles.",
            Access::Credential,
            create_user,
        ),
        ToolDefinition::new(
            "abp_update_user",
            "Update an identity user. userName and email are required.",
            Access::Credential,
            update_user,
        ),
        ToolDefinition::new(
            "abp_delete_user",
            "Delete an identity user by id.",
            Access::Credential,
            delete_user,
        ),
        ToolDefinition::new(
            "abp_get_user_roles",
            "List the roles assigned to an identity user.",
            Access::Credential,
            get_user_roles,
        ),
        ToolDefinition::new(
            "abp_get_roles",
            "List identity roles.",
            Access::Credential,
            list_roles,
        ),
    ]
}

async fn list_users(p: ListUsersParams, ctx: ToolContext) -> ToolResult {
    let request = ApiRequest::get("/api/identity/users").query_opt("Filter", p.filter);
    ctx.forward_list(p.page.apply(request)).await
}

async fn get_user(p: IdParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    ctx.forward(ApiRequest::get(format!("/api/identity/users/{}", id)))
        .await
}

async fn create_user(p: CreateUserParams, ctx: ToolContext) -> ToolResult {
    validate_email(&p.email)?;
    let output = ctx
        .forward(ApiRequest::post("/api/identity/users").json(&p))
        .await?;
    Ok(output.with_message(format!("User '{}' created", p.user_name)))
}

async fn update_user(p: UpdateUserParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    validate_email(&p.email)?;
    ctx.forward(ApiRequest::put(format!("/api/identity/users/{}", id)).json(&p))
        .await
}

async fn delete_user(p: IdParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    let output = ctx
        .forward(ApiRequest::delete(format!("/api/identity/users/{}", id)))
        .await?;
    Ok(output.with_message(format!("User {} deleted", id)))
}

async fn get_user_roles(p: IdParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    ctx.forward_list(ApiRequest::get(format!("/api/identity/users/{}/roles", id)))
        .await
}

async fn list_roles(p: ListRolesParams, ctx: ToolContext) -> ToolResult {
    let request = ApiRequest::get("/api/identity/roles").query_opt("Filter", p.filter);
    ctx.forward_list(p.page.apply(request)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::testing::RecordingApi;
    use crate::core::config::Config;
    use serde_json::json;
    use std::sync::Arc;

    fn context(api: Arc<RecordingApi>) -> ToolContext {
        let mut config = Config::default();
        config.api.api_key = Some("key".to_string());
        ToolContext::new(Arc::new(config), api)
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("admin@abp.io").is_ok());
        assert!(validate_email("admin").is_err());
        assert!(validate_email("@abp.io").is_err());
        assert!(validate_email("admin@localhost").is_err());
    }

    #[test]
    fn test_create_user_defaults() {
        let p: CreateUserParams = serde_json::from_value(json!({
            "userName": "john",
            "email": "john@acme.com",
            "password": "1q2w3E*"
        }))
        .unwrap();
        assert!(p.is_active);
        assert!(p.lockout_enabled);
        assert!(p.role_names.is_empty());
    }

    #[tokio::test]
    async fn test_user_roles_bare_array_is_normalized() {
        let api = Arc::new(RecordingApi::ok(json!({ "items": [{ "name": "admin" }] })));
        let output = get_user_roles(IdParams { id: "u1".to_string() }, context(api.clone()))
            .await
            .unwrap();

        assert_eq!(output.data["totalCount"], 1);
        assert_eq!(api.requests()[0].path, "/api/identity/users/u1/roles");
    }

    #[tokio::test]
    async fn test_update_user_sends_put_without_id() {
        let api = Arc::new(RecordingApi::ok(json!({ "id": "u1" })));
        let p: UpdateUserParams = serde_json::from_value(json!({
            "id": "u1",
            "userName": "john",
            "email": "john@acme.com",
            "roleNames": ["admin"]
        }))
        .unwrap();

        update_user(p, context(api.clone())).await.unwrap();

        let request = &api.requests()[0];
        assert_eq!(request.method, reqwest::Method::PUT);
        let body = request.body.as_ref().unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["roleNames"][0], "admin");
    }

    #[tokio::test]
    async fn test_invalid_email_makes_no_request() {
        let api = Arc::new(RecordingApi::ok(json!(null)));
        let p: CreateUserParams = serde_json::from_value(json!({
            "userName": "john",
            "email": "not-an-email",
            "password": "x"
        }))
        .unwrap();

        assert!(create_user(p, context(api.clone())).await.is_err());
        assert_eq!(api.call_count(), 0);
    }
}
