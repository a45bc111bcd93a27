//! Entity tools.
//!
//! Manage entity definitions of an ABP application (`/api/entities`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{IdParams, PageParams, path_segment};
use crate::core::api::ApiRequest;
use crate::domains::tools::{Access, ToolContext, ToolDefinition, ToolError, ToolResult};

/// Parameters for listing entities.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListEntitiesParams {
    /// Only entities of this application.
    pub application_id: Option<String>,

    /// Text matched against the entity name.
    pub filter: Option<String>,

    #[serde(flatten)]
    pub page: PageParams,
}

/// ABP base class for an entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
pub enum EntityBaseClass {
    Entity,
    AggregateRoot,
    AuditedAggregateRoot,
    FullAuditedAggregateRoot,
}

/// Primary key type of an entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryKeyType {
    Guid,
    Int,
    Long,
    String,
}

/// One property of an entity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityProperty {
    /// Property name in PascalCase, e.g. "Title".
    pub name: String,

    /// C# type, e.g. "string", "int", "DateTime", "decimal", "bool".
    #[serde(rename = "type")]
    pub property_type: String,

    /// Whether a value is required.
    #[serde(default)]
    pub is_required: bool,

    /// Maximum length for string properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

/// Parameters for creating an entity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntityParams {
    /// Application the entity belongs to.
    pub application_id: String,

    /// Entity name in PascalCase, e.g. "Book".
    pub name: String,

    /// Namespace, e.g. "Acme.BookStore.Books".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Base class (default: FullAuditedAggregateRoot).
    #[serde(default = "default_base_class")]
    pub base_class: EntityBaseClass,

    /// Primary key type (default: guid).
    #[serde(default = "default_primary_key_type")]
    pub primary_key_type: PrimaryKeyType,

    /// Entity properties.
    #[serde(default)]
    pub properties: Vec<EntityProperty>,

    /// Whether the entity is multi-tenant (implements IMultiTenant).
    #[serde(default)]
    pub multi_tenant: bool,
}

fn default_base_class() -> EntityBaseClass {
    EntityBaseClass::FullAuditedAggregateRoot
}

fn default_primary_key_type() -> PrimaryKeyType {
    PrimaryKeyType::Guid
}

impl CreateEntityParams {
    /// Reject definitions ABP would refuse to generate code for.
    fn validate(&self) -> Result<(), ToolError> {
        if !is_pascal_identifier(&self.name) {
            return Err(ToolError::invalid_arguments(format!(
                "entity name '{}' must be a PascalCase identifier",
                self.name
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for property in &self.properties {
            if !is_pascal_identifier(&property.name) {
                return Err(ToolError::invalid_arguments(format!(
                    "property name '{}' must be a PascalCase identifier",
                    property.name
                )));
            }
            if !seen.insert(property.name.as_str()) {
                return Err(ToolError::invalid_arguments(format!(
                    "duplicate property '{}'",
                    property.name
                )));
            }
        }
        Ok(())
    }
}

/// `Book`, `OrderLine2` - starts uppercase, letters and digits only.
pub(crate) fn is_pascal_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "abp_get_entities",
            "List entity definitions, optionally for one application.",
            Access::Credential,
            list_entities,
        ),
        ToolDefinition::new(
            "abp_get_entity",
            "Get an entity definition by id, including its properties.",
            Access::Credential,
            get_entity,
        ),
        ToolDefinition::new(
            "abp_create_entity",
            "Create an entity definition with properties, base class and key type.",
            Access::Credential,
            create_entity,
        ),
        ToolDefinition::new(
            "abp_delete_entity",
            "Delete an entity definition by id.",
            Access::Credential,
            delete_entity,
        ),
    ]
}

async fn list_entities(p: ListEntitiesParams, ctx: ToolContext) -> ToolResult {
    let request = ApiRequest::get("/api/entities")
        .query_opt("ApplicationId", p.application_id)
        .query_opt("Filter", p.filter);
    ctx.forward_list(p.page.apply(request)).await
}

async fn get_entity(p: IdParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    ctx.forward(ApiRequest::get(format!("/api/entities/{}", id)))
        .await
}

async fn create_entity(p: CreateEntityParams, ctx: ToolContext) -> ToolResult {
    p.validate()?;
    let output = ctx
        .forward(ApiRequest::post("/api/entities").json(&p))
        .await?;
    Ok(output.with_message(format!(
        "Entity '{}' created with {} properties",
        p.name,
        p.properties.len()
    )))
}

async fn delete_entity(p: IdParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    let output = ctx
        .forward(ApiRequest::delete(format!("/api/entities/{}", id)))
        .await?;
    Ok(output.with_message(format!("Entity {} deleted", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: serde_json::Value) -> CreateEntityParams {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_pascal_identifier() {
        assert!(is_pascal_identifier("Book"));
        assert!(is_pascal_identifier("OrderLine2"));
        assert!(!is_pascal_identifier("book"));
        assert!(!is_pascal_identifier("Order_Line"));
        assert!(!is_pascal_identifier(""));
    }

    #[test]
    fn test_create_defaults_and_body() {
        let p = params(json!({
            "applicationId": "app-1",
            "name": "Book",
            "properties": [{ "name": "Title", "type": "string", "isRequired": true, "maxLength": 128 }]
        }));
        assert!(p.validate().is_ok());

        let body = serde_json::to_value(&p).unwrap();
        assert_eq!(body["baseClass"], "FullAuditedAggregateRoot");
        assert_eq!(body["primaryKeyType"], "guid");
        assert_eq!(body["properties"][0]["type"], "string");
        assert_eq!(body["properties"][0]["maxLength"], 128);
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let p = params(json!({
            "applicationId": "app-1",
            "name": "Book",
            "properties": [
                { "name": "Title", "type": "string" },
                { "name": "Title", "type": "string" }
            ]
        }));
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_lowercase_entity_name_rejected() {
        let p = params(json!({ "applicationId": "app-1", "name": "book" }));
        assert!(matches!(p.validate(), Err(ToolError::InvalidArguments(_))));
    }
}
