//! Localization tools.

use schemars::JsonSchema;
use serde::Deserialize;

use super::common::NoParams;
use crate::core::api::ApiRequest;
use crate::domains::tools::{Access, ToolContext, ToolDefinition, ToolError, ToolResult};

/// Parameters for reading localized texts.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalizationTextsParams {
    /// Culture, e.g. "en" or "tr-TR".
    pub culture_name: String,

    /// Localization resource, e.g. "AbpIdentity". All resources when omitted.
    pub resource_name: Option<String>,

    /// Only keys or values containing this text.
    pub filter: Option<String>,

    /// Only texts missing a translation in this culture.
    #[serde(default)]
    pub only_empty_values: bool,
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "abp_get_languages",
            "List languages configured in the application.",
            Access::Credential,
            get_languages,
        ),
        ToolDefinition::new(
            "abp_get_localization_texts",
            "Get localized texts for a culture, optionally for one resource.",
            Access::Credential,
            get_texts,
        ),
    ]
}

async fn get_languages(_: NoParams, ctx: ToolContext) -> ToolResult {
    ctx.forward_list(ApiRequest::get("/api/localization/languages"))
        .await
}

async fn get_texts(p: LocalizationTextsParams, ctx: ToolContext) -> ToolResult {
    let culture = p.culture_name.trim();
    if culture.is_empty() {
        return Err(ToolError::invalid_arguments("cultureName must not be empty"));
    }

    let mut request = ApiRequest::get("/api/localization/texts")
        .query("CultureName", culture)
        .query_opt("ResourceName", p.resource_name)
        .query_opt("Filter", p.filter);
    if p.only_empty_values {
        request = request.query("GetOnlyEmptyValues", true);
    }
    ctx.forward_list(request).await
}
