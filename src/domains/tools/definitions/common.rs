//! Common utilities shared across the ABP tool groups.
//!
//! Paging parameters, identifier validation and the empty params type.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::core::api::ApiRequest;
use crate::domains::tools::ToolError;

/// ABP caps `MaxResultCount` at 1000 by default.
const MAX_RESULT_COUNT: u32 = 1000;

/// Parameters for tools that take no arguments.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

/// Parameters for tools addressing one record by id.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct IdParams {
    /// Record identifier (usually a GUID).
    pub id: String,
}

/// Paging and sorting arguments shared by list tools.
///
/// Passed through to ABP as `SkipCount`, `MaxResultCount` and `Sorting`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    /// Number of records to skip.
    pub skip_count: Option<u32>,

    /// Maximum number of records to return (default: 10, max: 1000).
    #[serde(default = "default_max_result_count")]
    pub max_result_count: u32,

    /// Sorting expression, e.g. "creationTime desc".
    pub sorting: Option<String>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            skip_count: None,
            max_result_count: default_max_result_count(),
            sorting: None,
        }
    }
}

impl PageParams {
    /// Add the paging query parameters to a request.
    pub fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .query_opt("SkipCount", self.skip_count)
            .query("MaxResultCount", validate_max_result_count(self.max_result_count))
            .query_opt("Sorting", self.sorting.as_deref())
    }
}

/// Default page size for list tools.
pub fn default_max_result_count() -> u32 {
    10
}

/// Clamp a page size to the range ABP accepts (1-1000).
pub fn validate_max_result_count(count: u32) -> u32 {
    count.clamp(1, MAX_RESULT_COUNT)
}

/// Validate an identifier that is placed into a URL path.
///
/// Rejects empty values and anything that would change the path shape,
/// including `.` and `..`, which URL parsing collapses into the parent path.
pub fn path_segment(value: &str) -> Result<&str, ToolError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ToolError::invalid_arguments("identifier must not be empty"));
    }
    if value.chars().all(|c| c == '.')
        || value.chars().any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace())
    {
        return Err(ToolError::invalid_arguments(format!(
            "invalid identifier '{}'",
            value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_max_result_count() {
        assert_eq!(validate_max_result_count(10), 10);
        assert_eq!(validate_max_result_count(0), 1);
        assert_eq!(validate_max_result_count(5000), 1000);
        assert_eq!(validate_max_result_count(1000), 1000);
    }

    #[test]
    fn test_page_params_defaults() {
        let params: PageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.max_result_count, 10);
        assert!(params.skip_count.is_none());

        let request = params.apply(ApiRequest::get("/api/applications"));
        assert_eq!(
            request.query,
            vec![("MaxResultCount".to_string(), "10".to_string())]
        );
    }

    #[test]
    fn test_page_params_full() {
        let params: PageParams = serde_json::from_str(
            r#"{"skipCount": 20, "maxResultCount": 5000, "sorting": "name asc"}"#,
        )
        .unwrap();
        let request = params.apply(ApiRequest::get("/api/applications"));
        assert_eq!(
            request.query,
            vec![
                ("SkipCount".to_string(), "20".to_string()),
                ("MaxResultCount".to_string(), "1000".to_string()),
                ("Sorting".to_string(), "name asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_path_segment_valid() {
        assert_eq!(
            path_segment(" 3a0f1c2e-7b44-4c1e-9a51-2f6d8e0b7c11 ").unwrap(),
            "3a0f1c2e-7b44-4c1e-9a51-2f6d8e0b7c11"
        );
        assert_eq!(path_segment("Volo.Blogging").unwrap(), "Volo.Blogging");
        assert_eq!(path_segment(".hidden").unwrap(), ".hidden");
    }

    #[test]
    fn test_path_segment_invalid() {
        assert!(path_segment("").is_err());
        assert!(path_segment("   ").is_err());
        assert!(path_segment("../admin").is_err());
        assert!(path_segment("a?b=c").is_err());
        assert!(path_segment("two words").is_err());
        assert!(path_segment(".").is_err());
        assert!(path_segment("..").is_err());
        assert!(path_segment(" ... ").is_err());
    }
}
