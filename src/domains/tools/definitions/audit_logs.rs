//! Audit log tools.
//!
//! Query the ABP audit logging module (`/api/audit-logging/audit-logs`).

use schemars::JsonSchema;
use serde::Deserialize;

use super::common::{IdParams, PageParams, path_segment};
use crate::core::api::ApiRequest;
use crate::domains::tools::{Access, ToolContext, ToolDefinition, ToolError, ToolResult};

/// HTTP method filter for audit logs.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethodFilter {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethodFilter {
    fn as_str(self) -> &'static str {
        match self {
            HttpMethodFilter::Get => "GET",
            HttpMethodFilter::Post => "POST",
            HttpMethodFilter::Put => "PUT",
            HttpMethodFilter::Patch => "PATCH",
            HttpMethodFilter::Delete => "DELETE",
        }
    }
}

/// Parameters for querying audit logs.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListAuditLogsParams {
    /// Only entries at or after this time (ISO 8601).
    pub start_time: Option<String>,

    /// Only entries at or before this time (ISO 8601).
    pub end_time: Option<String>,

    /// Only requests to URLs containing this text.
    pub url: Option<String>,

    /// Only requests by this user name.
    pub user_name: Option<String>,

    /// Only requests with this HTTP method.
    pub http_method: Option<HttpMethodFilter>,

    /// Only requests answered with this HTTP status code.
    pub http_status_code: Option<u16>,

    /// Only requests that did (true) or did not (false) throw.
    pub has_exception: Option<bool>,

    /// Only requests slower than this many milliseconds.
    pub min_execution_duration: Option<u32>,

    #[serde(flatten)]
    pub page: PageParams,
}

impl ListAuditLogsParams {
    fn validate(&self) -> Result<(), ToolError> {
        for (field, value) in [("startTime", &self.start_time), ("endTime", &self.end_time)] {
            if let Some(value) = value {
                chrono::DateTime::parse_from_rfc3339(value)
                    .map(|_| ())
                    .or_else(|_| {
                        chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|_| ())
                    })
                    .map_err(|_| {
                        ToolError::invalid_arguments(format!(
                            "{} '{}' is not an ISO 8601 date or timestamp",
                            field, value
                        ))
                    })?;
            }
        }
        Ok(())
    }
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "abp_get_audit_logs",
            "Query audit logs by time range, URL, user, HTTP method, status code or exceptions.",
            Access::Credential,
            list_audit_logs,
        ),
        ToolDefinition::new(
            "abp_get_audit_log",
            "Get one audit log entry by id, including its actions and entity changes.",
            Access::Credential,
            get_audit_log,
        ),
    ]
}

async fn list_audit_logs(p: ListAuditLogsParams, ctx: ToolContext) -> ToolResult {
    p.validate()?;
    let request = ApiRequest::get("/api/audit-logging/audit-logs")
        .query_opt("StartTime", p.start_time)
        .query_opt("EndTime", p.end_time)
        .query_opt("Url", p.url)
        .query_opt("UserName", p.user_name)
        .query_opt("HttpMethod", p.http_method.map(HttpMethodFilter::as_str))
        .query_opt("HttpStatusCode", p.http_status_code)
        .query_opt("HasException", p.has_exception)
        .query_opt("MinExecutionDuration", p.min_execution_duration);
    ctx.forward_list(p.page.apply(request)).await
}

async fn get_audit_log(p: IdParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    ctx.forward(ApiRequest::get(format!("/api/audit-logging/audit-logs/{}", id)))
        .await
}
