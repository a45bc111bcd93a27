//! Background job tools.
//!
//! Inspect and manage persisted background jobs (`/api/background-jobs`).

use schemars::JsonSchema;
use serde::Deserialize;

use super::common::{IdParams, PageParams, path_segment};
use crate::core::api::ApiRequest;
use crate::domains::tools::{Access, ToolContext, ToolDefinition, ToolResult};

/// Parameters for listing background jobs.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListBackgroundJobsParams {
    /// Only jobs with this job name (args type name).
    pub job_name: Option<String>,

    /// Only abandoned (true) or active (false) jobs.
    pub is_abandoned: Option<bool>,

    #[serde(flatten)]
    pub page: PageParams,
}

pub fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "abp_get_background_jobs",
            "List persisted background jobs, optionally only abandoned ones.",
            Access::Credential,
            list_background_jobs,
        ),
        ToolDefinition::new(
            "abp_get_background_job",
            "Get a background job by id, including try count and next try time.",
            Access::Credential,
            get_background_job,
        ),
        ToolDefinition::new(
            "abp_retry_background_job",
            "Reset an abandoned background job so it is tried again.",
            Access::Credential,
            retry_background_job,
        ),
        ToolDefinition::new(
            "abp_delete_background_job",
            "Delete a background job by id.",
            Access::Credential,
            delete_background_job,
        ),
    ]
}

async fn list_background_jobs(p: ListBackgroundJobsParams, ctx: ToolContext) -> ToolResult {
    let request = ApiRequest::get("/api/background-jobs")
        .query_opt("JobName", p.job_name)
        .query_opt("IsAbandoned", p.is_abandoned);
    ctx.forward_list(p.page.apply(request)).await
}

async fn get_background_job(p: IdParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    ctx.forward(ApiRequest::get(format!("/api/background-jobs/{}", id)))
        .await
}

async fn retry_background_job(p: IdParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    let output = ctx
        .forward(ApiRequest::post(format!("/api/background-jobs/{}/retry", id)))
        .await?;
    Ok(output.with_message(format!("Background job {} scheduled for retry", id)))
}

async fn delete_background_job(p: IdParams, ctx: ToolContext) -> ToolResult {
    let id = path_segment(&p.id)?;
    let output = ctx
        .forward(ApiRequest::delete(format!("/api/background-jobs/{}", id)))
        .await?;
    Ok(output.with_message(format!("Background job {} deleted", id)))
}
