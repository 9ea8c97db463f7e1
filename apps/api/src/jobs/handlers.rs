//! Axum route handlers for the Jobs API.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::envelope::{ApiResponse, Empty};
use crate::errors::AppError;
use crate::jobs::query::{JobFilter, JobQuery};
use crate::jobs::validation::{validate_changes, validate_new, validate_record, JobPayload};
use crate::models::job::Job;
use crate::state::AppState;

/// A malformed id cannot name a stored job, so it reads as not found.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::job_not_found())
}

/// GET /api/jobs
///
/// Lists jobs matching `category`, `location`, `type` and `search`, newest first.
/// Read as raw pairs so a repeated parameter is not a rejection.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<ApiResponse<Vec<Job>>, AppError> {
    let Query(pairs) = pairs?;
    let filter = JobFilter::from_pairs(pairs);
    let jobs = state.jobs.find(&JobQuery::from_filter(&filter)).await?;
    Ok(ApiResponse::list(jobs))
}

/// GET /api/jobs/:id
///
/// Counts the view before responding.
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Job>, AppError> {
    let id = parse_id(&id)?;
    let job = state
        .jobs
        .increment_views(id)
        .await?
        .ok_or_else(AppError::job_not_found)?;
    Ok(ApiResponse::ok(job))
}

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    payload: Result<Json<JobPayload>, JsonRejection>,
) -> Result<ApiResponse<Job>, AppError> {
    let Json(payload) = payload?;
    let new_job = validate_new(payload)?;
    let job = state.jobs.insert(new_job).await?;
    info!("Created job {} ({})", job.id, job.title);
    Ok(ApiResponse::created(job))
}

/// PUT /api/jobs/:id
///
/// Partial update: only fields present in the body are validated and written.
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<JobPayload>, JsonRejection>,
) -> Result<ApiResponse<Job>, AppError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    let changes = validate_changes(payload)?;

    let existing = state
        .jobs
        .find_by_id(id)
        .await?
        .ok_or_else(AppError::job_not_found)?;
    validate_record(&changes.apply_to(&existing))?;

    let job = state
        .jobs
        .update(id, &changes)
        .await?
        .ok_or_else(AppError::job_not_found)?;
    info!("Updated job {id}");
    Ok(ApiResponse::ok(job))
}

/// DELETE /api/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Empty>, AppError> {
    let id = parse_id(&id)?;
    if !state.jobs.delete(id).await? {
        return Err(AppError::job_not_found());
    }
    info!("Deleted job {id}");
    Ok(ApiResponse::ok(Empty::default()))
}

/// GET /api/jobs/category/:category
pub async fn handle_jobs_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<ApiResponse<Vec<Job>>, AppError> {
    let jobs = state.jobs.find(&JobQuery::by_category(&category)).await?;
    Ok(ApiResponse::list(jobs))
}
