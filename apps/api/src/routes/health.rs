use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "huntersite-api"
    }))
}

/// GET /
/// Service banner listing the Jobs API endpoints.
pub async fn index_handler() -> Json<Value> {
    Json(json!({
        "message": "HunterSite API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "getAllJobs": "GET /api/jobs",
            "getJobById": "GET /api/jobs/:id",
            "createJob": "POST /api/jobs",
            "updateJob": "PUT /api/jobs/:id",
            "deleteJob": "DELETE /api/jobs/:id",
            "getByCategory": "GET /api/jobs/category/:category"
        },
        "examples": {
            "searchJobs": "GET /api/jobs?search=developer&category=it-software",
            "filterByLocation": "GET /api/jobs?location=remote",
            "filterByType": "GET /api/jobs?type=Full-time"
        }
    }))
}
