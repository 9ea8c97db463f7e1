pub mod health;

use axum::{
    routing::{get, MethodRouter},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::errors::{panic_response, route_not_found};
use crate::jobs::handlers;
use crate::state::AppState;

/// Unsupported methods on a known path answer like unknown routes.
fn or_not_found(router: MethodRouter<AppState>) -> MethodRouter<AppState> {
    router.fallback(route_not_found)
}

fn jobs_router() -> Router<AppState> {
    Router::new()
        .route(
            "/jobs",
            or_not_found(get(handlers::handle_list_jobs).post(handlers::handle_create_job)),
        )
        .route(
            "/jobs/:id",
            or_not_found(
                get(handlers::handle_get_job)
                    .put(handlers::handle_update_job)
                    .delete(handlers::handle_delete_job),
            ),
        )
        .route(
            "/jobs/category/:category",
            or_not_found(get(handlers::handle_jobs_by_category)),
        )
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::index_handler))
        .route("/health", get(health::health_handler))
        .nest("/api", jobs_router())
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use chrono::{DateTime, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::jobs::memory_store::MemoryJobStore;
    use crate::jobs::store::JobStore;

    struct TestApp {
        app: Router,
        store: Arc<MemoryJobStore>,
    }

    impl TestApp {
        fn new() -> Self {
            let store = Arc::new(MemoryJobStore::new());
            let app = build_router(AppState::new(store.clone()));
            TestApp { app, store }
        }

        async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let body = body
                .map(|b| Body::from(serde_json::to_vec(&b).unwrap()))
                .unwrap_or_else(Body::empty);
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap();
            let response: Response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            (status, serde_json::from_slice(&bytes).unwrap())
        }

        async fn get(&self, uri: &str) -> (StatusCode, Value) {
            self.request("GET", uri, None).await
        }

        async fn create(&self, body: Value) -> Value {
            let (status, body) = self.request("POST", "/api/jobs", Some(body)).await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            body["data"].clone()
        }
    }

    fn job_body(title: &str, category: &str) -> Value {
        json!({
            "title": title,
            "company": "TechCorp",
            "description": "Looking for a skilled engineer",
            "requirements": ["React", "JavaScript", "CSS"],
            "location": "Remote",
            "salary": "$70,000 - $90,000",
            "type": "Full-time",
            "category": category
        })
    }

    fn titles(body: &Value) -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|j| j["title"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_create_returns_record_with_id_and_equal_timestamps() {
        let app = TestApp::new();
        let job = app.create(job_body("Frontend Developer", "it-software")).await;

        assert!(!job["id"].as_str().unwrap().is_empty());
        assert_eq!(job["createdAt"], job["updatedAt"]);
        assert_eq!(job["views"], 0);
        assert_eq!(job["applications"], 0);
        assert_eq!(job["status"], "active");
        assert_eq!(job["postedBy"], "Anonymous");
    }

    #[tokio::test]
    async fn test_create_envelope_shape() {
        let app = TestApp::new();
        let (status, body) = app
            .request("POST", "/api/jobs", Some(job_body("Dev", "design")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert!(body.get("count").is_none());
        let mut keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["data", "success"]);
    }

    #[tokio::test]
    async fn test_create_with_unknown_category_is_rejected_and_store_untouched() {
        let app = TestApp::new();
        let (status, body) = app
            .request("POST", "/api/jobs", Some(job_body("Dev", "gardening")))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("category"));
        assert_eq!(app.store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_with_missing_fields_reports_them() {
        let app = TestApp::new();
        let (status, body) = app
            .request("POST", "/api/jobs", Some(json!({ "title": "Dev" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error = body["error"].as_str().unwrap();
        assert!(error.contains("Company name is required"));
        assert!(error.contains("Category is required"));
    }

    #[tokio::test]
    async fn test_create_with_malformed_json_is_bad_request() {
        let app = TestApp::new();
        let request = Request::builder()
            .method("POST")
            .uri("/api/jobs")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_create_with_numeric_salary_is_bad_request() {
        let app = TestApp::new();
        let mut body = job_body("Dev", "sales");
        body["salary"] = json!(80000);
        let (status, body) = app.request("POST", "/api/jobs", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_create_keeps_whitespace_only_description() {
        let app = TestApp::new();
        let mut body = job_body("Dev", "design");
        body["description"] = json!("   ");
        let job = app.create(body).await;
        assert_eq!(job["description"], "   ");
    }

    #[tokio::test]
    async fn test_create_with_nul_text_is_bad_request() {
        let app = TestApp::new();
        let mut body = job_body("Dev\u{0}", "design");
        body["postedBy"] = json!("hr\u{0}");
        let (status, body) = app.request("POST", "/api/jobs", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error = body["error"].as_str().unwrap();
        assert!(error.contains("title cannot contain NUL characters"));
        assert!(error.contains("postedBy"));
        assert_eq!(app.store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_increments_views_each_time() {
        let app = TestApp::new();
        let job = app.create(job_body("Dev", "it-software")).await;
        let uri = format!("/api/jobs/{}", job["id"].as_str().unwrap());

        for expected in 1..=3 {
            let (status, body) = app.get(&uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["data"]["views"], expected);
        }
    }

    #[tokio::test]
    async fn test_concurrent_gets_are_all_counted() {
        let app = Arc::new(TestApp::new());
        let job = app.create(job_body("Dev", "it-software")).await;
        let uri = format!("/api/jobs/{}", job["id"].as_str().unwrap());

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let app = app.clone();
                let uri = uri.clone();
                tokio::spawn(async move { app.get(&uri).await.0 })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap(), StatusCode::OK);
        }

        let id = job["id"].as_str().unwrap().parse().unwrap();
        let stored = app.store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.views, 20);
    }

    #[tokio::test]
    async fn test_get_unknown_and_malformed_ids_are_not_found() {
        let app = TestApp::new();
        for uri in [
            format!("/api/jobs/{}", uuid::Uuid::now_v7()),
            "/api/jobs/65abc123".to_string(),
        ] {
            let (status, body) = app.get(&uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body, json!({ "success": false, "error": "Job not found" }));
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first_with_count() {
        let app = TestApp::new();
        app.create(job_body("A", "it-software")).await;
        app.create(job_body("B", "design")).await;

        let (status, body) = app.get("/api/jobs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 2);
        assert_eq!(titles(&body), ["B", "A"]);

        let created: Vec<DateTime<Utc>> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|j| serde_json::from_value(j["createdAt"].clone()).unwrap())
            .collect();
        assert!(created[0] >= created[1]);
    }

    #[tokio::test]
    async fn test_list_filters_by_exact_category() {
        let app = TestApp::new();
        app.create(job_body("A", "it-software")).await;
        app.create(job_body("B", "engineering")).await;

        let (_, body) = app.get("/api/jobs?category=it-software").await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["category"], "it-software");

        let (_, body) = app.get("/api/jobs?category=it").await;
        assert_eq!(body["count"], 0);
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn test_list_search_matches_description_case_insensitively() {
        let app = TestApp::new();
        let mut body = job_body("Solutions Engineer", "engineering");
        body["company"] = json!("AboitizPower");
        body["description"] = json!("Pair with our Developer advocates");
        app.create(body).await;
        app.create(job_body("Accountant", "finance")).await;

        let (_, body) = app.get("/api/jobs?search=developer").await;
        assert_eq!(titles(&body), ["Solutions Engineer"]);
    }

    #[tokio::test]
    async fn test_list_combines_location_and_type() {
        let app = TestApp::new();
        let mut manila = job_body("Manila Contract", "design");
        manila["location"] = json!("Manila, Philippines");
        manila["type"] = json!("Contract");
        app.create(manila).await;
        let mut cebu = job_body("Cebu Contract", "design");
        cebu["location"] = json!("Cebu, Philippines");
        cebu["type"] = json!("Contract");
        app.create(cebu).await;
        app.create(job_body("Remote Full", "design")).await;

        let (_, body) = app.get("/api/jobs?location=philippines&type=Contract").await;
        assert_eq!(titles(&body), ["Cebu Contract", "Manila Contract"]);

        let (_, body) = app.get("/api/jobs?location=MANILA&type=Contract").await;
        assert_eq!(titles(&body), ["Manila Contract"]);
    }

    #[tokio::test]
    async fn test_list_search_with_pattern_characters() {
        let app = TestApp::new();
        app.create(job_body("Dev (50% remote)", "it-software")).await;
        app.create(job_body("Dev", "it-software")).await;

        let (status, body) = app.get("/api/jobs?search=50%25").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), ["Dev (50% remote)"]);

        let (status, body) = app.get("/api/jobs?search=(").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);

        let (status, body) = app.get("/api/jobs?search=%00").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);

        let (status, body) = app.get("/api/jobs/category/it-software%00").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_list_repeated_parameter_keeps_last_value() {
        let app = TestApp::new();
        app.create(job_body("Designer", "design")).await;
        app.create(job_body("Seller", "sales")).await;

        let (status, body) = app.get("/api/jobs?category=design&category=sales").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&body), ["Seller"]);

        let (status, body) = app.get("/api/jobs?category=sales&category=").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
    }

    #[tokio::test]
    async fn test_list_by_category_route() {
        let app = TestApp::new();
        app.create(job_body("A", "marketing")).await;
        app.create(job_body("B", "sales")).await;
        app.create(job_body("C", "marketing")).await;

        let (status, body) = app.get("/api/jobs/category/marketing").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(titles(&body), ["C", "A"]);
    }

    #[tokio::test]
    async fn test_update_merges_partial_fields() {
        let app = TestApp::new();
        let job = app.create(job_body("Dev", "it-software")).await;
        let uri = format!("/api/jobs/{}", job["id"].as_str().unwrap());
        app.get(&uri).await;

        let (status, body) = app
            .request("PUT", &uri, Some(json!({ "salary": "$80,000 - $100,000" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        let updated = &body["data"];
        assert_eq!(updated["salary"], "$80,000 - $100,000");
        assert_eq!(updated["title"], "Dev");
        assert_eq!(updated["requirements"], json!(["React", "JavaScript", "CSS"]));
        assert_eq!(updated["views"], 1);
        assert_eq!(updated["id"], job["id"]);
        assert_eq!(updated["createdAt"], job["createdAt"]);
    }

    #[tokio::test]
    async fn test_update_validation_and_not_found() {
        let app = TestApp::new();
        let job = app.create(job_body("Dev", "it-software")).await;
        let uri = format!("/api/jobs/{}", job["id"].as_str().unwrap());

        let (status, body) = app
            .request("PUT", &uri, Some(json!({ "category": "gardening" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, body) = app
            .request("PUT", &uri, Some(json!({ "title": "x".repeat(101) })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("100 characters"));

        let missing = format!("/api/jobs/{}", uuid::Uuid::now_v7());
        let (status, _) = app
            .request("PUT", &missing, Some(json!({ "salary": "1" })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = app.get(&uri).await;
        assert_eq!(body["data"]["category"], "it-software");
        assert_eq!(body["data"]["title"], "Dev");
    }

    #[tokio::test]
    async fn test_delete_then_missing() {
        let app = TestApp::new();
        let job = app.create(job_body("Dev", "it-software")).await;
        app.create(job_body("Other", "it-software")).await;
        let uri = format!("/api/jobs/{}", job["id"].as_str().unwrap());

        let (status, body) = app.request("DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "data": {} }));

        let (status, body) = app.request("DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(app.store.count().await.unwrap(), 1);

        let (status, _) = app.get(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_routes_and_methods() {
        let app = TestApp::new();
        let expected = json!({ "success": false, "error": "Route not found" });

        let (status, body) = app.get("/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, expected);

        let (status, body) = app.request("PATCH", "/api/jobs", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn test_index_and_health() {
        let app = TestApp::new();
        let (status, body) = app.get("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["endpoints"]["getAllJobs"], "GET /api/jobs");

        let (status, body) = app.get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
