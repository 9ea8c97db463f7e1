//! HTTP client for the Jobs API.
//!
//! Maps each call to one request and unwraps the response envelope: `data` on
//! success, `ClientError::Api` carrying the envelope's `error` otherwise.
//! The server binary never calls it, so its items carry `allow(dead_code)`.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::jobs::query::JobFilter;
use crate::models::job::{Category, Job};

#[allow(dead_code)]
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with `success: false`.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("unexpected response ({status}): {body}")]
    Malformed { status: StatusCode, body: String },
}

/// Either envelope shape, read leniently.
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct RawEnvelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct JobsClient {
    http: reqwest::Client,
    base_url: String,
}

#[allow(dead_code)]
impl JobsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        JobsClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let envelope: RawEnvelope<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) => return Err(ClientError::Malformed { status, body: text }),
        };
        match envelope {
            RawEnvelope {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            RawEnvelope { success: false, error, .. } => Err(ClientError::Api {
                status,
                message: error.unwrap_or_else(|| status.to_string()),
            }),
            RawEnvelope { data: None, .. } => Err(ClientError::Malformed { status, body: text }),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T, ClientError> {
        self.send(self.http.request(method, self.url(path))).await
    }

    async fn call_with_body<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.http.request(method, self.url(path)).json(body))
            .await
    }

    /// Lists jobs; empty filter fields are left out of the query string.
    pub async fn get_all_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, ClientError> {
        self.send(self.http.get(self.url("/jobs")).query(filter))
            .await
    }

    pub async fn get_job_by_id(&self, id: Uuid) -> Result<Job, ClientError> {
        self.call(Method::GET, &format!("/jobs/{id}")).await
    }

    /// `job` is any JSON-serializable object with the job fields.
    pub async fn create_job<B: Serialize + ?Sized>(&self, job: &B) -> Result<Job, ClientError> {
        self.call_with_body(Method::POST, "/jobs", job).await
    }

    pub async fn update_job<B: Serialize + ?Sized>(
        &self,
        id: Uuid,
        changes: &B,
    ) -> Result<Job, ClientError> {
        self.call_with_body(Method::PUT, &format!("/jobs/{id}"), changes)
            .await
    }

    pub async fn delete_job(&self, id: Uuid) -> Result<(), ClientError> {
        let _: serde_json::Value = self.call(Method::DELETE, &format!("/jobs/{id}")).await?;
        Ok(())
    }

    pub async fn get_jobs_by_category(&self, category: Category) -> Result<Vec<Job>, ClientError> {
        self.call(Method::GET, &format!("/jobs/category/{category}"))
            .await
    }
}
