use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::jobs::query::JobQuery;
use crate::jobs::store::{JobStore, StoreError};
use crate::jobs::validation::{JobChanges, NewJob};
use crate::models::job::Job;

/// Process-local store for development (`STORE_BACKEND=memory`) and tests.
/// Writes take the lock once, so per-record updates are atomic.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<Vec<Job>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn find(&self, query: &JobQuery) -> Result<Vec<Job>, StoreError> {
        let jobs = self.jobs.read().await;
        Ok(query.apply(jobs.iter()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let jobs = self.jobs.read().await;
        Ok(jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let mut jobs = self.jobs.write().await;
        Ok(jobs.iter_mut().find(|j| j.id == id).map(|job| {
            job.views += 1;
            job.updated_at = Utc::now();
            job.clone()
        }))
    }

    async fn insert(&self, new: NewJob) -> Result<Job, StoreError> {
        let now = Utc::now();
        let job = Job {
            id: Uuid::now_v7(),
            title: new.title,
            company: new.company,
            description: new.description,
            requirements: new.requirements,
            location: new.location,
            salary: new.salary,
            job_type: new.job_type,
            category: new.category,
            status: new.status,
            posted_by: new.posted_by,
            applications: new.applications,
            views: 0,
            created_at: now,
            updated_at: now,
        };
        self.jobs.write().await.push(job.clone());
        Ok(job)
    }

    async fn update(&self, id: Uuid, changes: &JobChanges) -> Result<Option<Job>, StoreError> {
        let mut jobs = self.jobs.write().await;
        Ok(jobs.iter_mut().find(|j| j.id == id).map(|job| {
            *job = changes.apply_to(job);
            job.updated_at = Utc::now();
            job.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|j| j.id != id);
        Ok(jobs.len() < before)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.jobs.read().await.len() as u64)
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let mut jobs = self.jobs.write().await;
        let removed = jobs.len() as u64;
        jobs.clear();
        Ok(removed)
    }
}
