use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::jobs::query::JobQuery;
use crate::jobs::validation::{JobChanges, NewJob};
use crate::models::job::Job;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// A stored row could not be turned back into a `Job`.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Persistence for job postings.
///
/// Carried in `AppState` as `Arc<dyn JobStore>`. Every method is a single
/// round trip; `increment_views` and `update` must be atomic per record.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Runs a listing query, newest first.
    async fn find(&self, query: &JobQuery) -> Result<Vec<Job>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, StoreError>;

    /// Adds one to `views` and returns the updated record, or `None` if absent.
    async fn increment_views(&self, id: Uuid) -> Result<Option<Job>, StoreError>;

    /// Assigns id and timestamps (`created_at == updated_at`) and stores the job.
    async fn insert(&self, job: NewJob) -> Result<Job, StoreError>;

    /// Writes only the fields present in `changes`.
    async fn update(&self, id: Uuid, changes: &JobChanges) -> Result<Option<Job>, StoreError>;

    /// Hard delete. Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    /// Removes every job. Used by the seeder.
    async fn clear(&self) -> Result<u64, StoreError>;
}
