use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};
use uuid::Uuid;

use crate::jobs::query::JobQuery;
use crate::jobs::store::{JobStore, StoreError};
use crate::jobs::validation::{JobChanges, NewJob};
use crate::models::job::{Job, JobRow};

/// Postgres-backed store over the `jobs` table.
#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        PgJobStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn to_job(row: JobRow) -> Result<Job, StoreError> {
    Job::try_from(row).map_err(StoreError::Corrupt)
}

fn to_jobs(rows: Vec<JobRow>) -> Result<Vec<Job>, StoreError> {
    rows.into_iter().map(to_job).collect()
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn find(&self, query: &JobQuery) -> Result<Vec<Job>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM jobs");
        query.push_sql(&mut qb);
        debug!("Job query: {}", qb.sql());

        let rows = qb.build_query_as::<JobRow>().fetch_all(&self.pool).await?;
        to_jobs(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(to_job)
            .transpose()
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        sqlx::query_as::<_, JobRow>(
            "UPDATE jobs SET views = views + 1, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(to_job)
        .transpose()
    }

    async fn insert(&self, job: NewJob) -> Result<Job, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now();

        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (id, title, company, description, requirements, location, salary,
                 job_type, category, status, posted_by, applications, views,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 0, $13, $13)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.location)
        .bind(&job.salary)
        .bind(job.job_type.as_str())
        .bind(job.category.as_str())
        .bind(job.status.as_str())
        .bind(&job.posted_by)
        .bind(job.applications)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted job {id}");
        to_job(row)
    }

    async fn update(&self, id: Uuid, changes: &JobChanges) -> Result<Option<Job>, StoreError> {
        sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET
                title        = COALESCE($2, title),
                company      = COALESCE($3, company),
                description  = COALESCE($4, description),
                requirements = COALESCE($5, requirements),
                location     = COALESCE($6, location),
                salary       = COALESCE($7, salary),
                job_type     = COALESCE($8, job_type),
                category     = COALESCE($9, category),
                status       = COALESCE($10, status),
                posted_by    = COALESCE($11, posted_by),
                applications = COALESCE($12, applications),
                updated_at   = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.company)
        .bind(&changes.description)
        .bind(&changes.requirements)
        .bind(&changes.location)
        .bind(&changes.salary)
        .bind(changes.job_type.map(|t| t.as_str()))
        .bind(changes.category.map(|c| c.as_str()))
        .bind(changes.status.map(|s| s.as_str()))
        .bind(&changes.posted_by)
        .bind(changes.applications)
        .fetch_optional(&self.pool)
        .await?
        .map(to_job)
        .transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await?;
        Ok(n as u64)
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM jobs").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
