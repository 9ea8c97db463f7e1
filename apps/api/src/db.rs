use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id           UUID PRIMARY KEY,
        title        TEXT NOT NULL CHECK (char_length(title) BETWEEN 1 AND 100),
        company      TEXT NOT NULL,
        description  TEXT NOT NULL CHECK (char_length(description) BETWEEN 1 AND 2000),
        requirements TEXT[] NOT NULL DEFAULT '{}',
        location     TEXT NOT NULL,
        salary       TEXT NOT NULL DEFAULT 'Competitive',
        job_type     TEXT NOT NULL DEFAULT 'Full-time'
                     CHECK (job_type IN ('Full-time', 'Part-time', 'Contract', 'Internship', 'Freelance')),
        category     TEXT NOT NULL
                     CHECK (category IN ('it-software', 'engineering', 'design', 'marketing', 'sales', 'finance')),
        status       TEXT NOT NULL DEFAULT 'active'
                     CHECK (status IN ('active', 'closed', 'pending')),
        posted_by    TEXT NOT NULL DEFAULT 'Anonymous',
        applications BIGINT NOT NULL DEFAULT 0 CHECK (applications >= 0),
        views        BIGINT NOT NULL DEFAULT 0 CHECK (views >= 0),
        created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at   TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS jobs_category_idx ON jobs (category)",
    "CREATE INDEX IF NOT EXISTS jobs_location_idx ON jobs (location)",
    "CREATE INDEX IF NOT EXISTS jobs_created_at_idx ON jobs (created_at DESC, id DESC)",
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to PostgreSQL")?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the `jobs` table and its indexes if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("failed to create jobs schema")?;
    }
    info!("Jobs schema ready");
    Ok(())
}
