//! Sample data loader, run with `huntersite seed`.
//!
//! Replaces every stored job with the postings below. They go through the same
//! validation as API-created jobs.

use anyhow::{Context, Result};
use tracing::info;

use crate::jobs::store::JobStore;
use crate::jobs::validation::{validate_new, JobPayload};

fn posting(
    title: &str,
    company: &str,
    location: &str,
    salary: &str,
    category: &str,
    description: &str,
) -> JobPayload {
    JobPayload {
        title: Some(title.to_string()),
        company: Some(company.to_string()),
        location: Some(location.to_string()),
        salary: Some(salary.to_string()),
        job_type: Some("Full-time".to_string()),
        category: Some(category.to_string()),
        description: Some(description.to_string()),
        ..Default::default()
    }
}

pub fn sample_jobs() -> Vec<JobPayload> {
    vec![
        posting(
            "Senior Full Stack Developer",
            "LeapFroggr Inc.",
            "Manila, Philippines",
            "80000",
            "it-software",
            "We are looking for a Senior Full Stack Developer to join our growing team. \
             You will work on high-impact projects.",
        ),
        posting(
            "Solutions Engineer",
            "AboitizPower",
            "Makati, Philippines",
            "60000",
            "engineering",
            "Responsible for providing technical solutions and support to our enterprise clients.",
        ),
    ]
}

/// Clears the store and inserts the sample postings. Returns how many were added.
pub async fn run(store: &dyn JobStore) -> Result<usize> {
    let removed = store.clear().await.context("failed to clear jobs")?;
    info!("Cleared {removed} existing jobs");

    let mut inserted = 0;
    for payload in sample_jobs() {
        let job = validate_new(payload).context("sample job failed validation")?;
        let job = store.insert(job).await.context("failed to insert sample job")?;
        info!("Seeded job {} ({})", job.id, job.title);
        inserted += 1;
    }
    Ok(inserted)
}
