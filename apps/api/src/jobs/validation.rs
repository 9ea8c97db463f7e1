//! Field-level validation for job payloads.
//!
//! Create and update share one payload shape with every field optional;
//! required-ness is enforced here so that a missing field produces a readable
//! field message instead of a deserializer error.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::models::job::{
    Category, Job, JobStatus, JobType, UnknownVariant, DEFAULT_POSTED_BY, DEFAULT_SALARY,
    DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS,
};

/// Body accepted by `POST /api/jobs` and `PUT /api/jobs/:id`.
/// Unknown keys (`id`, `views`, timestamps) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub location: Option<String>,
    pub salary: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub posted_by: Option<String>,
    pub applications: Option<i64>,
}

/// A fully validated record ready for insertion. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub location: String,
    pub salary: String,
    pub job_type: JobType,
    pub category: Category,
    pub status: JobStatus,
    pub posted_by: String,
    pub applications: i64,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobChanges {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<JobType>,
    pub category: Option<Category>,
    pub status: Option<JobStatus>,
    pub posted_by: Option<String>,
    pub applications: Option<i64>,
}

impl JobChanges {
    /// Returns `job` with every present change applied.
    pub fn apply_to(&self, job: &Job) -> Job {
        let mut merged = job.clone();
        if let Some(v) = &self.title {
            merged.title = v.clone();
        }
        if let Some(v) = &self.company {
            merged.company = v.clone();
        }
        if let Some(v) = &self.description {
            merged.description = v.clone();
        }
        if let Some(v) = &self.requirements {
            merged.requirements = v.clone();
        }
        if let Some(v) = &self.location {
            merged.location = v.clone();
        }
        if let Some(v) = &self.salary {
            merged.salary = v.clone();
        }
        if let Some(v) = self.job_type {
            merged.job_type = v;
        }
        if let Some(v) = self.category {
            merged.category = v;
        }
        if let Some(v) = self.status {
            merged.status = v;
        }
        if let Some(v) = &self.posted_by {
            merged.posted_by = v.clone();
        }
        if let Some(v) = self.applications {
            merged.applications = v;
        }
        merged
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field that failed validation, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[cfg(test)]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Job validation failed: ")?;
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

struct TextRule {
    field: &'static str,
    required: &'static str,
    trim: bool,
    max_chars: Option<(usize, &'static str)>,
}

const TITLE: TextRule = TextRule {
    field: "title",
    required: "Job title is required",
    trim: true,
    max_chars: Some((TITLE_MAX_CHARS, "Title cannot exceed 100 characters")),
};

const COMPANY: TextRule = TextRule {
    field: "company",
    required: "Company name is required",
    trim: true,
    max_chars: None,
};

const DESCRIPTION: TextRule = TextRule {
    field: "description",
    required: "Job description is required",
    trim: false,
    max_chars: Some((
        DESCRIPTION_MAX_CHARS,
        "Description cannot exceed 2000 characters",
    )),
};

const LOCATION: TextRule = TextRule {
    field: "location",
    required: "Location is required",
    trim: false,
    max_chars: None,
};

impl TextRule {
    /// Checks a value that is present. Empty counts as missing; for trimmed
    /// fields that includes whitespace-only input.
    fn check(&self, value: &str, errors: &mut ValidationErrors) -> Option<String> {
        let value = if self.trim { value.trim() } else { value };
        if value.is_empty() {
            errors.push(self.field, self.required);
            return None;
        }
        if !check_nul(self.field, value, errors) {
            return None;
        }
        if let Some((max, message)) = self.max_chars {
            if value.chars().count() > max {
                errors.push(self.field, message);
                return None;
            }
        }
        Some(value.to_string())
    }

    fn require(&self, value: Option<&str>, errors: &mut ValidationErrors) -> Option<String> {
        match value {
            Some(v) => self.check(v, errors),
            None => {
                errors.push(self.field, self.required);
                None
            }
        }
    }
}

/// Postgres text cannot hold NUL, so neither can any stored field.
fn check_nul(field: &'static str, value: &str, errors: &mut ValidationErrors) -> bool {
    if value.contains('\0') {
        errors.push(field, format!("{field} cannot contain NUL characters"));
        false
    } else {
        true
    }
}

/// Free-text fields with no other rule.
fn check_free_text(payload: &JobPayload, errors: &mut ValidationErrors) {
    if let Some(requirements) = &payload.requirements {
        if let Some(bad) = requirements.iter().find(|r| r.contains('\0')) {
            check_nul("requirements", bad, errors);
        }
    }
    if let Some(salary) = &payload.salary {
        check_nul("salary", salary, errors);
    }
    if let Some(posted_by) = &payload.posted_by {
        check_nul("postedBy", posted_by, errors);
    }
}

fn parse_enum<T: FromStr<Err = UnknownVariant>>(
    field: &'static str,
    value: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    match value.parse() {
        Ok(v) => Some(v),
        Err(UnknownVariant(raw)) => {
            errors.push(
                field,
                format!("`{raw}` is not a valid enum value for path `{field}`"),
            );
            None
        }
    }
}

fn check_counter(field: &'static str, value: i64, errors: &mut ValidationErrors) -> Option<i64> {
    if value < 0 {
        errors.push(field, format!("{field} cannot be negative"));
        None
    } else {
        Some(value)
    }
}

/// Validates a create payload and fills in defaults.
pub fn validate_new(payload: JobPayload) -> Result<NewJob, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_free_text(&payload, &mut errors);

    let title = TITLE.require(payload.title.as_deref(), &mut errors);
    let company = COMPANY.require(payload.company.as_deref(), &mut errors);
    let description = DESCRIPTION.require(payload.description.as_deref(), &mut errors);
    let location = LOCATION.require(payload.location.as_deref(), &mut errors);
    let job_type = match payload.job_type.as_deref() {
        Some(v) => parse_enum("type", v, &mut errors),
        None => Some(JobType::default()),
    };
    let category = match payload.category.as_deref() {
        Some(v) => parse_enum("category", v, &mut errors),
        None => {
            errors.push("category", "Category is required");
            None
        }
    };
    let status = match payload.status.as_deref() {
        Some(v) => parse_enum("status", v, &mut errors),
        None => Some(JobStatus::default()),
    };
    let applications = check_counter(
        "applications",
        payload.applications.unwrap_or(0),
        &mut errors,
    );

    match (
        title,
        company,
        description,
        location,
        job_type,
        category,
        status,
        applications,
    ) {
        (
            Some(title),
            Some(company),
            Some(description),
            Some(location),
            Some(job_type),
            Some(category),
            Some(status),
            Some(applications),
        ) if errors.is_empty() => Ok(NewJob {
            title,
            company,
            description,
            requirements: payload.requirements.unwrap_or_default(),
            location,
            salary: payload
                .salary
                .unwrap_or_else(|| DEFAULT_SALARY.to_string()),
            job_type,
            category,
            status,
            posted_by: payload
                .posted_by
                .unwrap_or_else(|| DEFAULT_POSTED_BY.to_string()),
            applications,
        }),
        _ => Err(errors),
    }
}

/// Validates only the fields present in an update payload.
pub fn validate_changes(payload: JobPayload) -> Result<JobChanges, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_free_text(&payload, &mut errors);

    let changes = JobChanges {
        title: payload
            .title
            .as_deref()
            .and_then(|v| TITLE.check(v, &mut errors)),
        company: payload
            .company
            .as_deref()
            .and_then(|v| COMPANY.check(v, &mut errors)),
        description: payload
            .description
            .as_deref()
            .and_then(|v| DESCRIPTION.check(v, &mut errors)),
        requirements: payload.requirements,
        location: payload
            .location
            .as_deref()
            .and_then(|v| LOCATION.check(v, &mut errors)),
        salary: payload.salary,
        job_type: payload
            .job_type
            .as_deref()
            .and_then(|v| parse_enum("type", v, &mut errors)),
        category: payload
            .category
            .as_deref()
            .and_then(|v| parse_enum("category", v, &mut errors)),
        status: payload
            .status
            .as_deref()
            .and_then(|v| parse_enum("status", v, &mut errors)),
        posted_by: payload.posted_by,
        applications: payload
            .applications
            .and_then(|v| check_counter("applications", v, &mut errors)),
    };

    errors.into_result(changes)
}

/// Re-checks a complete record, e.g. the result of merging changes into a stored job.
pub fn validate_record(job: &Job) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    TITLE.check(&job.title, &mut errors);
    COMPANY.check(&job.company, &mut errors);
    DESCRIPTION.check(&job.description, &mut errors);
    LOCATION.check(&job.location, &mut errors);
    check_counter("applications", job.applications, &mut errors);
    check_counter("views", job.views, &mut errors);
    errors.into_result(())
}
