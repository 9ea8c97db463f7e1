//! Query construction for job listings.
//!
//! Request filters become a small predicate tree that each store backend
//! interprets: Postgres renders it to SQL with bound parameters, the in-memory
//! store evaluates it directly. Ordering is fixed to newest first.
//!
//! Semantics:
//! - `category`, `type`: exact, case-sensitive match
//! - `location`: case-insensitive substring
//! - `search`: case-insensitive substring on title OR description OR company
//! - clauses are ANDed; no filters matches everything

use serde::Serialize;
use sqlx::{Postgres, QueryBuilder};

use crate::models::job::Job;

/// Filters accepted by `GET /api/jobs`. Empty values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl JobFilter {
    /// Builds a filter from raw query pairs. Unknown keys are ignored and a
    /// repeated key keeps its last value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut filter = JobFilter::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "category" => &mut filter.category,
                "location" => &mut filter.location,
                "type" => &mut filter.job_type,
                "search" => &mut filter.search,
                _ => continue,
            };
            *slot = Some(value);
        }
        filter
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Company,
    Description,
    Location,
    Category,
    JobType,
}

impl Field {
    pub fn column(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Company => "company",
            Field::Description => "description",
            Field::Location => "location",
            Field::Category => "category",
            Field::JobType => "job_type",
        }
    }

    fn value(self, job: &Job) -> &str {
        match self {
            Field::Title => &job.title,
            Field::Company => &job.company,
            Field::Description => &job.description,
            Field::Location => &job.location,
            Field::Category => job.category.as_str(),
            Field::JobType => job.job_type.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Exact, case-sensitive equality.
    Eq(Field, String),
    /// Case-insensitive substring. The needle is literal text, never a pattern.
    Contains(Field, String),
    /// Disjunction; empty matches nothing.
    Any(Vec<Predicate>),
    /// Conjunction; empty means match all.
    All(Vec<Predicate>),
}

impl Predicate {
    pub fn matches(&self, job: &Job) -> bool {
        match self {
            Predicate::Eq(field, value) => field.value(job) == value,
            Predicate::Contains(field, needle) => field
                .value(job)
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Predicate::Any(preds) => preds.iter().any(|p| p.matches(job)),
            Predicate::All(preds) => preds.iter().all(|p| p.matches(job)),
        }
    }

    /// Appends this predicate as a SQL boolean expression, binding every value.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Predicate::Eq(field, value) => {
                qb.push(field.column()).push(" = ").push_bind(value.clone());
            }
            Predicate::Contains(field, needle) => {
                qb.push(field.column())
                    .push(" ILIKE ")
                    .push_bind(like_pattern(needle))
                    .push(" ESCAPE '\\'");
            }
            Predicate::Any(preds) => push_joined(qb, preds, " OR ", "FALSE"),
            Predicate::All(preds) => push_joined(qb, preds, " AND ", "TRUE"),
        }
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, Predicate::All(preds) if preds.is_empty())
    }
}

fn push_joined(
    qb: &mut QueryBuilder<'_, Postgres>,
    preds: &[Predicate],
    sep: &str,
    empty: &str,
) {
    if preds.is_empty() {
        qb.push(empty);
        return;
    }
    qb.push("(");
    for (i, p) in preds.iter().enumerate() {
        if i > 0 {
            qb.push(sep);
        }
        p.push_sql(qb);
    }
    qb.push(")");
}

/// Escapes LIKE metacharacters (`\`, `%`, `_`) so the input matches literally
/// under `ESCAPE '\'`.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn like_pattern(needle: &str) -> String {
    format!("%{}%", escape_like(needle))
}

/// A listing query: a predicate plus the fixed newest-first ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub predicate: Predicate,
}

pub const ORDER_BY_NEWEST: &str = " ORDER BY created_at DESC, id DESC";

impl JobQuery {
    pub fn match_all() -> Self {
        JobQuery {
            predicate: Predicate::All(Vec::new()),
        }
    }

    pub fn from_filter(filter: &JobFilter) -> Self {
        let mut clauses = Vec::new();

        if let Some(category) = present(&filter.category) {
            clauses.push(storable(category, |v| Predicate::Eq(Field::Category, v)));
        }
        if let Some(location) = present(&filter.location) {
            clauses.push(storable(location, |v| Predicate::Contains(Field::Location, v)));
        }
        if let Some(job_type) = present(&filter.job_type) {
            clauses.push(storable(job_type, |v| Predicate::Eq(Field::JobType, v)));
        }
        if let Some(search) = present(&filter.search) {
            clauses.push(storable(search, |v| {
                Predicate::Any(
                    [Field::Title, Field::Description, Field::Company]
                        .into_iter()
                        .map(|f| Predicate::Contains(f, v.clone()))
                        .collect(),
                )
            }));
        }

        if clauses.is_empty() {
            return JobQuery::match_all();
        }
        JobQuery {
            predicate: Predicate::All(clauses),
        }
    }

    /// Listing restricted to one category, taken verbatim from the path.
    pub fn by_category(category: &str) -> Self {
        JobQuery::from_filter(&JobFilter {
            category: Some(category.to_string()),
            ..Default::default()
        })
    }

    pub fn matches(&self, job: &Job) -> bool {
        self.predicate.matches(job)
    }

    /// Appends ` WHERE ... ORDER BY ...` to a `SELECT ... FROM jobs` builder.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if !self.predicate.is_match_all() {
            qb.push(" WHERE ");
            self.predicate.push_sql(qb);
        }
        qb.push(ORDER_BY_NEWEST);
    }

    /// Filters and orders an in-memory collection the same way the SQL does.
    pub fn apply<'a, I>(&self, jobs: I) -> Vec<Job>
    where
        I: IntoIterator<Item = &'a Job>,
    {
        let mut out: Vec<Job> = jobs.into_iter().filter(|j| self.matches(j)).cloned().collect();
        sort_newest_first(&mut out);
        out
    }
}

pub fn sort_newest_first(jobs: &mut [Job]) {
    jobs.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Stored text never contains NUL and Postgres refuses it as a parameter, so
/// such a value becomes a clause that matches nothing.
fn storable(value: &str, clause: impl FnOnce(String) -> Predicate) -> Predicate {
    if value.contains('\0') {
        Predicate::Any(Vec::new())
    } else {
        clause(value.to_string())
    }
}
