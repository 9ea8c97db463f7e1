use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;
pub const DEFAULT_SALARY: &str = "Competitive";
pub const DEFAULT_POSTED_BY: &str = "Anonymous";

/// Returned by the enum parsers; carries the rejected input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(UnknownVariant(other.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum!(
    /// Employment type of a posting.
    #[derive(Default)]
    JobType {
        #[default]
        FullTime => "Full-time",
        PartTime => "Part-time",
        Contract => "Contract",
        Internship => "Internship",
        Freelance => "Freelance",
    }
);

wire_enum!(
    Category {
        ItSoftware => "it-software",
        Engineering => "engineering",
        Design => "design",
        Marketing => "marketing",
        Sales => "sales",
        Finance => "finance",
    }
);

wire_enum!(
    #[derive(Default)]
    JobStatus {
        #[default]
        Active => "active",
        Closed => "closed",
        Pending => "pending",
    }
);

/// A job posting as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub location: String,
    pub salary: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub category: Category,
    pub status: JobStatus,
    pub posted_by: String,
    pub applications: i64,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw `jobs` row. Enum columns are plain text and are checked on the way out.
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub location: String,
    pub salary: String,
    pub job_type: String,
    pub category: String,
    pub status: String,
    pub posted_by: String,
    pub applications: i64,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = String;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let bad = |column: &str, UnknownVariant(value): UnknownVariant| {
            format!("job {} has invalid {column} '{value}'", row.id)
        };
        Ok(Job {
            job_type: row.job_type.parse().map_err(|e| bad("job_type", e))?,
            category: row.category.parse().map_err(|e| bad("category", e))?,
            status: row.status.parse().map_err(|e| bad("status", e))?,
            id: row.id,
            title: row.title,
            company: row.company,
            description: row.description,
            requirements: row.requirements,
            location: row.location,
            salary: row.salary,
            posted_by: row.posted_by,
            applications: row.applications,
            views: row.views,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
