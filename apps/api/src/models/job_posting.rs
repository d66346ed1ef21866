#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Experience level excluded from every salary aggregate.
pub const LEADERSHIP_LEVEL: &str = "Leadership";

/// A scraped job posting. Owned by the ingestion pipeline; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPosting {
    pub id: Uuid,
    pub specialty: String,
    pub city: Option<String>,
    /// Normalized 2-letter state code.
    pub state: Option<String>,
    pub job_type: Option<String>,
    pub shift_type: Option<String>,
    pub experience_level: Option<String>,
    pub salary_min_annual: Option<f64>,
    pub salary_max_annual: Option<f64>,
    pub salary_min_hourly: Option<f64>,
    pub salary_max_hourly: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl JobPosting {
    /// Active, carries both annual bounds, and is not a leadership role.
    pub fn is_eligible(&self) -> bool {
        self.is_active
            && self.salary_min_annual.is_some()
            && self.salary_max_annual.is_some()
            && self.experience_level.as_deref() != Some(LEADERSHIP_LEVEL)
    }
}
