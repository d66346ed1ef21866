//! Job-postings query interface — the only collaborator the salary core reads from.
//!
//! Every implementation applies the eligibility rule itself (active, both annual
//! bounds present, not a leadership posting). Callers only add scope and filters.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::errors::AppError;
use crate::models::job_posting::LEADERSHIP_LEVEL;

/// Predicates for one aggregate query. `None` leaves a column unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingFilter {
    /// Compared case-insensitively.
    pub specialty: String,
    /// Compared case-insensitively.
    pub city: Option<String>,
    /// Compared exactly; expected to be an upper-case code.
    pub state: Option<String>,
    pub job_type: Option<String>,
    pub shift_type: Option<String>,
}

/// Count and unweighted means over the eligible postings matching a filter.
/// Means are `None` when no matching posting carries that column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SalaryAggregate {
    pub sample_count: i64,
    pub avg_min_annual: Option<f64>,
    pub avg_max_annual: Option<f64>,
    pub avg_min_hourly: Option<f64>,
    pub avg_max_hourly: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SpecialtyCount {
    pub specialty: String,
    pub sample_count: i64,
}

/// Read-only aggregate access to job postings.
///
/// Carried in `AppState` as `Arc<dyn JobPostingStore>`.
#[async_trait]
pub trait JobPostingStore: Send + Sync {
    async fn aggregate(&self, filter: &PostingFilter) -> Result<SalaryAggregate, AppError>;

    /// Specialties with at least one eligible posting, most data first.
    async fn specialties(&self) -> Result<Vec<SpecialtyCount>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres adapter
// ────────────────────────────────────────────────────────────────────────────

pub struct PgPostingStore {
    pool: PgPool,
}

impl PgPostingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_eligibility(qb: &mut QueryBuilder<'_, Postgres>) {
    qb.push(
        " WHERE is_active = TRUE \
         AND salary_min_annual IS NOT NULL \
         AND salary_max_annual IS NOT NULL \
         AND experience_level IS DISTINCT FROM ",
    );
    qb.push_bind(LEADERSHIP_LEVEL);
}

fn push_ci_eq(qb: &mut QueryBuilder<'_, Postgres>, column: &str, value: &str) {
    qb.push(format!(" AND LOWER({column}) = LOWER("));
    qb.push_bind(value.to_string());
    qb.push(")");
}

#[async_trait]
impl JobPostingStore for PgPostingStore {
    async fn aggregate(&self, filter: &PostingFilter) -> Result<SalaryAggregate, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT COUNT(*) AS sample_count,
                   AVG(salary_min_annual)::FLOAT8 AS avg_min_annual,
                   AVG(salary_max_annual)::FLOAT8 AS avg_max_annual,
                   AVG(salary_min_hourly)::FLOAT8 AS avg_min_hourly,
                   AVG(salary_max_hourly)::FLOAT8 AS avg_max_hourly
            FROM job_postings
            "#,
        );
        push_eligibility(&mut qb);
        push_ci_eq(&mut qb, "specialty", &filter.specialty);

        if let Some(city) = &filter.city {
            push_ci_eq(&mut qb, "city", city);
        }
        if let Some(state) = &filter.state {
            qb.push(" AND state = ");
            qb.push_bind(state.clone());
        }
        if let Some(job_type) = &filter.job_type {
            push_ci_eq(&mut qb, "job_type", job_type);
        }
        if let Some(shift_type) = &filter.shift_type {
            push_ci_eq(&mut qb, "shift_type", shift_type);
        }

        let aggregate = qb
            .build_query_as::<SalaryAggregate>()
            .fetch_one(&self.pool)
            .await?;
        Ok(aggregate)
    }

    async fn specialties(&self) -> Result<Vec<SpecialtyCount>, AppError> {
        // Specialty matching is case-insensitive, so casing variants share one row.
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT MIN(specialty) AS specialty, COUNT(*) AS sample_count FROM job_postings",
        );
        push_eligibility(&mut qb);
        qb.push(" GROUP BY LOWER(specialty) ORDER BY sample_count DESC, specialty ASC");

        Ok(qb
            .build_query_as::<SpecialtyCount>()
            .fetch_all(&self.pool)
            .await?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store (tests)
// ────────────────────────────────────────────────────────────────────────────
