//! Estimation Orchestrator — validates a request, runs the pipeline, assembles the estimate.
//!
//! parse location → aggregate (cascade) → adjust for experience, with the
//! comparison baselines computed concurrently from specialty + parsed state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::salary::aggregator::{AggregationResult, FiltersApplied, SalaryAggregator};
use crate::salary::comparison::{ComparisonCalculator, Comparisons};
use crate::salary::experience::adjust;
use crate::salary::location::{parse_location, LocationFilter};
use crate::salary::store::JobPostingStore;

/// Sentinel accepted for optional filters, equivalent to leaving them out.
const ANY_FILTER: &str = "any";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Raw estimate request as received from a client. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstimateRequest {
    pub specialty: Option<String>,
    pub location: Option<String>,
    pub years_experience: Option<YearsExperience>,
    pub job_type: Option<String>,
    pub shift_type: Option<String>,
}

/// Years of experience as sent: a JSON number, or text from a query string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum YearsExperience {
    Whole(i64),
    Fractional(f64),
    Text(String),
}

impl From<i64> for YearsExperience {
    fn from(years: i64) -> Self {
        YearsExperience::Whole(years)
    }
}

impl YearsExperience {
    /// `None` for blank text, which counts as a missing field.
    fn parse(self) -> Option<Result<i64, AppError>> {
        let invalid = |raw: &str| {
            AppError::Validation(format!(
                "years_experience must be a whole number, got {raw:?}"
            ))
        };
        match self {
            YearsExperience::Whole(years) => Some(Ok(years)),
            YearsExperience::Fractional(years) if years.fract() == 0.0 => Some(Ok(years as i64)),
            YearsExperience::Fractional(years) => Some(Err(invalid(&years.to_string()))),
            YearsExperience::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.parse::<i64>().map_err(|_| invalid(trimmed)))
                }
            }
        }
    }
}

/// A validated estimate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryQuery {
    pub specialty: String,
    pub location: String,
    pub years_experience: u32,
    /// `None` when absent or `"any"`.
    pub job_type: Option<String>,
    /// `None` when absent or `"any"`.
    pub shift_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange<T> {
    pub min: T,
    pub max: T,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedFilters {
    pub job_type: Option<String>,
    pub shift_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateMetadata {
    pub specialty: String,
    pub location: String,
    pub parsed_location: LocationFilter,
    pub years_experience: u32,
    pub sample_count: i64,
    pub experience_multiplier: f64,
    pub fallback_to_state: bool,
    pub filters_applied: FiltersApplied,
    pub requested_filters: RequestedFilters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryEstimate {
    pub annual: SalaryRange<i64>,
    pub hourly: SalaryRange<f64>,
    pub comparisons: Comparisons,
    pub metadata: EstimateMetadata,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_filter(value: Option<String>) -> Option<String> {
    present(value).filter(|v| !v.eq_ignore_ascii_case(ANY_FILTER))
}

impl EstimateRequest {
    /// Reports every missing field at once. Blank strings count as missing.
    pub fn validate(self) -> Result<SalaryQuery, AppError> {
        let specialty = present(self.specialty);
        let location = present(self.location);
        let years = self.years_experience.and_then(YearsExperience::parse);

        let mut missing = Vec::new();
        if specialty.is_none() {
            missing.push("specialty".to_string());
        }
        if location.is_none() {
            missing.push("location".to_string());
        }
        if years.is_none() {
            missing.push("years_experience".to_string());
        }

        let (Some(specialty), Some(location), Some(years)) = (specialty, location, years) else {
            return Err(AppError::MissingFields(missing));
        };

        let years = years?;
        if years < 0 {
            return Err(AppError::Validation(
                "years_experience must be zero or greater".to_string(),
            ));
        }

        Ok(SalaryQuery {
            specialty,
            location,
            // Past the top experience bucket every value is equivalent.
            years_experience: u32::try_from(years).unwrap_or(u32::MAX),
            job_type: normalize_filter(self.job_type),
            shift_type: normalize_filter(self.shift_type),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

pub struct SalaryEstimator {
    aggregator: SalaryAggregator,
    comparisons: ComparisonCalculator,
}

impl SalaryEstimator {
    pub fn new(store: Arc<dyn JobPostingStore>) -> Self {
        Self {
            aggregator: SalaryAggregator::new(store.clone()),
            comparisons: ComparisonCalculator::new(store),
        }
    }

    pub async fn estimate(&self, request: EstimateRequest) -> Result<SalaryEstimate, AppError> {
        let query = request.validate()?;
        self.estimate_query(&query).await
    }

    pub async fn estimate_query(&self, query: &SalaryQuery) -> Result<SalaryEstimate, AppError> {
        let location = parse_location(&query.location);

        let aggregation = async {
            let aggregation = self
                .aggregator
                .aggregate(
                    &query.specialty,
                    &location,
                    query.job_type.as_deref(),
                    query.shift_type.as_deref(),
                )
                .await?;
            if aggregation.sample_count == 0 {
                return Err(AppError::InsufficientData {
                    specialty: query.specialty.clone(),
                    location: query.location.clone(),
                });
            }
            Ok::<AggregationResult, AppError>(aggregation)
        };
        let comparisons = self
            .comparisons
            .compare(&query.specialty, location.state.as_deref());

        let (aggregation, comparisons) = tokio::try_join!(aggregation, comparisons)?;
        let adjusted = adjust(&aggregation, query.years_experience);

        info!(
            "Estimated {} in {:?}: {}-{} ({} samples, multiplier {})",
            query.specialty,
            query.location,
            adjusted.min_annual,
            adjusted.max_annual,
            aggregation.sample_count,
            adjusted.multiplier
        );

        Ok(SalaryEstimate {
            annual: SalaryRange {
                min: adjusted.min_annual,
                max: adjusted.max_annual,
            },
            hourly: SalaryRange {
                min: adjusted.min_hourly,
                max: adjusted.max_hourly,
            },
            comparisons: comparisons.into(),
            metadata: EstimateMetadata {
                specialty: query.specialty.clone(),
                location: query.location.clone(),
                parsed_location: location,
                years_experience: query.years_experience,
                sample_count: aggregation.sample_count,
                experience_multiplier: adjusted.multiplier,
                fallback_to_state: aggregation.fallback_to_state,
                filters_applied: aggregation.filters_applied,
                requested_filters: RequestedFilters {
                    job_type: query.job_type.clone(),
                    shift_type: query.shift_type.clone(),
                },
            },
        })
    }
}
