//! Base Salary Aggregator — tiered fallback over the postings store.
//!
//! The cascade is an explicit ladder of tiers (location scope + active filters),
//! evaluated in order. The first tier reaching `MIN_SAMPLE_SIZE` wins; if none
//! does, the last tier evaluated is returned as-is, possibly with zero samples.
//!
//! | Tier | Scope                | Filters                     | Present when              |
//! |------|----------------------|-----------------------------|---------------------------|
//! | 0    | parsed city/state    | job + shift as requested    | always                    |
//! | 1    | parsed city/state    | job only                    | shift requested           |
//! | 2    | parsed city/state    | none                        | job requested             |
//! | 3    | state only           | job + shift as requested    | city, any filter          |
//! | 4    | state only           | none                        | city                      |
//!
//! A city with no parsed state falls back to an unconstrained (national) scope.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::salary::location::LocationFilter;
use crate::salary::store::{JobPostingStore, PostingFilter};

/// Minimum eligible postings before an averaged figure is trusted.
pub const MIN_SAMPLE_SIZE: i64 = 3;

/// Which optional filters contributed to a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiltersApplied {
    pub job_type: bool,
    pub shift_type: bool,
}

/// Averages from the winning (or last) tier.
///
/// Annual means are `0.0` only when `sample_count == 0`; eligible postings
/// always carry both annual bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub avg_min_annual: f64,
    pub avg_max_annual: f64,
    pub avg_min_hourly: Option<f64>,
    pub avg_max_hourly: Option<f64>,
    pub sample_count: i64,
    pub fallback_to_state: bool,
    pub filters_applied: FiltersApplied,
}

/// One rung of the fallback ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    pub level: u8,
    pub scope: LocationFilter,
    pub job_type: Option<String>,
    pub shift_type: Option<String>,
    pub fallback_to_state: bool,
}

impl Tier {
    fn filters_applied(&self) -> FiltersApplied {
        FiltersApplied {
            job_type: self.job_type.is_some(),
            shift_type: self.shift_type.is_some(),
        }
    }

    fn posting_filter(&self, specialty: &str) -> PostingFilter {
        PostingFilter {
            specialty: specialty.to_string(),
            city: self.scope.city.clone(),
            state: self.scope.state.clone(),
            job_type: self.job_type.clone(),
            shift_type: self.shift_type.clone(),
        }
    }
}

/// Builds the ordered ladder for a query. Never empty.
pub fn plan_tiers(
    location: &LocationFilter,
    job_type: Option<&str>,
    shift_type: Option<&str>,
) -> Vec<Tier> {
    let job = job_type.map(str::to_string);
    let shift = shift_type.map(str::to_string);
    let tier = |level, scope: &LocationFilter, job: &Option<String>, shift: &Option<String>| Tier {
        level,
        scope: scope.clone(),
        job_type: job.clone(),
        shift_type: shift.clone(),
        fallback_to_state: level >= 3,
    };

    let mut tiers = vec![tier(0, location, &job, &shift)];
    if shift.is_some() {
        tiers.push(tier(1, location, &job, &None));
    }
    if job.is_some() {
        tiers.push(tier(2, location, &None, &None));
    }

    if location.city.is_some() {
        let state_scope = location.state_only();
        // Identical to tier 4 when nothing was requested.
        if job.is_some() || shift.is_some() {
            tiers.push(tier(3, &state_scope, &job, &shift));
        }
        tiers.push(tier(4, &state_scope, &None, &None));
    }

    tiers
}

pub struct SalaryAggregator {
    store: Arc<dyn JobPostingStore>,
}

impl SalaryAggregator {
    pub fn new(store: Arc<dyn JobPostingStore>) -> Self {
        Self { store }
    }

    /// Runs the cascade. Zero samples is reported in the result, never as an error.
    pub async fn aggregate(
        &self,
        specialty: &str,
        location: &LocationFilter,
        job_type: Option<&str>,
        shift_type: Option<&str>,
    ) -> Result<AggregationResult, AppError> {
        let mut last = AggregationResult::default();

        for tier in plan_tiers(location, job_type, shift_type) {
            let aggregate = self
                .store
                .aggregate(&tier.posting_filter(specialty))
                .await?;
            debug!(
                "Salary tier {} scope={:?} job_type={:?} shift_type={:?}: {} samples",
                tier.level, tier.scope, tier.job_type, tier.shift_type, aggregate.sample_count
            );

            last = AggregationResult {
                avg_min_annual: aggregate.avg_min_annual.unwrap_or(0.0),
                avg_max_annual: aggregate.avg_max_annual.unwrap_or(0.0),
                avg_min_hourly: aggregate.avg_min_hourly,
                avg_max_hourly: aggregate.avg_max_hourly,
                sample_count: aggregate.sample_count,
                fallback_to_state: tier.fallback_to_state,
                filters_applied: tier.filters_applied(),
            };

            if aggregate.sample_count >= MIN_SAMPLE_SIZE {
                info!(
                    "Salary estimate for {specialty} resolved at tier {} with {} samples",
                    tier.level, aggregate.sample_count
                );
                return Ok(last);
            }
        }

        info!(
            "No tier reached {MIN_SAMPLE_SIZE} samples for {specialty}; using last tier ({} samples)",
            last.sample_count
        );
        Ok(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::salary::store::fixtures::*;
    use crate::salary::store::memory::InMemoryPostingStore;

    fn cleveland() -> LocationFilter {
        LocationFilter {
            city: Some("Cleveland".to_string()),
            state: Some("OH".to_string()),
        }
    }

    fn ohio() -> LocationFilter {
        LocationFilter {
            city: None,
            state: Some("OH".to_string()),
        }
    }

    fn levels(tiers: &[Tier]) -> Vec<u8> {
        tiers.iter().map(|t| t.level).collect()
    }

    #[test]
    fn test_full_ladder_with_both_filters() {
        let tiers = plan_tiers(&cleveland(), Some("full-time"), Some("night"));
        assert_eq!(levels(&tiers), vec![0, 1, 2, 3, 4]);
        assert_eq!(tiers[1].job_type.as_deref(), Some("full-time"));
        assert_eq!(tiers[1].shift_type, None);
        assert_eq!(tiers[3].scope, ohio());
        assert_eq!(tiers[3].shift_type.as_deref(), Some("night"));
        assert_eq!(tiers[4].job_type, None);
        assert!(tiers[3].fallback_to_state && tiers[4].fallback_to_state);
        assert!(!tiers[2].fallback_to_state);
    }

    #[test]
    fn test_ladder_skips_unrequested_filter_tiers() {
        assert_eq!(levels(&plan_tiers(&cleveland(), None, None)), vec![0, 4]);
        assert_eq!(
            levels(&plan_tiers(&cleveland(), Some("prn"), None)),
            vec![0, 2, 3, 4]
        );
        assert_eq!(
            levels(&plan_tiers(&cleveland(), None, Some("day"))),
            vec![0, 1, 3, 4]
        );
    }

    #[test]
    fn test_ladder_without_city_never_falls_back() {
        assert_eq!(
            levels(&plan_tiers(&ohio(), Some("prn"), Some("day"))),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_city_without_state_falls_back_to_unscoped() {
        let city_only = LocationFilter {
            city: Some("Nowhereville".to_string()),
            state: None,
        };
        let tiers = plan_tiers(&city_only, None, None);
        assert_eq!(levels(&tiers), vec![0, 4]);
        assert_eq!(tiers[1].scope, LocationFilter::default());
        assert!(tiers[1].fallback_to_state);
    }

    #[tokio::test]
    async fn test_first_tier_meeting_threshold_wins() {
        let store = Arc::new(InMemoryPostingStore::new(vec![
            with_filters(posting("ICU", Some("Cleveland"), Some("OH")), "full-time", "day"),
            with_filters(posting("ICU", Some("Cleveland"), Some("OH")), "full-time", "day"),
            with_filters(posting("ICU", Some("Cleveland"), Some("OH")), "full-time", "day"),
        ]));
        let aggregator = SalaryAggregator::new(store.clone());

        let result = aggregator
            .aggregate("ICU", &cleveland(), Some("full-time"), Some("day"))
            .await
            .unwrap();

        assert_eq!(result.sample_count, 3);
        assert!(!result.fallback_to_state);
        assert_eq!(
            result.filters_applied,
            FiltersApplied {
                job_type: true,
                shift_type: true
            }
        );
        assert_eq!(store.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_shift_filter_dropped_before_job_filter() {
        let store = Arc::new(InMemoryPostingStore::new(vec![
            with_filters(posting("ICU", Some("Cleveland"), Some("OH")), "full-time", "day"),
            with_filters(posting("ICU", Some("Cleveland"), Some("OH")), "full-time", "day"),
            with_filters(posting("ICU", Some("Cleveland"), Some("OH")), "full-time", "night"),
        ]));
        let aggregator = SalaryAggregator::new(store);

        let result = aggregator
            .aggregate("ICU", &cleveland(), Some("full-time"), Some("night"))
            .await
            .unwrap();

        assert_eq!(result.sample_count, 3);
        assert_eq!(
            result.filters_applied,
            FiltersApplied {
                job_type: true,
                shift_type: false
            }
        );
    }

    #[tokio::test]
    async fn test_cascade_falls_back_to_state_after_city_tiers() {
        let mut postings = vec![
            with_filters(posting("ICU", Some("Cleveland"), Some("OH")), "full-time", "night"),
            with_filters(posting("ICU", Some("Cleveland"), Some("OH")), "full-time", "night"),
        ];
        for city in ["Columbus", "Dayton", "Akron", "Toledo"] {
            postings.push(with_filters(
                posting("ICU", Some(city), Some("OH")),
                "full-time",
                "night",
            ));
        }
        let store = Arc::new(InMemoryPostingStore::new(postings));
        let aggregator = SalaryAggregator::new(store.clone());

        let result = aggregator
            .aggregate("ICU", &cleveland(), Some("full-time"), Some("night"))
            .await
            .unwrap();

        assert_eq!(result.sample_count, 6);
        assert!(result.fallback_to_state);
        assert_eq!(
            result.filters_applied,
            FiltersApplied {
                job_type: true,
                shift_type: true
            }
        );

        let queries = store.queries();
        assert_eq!(queries.len(), 4);
        assert!(queries[..3]
            .iter()
            .all(|q| q.city.as_deref() == Some("Cleveland")));
        assert_eq!(queries[1].shift_type, None);
        assert_eq!(queries[2].job_type, None);
        assert_eq!(queries[3].city, None);
        assert_eq!(queries[3].state.as_deref(), Some("OH"));
    }

    #[tokio::test]
    async fn test_last_tier_returned_when_nothing_meets_threshold() {
        let store = Arc::new(InMemoryPostingStore::new(vec![
            posting("ICU", Some("Columbus"), Some("OH")),
            posting("ICU", Some("Dayton"), Some("OH")),
        ]));
        let aggregator = SalaryAggregator::new(store.clone());

        let result = aggregator
            .aggregate("ICU", &cleveland(), Some("travel"), None)
            .await
            .unwrap();

        assert_eq!(result.sample_count, 2);
        assert!(result.fallback_to_state);
        assert_eq!(result.filters_applied, FiltersApplied::default());
        assert_eq!(store.queries().len(), 4);
    }

    #[tokio::test]
    async fn test_leadership_only_data_yields_zero_at_every_tier() {
        let mut postings = Vec::new();
        for _ in 0..5 {
            postings.push(leadership(with_filters(
                posting("ICU", Some("Cleveland"), Some("OH")),
                "full-time",
                "day",
            )));
            postings.push(leadership(posting("ICU", Some("Columbus"), Some("OH"))));
        }
        let store = Arc::new(InMemoryPostingStore::new(postings));
        let aggregator = SalaryAggregator::new(store.clone());

        let result = aggregator
            .aggregate("ICU", &cleveland(), Some("full-time"), Some("day"))
            .await
            .unwrap();

        assert_eq!(result.sample_count, 0);
        assert_eq!(result.avg_min_annual, 0.0);
        assert_eq!(store.queries().len(), 5);
    }

    #[tokio::test]
    async fn test_means_are_unweighted() {
        let store = Arc::new(InMemoryPostingStore::new(vec![
            with_annual(posting("ER", None, Some("TX")), 60_000.0, 80_000.0),
            with_annual(posting("ER", None, Some("TX")), 70_000.0, 90_000.0),
            with_hourly(
                with_annual(posting("ER", None, Some("TX")), 80_000.0, 100_000.0),
                40.0,
                50.0,
            ),
        ]));
        let aggregator = SalaryAggregator::new(store);
        let texas = LocationFilter {
            city: None,
            state: Some("TX".to_string()),
        };

        let result = aggregator.aggregate("er", &texas, None, None).await.unwrap();

        assert_eq!(result.sample_count, 3);
        assert_eq!(result.avg_min_annual, 70_000.0);
        assert_eq!(result.avg_max_annual, 90_000.0);
        assert_eq!(result.avg_min_hourly, Some(40.0));
        assert_eq!(result.avg_max_hourly, Some(50.0));
    }
}
