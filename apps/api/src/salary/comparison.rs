//! Comparison Calculator — raw market context for an estimate.
//!
//! Baselines are means of `salary_max_annual` over eligible postings for the
//! specialty, scoped to the state and to the whole dataset. No experience
//! adjustment, no city/job/shift filters, no minimum sample size.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::salary::experience::annual_to_hourly;
use crate::salary::store::{JobPostingStore, PostingFilter};

/// Unrounded baseline means. `None` when the scope has no eligible postings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonAverages {
    pub state_avg: Option<f64>,
    pub national_avg: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub annual: i64,
    pub hourly: f64,
}

impl Baseline {
    pub fn from_annual(avg: f64) -> Self {
        let annual = avg.round() as i64;
        Self {
            annual,
            hourly: annual_to_hourly(annual),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Comparisons {
    pub state: Option<Baseline>,
    pub national: Option<Baseline>,
}

impl From<ComparisonAverages> for Comparisons {
    fn from(avgs: ComparisonAverages) -> Self {
        Self {
            state: avgs.state_avg.map(Baseline::from_annual),
            national: avgs.national_avg.map(Baseline::from_annual),
        }
    }
}

pub struct ComparisonCalculator {
    store: Arc<dyn JobPostingStore>,
}

impl ComparisonCalculator {
    pub fn new(store: Arc<dyn JobPostingStore>) -> Self {
        Self { store }
    }

    /// State baseline is skipped (and `None`) when no state is known.
    pub async fn compare(
        &self,
        specialty: &str,
        state: Option<&str>,
    ) -> Result<ComparisonAverages, AppError> {
        let state_avg = async {
            match state {
                Some(state) => self.max_annual_mean(specialty, Some(state)).await,
                None => Ok(None),
            }
        };
        let national_avg = self.max_annual_mean(specialty, None);

        let (state_avg, national_avg) = tokio::try_join!(state_avg, national_avg)?;
        Ok(ComparisonAverages {
            state_avg,
            national_avg,
        })
    }

    async fn max_annual_mean(
        &self,
        specialty: &str,
        state: Option<&str>,
    ) -> Result<Option<f64>, AppError> {
        let filter = PostingFilter {
            specialty: specialty.to_string(),
            state: state.map(str::to_string),
            ..Default::default()
        };
        let aggregate = self.store.aggregate(&filter).await?;
        Ok(if aggregate.sample_count > 0 {
            aggregate.avg_max_annual
        } else {
            None
        })
    }
}
