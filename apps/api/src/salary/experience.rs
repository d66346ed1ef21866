use serde::{Deserialize, Serialize};

use crate::salary::aggregator::AggregationResult;

/// Standard full-time hours per year (52 weeks × 40 hours).
pub const HOURS_PER_YEAR: f64 = 2080.0;

/// (max years inclusive, multiplier). Anything past the last bucket clamps to it.
const EXPERIENCE_MULTIPLIERS: &[(u32, f64)] = &[
    (1, 0.90),
    (3, 1.00),
    (5, 1.05),
    (10, 1.12),
    (20, 1.18),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustedSalary {
    pub min_annual: i64,
    pub max_annual: i64,
    pub min_hourly: f64,
    pub max_hourly: f64,
    pub multiplier: f64,
}

pub fn experience_multiplier(years_experience: u32) -> f64 {
    EXPERIENCE_MULTIPLIERS
        .iter()
        .find(|(max_years, _)| years_experience <= *max_years)
        .or(EXPERIENCE_MULTIPLIERS.last())
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Hourly equivalent of an annual figure, to the cent.
pub fn annual_to_hourly(annual: i64) -> f64 {
    round_cents(annual as f64 / HOURS_PER_YEAR)
}

/// Scales aggregated figures by the experience multiplier.
///
/// Missing hourly averages are derived from the *adjusted* annual figures.
pub fn adjust(aggregation: &AggregationResult, years_experience: u32) -> AdjustedSalary {
    let multiplier = experience_multiplier(years_experience);
    let min_annual = (aggregation.avg_min_annual * multiplier).round() as i64;
    let max_annual = (aggregation.avg_max_annual * multiplier).round() as i64;

    let hourly = |avg: Option<f64>, annual: i64| match avg {
        Some(avg) => round_cents(avg * multiplier),
        None => annual_to_hourly(annual),
    };

    AdjustedSalary {
        min_annual,
        max_annual,
        min_hourly: hourly(aggregation.avg_min_hourly, min_annual),
        max_hourly: hourly(aggregation.avg_max_hourly, max_annual),
        multiplier,
    }
}
