//! Axum route handlers for the Salary API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::salary::estimator::{EstimateRequest, SalaryEstimate};
use crate::salary::store::SpecialtyCount;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SpecialtiesResponse {
    pub specialties: Vec<SpecialtyCount>,
}

/// GET /api/v1/salary/estimate?specialty=&location=&years_experience=&job_type=&shift_type=
pub async fn handle_estimate_query(
    State(state): State<AppState>,
    Query(request): Query<EstimateRequest>,
) -> Result<Json<SalaryEstimate>, AppError> {
    Ok(Json(state.estimator.estimate(request).await?))
}

/// POST /api/v1/salary/estimate
pub async fn handle_estimate(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<SalaryEstimate>, AppError> {
    Ok(Json(state.estimator.estimate(request).await?))
}

/// GET /api/v1/salary/specialties
///
/// Specialties that have eligible salary data, most postings first.
pub async fn handle_specialties(
    State(state): State<AppState>,
) -> Result<Json<SpecialtiesResponse>, AppError> {
    let specialties = state.store.specialties().await?;
    Ok(Json(SpecialtiesResponse { specialties }))
}
