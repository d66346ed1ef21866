use std::sync::Arc;

use crate::salary::estimator::SalaryEstimator;
use crate::salary::store::JobPostingStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only postings store. Default: `PgPostingStore`.
    pub store: Arc<dyn JobPostingStore>,
    pub estimator: Arc<SalaryEstimator>,
}

impl AppState {
    pub fn new(store: Arc<dyn JobPostingStore>) -> Self {
        Self {
            estimator: Arc::new(SalaryEstimator::new(store.clone())),
            store,
        }
    }
}
