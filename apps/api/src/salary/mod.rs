// Salary estimation engine.
// Location parsing, tiered fallback aggregation, experience adjustment, comparison baselines.
// All reads go through `store::JobPostingStore`; nothing here writes.

pub mod aggregator;
pub mod comparison;
pub mod estimator;
pub mod experience;
pub mod handlers;
pub mod location;
pub mod store;
