//! Level-up progression estimates

mod estimator;
mod thresholds;

pub use estimator::{estimate_days_to_level_up, estimate_with};
pub use thresholds::{HeuristicThresholds, TableThresholds, XpThresholds};
