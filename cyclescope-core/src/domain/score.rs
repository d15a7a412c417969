//! Dated score samples returned by the computation service.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Synthetic id for the average over fundamental indicators.
pub const FUNDAMENTAL_AVERAGE: &str = "fundamental_average";
/// Synthetic id for the average over technical indicators.
pub const TECHNICAL_AVERAGE: &str = "technical_average";
/// Synthetic id for the overall average across all selected indicators.
pub const OVERALL_AVERAGE: &str = "average";

/// The three synthetic aggregate ids, in their fixed display order.
pub const AVERAGE_IDS: &[&str] = &[FUNDAMENTAL_AVERAGE, TECHNICAL_AVERAGE, OVERALL_AVERAGE];

/// One sample of the composite signal: a date, the price, and a z-score per
/// indicator id (including the synthetic averages).
///
/// A series is ordered by strictly increasing date. The series is owned for
/// one display cycle and replaced wholesale on each successful recompute,
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePoint {
    pub date: NaiveDate,
    pub price: f64,
    #[serde(default)]
    pub scores: HashMap<String, f64>,
}

impl ScorePoint {
    /// Score for `key`, with NaN treated as missing.
    ///
    /// This is the single place NaN is filtered; downstream consumers
    /// (gradient, region detection) never see it.
    pub fn score(&self, key: &str) -> Option<f64> {
        self.scores.get(key).copied().filter(|v| !v.is_nan())
    }
}

/// Check the strictly-increasing-date series invariant.
pub fn is_date_ordered(series: &[ScorePoint]) -> bool {
    series.windows(2).all(|w| w[0].date < w[1].date)
}
