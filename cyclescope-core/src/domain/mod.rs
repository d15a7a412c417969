//! Domain types shared across the pipeline.

pub mod indicator;
pub mod score;

pub use indicator::{IndicatorCategory, IndicatorDescriptor};
pub use score::{
    is_date_ordered, ScorePoint, AVERAGE_IDS, FUNDAMENTAL_AVERAGE, OVERALL_AVERAGE,
    TECHNICAL_AVERAGE,
};

use std::collections::BTreeMap;

/// Sparse per-indicator parameter overrides.
///
/// An indicator absent from the outer map uses its descriptor's default
/// parameters. Inner keys are expected (but not validated here) to be a
/// subset of the descriptor's default-parameter names.
pub type ParameterOverrides = BTreeMap<String, BTreeMap<String, f64>>;
