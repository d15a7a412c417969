//! Synthetic compute service — offline stand-in for the real endpoint.
//!
//! Generates a deterministic price walk plus mean-reverting z-score series
//! per indicator, so the dashboard is fully usable without a running
//! computation service. Parameter overrides feed the per-indicator seed,
//! so tuning a parameter visibly changes the series.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cyclescope_core::domain::{
    IndicatorCategory, IndicatorDescriptor, ScorePoint, FUNDAMENTAL_AVERAGE, OVERALL_AVERAGE,
    TECHNICAL_AVERAGE,
};
use cyclescope_core::service::{ComputeRequest, ComputeResult, ComputeService, ServiceError};
use cyclescope_core::table::{FUNDAMENTAL_ORDER, TECHNICAL_ORDER};

const DEFAULT_SPAN_DAYS: i64 = 4 * 365;
const BASE_SEED: u64 = 0x5dca;

pub struct SyntheticComputeService {
    seed: u64,
}

impl Default for SyntheticComputeService {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticComputeService {
    pub fn new() -> Self {
        Self { seed: BASE_SEED }
    }

    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl ComputeService for SyntheticComputeService {
    fn descriptors(&self) -> Result<Vec<IndicatorDescriptor>, ServiceError> {
        let mut descriptors = Vec::new();
        for id in FUNDAMENTAL_ORDER {
            descriptors.push(descriptor(id, IndicatorCategory::Fundamental));
        }
        for id in TECHNICAL_ORDER {
            descriptors.push(descriptor(id, IndicatorCategory::Technical));
        }
        Ok(descriptors)
    }

    fn compute(&self, request: &ComputeRequest) -> Result<ComputeResult, ServiceError> {
        let end = request
            .end_date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let start = request
            .start_date
            .unwrap_or(end - Duration::days(DEFAULT_SPAN_DAYS));
        if start > end {
            return Err(ServiceError::Rejected(format!(
                "start date {start} is after end date {end}"
            )));
        }
        let days = (end - start).num_days() + 1;

        // Price: geometric walk with a slow cycle overlaid.
        let mut price_rng = StdRng::seed_from_u64(self.seed);
        let mut price = 30_000.0f64;

        // One mean-reverting walk per requested indicator.
        let mut walks: Vec<(String, IndicatorCategory, Walk)> = request
            .indicators
            .iter()
            .map(|id| {
                let seed = indicator_seed(self.seed, id, request);
                (id.clone(), category_of(id), Walk::new(seed))
            })
            .collect();

        let mut data = Vec::with_capacity(days as usize);
        for offset in 0..days {
            let date = start + Duration::days(offset);
            let cycle = (offset as f64 / 365.0 * std::f64::consts::TAU / 4.0).sin();
            price *= 1.0 + 0.0015 * cycle + price_rng.gen_range(-0.02..0.02);

            let mut scores: HashMap<String, f64> = HashMap::new();
            let mut fundamental = Vec::new();
            let mut technical = Vec::new();
            for (id, cat, walk) in walks.iter_mut() {
                let z = walk.step(cycle);
                scores.insert(id.clone(), z);
                match cat {
                    IndicatorCategory::Fundamental => fundamental.push(z),
                    IndicatorCategory::Technical => technical.push(z),
                }
            }
            if let Some(avg) = mean(&fundamental) {
                scores.insert(FUNDAMENTAL_AVERAGE.to_string(), avg);
            }
            if let Some(avg) = mean(&technical) {
                scores.insert(TECHNICAL_AVERAGE.to_string(), avg);
            }
            let all: Vec<f64> = fundamental.iter().chain(&technical).copied().collect();
            if let Some(avg) = mean(&all) {
                scores.insert(OVERALL_AVERAGE.to_string(), avg);
            }

            data.push(ScorePoint { date, price, scores });
        }

        let roc = roc_deltas(&data, request.roc_days);
        Ok(ComputeResult { data, roc })
    }
}

/// ROC over the requested window: current score minus the score `roc_days`
/// samples earlier, per series key present at the series end.
fn roc_deltas(data: &[ScorePoint], roc_days: u32) -> HashMap<String, f64> {
    let mut roc = HashMap::new();
    let Some(last) = data.last() else {
        return roc;
    };
    let earlier_idx = data.len().saturating_sub(roc_days as usize + 1);
    let earlier = &data[earlier_idx];
    for (id, current) in &last.scores {
        if let Some(past) = earlier.scores.get(id) {
            roc.insert(id.clone(), current - past);
        }
    }
    roc
}

fn descriptor(id: &str, category: IndicatorCategory) -> IndicatorDescriptor {
    let default_parameters: BTreeMap<String, f64> = match category {
        IndicatorCategory::Fundamental => {
            BTreeMap::from([("lookback_days".to_string(), 1460.0)])
        }
        IndicatorCategory::Technical => BTreeMap::from([
            ("window".to_string(), 14.0),
            ("smoothing".to_string(), 3.0),
        ]),
    };
    IndicatorDescriptor {
        id: id.to_string(),
        name: display_name(id),
        category,
        default_parameters,
    }
}

fn display_name(id: &str) -> String {
    let mut name = String::new();
    for (i, part) in id.split('_').enumerate() {
        if i > 0 {
            name.push(' ');
        }
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}

fn category_of(id: &str) -> IndicatorCategory {
    if FUNDAMENTAL_ORDER.contains(&id) {
        IndicatorCategory::Fundamental
    } else {
        IndicatorCategory::Technical
    }
}

/// Per-indicator seed: base seed, id, and any overrides for that id. An
/// override change reshapes that indicator's series.
fn indicator_seed(base: u64, id: &str, request: &ComputeRequest) -> u64 {
    let mut hasher = DefaultHasher::new();
    base.hash(&mut hasher);
    id.hash(&mut hasher);
    if let Some(params) = request.indicator_params.get(id) {
        for (name, value) in params {
            name.hash(&mut hasher);
            value.to_bits().hash(&mut hasher);
        }
    }
    hasher.finish()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// AR(1) mean-reverting walk, pulled toward the shared market cycle.
struct Walk {
    rng: StdRng,
    value: f64,
}

impl Walk {
    fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let value = rng.gen_range(-1.0..1.0);
        Self { rng, value }
    }

    fn step(&mut self, cycle: f64) -> f64 {
        let noise = self.rng.gen_range(-0.15..0.15);
        self.value = (0.97 * self.value + 0.03 * (2.0 * cycle) + noise).clamp(-3.5, 3.5);
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyclescope_core::domain::is_date_ordered;

    fn request(indicators: &[&str]) -> ComputeRequest {
        ComputeRequest {
            indicators: indicators.iter().map(|s| s.to_string()).collect(),
            indicator_params: Default::default(),
            start_date: Some("2024-01-01".parse().unwrap()),
            end_date: Some("2024-03-31".parse().unwrap()),
            roc_days: 30,
            sdca_in: Some(-1.5),
            sdca_out: Some(1.5),
            force_refresh: false,
        }
    }

    #[test]
    fn series_is_date_ordered_and_spans_the_range() {
        let service = SyntheticComputeService::new();
        let result = service.compute(&request(&["mvrv_z", "rsi_z"])).unwrap();
        assert_eq!(result.data.len(), 91);
        assert!(is_date_ordered(&result.data));
        assert_eq!(result.data[0].date, "2024-01-01".parse().unwrap());
        assert_eq!(
            result.data.last().unwrap().date,
            "2024-03-31".parse().unwrap()
        );
    }

    #[test]
    fn averages_are_present_and_bounded() {
        let service = SyntheticComputeService::new();
        let result = service.compute(&request(&["mvrv_z", "rsi_z"])).unwrap();
        for point in &result.data {
            for key in [FUNDAMENTAL_AVERAGE, TECHNICAL_AVERAGE, OVERALL_AVERAGE] {
                let score = point.score(key).expect("average present");
                assert!(score.abs() <= 3.5);
            }
        }
        assert!(result.roc.contains_key(OVERALL_AVERAGE));
    }

    #[test]
    fn same_request_is_deterministic() {
        let service = SyntheticComputeService::with_seed(99);
        let a = service.compute(&request(&["mvrv_z"])).unwrap();
        let b = service.compute(&request(&["mvrv_z"])).unwrap();
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn parameter_override_changes_the_series() {
        let service = SyntheticComputeService::new();
        let plain = service.compute(&request(&["rsi_z"])).unwrap();
        let mut tuned_request = request(&["rsi_z"]);
        tuned_request.indicator_params.insert(
            "rsi_z".to_string(),
            BTreeMap::from([("window".to_string(), 28.0)]),
        );
        let tuned = service.compute(&tuned_request).unwrap();
        let plain_scores: Vec<_> = plain.data.iter().map(|p| p.score("rsi_z")).collect();
        let tuned_scores: Vec<_> = tuned.data.iter().map(|p| p.score("rsi_z")).collect();
        assert_ne!(plain_scores, tuned_scores);
    }

    #[test]
    fn inverted_date_range_is_rejected_with_a_message() {
        let service = SyntheticComputeService::new();
        let mut r = request(&["mvrv_z"]);
        r.start_date = Some("2024-06-01".parse().unwrap());
        r.end_date = Some("2024-01-01".parse().unwrap());
        assert!(matches!(
            service.compute(&r),
            Err(ServiceError::Rejected(_))
        ));
    }

    #[test]
    fn descriptors_cover_both_categories() {
        let service = SyntheticComputeService::new();
        let descriptors = service.descriptors().unwrap();
        assert!(descriptors
            .iter()
            .any(|d| d.category == IndicatorCategory::Fundamental));
        assert!(descriptors
            .iter()
            .any(|d| d.category == IndicatorCategory::Technical));
        assert!(descriptors.iter().all(|d| !d.default_parameters.is_empty()));
    }
}
