//! Dashboard parameter state — single owner, synchronous pure transitions.
//!
//! The store holds everything the user can tune: indicator selection and
//! visibility, sparse parameter overrides, thresholds, date range, ROC
//! window, and the three average-line flags. It derives the request payload
//! for the computation service; *when* that payload is sent is the
//! scheduler's concern.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{IndicatorDescriptor, ParameterOverrides, OVERALL_AVERAGE};
use crate::preset::PresetPayload;
use crate::service::ComputeRequest;

/// Default ROC window, in trading days.
pub const DEFAULT_ROC_DAYS: u32 = 30;

/// Lower/upper z-score bounds marking oversold ("in") and overbought
/// ("out") conditions. `sdca_in < sdca_out` is expected but not enforced;
/// inverted bounds are a degenerate, allowed input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub sdca_in: f64,
    pub sdca_out: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            sdca_in: -1.5,
            sdca_out: 1.5,
        }
    }
}

/// Inclusive request date bounds; either side may be open, letting the
/// service decide the span. `start <= end` is expected but not validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// The page-level parameter state.
///
/// "Selected" means computed-and-available (chart hover and tooltip read
/// selected indicators); "visible" means rendered as a line. The two sets
/// are deliberately independent: the default-select-all path selects every
/// indicator but makes only the overall average visible.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStateStore {
    selected: HashSet<String>,
    visible: HashSet<String>,
    overrides: ParameterOverrides,
    thresholds: ThresholdConfig,
    date_range: DateRange,
    roc_days: u32,
    show_fundamental_average: bool,
    show_technical_average: bool,
    show_overall_average: bool,
}

impl Default for ParameterStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterStateStore {
    pub fn new() -> Self {
        Self {
            selected: HashSet::new(),
            visible: HashSet::new(),
            overrides: ParameterOverrides::new(),
            thresholds: ThresholdConfig::default(),
            date_range: DateRange::default(),
            roc_days: DEFAULT_ROC_DAYS,
            show_fundamental_average: true,
            show_technical_average: true,
            show_overall_average: true,
        }
    }

    // --- accessors ---

    pub fn selected(&self) -> &HashSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.contains(id)
    }

    pub fn visible(&self) -> &HashSet<String> {
        &self.visible
    }

    pub fn overrides(&self) -> &ParameterOverrides {
        &self.overrides
    }

    /// Effective value for one parameter: the override if present, else the
    /// descriptor default.
    pub fn parameter_value(&self, descriptor: &IndicatorDescriptor, param: &str) -> Option<f64> {
        self.overrides
            .get(&descriptor.id)
            .and_then(|m| m.get(param))
            .or_else(|| descriptor.default_parameters.get(param))
            .copied()
    }

    pub fn thresholds(&self) -> ThresholdConfig {
        self.thresholds
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn roc_days(&self) -> u32 {
        self.roc_days
    }

    pub fn show_fundamental_average(&self) -> bool {
        self.show_fundamental_average
    }

    pub fn show_technical_average(&self) -> bool {
        self.show_technical_average
    }

    pub fn show_overall_average(&self) -> bool {
        self.show_overall_average
    }

    // --- transitions ---

    /// Replace the selection. Any id leaving the selection also leaves the
    /// visible set; ids entering it do not become visible automatically.
    pub fn set_selected_indicators(&mut self, ids: impl IntoIterator<Item = String>) {
        let next: HashSet<String> = ids.into_iter().collect();
        for removed in self.selected.difference(&next) {
            self.visible.remove(removed);
        }
        self.selected = next;
    }

    /// Toggle one id in or out of the selection (same removal rule as
    /// [`Self::set_selected_indicators`]).
    pub fn toggle_selected(&mut self, id: &str) {
        if self.selected.remove(id) {
            self.visible.remove(id);
        } else {
            self.selected.insert(id.to_string());
        }
    }

    /// Default-select-all path: select every descriptor, render only the
    /// overall average line. Individual lines stay hidden but selectable
    /// for hover/tooltip purposes.
    pub fn select_all(&mut self, descriptors: &[IndicatorDescriptor]) {
        self.selected = descriptors.iter().map(|d| d.id.clone()).collect();
        self.visible = HashSet::from([OVERALL_AVERAGE.to_string()]);
    }

    /// Symmetric-difference toggle on the visible set; never touches the
    /// selection.
    pub fn toggle_visibility(&mut self, id: &str) {
        if !self.visible.remove(id) {
            self.visible.insert(id.to_string());
        }
    }

    /// Merge one parameter value into the sparse override map.
    ///
    /// The parameter name is not validated against the descriptor's known
    /// names; unknown names merge silently, matching the source behavior.
    pub fn update_parameter(&mut self, indicator_id: &str, param_name: &str, value: f64) {
        self.overrides
            .entry(indicator_id.to_string())
            .or_default()
            .insert(param_name.to_string(), value);
    }

    pub fn set_thresholds(&mut self, thresholds: ThresholdConfig) {
        self.thresholds = thresholds;
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
    }

    pub fn set_roc_days(&mut self, days: u32) {
        self.roc_days = days;
    }

    pub fn toggle_fundamental_average(&mut self) {
        self.show_fundamental_average = !self.show_fundamental_average;
    }

    pub fn toggle_technical_average(&mut self) {
        self.show_technical_average = !self.show_technical_average;
    }

    pub fn toggle_overall_average(&mut self) {
        self.show_overall_average = !self.show_overall_average;
    }

    /// Atomically replace selection, overrides, date range, ROC window,
    /// average flags and thresholds from a preset.
    ///
    /// Optional preset fields fall back to the current values. The visible
    /// set always resets to the overall average, regardless of what was
    /// visible when the preset was saved — visibility is a rendering
    /// detail, not part of the preset schema.
    pub fn load_preset(&mut self, preset: &PresetPayload) {
        self.set_selected_indicators(preset.selected_indicators.iter().cloned());
        self.overrides = preset.indicator_params.clone();
        self.date_range = DateRange {
            start: preset.start_date.or(self.date_range.start),
            end: preset.end_date.or(self.date_range.end),
        };
        self.roc_days = preset.roc_days;
        self.show_fundamental_average = preset.show_fundamental_average;
        self.show_technical_average = preset.show_technical_average;
        self.show_overall_average = preset.show_overall_average;
        self.thresholds = ThresholdConfig {
            sdca_in: preset.sdca_in.unwrap_or(self.thresholds.sdca_in),
            sdca_out: preset.sdca_out.unwrap_or(self.thresholds.sdca_out),
        };
        self.visible = HashSet::from([OVERALL_AVERAGE.to_string()]);
    }

    /// Serialize the inverse of [`Self::load_preset`]'s inputs. The visible
    /// set is not included, by design.
    pub fn to_preset_payload(&self) -> PresetPayload {
        let mut selected: Vec<String> = self.selected.iter().cloned().collect();
        selected.sort();
        PresetPayload {
            indicator_params: self.overrides.clone(),
            selected_indicators: selected,
            start_date: self.date_range.start,
            end_date: self.date_range.end,
            roc_days: self.roc_days,
            show_fundamental_average: self.show_fundamental_average,
            show_technical_average: self.show_technical_average,
            show_overall_average: self.show_overall_average,
            sdca_in: Some(self.thresholds.sdca_in),
            sdca_out: Some(self.thresholds.sdca_out),
        }
    }

    /// Derive the request payload for the computation service.
    pub fn compute_request(&self, force_refresh: bool) -> ComputeRequest {
        let mut indicators: Vec<String> = self.selected.iter().cloned().collect();
        indicators.sort();
        ComputeRequest {
            indicators,
            indicator_params: self.overrides.clone(),
            start_date: self.date_range.start,
            end_date: self.date_range.end,
            roc_days: self.roc_days,
            sdca_in: Some(self.thresholds.sdca_in),
            sdca_out: Some(self.thresholds.sdca_out),
            force_refresh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IndicatorCategory;
    use std::collections::BTreeMap;

    fn descriptor(id: &str) -> IndicatorDescriptor {
        IndicatorDescriptor {
            id: id.to_string(),
            name: id.to_uppercase(),
            category: IndicatorCategory::Technical,
            default_parameters: BTreeMap::from([("window".to_string(), 14.0)]),
        }
    }

    fn store_with(ids: &[&str]) -> ParameterStateStore {
        let mut store = ParameterStateStore::new();
        store.set_selected_indicators(ids.iter().map(|s| s.to_string()));
        store
    }

    #[test]
    fn deselection_removes_visibility() {
        let mut store = store_with(&["mvrv_z", "rsi_z"]);
        store.toggle_visibility("mvrv_z");
        store.toggle_visibility("rsi_z");
        store.set_selected_indicators(["rsi_z".to_string()]);
        assert!(!store.is_visible("mvrv_z"));
        assert!(store.is_visible("rsi_z"));
    }

    #[test]
    fn newly_selected_id_is_not_visible() {
        let mut store = store_with(&["mvrv_z"]);
        store.set_selected_indicators(["mvrv_z".to_string(), "rsi_z".to_string()]);
        assert!(store.is_selected("rsi_z"));
        assert!(!store.is_visible("rsi_z"));
    }

    #[test]
    fn select_all_shows_only_overall_average() {
        let mut store = ParameterStateStore::new();
        store.toggle_visibility("stale_line");
        store.select_all(&[descriptor("mvrv_z"), descriptor("rsi_z")]);
        assert!(store.is_selected("mvrv_z"));
        assert!(store.is_selected("rsi_z"));
        assert_eq!(store.visible().len(), 1);
        assert!(store.is_visible(OVERALL_AVERAGE));
    }

    #[test]
    fn visibility_toggle_never_touches_selection() {
        let mut store = store_with(&["mvrv_z"]);
        store.toggle_visibility("mvrv_z");
        assert!(store.is_visible("mvrv_z"));
        store.toggle_visibility("mvrv_z");
        assert!(!store.is_visible("mvrv_z"));
        assert!(store.is_selected("mvrv_z"));
    }

    #[test]
    fn update_parameter_merges_sparse_overrides() {
        let mut store = ParameterStateStore::new();
        store.update_parameter("rsi_z", "window", 21.0);
        store.update_parameter("rsi_z", "smoothing", 3.0);
        store.update_parameter("rsi_z", "window", 28.0); // last write wins
        let params = &store.overrides()["rsi_z"];
        assert_eq!(params["window"], 28.0);
        assert_eq!(params["smoothing"], 3.0);
    }

    #[test]
    fn parameter_name_is_not_validated() {
        // Source behavior: any name merges silently.
        let mut store = ParameterStateStore::new();
        store.update_parameter("rsi_z", "no_such_param", 1.0);
        assert_eq!(store.overrides()["rsi_z"]["no_such_param"], 1.0);
    }

    #[test]
    fn parameter_value_prefers_override_over_default() {
        let mut store = ParameterStateStore::new();
        let d = descriptor("rsi_z");
        assert_eq!(store.parameter_value(&d, "window"), Some(14.0));
        store.update_parameter("rsi_z", "window", 30.0);
        assert_eq!(store.parameter_value(&d, "window"), Some(30.0));
        assert_eq!(store.parameter_value(&d, "unknown"), None);
    }

    #[test]
    fn load_preset_resets_visibility_to_overall_average() {
        let mut store = store_with(&["mvrv_z"]);
        store.toggle_visibility("mvrv_z");
        let mut payload = store.to_preset_payload();
        payload.selected_indicators = vec!["mvrv_z".to_string(), "nupl".to_string()];
        store.load_preset(&payload);
        assert!(store.is_selected("nupl"));
        assert_eq!(store.visible().len(), 1);
        assert!(store.is_visible(OVERALL_AVERAGE));
    }

    #[test]
    fn load_preset_missing_optionals_fall_back_to_current() {
        let mut store = ParameterStateStore::new();
        store.set_thresholds(ThresholdConfig {
            sdca_in: -2.0,
            sdca_out: 2.5,
        });
        store.set_date_range(DateRange {
            start: Some("2020-01-01".parse().unwrap()),
            end: None,
        });
        let payload = PresetPayload::from_json(serde_json::json!({
            "selected_indicators": ["mvrv_z"],
            "roc_days": 7,
        }))
        .unwrap();
        store.load_preset(&payload);
        assert_eq!(store.thresholds().sdca_in, -2.0);
        assert_eq!(store.thresholds().sdca_out, 2.5);
        assert_eq!(
            store.date_range().start,
            Some("2020-01-01".parse().unwrap())
        );
        assert_eq!(store.roc_days(), 7);
    }

    #[test]
    fn preset_round_trip_preserves_everything_but_visibility() {
        let mut store = ParameterStateStore::new();
        store.set_selected_indicators(["mvrv_z".to_string(), "rsi_z".to_string()]);
        store.toggle_visibility("rsi_z");
        store.update_parameter("rsi_z", "window", 21.0);
        store.set_roc_days(90);
        store.set_thresholds(ThresholdConfig {
            sdca_in: -1.0,
            sdca_out: 1.0,
        });
        store.set_date_range(DateRange {
            start: Some("2019-06-01".parse().unwrap()),
            end: Some("2024-06-01".parse().unwrap()),
        });
        store.toggle_technical_average();

        let payload = store.to_preset_payload();
        let mut restored = ParameterStateStore::new();
        restored.load_preset(&payload);

        assert_eq!(restored.selected(), store.selected());
        assert_eq!(restored.overrides(), store.overrides());
        assert_eq!(restored.roc_days(), store.roc_days());
        assert_eq!(restored.thresholds(), store.thresholds());
        assert_eq!(restored.date_range(), store.date_range());
        assert_eq!(
            restored.show_technical_average(),
            store.show_technical_average()
        );
        // Visibility is the one exception: always {average} after a load.
        assert_eq!(restored.visible().len(), 1);
        assert!(restored.is_visible(OVERALL_AVERAGE));
    }

    #[test]
    fn compute_request_derivation() {
        let mut store = ParameterStateStore::new();
        store.set_selected_indicators(["rsi_z".to_string(), "mvrv_z".to_string()]);
        store.update_parameter("rsi_z", "window", 21.0);
        let request = store.compute_request(true);
        // Sorted for a deterministic wire payload.
        assert_eq!(request.indicators, vec!["mvrv_z", "rsi_z"]);
        assert_eq!(request.indicator_params["rsi_z"]["window"], 21.0);
        assert_eq!(request.roc_days, DEFAULT_ROC_DAYS);
        assert_eq!(request.sdca_in, Some(-1.5));
        assert_eq!(request.sdca_out, Some(1.5));
        assert!(request.force_refresh);
    }
}
