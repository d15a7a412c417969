//! Application state — single-owner, main-thread only.
//!
//! All dashboard state lives here: the parameter store, the recompute
//! scheduler, the last-good score series and everything derived from it.
//! The worker thread communicates via channels; responses are admitted
//! through the scheduler's latest-wins rule.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Instant;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use cyclescope_core::domain::{IndicatorDescriptor, ScorePoint, OVERALL_AVERAGE};
use cyclescope_core::regions::{detect_regions, merged_by_start, Region};
use cyclescope_core::scheduler::{RecomputeScheduler, Ticket};
use cyclescope_core::state::ParameterStateStore;
use cyclescope_core::table::{order_rows, DisplayRow};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Chart,
    Indicators,
    Parameters,
    Table,
    Presets,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Chart => 0,
            Panel::Indicators => 1,
            Panel::Parameters => 2,
            Panel::Table => 3,
            Panel::Presets => 4,
            Panel::Help => 5,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Chart),
            1 => Some(Panel::Indicators),
            2 => Some(Panel::Parameters),
            3 => Some(Panel::Table),
            4 => Some(Panel::Presets),
            5 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Chart => "Chart",
            Panel::Indicators => "Indicators",
            Panel::Parameters => "Parameters",
            Panel::Table => "ROC Table",
            Panel::Presets => "Presets",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % 6).unwrap()
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + 5) % 6).unwrap()
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Error category for the history overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Service,
    Preset,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Service => "SVC",
            ErrorCategory::Preset => "PRESET",
            ErrorCategory::Other => "ERR",
        }
    }
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    ErrorHistory,
    SavePreset,
}

/// Indicators panel cursor.
#[derive(Debug, Default)]
pub struct IndicatorsPanelState {
    pub cursor: usize,
}

/// Parameters panel cursor over the flattened (indicator, param) rows.
#[derive(Debug, Default)]
pub struct ParametersPanelState {
    pub cursor: usize,
}

/// Table panel scroll offset.
#[derive(Debug, Default)]
pub struct TablePanelState {
    pub scroll: usize,
}

/// Presets panel: cursor plus the on-disk preset map (raw JSON values so a
/// malformed entry surfaces on load, not on listing).
#[derive(Debug, Default)]
pub struct PresetsPanelState {
    pub cursor: usize,
    pub entries: BTreeMap<String, serde_json::Value>,
}

impl PresetsPanelState {
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.names().get(self.cursor).copied()
    }
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Core pipeline
    pub store: ParameterStateStore,
    pub scheduler: RecomputeScheduler,
    pub descriptors: Vec<IndicatorDescriptor>,

    // Last-good computed data and its derivations
    pub series: Vec<ScorePoint>,
    pub roc: HashMap<String, f64>,
    pub regions: Vec<Region>,
    pub rows: Vec<DisplayRow>,
    pub loading: bool,

    // Panel states
    pub indicators: IndicatorsPanelState,
    pub parameters: ParametersPanelState,
    pub table: TablePanelState,
    pub presets: PresetsPanelState,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
    pub preset_name_input: String,

    // Paths
    pub preset_path: PathBuf,
    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        preset_path: PathBuf,
        state_path: PathBuf,
    ) -> Self {
        Self {
            active_panel: Panel::Chart,
            running: true,
            store: ParameterStateStore::new(),
            scheduler: RecomputeScheduler::new(),
            descriptors: Vec::new(),
            series: Vec::new(),
            roc: HashMap::new(),
            regions: Vec::new(),
            rows: Vec::new(),
            loading: false,
            indicators: IndicatorsPanelState::default(),
            parameters: ParametersPanelState::default(),
            table: TablePanelState::default(),
            presets: PresetsPanelState::default(),
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(50),
            error_scroll: 0,
            overlay: Overlay::None,
            preset_name_input: String::new(),
            preset_path,
            state_path,
        }
    }

    // --- status & errors ---

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > 50 {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    // --- recompute pipeline ---

    /// Send the store's derived payload to the worker under a ticket.
    fn issue(&mut self, ticket: Ticket) {
        let request = self.store.compute_request(ticket.force_refresh);
        self.loading = true;
        let _ = self.worker_tx.send(WorkerCommand::Recompute {
            seq: ticket.seq,
            request,
        });
    }

    /// Structural change already applied to the store: recompute now.
    pub fn structural_recompute(&mut self) {
        let ticket = self.scheduler.structural();
        self.issue(ticket);
    }

    /// Explicit refresh bypassing any service-side cache.
    pub fn forced_recompute(&mut self) {
        let ticket = self.scheduler.forced();
        self.issue(ticket);
        self.set_status("Refreshing (cache bypassed)...");
    }

    /// Fine-grained parameter edit: merge the value, arm the debounce.
    pub fn parameter_edited(
        &mut self,
        indicator_id: &str,
        param_name: &str,
        value: f64,
        now: Instant,
    ) {
        self.store.update_parameter(indicator_id, param_name, value);
        self.scheduler.parameter_edited(now);
    }

    /// Event-loop tick: fire the debounced recompute when its deadline
    /// passes.
    pub fn tick(&mut self, now: Instant) {
        if let Some(ticket) = self.scheduler.due(now) {
            self.issue(ticket);
        }
    }

    /// Descriptor set arrived (once per session). An empty selection means
    /// first launch: default-select everything, average line only.
    pub fn set_descriptors(&mut self, descriptors: Vec<IndicatorDescriptor>) {
        self.descriptors = descriptors;
        if self.store.selected().is_empty() {
            self.store.select_all(&self.descriptors);
        }
        self.structural_recompute();
    }

    /// A recompute response arrived. Stale responses (a newer request has
    /// been issued since) are discarded silently.
    pub fn apply_compute(&mut self, seq: u64, data: Vec<ScorePoint>, roc: HashMap<String, f64>) {
        if !self.scheduler.is_current(seq) {
            return;
        }
        self.loading = false;
        self.series = data;
        self.roc = roc;
        self.rederive();
        self.set_status(format!(
            "Updated: {} points, {} regions",
            self.series.len(),
            self.regions.len()
        ));
    }

    /// A recompute failed. The previous series stays on screen; only the
    /// message surfaces.
    pub fn compute_failed(&mut self, seq: u64, error: String) {
        if !self.scheduler.is_current(seq) {
            return;
        }
        self.loading = false;
        self.push_error(ErrorCategory::Service, error, "recompute".into());
    }

    /// Rebuild regions and table rows from the current series and store.
    pub fn rederive(&mut self) {
        let thresholds = self.store.thresholds();
        self.regions = merged_by_start(detect_regions(
            &self.series,
            OVERALL_AVERAGE,
            thresholds.sdca_in,
            thresholds.sdca_out,
        ));
        let current_scores = self
            .series
            .last()
            .map(|p| p.scores.clone())
            .unwrap_or_default();
        self.rows = order_rows(&self.roc, &self.descriptors, &current_scores);
    }

    /// Flattened (indicator id, parameter name) rows for the parameters
    /// panel, in descriptor order then parameter-name order.
    pub fn parameter_rows(&self) -> Vec<(String, String)> {
        let mut rows = Vec::new();
        for descriptor in &self.descriptors {
            if !self.store.is_selected(&descriptor.id) {
                continue;
            }
            for param in descriptor.default_parameters.keys() {
                rows.push((descriptor.id.clone(), param.clone()));
            }
        }
        rows
    }

    pub fn descriptor(&self, id: &str) -> Option<&IndicatorDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::WorkerCommand;
    use std::sync::mpsc;
    use std::time::Duration;

    fn test_app() -> (AppState, mpsc::Receiver<WorkerCommand>) {
        let (tx, cmd_rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        let app = AppState::new(
            tx,
            resp_rx,
            PathBuf::from("presets.json"),
            PathBuf::from("session.json"),
        );
        (app, cmd_rx)
    }

    fn point(date: &str, avg: f64) -> ScorePoint {
        ScorePoint {
            date: date.parse().unwrap(),
            price: 100.0,
            scores: HashMap::from([(OVERALL_AVERAGE.to_string(), avg)]),
        }
    }

    #[test]
    fn panel_cycle() {
        assert_eq!(Panel::Chart.next(), Panel::Indicators);
        assert_eq!(Panel::Help.next(), Panel::Chart);
        assert_eq!(Panel::Chart.prev(), Panel::Help);
        for i in 0..6 {
            assert_eq!(Panel::from_index(i).unwrap().index(), i);
        }
        assert!(Panel::from_index(6).is_none());
    }

    #[test]
    fn error_history_caps_at_50() {
        let (mut app, _cmd_rx) = test_app();
        for i in 0..60 {
            app.push_error(ErrorCategory::Other, format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), 50);
        assert!(app.error_history[0].message.contains("59"));
    }

    #[test]
    fn rapid_parameter_edits_issue_one_request_with_last_values() {
        let (mut app, cmd_rx) = test_app();
        let t0 = Instant::now();
        app.parameter_edited("rsi_z", "window", 15.0, t0);
        app.parameter_edited("rsi_z", "window", 16.0, t0 + Duration::from_millis(100));
        app.parameter_edited("mvrv_z", "lookback_days", 900.0, t0 + Duration::from_millis(200));

        app.tick(t0 + Duration::from_millis(400)); // inside the window
        assert!(cmd_rx.try_recv().is_err());

        app.tick(t0 + Duration::from_millis(800));
        match cmd_rx.try_recv().unwrap() {
            WorkerCommand::Recompute { request, .. } => {
                // Full current override map, last value per parameter.
                assert_eq!(request.indicator_params["rsi_z"]["window"], 16.0);
                assert_eq!(request.indicator_params["mvrv_z"]["lookback_days"], 900.0);
            }
            other => panic!("expected Recompute, got {other:?}"),
        }
        assert!(cmd_rx.try_recv().is_err(), "exactly one request");
        assert!(app.loading);
    }

    #[test]
    fn stale_response_never_clobbers_newer_result() {
        let (mut app, cmd_rx) = test_app();
        app.structural_recompute();
        let seq_a = match cmd_rx.try_recv().unwrap() {
            WorkerCommand::Recompute { seq, .. } => seq,
            other => panic!("unexpected {other:?}"),
        };
        app.structural_recompute();
        let seq_b = match cmd_rx.try_recv().unwrap() {
            WorkerCommand::Recompute { seq, .. } => seq,
            other => panic!("unexpected {other:?}"),
        };

        // B's response lands first, then A's late response.
        app.apply_compute(seq_b, vec![point("2024-01-02", 0.5)], HashMap::new());
        assert!(!app.loading);
        app.apply_compute(seq_a, vec![point("2023-01-01", -3.0)], HashMap::new());

        assert_eq!(app.series.len(), 1);
        assert_eq!(app.series[0].date, "2024-01-02".parse().unwrap());
    }

    #[test]
    fn failed_recompute_keeps_previous_series() {
        let (mut app, cmd_rx) = test_app();
        app.structural_recompute();
        let seq_a = match cmd_rx.try_recv().unwrap() {
            WorkerCommand::Recompute { seq, .. } => seq,
            other => panic!("unexpected {other:?}"),
        };
        app.apply_compute(seq_a, vec![point("2024-01-01", -2.5)], HashMap::new());
        assert_eq!(app.regions.len(), 1);

        app.structural_recompute();
        let seq_b = match cmd_rx.try_recv().unwrap() {
            WorkerCommand::Recompute { seq, .. } => seq,
            other => panic!("unexpected {other:?}"),
        };
        app.compute_failed(seq_b, "service exploded".into());

        assert!(!app.loading);
        assert_eq!(app.series.len(), 1, "last-good series preserved");
        assert_eq!(app.regions.len(), 1);
        assert!(matches!(
            app.status_message,
            Some((_, StatusLevel::Error))
        ));
    }

    #[test]
    fn stale_failure_is_discarded_silently() {
        let (mut app, cmd_rx) = test_app();
        app.structural_recompute();
        let seq_a = match cmd_rx.try_recv().unwrap() {
            WorkerCommand::Recompute { seq, .. } => seq,
            other => panic!("unexpected {other:?}"),
        };
        app.structural_recompute();
        let _ = cmd_rx.try_recv().unwrap();

        app.compute_failed(seq_a, "late failure".into());
        assert!(app.loading, "newer request still in flight");
        assert!(app.error_history.is_empty());
    }

    #[test]
    fn first_descriptor_load_selects_all_with_average_visible() {
        let (mut app, cmd_rx) = test_app();
        let service = crate::sample_data::SyntheticComputeService::new();
        use cyclescope_core::service::ComputeService;
        app.set_descriptors(service.descriptors().unwrap());

        assert!(!app.store.selected().is_empty());
        assert_eq!(app.store.visible().len(), 1);
        assert!(app.store.is_visible(OVERALL_AVERAGE));
        assert!(matches!(
            cmd_rx.try_recv().unwrap(),
            WorkerCommand::Recompute { .. }
        ));
    }
}
