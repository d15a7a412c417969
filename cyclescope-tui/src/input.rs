//! Keyboard input dispatch — global keys → overlays → panel-specific
//! handlers.
//!
//! Trigger classes are enforced here: selection, date-range, ROC-window and
//! threshold keys call `structural_recompute` (immediate); parameter nudges
//! go through `parameter_edited` (debounced); `r` is the forced refresh.
//! Visibility and average-flag toggles are render-only and trigger nothing.

use std::time::Instant;

use chrono::Duration;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use cyclescope_core::state::{DateRange, ThresholdConfig};

use crate::app::{AppState, ErrorCategory, Overlay, Panel};
use crate::persistence;

const DATE_STEP_DAYS: i64 = 90;
const THRESHOLD_STEP: f64 = 0.1;
const ROC_STEP: u32 = 5;

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match &app.overlay {
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::SavePreset => {
            handle_save_preset_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('r') => {
            app.forced_recompute();
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Char(c @ '1'..='6') => {
            if let Some(panel) = Panel::from_index(c as usize - '1' as usize) {
                app.active_panel = panel;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Chart => handle_chart_key(app, key),
        Panel::Indicators => handle_indicators_key(app, key),
        Panel::Parameters => handle_parameters_key(app, key),
        Panel::Table => handle_table_key(app, key),
        Panel::Presets => handle_presets_key(app, key),
        Panel::Help => {} // display only
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_save_preset_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.preset_name_input.clear();
        }
        KeyCode::Enter => {
            let name = app.preset_name_input.trim().to_string();
            if !name.is_empty() {
                let payload = app.store.to_preset_payload();
                let value = match serde_json::to_value(&payload) {
                    Ok(v) => v,
                    Err(e) => {
                        app.push_error(ErrorCategory::Preset, e.to_string(), name);
                        return;
                    }
                };
                app.presets.entries.insert(name.clone(), value);
                if let Err(e) = persistence::save_presets(&app.preset_path, &app.presets.entries) {
                    app.push_error(ErrorCategory::Preset, e.to_string(), name);
                } else {
                    app.set_status(format!("Saved preset '{name}'"));
                }
            }
            app.preset_name_input.clear();
            app.overlay = Overlay::None;
        }
        KeyCode::Backspace => {
            app.preset_name_input.pop();
        }
        KeyCode::Char(c) => {
            app.preset_name_input.push(c);
        }
        _ => {}
    }
}

fn handle_chart_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        // Thresholds (structural: regions and the service request both
        // depend on them).
        KeyCode::Char('[') => adjust_thresholds(app, -THRESHOLD_STEP, 0.0),
        KeyCode::Char(']') => adjust_thresholds(app, THRESHOLD_STEP, 0.0),
        KeyCode::Char('{') => adjust_thresholds(app, 0.0, -THRESHOLD_STEP),
        KeyCode::Char('}') => adjust_thresholds(app, 0.0, THRESHOLD_STEP),

        // Date range (structural).
        KeyCode::Char(',') => adjust_date_range(app, -DATE_STEP_DAYS, 0),
        KeyCode::Char('.') => adjust_date_range(app, DATE_STEP_DAYS, 0),
        KeyCode::Char('<') => adjust_date_range(app, 0, -DATE_STEP_DAYS),
        KeyCode::Char('>') => adjust_date_range(app, 0, DATE_STEP_DAYS),
        _ => {}
    }
}

fn adjust_thresholds(app: &mut AppState, d_in: f64, d_out: f64) {
    let t = app.store.thresholds();
    app.store.set_thresholds(ThresholdConfig {
        sdca_in: t.sdca_in + d_in,
        sdca_out: t.sdca_out + d_out,
    });
    app.structural_recompute();
}

fn adjust_date_range(app: &mut AppState, d_start: i64, d_end: i64) {
    let range = app.store.date_range();
    // Open bounds anchor to the displayed series before shifting.
    let start = range
        .start
        .or_else(|| app.series.first().map(|p| p.date))
        .unwrap_or_else(|| chrono::Local::now().date_naive() - Duration::days(4 * 365));
    let end = range
        .end
        .or_else(|| app.series.last().map(|p| p.date))
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    app.store.set_date_range(DateRange {
        start: Some(start + Duration::days(d_start)),
        end: Some(end + Duration::days(d_end)),
    });
    app.structural_recompute();
}

fn handle_indicators_key(app: &mut AppState, key: KeyEvent) {
    let count = app.descriptors.len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if count > 0 && app.indicators.cursor + 1 < count {
                app.indicators.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.indicators.cursor = app.indicators.cursor.saturating_sub(1);
        }
        KeyCode::Char(' ') => {
            if let Some(id) = app.descriptors.get(app.indicators.cursor).map(|d| d.id.clone()) {
                app.store.toggle_selected(&id);
                app.structural_recompute();
            }
        }
        KeyCode::Char('v') => {
            // Render-only: no recompute.
            if let Some(id) = app.descriptors.get(app.indicators.cursor).map(|d| d.id.clone()) {
                app.store.toggle_visibility(&id);
            }
        }
        KeyCode::Char('a') => {
            let descriptors = app.descriptors.clone();
            app.store.select_all(&descriptors);
            app.structural_recompute();
        }
        KeyCode::Char('d') => {
            app.store.set_selected_indicators(std::iter::empty());
            app.structural_recompute();
        }
        KeyCode::Char('f') => app.store.toggle_fundamental_average(),
        KeyCode::Char('t') => app.store.toggle_technical_average(),
        KeyCode::Char('o') => app.store.toggle_overall_average(),
        _ => {}
    }
}

fn handle_parameters_key(app: &mut AppState, key: KeyEvent) {
    let rows = app.parameter_rows();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if !rows.is_empty() && app.parameters.cursor + 1 < rows.len() {
                app.parameters.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.parameters.cursor = app.parameters.cursor.saturating_sub(1);
        }
        KeyCode::Char('h') | KeyCode::Left => nudge_parameter(app, -1.0),
        KeyCode::Char('l') | KeyCode::Right => nudge_parameter(app, 1.0),
        _ => {}
    }
}

fn nudge_parameter(app: &mut AppState, direction: f64) {
    let rows = app.parameter_rows();
    let Some((indicator_id, param_name)) = rows.get(app.parameters.cursor).cloned() else {
        return;
    };
    let Some(descriptor) = app.descriptor(&indicator_id).cloned() else {
        return;
    };
    let current = app
        .store
        .parameter_value(&descriptor, &param_name)
        .unwrap_or(0.0);
    let step = (current.abs() * 0.05).max(1.0);
    app.parameter_edited(
        &indicator_id,
        &param_name,
        current + step * direction,
        Instant::now(),
    );
}

fn handle_table_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.table.scroll + 1 < app.rows.len() {
                app.table.scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.table.scroll = app.table.scroll.saturating_sub(1);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let days = app.store.roc_days() + ROC_STEP;
            app.store.set_roc_days(days);
            app.structural_recompute();
        }
        KeyCode::Char('-') => {
            let days = app.store.roc_days().saturating_sub(ROC_STEP).max(1);
            app.store.set_roc_days(days);
            app.structural_recompute();
        }
        _ => {}
    }
}

fn handle_presets_key(app: &mut AppState, key: KeyEvent) {
    let count = app.presets.entries.len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if count > 0 && app.presets.cursor + 1 < count {
                app.presets.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.presets.cursor = app.presets.cursor.saturating_sub(1);
        }
        KeyCode::Char('s') => {
            app.overlay = Overlay::SavePreset;
            app.preset_name_input.clear();
        }
        KeyCode::Enter => {
            let Some(name) = app.presets.selected_name().map(String::from) else {
                return;
            };
            let value = app.presets.entries[&name].clone();
            match persistence::decode_preset(&value) {
                Ok(payload) => {
                    app.store.load_preset(&payload);
                    app.structural_recompute();
                    app.set_status(format!("Loaded preset '{name}'"));
                }
                Err(e) => {
                    app.push_error(ErrorCategory::Preset, e.to_string(), name);
                }
            }
        }
        KeyCode::Char('x') => {
            let Some(name) = app.presets.selected_name().map(String::from) else {
                return;
            };
            app.presets.entries.remove(&name);
            app.presets.cursor = app.presets.cursor.min(app.presets.entries.len().saturating_sub(1));
            if let Err(e) = persistence::save_presets(&app.preset_path, &app.presets.entries) {
                app.push_error(ErrorCategory::Preset, e.to_string(), name);
            } else {
                app.set_status(format!("Deleted preset '{name}'"));
            }
        }
        _ => {}
    }
}
