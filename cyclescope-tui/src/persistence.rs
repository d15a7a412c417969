//! On-disk persistence — named presets and session state, JSON.
//!
//! The preset file plays the role of the external preset store: a flat map
//! of name → raw payload. Entries are kept as raw JSON so one malformed
//! preset fails on load with a message instead of poisoning the whole file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use cyclescope_core::preset::{PresetError, PresetPayload};

use crate::app::{AppState, Panel};

/// Serializable subset of app state that persists across restarts. The
/// configuration part shares the preset schema, so it inherits the same
/// visibility-resets-to-average rule on restore.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionState {
    pub active_panel: Panel,
    pub config: PresetPayload,
}

/// Load session state. Missing or corrupt file → `None` (fresh session).
pub fn load_session(path: &Path) -> Option<SessionState> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Save session state, creating parent directories if needed.
pub fn save_session(path: &Path, state: &SessionState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract session state from the app.
pub fn extract(app: &AppState) -> SessionState {
    SessionState {
        active_panel: app.active_panel,
        config: app.store.to_preset_payload(),
    }
}

/// Apply a restored session to the app.
pub fn apply(app: &mut AppState, state: SessionState) {
    app.store.load_preset(&state.config);
    app.active_panel = state.active_panel;
}

/// Load the named-preset map. Missing or corrupt file → empty map.
pub fn load_presets(path: &Path) -> BTreeMap<String, serde_json::Value> {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => BTreeMap::new(),
    }
}

/// Save the named-preset map, creating parent directories if needed.
pub fn save_presets(
    path: &Path,
    presets: &BTreeMap<String, serde_json::Value>,
) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(presets)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Decode one stored preset entry into a typed payload.
pub fn decode_preset(value: &serde_json::Value) -> Result<PresetPayload, PresetError> {
    PresetPayload::from_json(value.clone())
}
