//! Preset payload — the persisted snapshot exchanged with the preset store.
//!
//! Visibility is deliberately not part of the schema: it is a rendering
//! detail, and loading any preset resets the visible set to the overall
//! average only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ParameterOverrides;

/// Errors from decoding a preset payload. Callers display the message;
/// nothing here panics or aborts a session.
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("preset payload is not a JSON object")]
    NotAnObject,

    #[error("preset payload is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("malformed preset payload: {0}")]
    Malformed(String),
}

/// A named-preset value object.
///
/// `selected_indicators` and `roc_days` are required; every other field is
/// optional and falls back to the store's current value on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetPayload {
    #[serde(default)]
    pub indicator_params: ParameterOverrides,
    pub selected_indicators: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub roc_days: u32,
    #[serde(default = "default_true")]
    pub show_fundamental_average: bool,
    #[serde(default = "default_true")]
    pub show_technical_average: bool,
    #[serde(default = "default_true")]
    pub show_overall_average: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdca_in: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdca_out: Option<f64>,
}

fn default_true() -> bool {
    true
}

const REQUIRED_FIELDS: &[&str] = &["selected_indicators", "roc_days"];

impl PresetPayload {
    /// Decode a raw payload, rejecting (not panicking on) missing required
    /// fields or a malformed shape.
    pub fn from_json(value: serde_json::Value) -> Result<Self, PresetError> {
        let object = value.as_object().ok_or(PresetError::NotAnObject)?;
        for field in REQUIRED_FIELDS {
            if !object.contains_key(*field) {
                return Err(PresetError::MissingField(field));
            }
        }
        serde_json::from_value(value).map_err(|e| PresetError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_payload_decodes_with_defaults() {
        let value = serde_json::json!({
            "selected_indicators": ["mvrv_z", "rsi_z"],
            "roc_days": 30,
        });
        let payload = PresetPayload::from_json(value).unwrap();
        assert_eq!(payload.selected_indicators.len(), 2);
        assert!(payload.indicator_params.is_empty());
        assert!(payload.show_overall_average);
        assert_eq!(payload.sdca_in, None);
    }

    #[test]
    fn missing_required_field_is_rejected_not_thrown() {
        let value = serde_json::json!({"roc_days": 30});
        match PresetPayload::from_json(value) {
            Err(PresetError::MissingField(field)) => {
                assert_eq!(field, "selected_indicators");
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(matches!(
            PresetPayload::from_json(serde_json::json!([1, 2, 3])),
            Err(PresetError::NotAnObject)
        ));
    }

    #[test]
    fn wrong_field_type_reports_malformed() {
        let value = serde_json::json!({
            "selected_indicators": "not-a-list",
            "roc_days": 30,
        });
        assert!(matches!(
            PresetPayload::from_json(value),
            Err(PresetError::Malformed(_))
        ));
    }

    #[test]
    fn serializes_without_empty_optionals() {
        let payload = PresetPayload {
            indicator_params: ParameterOverrides::new(),
            selected_indicators: vec!["mvrv_z".into()],
            start_date: None,
            end_date: None,
            roc_days: 30,
            show_fundamental_average: true,
            show_technical_average: false,
            show_overall_average: true,
            sdca_in: Some(-1.5),
            sdca_out: None,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("start_date").is_none());
        assert!(value.get("sdca_out").is_none());
        assert_eq!(value["sdca_in"], -1.5);
    }
}
