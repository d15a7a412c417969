//! Indicator metadata supplied by the computation service at load time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fixed two-way category taxonomy for concrete indicators.
///
/// Synthetic aggregate series (the three averages) sit outside this enum;
/// see [`crate::domain::AVERAGE_IDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorCategory {
    Fundamental,
    Technical,
}

/// Immutable descriptor for one indicator.
///
/// Fetched once per session from the computation service and read-only
/// thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorDescriptor {
    pub id: String,
    pub name: String,
    pub category: IndicatorCategory,
    #[serde(default)]
    pub default_parameters: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_decodes_without_parameters() {
        let json = r#"{"id": "mvrv_z", "name": "MVRV Z-Score", "category": "fundamental"}"#;
        let d: IndicatorDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.id, "mvrv_z");
        assert_eq!(d.category, IndicatorCategory::Fundamental);
        assert!(d.default_parameters.is_empty());
    }

    #[test]
    fn category_uses_lowercase_wire_names() {
        let json = serde_json::to_string(&IndicatorCategory::Technical).unwrap();
        assert_eq!(json, "\"technical\"");
    }
}
