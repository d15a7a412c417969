//! ROC summary table — grouped, ordered display rows.
//!
//! Rows are bucketed Fundamental → Technical → Average. Within the first
//! two buckets a hardcoded canonical ordering applies; the Average bucket
//! has its own fixed order (fundamental, technical, overall).

use std::collections::HashMap;

use crate::domain::{
    IndicatorCategory, IndicatorDescriptor, FUNDAMENTAL_AVERAGE, OVERALL_AVERAGE,
    TECHNICAL_AVERAGE,
};

/// Canonical display order for fundamental (on-chain) indicators.
pub const FUNDAMENTAL_ORDER: &[&str] = &[
    "mvrv_z",
    "nupl",
    "puell_multiple",
    "reserve_risk",
    "sopr",
    "rhodl_ratio",
];

/// Canonical display order for technical (price-derived) indicators.
pub const TECHNICAL_ORDER: &[&str] = &[
    "mayer_multiple",
    "price_sma_ratio",
    "rsi_z",
    "stoch_rsi",
    "bollinger_pctb",
    "roc_z",
    "pi_cycle",
    "drawdown_z",
];

/// Category column on a display row; the synthetic averages get their own
/// bucket after the two indicator categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCategory {
    Fundamental,
    Technical,
    Average,
}

/// One row of the rate-of-change summary table, in final display order.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub indicator_id: String,
    pub label: String,
    pub current_score: f64,
    pub delta: f64,
    pub delta_percent: f64,
    pub category: RowCategory,
}

/// Order the ROC deltas into display rows.
///
/// Bucketing: any id in the average set goes to the Average bucket; else
/// the canonical lists decide; else the descriptor's declared category,
/// defaulting to Technical when no descriptor exists. Within Fundamental
/// and Technical, canonical-list position sorts first; unknown ids sort
/// after all known ones, alphabetically by display label (then id, for a
/// total order — map iteration order is not deterministic). The Average
/// bucket is fixed: fundamental_average, technical_average, average.
///
/// `delta_percent` is `delta / |current| * 100` when the current score is
/// nonzero, else exactly `0` — a ratio of change to current magnitude,
/// which is the definition the table has always used.
pub fn order_rows(
    deltas: &HashMap<String, f64>,
    descriptors: &[IndicatorDescriptor],
    current_scores: &HashMap<String, f64>,
) -> Vec<DisplayRow> {
    let by_id: HashMap<&str, &IndicatorDescriptor> =
        descriptors.iter().map(|d| (d.id.as_str(), d)).collect();

    let mut fundamental: Vec<(SortKey, DisplayRow)> = Vec::new();
    let mut technical: Vec<(SortKey, DisplayRow)> = Vec::new();
    let mut averages: Vec<DisplayRow> = Vec::new();

    for (id, &delta) in deltas {
        let descriptor = by_id.get(id.as_str()).copied();
        let label = descriptor
            .map(|d| d.name.clone())
            .unwrap_or_else(|| id.clone());
        let current = current_scores.get(id).copied().unwrap_or(0.0);
        let category = categorize(id, descriptor);
        let row = DisplayRow {
            indicator_id: id.clone(),
            label,
            current_score: current,
            delta,
            delta_percent: delta_percent(delta, current),
            category,
        };
        match category {
            RowCategory::Average => averages.push(row),
            RowCategory::Fundamental => {
                fundamental.push((SortKey::new(id, &row.label, FUNDAMENTAL_ORDER), row))
            }
            RowCategory::Technical => {
                technical.push((SortKey::new(id, &row.label, TECHNICAL_ORDER), row))
            }
        }
    }

    fundamental.sort_by(|a, b| a.0.cmp(&b.0));
    technical.sort_by(|a, b| a.0.cmp(&b.0));
    averages.sort_by_key(|row| average_position(&row.indicator_id));

    fundamental
        .into_iter()
        .chain(technical)
        .map(|(_, row)| row)
        .chain(averages)
        .collect()
}

fn delta_percent(delta: f64, current: f64) -> f64 {
    if current != 0.0 {
        delta / current.abs() * 100.0
    } else {
        0.0
    }
}

fn categorize(id: &str, descriptor: Option<&IndicatorDescriptor>) -> RowCategory {
    if is_average_id(id) {
        RowCategory::Average
    } else if FUNDAMENTAL_ORDER.contains(&id) {
        RowCategory::Fundamental
    } else if TECHNICAL_ORDER.contains(&id) {
        RowCategory::Technical
    } else {
        match descriptor.map(|d| d.category) {
            Some(IndicatorCategory::Fundamental) => RowCategory::Fundamental,
            Some(IndicatorCategory::Technical) | None => RowCategory::Technical,
        }
    }
}

fn is_average_id(id: &str) -> bool {
    id == FUNDAMENTAL_AVERAGE || id == TECHNICAL_AVERAGE || id == OVERALL_AVERAGE
}

fn average_position(id: &str) -> usize {
    match id {
        FUNDAMENTAL_AVERAGE => 0,
        TECHNICAL_AVERAGE => 1,
        _ => 2,
    }
}

/// Canonical-list ids sort by position; unknown ids sort after, by label
/// then id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    canonical: usize,
    label: String,
    id: String,
}

impl SortKey {
    fn new(id: &str, label: &str, canonical_order: &[&str]) -> Self {
        match canonical_order.iter().position(|c| *c == id) {
            Some(pos) => Self {
                canonical: pos,
                label: String::new(),
                id: String::new(),
            },
            None => Self {
                canonical: canonical_order.len(),
                label: label.to_string(),
                id: id.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn descriptor(id: &str, name: &str, category: IndicatorCategory) -> IndicatorDescriptor {
        IndicatorDescriptor {
            id: id.to_string(),
            name: name.to_string(),
            category,
            default_parameters: BTreeMap::new(),
        }
    }

    fn deltas(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn buckets_come_out_fundamental_technical_average() {
        let d = deltas(&[
            ("average", 0.1),
            ("rsi_z", 0.2),
            ("mvrv_z", -0.3),
            ("technical_average", 0.05),
            ("nupl", 0.4),
            ("fundamental_average", -0.1),
            ("mayer_multiple", 0.6),
        ]);
        let rows = order_rows(&d, &[], &HashMap::new());
        let ids: Vec<&str> = rows.iter().map(|r| r.indicator_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "mvrv_z",
                "nupl",
                "mayer_multiple",
                "rsi_z",
                "fundamental_average",
                "technical_average",
                "average",
            ]
        );
    }

    #[test]
    fn category_boundaries_hold_for_any_input() {
        let d = deltas(&[
            ("rsi_z", 1.0),
            ("average", 1.0),
            ("sopr", 1.0),
            ("pi_cycle", 1.0),
            ("mvrv_z", 1.0),
        ]);
        let rows = order_rows(&d, &[], &HashMap::new());
        let last_fundamental = rows
            .iter()
            .rposition(|r| r.category == RowCategory::Fundamental)
            .unwrap();
        let first_technical = rows
            .iter()
            .position(|r| r.category == RowCategory::Technical)
            .unwrap();
        let first_average = rows
            .iter()
            .position(|r| r.category == RowCategory::Average)
            .unwrap();
        assert!(last_fundamental < first_technical);
        assert!(first_technical < first_average);
    }

    #[test]
    fn unknown_id_falls_back_to_descriptor_category() {
        let descriptors = vec![descriptor(
            "exchange_flow_z",
            "Exchange Flow Z",
            IndicatorCategory::Fundamental,
        )];
        let d = deltas(&[("exchange_flow_z", 0.2), ("rsi_z", 0.1)]);
        let rows = order_rows(&d, &descriptors, &HashMap::new());
        assert_eq!(rows[0].indicator_id, "exchange_flow_z");
        assert_eq!(rows[0].category, RowCategory::Fundamental);
        // Unknown-but-fundamental sorts after all canonical fundamentals
        // and before every technical row.
        assert_eq!(rows[1].indicator_id, "rsi_z");
    }

    #[test]
    fn unknown_without_descriptor_defaults_to_technical() {
        let d = deltas(&[("mystery", 0.2), ("mvrv_z", 0.1)]);
        let rows = order_rows(&d, &[], &HashMap::new());
        assert_eq!(rows[0].indicator_id, "mvrv_z");
        assert_eq!(rows[1].indicator_id, "mystery");
        assert_eq!(rows[1].category, RowCategory::Technical);
        // No descriptor: raw id is the label.
        assert_eq!(rows[1].label, "mystery");
    }

    #[test]
    fn unknown_ids_sort_alphabetically_by_label() {
        let descriptors = vec![
            descriptor("zz_custom", "Alpha Signal", IndicatorCategory::Technical),
            descriptor("aa_custom", "Beta Signal", IndicatorCategory::Technical),
        ];
        let d = deltas(&[("zz_custom", 0.1), ("aa_custom", 0.2), ("rsi_z", 0.3)]);
        let rows = order_rows(&d, &descriptors, &HashMap::new());
        let ids: Vec<&str> = rows.iter().map(|r| r.indicator_id.as_str()).collect();
        // Canonical first, then unknowns by display label.
        assert_eq!(ids, vec!["rsi_z", "zz_custom", "aa_custom"]);
    }

    #[test]
    fn averages_keep_fixed_order_not_alphabetic() {
        let d = deltas(&[
            ("average", 0.1),
            ("fundamental_average", 0.2),
            ("technical_average", 0.3),
        ]);
        let rows = order_rows(&d, &[], &HashMap::new());
        let ids: Vec<&str> = rows.iter().map(|r| r.indicator_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["fundamental_average", "technical_average", "average"]
        );
    }

    #[test]
    fn delta_percent_is_ratio_to_current_magnitude() {
        let d = deltas(&[("mvrv_z", 0.5)]);
        let current = deltas(&[("mvrv_z", -2.0)]);
        let rows = order_rows(&d, &[], &current);
        assert_eq!(rows[0].delta_percent, 25.0);
    }

    #[test]
    fn delta_percent_at_zero_current_is_exactly_zero() {
        let d = deltas(&[("mvrv_z", 0.5), ("rsi_z", -1.0)]);
        let current = deltas(&[("mvrv_z", 0.0)]); // rsi_z absent → treated as 0
        let rows = order_rows(&d, &[], &current);
        for row in rows {
            assert_eq!(row.delta_percent, 0.0);
            assert!(row.delta_percent.is_finite());
        }
    }
}
