use crate::models::{Label, Record, numeric_value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary statistics for one label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelSummary {
    pub label: Label,
    pub count: usize,
    /// Records whose value is absent or not a number.
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Flat series: at least one value and min == max.
    pub degenerate: bool,
}

/// Compute statistics grouped by `label_field`, ordered by label.
pub fn label_summary(records: &[Record], label_field: &str, value_field: &str) -> Vec<LabelSummary> {
    let mut groups: BTreeMap<Label, (Vec<f64>, usize)> = BTreeMap::new();
    for r in records {
        let entry = groups.entry(Label::of(r, label_field)).or_default();
        match numeric_value(r, value_field) {
            Some(v) if !v.is_nan() => entry.0.push(v),
            _ => entry.1 += 1,
        }
    }

    let mut out = Vec::new();
    for (label, (mut vals, missing)) in groups {
        vals.sort_by(|a, b| a.total_cmp(b));
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else {
            None
        };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        let degenerate = matches!((min, max), (Some(a), Some(b)) if a == b);
        out.push(LabelSummary {
            label,
            count,
            missing,
            min,
            max,
            mean,
            median,
            degenerate,
        });
    }
    out
}

/// Sum of the numeric values of `field` (the denominator of a pie/percent chart).
pub fn percent_total(records: &[Record], field: &str) -> f64 {
    records.iter().filter_map(|r| numeric_value(r, field)).sum()
}
