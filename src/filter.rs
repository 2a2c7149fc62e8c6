//! Downstream helpers applied to records around a selection.

use crate::models::{Label, Record};
use ahash::AHashSet;
use serde_json::Value;

/// Values below this are treated as zero before plotting.
pub const NOISE_FLOOR: f64 = 1e-4;

/// Exact-membership predicate over a selection.
#[derive(Debug, Clone, Default)]
pub struct LabelSet {
    labels: AHashSet<Label>,
}

impl LabelSet {
    pub fn new<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a Label>,
    {
        Self {
            labels: labels.into_iter().cloned().collect(),
        }
    }

    pub fn contains(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }

    /// Whether the record's `label_field` is one of the selected labels.
    pub fn admits(&self, record: &Record, label_field: &str) -> bool {
        self.contains(&Label::of(record, label_field))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Records whose label is in `selected`, in input order.
pub fn retain_selected(records: &[Record], label_field: &str, selected: &[Label]) -> Vec<Record> {
    let set = LabelSet::new(selected);
    records
        .iter()
        .filter(|r| set.admits(r, label_field))
        .cloned()
        .collect()
}

/// Replace numeric values of `value_field` below `floor` with `0`. Returns how many changed.
///
/// Mutates the records in place; non-numeric values are left alone.
pub fn clamp_noise_floor(records: &mut [Record], value_field: &str, floor: f64) -> usize {
    let mut changed = 0;
    for r in records.iter_mut() {
        let clamp = match r.get(value_field) {
            // exact zeros are already clamped
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v < floor && v != 0.0),
            _ => false,
        };
        if clamp {
            r.insert(value_field.to_string(), Value::from(0));
            changed += 1;
        }
    }
    changed
}
