//! Axis helpers: scale kind inference, tick ordering, and annotation placement.

use crate::models::Record;
use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// How an axis field should be scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    /// Continuous numeric axis.
    Linear,
    /// `YYYY-MM-DD` dates, one category per day.
    TimeCategory,
    /// `YYYY` years as ordered categories.
    Category,
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^[0-9]{4}-(",
            r"((0[13578]|10|12)-(0[1-9]|[12][0-9]|3[01]))",
            r"|(02-(0[1-9]|[12][0-9]))",
            r"|((0[469]|11)-(0[1-9]|[12][0-9]|30))",
            r")$"
        ))
        .expect("static date regex")
    })
}

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{4}$").expect("static year regex"))
}

/// Classify a single value.
pub fn classify(v: &Value) -> Option<AxisKind> {
    match v {
        Value::Number(_) => Some(AxisKind::Linear),
        Value::String(s) if date_re().is_match(s) => Some(AxisKind::TimeCategory),
        Value::String(s) if year_re().is_match(s) => Some(AxisKind::Category),
        _ => None,
    }
}

/// Axis kind of `field`, judged from the first record only.
pub fn infer_axis_kind(records: &[Record], field: &str) -> Option<AxisKind> {
    classify(records.first()?.get(field)?)
}

fn tick_key(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
        _ => None,
    }
}

/// Stable sort by the numeric value of `field` (numbers or numeric strings).
/// Records without a usable key move to the end, keeping their order.
pub fn sort_ticks(records: &mut [Record], field: &str) {
    records.sort_by(|a, b| match (tick_key(a.get(field)), tick_key(b.get(field))) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn as_date(v: &Value) -> Option<NaiveDate> {
    let s = v.as_str().map(str::to_string).or_else(|| v.as_i64().map(|n| n.to_string()))?;
    if year_re().is_match(&s) {
        let year = s.parse::<i32>().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Distinct values of `x_field` (first occurrence wins) in chronological order.
///
/// Values that are not dates or years keep their relative order after all dates.
pub fn category_ticks(records: &[Record], x_field: &str) -> Vec<Value> {
    let mut xs: Vec<Value> = Vec::new();
    for r in records {
        if let Some(x) = r.get(x_field) {
            if !xs.contains(x) {
                xs.push(x.clone());
            }
        }
    }
    xs.sort_by(|a, b| match (as_date(a), as_date(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    xs
}

/// Position of `marker` among the distinct, chronologically ordered values of `x_field`.
pub fn annotation_position(records: &[Record], x_field: &str, marker: &Value) -> Option<usize> {
    category_ticks(records, x_field).iter().position(|x| x == marker)
}

/// Replace each value of `x_field` with its position in [`category_ticks`], so a
/// category axis can be drawn on a numeric scale. Returns the ticks.
pub fn index_categories(records: &mut [Record], x_field: &str) -> Vec<Value> {
    let ticks = category_ticks(records, x_field);
    for r in records.iter_mut() {
        let pos = r.get(x_field).and_then(|x| ticks.iter().position(|t| t == x));
        if let Some(i) = pos {
            r.insert(x_field.to_string(), Value::from(i));
        }
    }
    ticks
}
