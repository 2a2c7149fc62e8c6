use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One row of tabular input: field name -> JSON value.
pub type Record = serde_json::Map<String, Value>;

/// Grouping key of a series.
///
/// Built from the JSON scalar found in the label field. Numbers keep their
/// canonical text (`1`, `2.5`) so they hash and compare exactly; integral floats
/// are written as integers, so `1.0` and `1` are the same label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "Value", into = "Value")]
pub enum Label {
    Null,
    Bool(bool),
    Number(String),
    Text(String),
}

impl Label {
    /// Label of a raw JSON value. Arrays and objects collapse to their compact JSON text.
    pub fn from_value(v: &Value) -> Self {
        match v {
            Value::Null => Label::Null,
            Value::Bool(b) => Label::Bool(*b),
            Value::Number(n) => Label::Number(number_text(n)),
            Value::String(s) => Label::Text(s.clone()),
            other => Label::Text(other.to_string()),
        }
    }

    /// Label stored under `field`; a missing field is `Null`.
    pub fn of(record: &Record, field: &str) -> Self {
        record.get(field).map(Label::from_value).unwrap_or(Label::Null)
    }

    /// Convert back into a JSON value (numbers are re-parsed from their text).
    pub fn to_value(&self) -> Value {
        match self {
            Label::Null => Value::Null,
            Label::Bool(b) => Value::Bool(*b),
            Label::Number(s) => serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.clone())),
            Label::Text(s) => Value::String(s.clone()),
        }
    }
}

/// Largest integer an `f64` holds exactly (2^53).
const EXACT_INT: f64 = 9_007_199_254_740_992.0;

fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= EXACT_INT => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

impl From<Value> for Label {
    fn from(v: Value) -> Self {
        Label::from_value(&v)
    }
}

impl From<Label> for Value {
    fn from(l: Label) -> Self {
        l.to_value()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Null => f.write_str("null"),
            Label::Bool(b) => write!(f, "{b}"),
            Label::Number(s) | Label::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Text(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::Text(s)
    }
}

impl From<i64> for Label {
    fn from(n: i64) -> Self {
        Label::Number(n.to_string())
    }
}

/// Numeric value of `field`, if it holds a JSON number.
///
/// Strings are never coerced, even when they look numeric.
pub fn numeric_value(record: &Record, field: &str) -> Option<f64> {
    match record.get(field)? {
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Find the label whose display text equals `text` among the labels present in `records`.
///
/// Falls back to a `Text` label when nothing matches, so a command-line base label
/// that is absent from the data still pins itself into the result.
pub fn resolve_label(records: &[Record], field: &str, text: &str) -> Label {
    records
        .iter()
        .map(|r| Label::of(r, field))
        .find(|l| l.to_string() == text)
        .unwrap_or_else(|| Label::Text(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(v: Value) -> Record {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn labels_from_scalars() {
        assert_eq!(Label::from_value(&json!("DEU")), Label::Text("DEU".into()));
        assert_eq!(Label::from_value(&json!(3)), Label::Number("3".into()));
        assert_eq!(Label::from_value(&json!(true)), Label::Bool(true));
        assert_eq!(Label::from_value(&json!([1, 2])), Label::Text("[1,2]".into()));
        assert_eq!(Label::of(&rec(json!({"x": 1})), "type"), Label::Null);
    }

    #[test]
    fn number_and_text_labels_stay_distinct() {
        assert_ne!(Label::from_value(&json!(1)), Label::from_value(&json!("1")));
        assert_eq!(Label::Number("2.5".into()).to_value(), json!(2.5));
    }

    #[test]
    fn integral_floats_share_the_integer_label() {
        assert_eq!(Label::from_value(&json!(1.0)), Label::from_value(&json!(1)));
        assert_eq!(Label::from_value(&json!(-0.0)), Label::Number("0".into()));
        assert_eq!(Label::from_value(&json!(1.5)), Label::Number("1.5".into()));
        assert_eq!(Label::from_value(&json!(1.0)).to_value(), json!(1));
    }

    #[test]
    fn only_json_numbers_are_numeric() {
        let r = rec(json!({"a": 1.5, "b": "2", "c": null}));
        assert_eq!(numeric_value(&r, "a"), Some(1.5));
        assert_eq!(numeric_value(&r, "b"), None);
        assert_eq!(numeric_value(&r, "c"), None);
        assert_eq!(numeric_value(&r, "missing"), None);
    }

    #[test]
    fn resolve_prefers_labels_in_data() {
        let rows = vec![rec(json!({"type": 7, "v": 1})), rec(json!({"type": "a", "v": 2}))];
        assert_eq!(resolve_label(&rows, "type", "7"), Label::Number("7".into()));
        assert_eq!(resolve_label(&rows, "type", "zz"), Label::Text("zz".into()));
    }
}
