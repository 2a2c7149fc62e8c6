//! Degenerate input, base-label pinning, and non-numeric values.

use serde_json::{Value, json};
use series_select::models::{Label, Record};
use series_select::select::{Outcome, select, select_detailed};
use series_select::SelectOptions;

fn rows(vals: Vec<Value>) -> Vec<Record> {
    vals.into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect()
}

fn abc() -> Vec<Record> {
    let mut v = Vec::new();
    for (label, vals) in [("A", [1, 2, 3]), ("B", [2, 5, 8]), ("C", [10, 11, 12])] {
        for x in vals {
            v.push(json!({"type": label, "value": x}));
        }
    }
    rows(v)
}

#[test]
fn all_flat_input_returns_every_label() {
    let data = rows(vec![
        json!({"type": "A", "value": 5}),
        json!({"type": "A", "value": 5}),
        json!({"type": "B", "value": 5}),
        json!({"type": "C", "value": 9}),
        json!({"type": "C", "value": 9}),
    ]);
    let sel = select_detailed(&data, "type", "value", &SelectOptions::default());
    assert_eq!(sel.outcome, Outcome::DegenerateFallback);
    let mut got = sel.labels.clone();
    got.sort();
    assert_eq!(got, vec![Label::from("A"), Label::from("B"), Label::from("C")]);
}

#[test]
fn empty_input_yields_empty_result() {
    let got = select(&[], "type", "value", &SelectOptions::default());
    assert!(got.is_empty());
}

#[test]
fn base_label_is_pinned_even_without_partners() {
    let data = abc();
    let opts = SelectOptions::default().with_base_label(Label::from("C"));
    let sel = select_detailed(&data, "type", "value", &opts);
    assert_eq!(sel.outcome, Outcome::Pinned);
    assert_eq!(sel.labels, vec![Label::from("C")]);
}

#[test]
fn base_label_pivots_and_collects_overlaps() {
    let data = abc();
    let opts = SelectOptions::default().with_base_label(Label::from("B"));
    let got = select(&data, "type", "value", &opts);
    assert_eq!(got, vec![Label::from("B"), Label::from("A")]);
}

#[test]
fn base_label_counts_toward_the_cap() {
    let mut v = Vec::new();
    for label in ["A", "B", "C", "D"] {
        v.push(json!({"type": label, "value": 0}));
        v.push(json!({"type": label, "value": 10}));
    }
    let data = rows(v);
    let opts = SelectOptions::default()
        .with_max_size(2)
        .with_base_label(Label::from("D"));
    let got = select(&data, "type", "value", &opts);
    assert_eq!(got, vec![Label::from("D"), Label::from("A")]);
}

#[test]
fn flat_base_label_stays_but_matches_nothing() {
    let data = rows(vec![
        json!({"type": "base", "value": 4}),
        json!({"type": "base", "value": 4}),
        json!({"type": "A", "value": 0}),
        json!({"type": "A", "value": 10}),
    ]);
    let opts = SelectOptions::default().with_base_label(Label::from("base"));
    let sel = select_detailed(&data, "type", "value", &opts);
    assert_eq!(sel.labels, vec![Label::from("base")]);
    assert!(sel.degenerate.is_empty());
}

#[test]
fn base_label_absent_from_data_is_still_returned() {
    let opts = SelectOptions::default().with_base_label(Label::from("ghost"));
    assert_eq!(select(&abc(), "type", "value", &opts), vec![Label::from("ghost")]);
    assert_eq!(select(&[], "type", "value", &opts), vec![Label::from("ghost")]);
}

#[test]
fn string_values_never_form_a_group() {
    let mut data = abc();
    data.extend(rows(vec![
        json!({"type": "S", "value": "2"}),
        json!({"type": "S", "value": "3"}),
        json!({"type": "N", "value": null}),
        json!({"type": "M"}),
    ]));
    let got = select(&data, "type", "value", &SelectOptions::default());
    for bad in ["S", "N", "M"] {
        assert!(!got.contains(&Label::from(bad)), "{bad} must not be selected");
    }

    let only_strings = rows(vec![
        json!({"type": "S", "value": "1"}),
        json!({"type": "S", "value": "9"}),
    ]);
    assert!(select(&only_strings, "type", "value", &SelectOptions::default()).is_empty());
}

#[test]
fn missing_label_field_groups_under_null() {
    let data = rows(vec![
        json!({"value": 1}),
        json!({"value": 3}),
        json!({"type": "A", "value": 2}),
        json!({"type": "A", "value": 6}),
    ]);
    let got = select(&data, "type", "value", &SelectOptions::default());
    assert_eq!(got, vec![Label::Null, Label::from("A")]);
}
