//! The generic selector over typed items.

use series_select::select::{Outcome, select_by, select_detailed_by};
use series_select::SelectOptions;

#[derive(Debug, Clone)]
struct Reading {
    sensor: &'static str,
    celsius: Option<f64>,
}

fn r(sensor: &'static str, celsius: Option<f64>) -> Reading {
    Reading { sensor, celsius }
}

#[test]
fn typed_items_use_accessors() {
    let items = vec![
        r("in", Some(20.0)),
        r("in", Some(23.5)),
        r("out", Some(-3.0)),
        r("out", Some(21.0)),
        r("cpu", Some(60.0)),
        r("cpu", Some(80.0)),
        r("broken", None),
    ];
    let got = select_by(&items, |x| x.sensor, |x| x.celsius, &SelectOptions::default());
    assert_eq!(got, vec!["out", "in"]);
}

#[test]
fn nan_is_treated_as_missing() {
    let items = vec![
        r("a", Some(f64::NAN)),
        r("a", Some(1.0)),
        r("a", Some(1.0)),
        r("b", Some(f64::NAN)),
    ];
    let sel = select_detailed_by(&items, |x| x.sensor, |x| x.celsius, &SelectOptions::default());
    assert_eq!(sel.outcome, Outcome::DegenerateFallback);
    assert_eq!(sel.labels, vec!["a"]);
}

#[test]
fn infinite_values_still_count() {
    let items = vec![
        r("a", Some(f64::NEG_INFINITY)),
        r("a", Some(0.0)),
        r("b", Some(-5.0)),
        r("b", Some(5.0)),
    ];
    let got = select_by(&items, |x| x.sensor, |x| x.celsius, &SelectOptions::default());
    assert_eq!(got, vec!["a", "b"]);
}

#[test]
fn integer_labels_work_with_base() {
    let items: Vec<(u32, f64)> = vec![(1, 0.0), (1, 2.0), (2, 1.0), (2, 3.0), (3, 50.0), (3, 60.0)];
    let opts = SelectOptions::default().with_base_label(3u32);
    assert_eq!(select_by(&items, |x| x.0, |x| Some(x.1), &opts), vec![3]);
}
