//! Range-overlap series selection (the chart "auto filter").
//!
//! Given labeled numeric observations, pick the largest set of labels whose value
//! ranges overlap a common pivot range, so a multi-line chart only shows series that
//! live on a comparable scale.
//!
//! ### Algorithm
//! 1. Keep observations with a numeric value and sort a private copy ascending by
//!    value (stable, so equal values keep input order). The caller's slice is never
//!    reordered.
//! 2. Group by label. Groups are visited in order of first appearance in the sorted
//!    copy, i.e. by ascending minimum; this order also decides ties.
//! 3. Flat groups (min == max) leave the comparison pool, unless they carry the base label.
//! 4. With a base label, only it pivots. Otherwise every pooled label pivots and the
//!    first strictly largest candidate set wins.
//! 5. If nothing is left to compare, every flat label is returned.
//!
//! ### Example
//! ```
//! use series_select::select::select;
//! use series_select::config::SelectOptions;
//! use series_select::models::{Label, Record};
//! use serde_json::json;
//!
//! let rows: Vec<Record> = [
//!     json!({"type": "A", "v": 1}), json!({"type": "A", "v": 3}),
//!     json!({"type": "B", "v": 2}), json!({"type": "B", "v": 8}),
//!     json!({"type": "C", "v": 10}), json!({"type": "C", "v": 12}),
//! ]
//! .iter()
//! .filter_map(|v| v.as_object().cloned())
//! .collect();
//!
//! let picked = select(&rows, "type", "v", &SelectOptions::default());
//! assert_eq!(picked, vec![Label::from("A"), Label::from("B")]);
//! ```

use crate::config::SelectOptions;
use crate::models::{Label, Record, numeric_value};
use ahash::AHashMap;
use std::cmp::Ordering;
use std::hash::Hash;

/// How a selection was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<L> {
    /// The base label was the only pivot.
    Pinned,
    /// The candidate set built around `pivot` was the largest.
    BestPivot { pivot: L },
    /// No range to compare against; all flat labels were returned.
    DegenerateFallback,
}

/// Selected labels plus the bookkeeping behind them.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<L> {
    pub labels: Vec<L>,
    pub outcome: Outcome<L>,
    /// Flat labels removed from the comparison pool, in visiting order.
    pub degenerate: Vec<L>,
}

#[derive(Debug)]
struct Group<L> {
    label: L,
    min: f64,
    max: f64,
}

impl<L> Group<L> {
    fn is_flat(&self) -> bool {
        self.min == self.max
    }

    /// Closed-interval overlap with `self` as pivot. A flat pivot overlaps nothing.
    fn overlaps(&self, other: &Group<L>) -> bool {
        other.max >= self.min && other.min <= self.max && !self.is_flat()
    }
}

/// Sort numeric observations and fold them into per-label ranges, in first-seen order.
fn build_groups<L>(mut obs: Vec<(L, f64)>) -> Vec<Group<L>>
where
    L: Eq + Hash + Clone,
{
    obs.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut index: AHashMap<L, usize> = AHashMap::new();
    let mut groups: Vec<Group<L>> = Vec::new();
    for (label, v) in obs {
        match index.get(&label) {
            // sorted input: the latest value is the new maximum
            Some(&i) => groups[i].max = v,
            None => {
                index.insert(label.clone(), groups.len());
                groups.push(Group { label, min: v, max: v });
            }
        }
    }
    groups
}

/// Pivot first, then overlapping pool members in visiting order, capped at `cap`.
fn candidate_set<L>(pivot: &Group<L>, pool: &[&Group<L>], cap: usize) -> Vec<L>
where
    L: Eq + Clone,
{
    let mut out = vec![pivot.label.clone()];
    for g in pool {
        if out.len() >= cap {
            break;
        }
        // pool is ordered by minimum: nothing after this can reach the pivot range
        if g.min > pivot.max {
            break;
        }
        if g.label != pivot.label && pivot.overlaps(g) {
            out.push(g.label.clone());
        }
    }
    out
}

/// Run the selector over arbitrary items, with accessors for the label and the value.
///
/// `value_of` returning `None` (or NaN) keeps the item out of every group.
pub fn select_detailed_by<T, L, FL, FV>(
    items: &[T],
    label_of: FL,
    value_of: FV,
    opts: &SelectOptions<L>,
) -> Selection<L>
where
    L: Eq + Hash + Clone,
    FL: Fn(&T) -> L,
    FV: Fn(&T) -> Option<f64>,
{
    let cap = if opts.max_size == 0 {
        log::warn!("max_size 0 treated as 1");
        1
    } else {
        opts.max_size
    };
    let base = opts.base_label.as_ref();

    let obs: Vec<(L, f64)> = items
        .iter()
        .filter_map(|it| match value_of(it) {
            Some(v) if !v.is_nan() => Some((label_of(it), v)),
            _ => None,
        })
        .collect();
    let groups = build_groups(obs);

    let mut pool: Vec<&Group<L>> = Vec::with_capacity(groups.len());
    let mut degenerate: Vec<L> = Vec::new();
    for g in &groups {
        if g.is_flat() && base != Some(&g.label) {
            degenerate.push(g.label.clone());
        } else {
            pool.push(g);
        }
    }
    log::debug!(
        "auto filter: {} groups, {} flat, cap {}",
        groups.len(),
        degenerate.len(),
        cap
    );

    if let Some(base) = base {
        let labels = match pool.iter().find(|g| &g.label == base) {
            Some(pivot) => candidate_set(pivot, &pool, cap),
            None => vec![base.clone()],
        };
        return Selection {
            labels,
            outcome: Outcome::Pinned,
            degenerate,
        };
    }

    let mut best: Option<Vec<L>> = None;
    for pivot in &pool {
        let set = candidate_set(pivot, &pool, cap);
        if best.as_ref().is_none_or(|b| set.len() > b.len()) {
            let full = set.len() >= cap;
            best = Some(set);
            if full {
                break;
            }
        }
    }

    match best {
        Some(labels) => {
            let pivot = labels[0].clone();
            Selection {
                labels,
                outcome: Outcome::BestPivot { pivot },
                degenerate,
            }
        }
        None => Selection {
            labels: degenerate.clone(),
            outcome: Outcome::DegenerateFallback,
            degenerate,
        },
    }
}

/// Labels selected from arbitrary items.
pub fn select_by<T, L, FL, FV>(items: &[T], label_of: FL, value_of: FV, opts: &SelectOptions<L>) -> Vec<L>
where
    L: Eq + Hash + Clone,
    FL: Fn(&T) -> L,
    FV: Fn(&T) -> Option<f64>,
{
    select_detailed_by(items, label_of, value_of, opts).labels
}

/// Run the selector over records, reading `label_field` and `value_field`.
///
/// Only JSON numbers count as values; a missing label field groups under `Label::Null`.
pub fn select_detailed(
    records: &[Record],
    label_field: &str,
    value_field: &str,
    opts: &SelectOptions<Label>,
) -> Selection<Label> {
    select_detailed_by(
        records,
        |r| Label::of(r, label_field),
        |r| numeric_value(r, value_field),
        opts,
    )
}

/// Labels worth plotting together. See the module docs for the rules.
pub fn select(
    records: &[Record],
    label_field: &str,
    value_field: &str,
    opts: &SelectOptions<Label>,
) -> Vec<Label> {
    select_detailed(records, label_field, value_field, opts).labels
}
