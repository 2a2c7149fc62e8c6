//! series_select
//!
//! Pick the series worth drawing together on a multi-line chart. Observations are
//! grouped by a label field; the selector keeps the largest set of labels whose value
//! ranges overlap, drops flat series, and can pin a base label. Pairs with the `sersel` CLI.
//!
//! ### Features
//! - Range-overlap selection over JSON-like records or any typed items
//! - Chart-level `auto` parameter (`true`/`false` or an override object)
//! - Load/save CSV or JSON tables, keep only selected series
//! - Per-label summary statistics, axis kind inference, annotation placement
//! - Render the selected series to SVG/PNG
//!
//! ### Example
//! ```no_run
//! use series_select::{SelectOptions, select, storage, viz};
//!
//! let rows = storage::load_records("series.csv")?;
//! let labels = select(&rows, "type", "value", &SelectOptions::default());
//! let spec = viz::ChartSpec::new("type", "year", "value");
//! viz::plot_selected(&rows, &labels, &spec, "selected.svg", 1000, 600)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod axis;
pub mod config;
pub mod filter;
pub mod models;
pub mod select;
pub mod stats;
pub mod storage;
pub mod viz;

pub use config::{AutoFilter, SelectOptions};
pub use models::{Label, Record};
pub use select::{Outcome, Selection, select, select_by};
