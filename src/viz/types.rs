//! Public types for the visualization module.

use std::path::PathBuf;

/// What to draw and how to label it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Field that names each series.
    pub label_field: String,
    /// Numeric (or year) field on the horizontal axis.
    pub x_field: String,
    /// Numeric field on the vertical axis.
    pub value_field: String,
    pub title: String,
    /// Locale tag for tick labels (`en`, `de`, ...).
    pub locale: String,
    /// TrueType font used for title, ticks and legend.
    /// Without one the chart is drawn without any text.
    pub font: Option<PathBuf>,
    /// X position of a vertical marker line (e.g. a release date).
    pub marker: Option<f64>,
    /// Tick names of a category axis whose x values are positions (`0`, `1`, ...).
    pub x_ticks: Vec<String>,
}

impl ChartSpec {
    pub fn new(label_field: &str, x_field: &str, value_field: &str) -> Self {
        Self {
            label_field: label_field.to_string(),
            x_field: x_field.to_string(),
            value_field: value_field.to_string(),
            title: "Selected series".to_string(),
            locale: "en".to_string(),
            font: None,
            marker: None,
            x_ticks: Vec::new(),
        }
    }
}
