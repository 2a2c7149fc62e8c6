//! Visualization: render the selected series as a multi-line chart to **SVG** or **PNG**.
//!
//! - Only records whose label is in the selection are drawn, one colored line per label
//! - Distinct series colors (Microsoft Office palette), markers on every point
//! - Locale-aware tick labels (`30,000` vs `30.000`)
//! - Optional vertical marker line (e.g. a release date)
//!
//! Text (title, ticks, legend) needs a font file: the `ab_glyph` text path does not
//! discover OS fonts. Without `ChartSpec::font` the chart is drawn without text.

pub mod types;
pub mod util;

pub use types::ChartSpec;

use crate::filter::LabelSet;
use crate::models::{Label, Record, numeric_value};
use anyhow::{Context, Result, anyhow};
use num_format::{Locale, ToFormattedString};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::LineSeries;
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::Path;
use std::sync::OnceLock;

use util::{map_locale, office_color, padded_range};

/// Points of one series, in drawing order.
type Series = (Label, Vec<(f64, f64)>);

/// First registered font wins; later paths are ignored.
static FONT: OnceLock<bool> = OnceLock::new();

fn ensure_font_registered(path: &Path) -> Result<()> {
    if FONT.get().is_some() {
        return Ok(());
    }
    let bytes = std::fs::read(path).with_context(|| format!("read font {}", path.display()))?;
    // ab_glyph keeps a 'static reference for the whole process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font("sans-serif", plotters::style::FontStyle::Normal, bytes)
        .map_err(|_| anyhow!("invalid font {}", path.display()))?;
    let _ = FONT.set(true);
    Ok(())
}

/// X coordinate: JSON numbers, or strings holding a number (e.g. `"2020"`).
fn x_coord(record: &Record, field: &str) -> Option<f64> {
    numeric_value(record, field).or_else(|| {
        record
            .get(field)?
            .as_str()?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
    })
}

/// Group the admitted records into series, following the order of `selected`.
fn collect_series(records: &[Record], selected: &[Label], spec: &ChartSpec) -> Vec<Series> {
    let admitted = LabelSet::new(selected);
    let mut series: Vec<Series> = Vec::new();
    for label in selected {
        if series.iter().any(|(l, _)| l == label) {
            continue;
        }
        series.push((label.clone(), Vec::new()));
    }
    for r in records {
        if !admitted.admits(r, &spec.label_field) {
            continue;
        }
        let (Some(x), Some(y)) = (x_coord(r, &spec.x_field), numeric_value(r, &spec.value_field))
        else {
            continue;
        };
        let label = Label::of(r, &spec.label_field);
        if let Some((_, pts)) = series.iter_mut().find(|(l, _)| *l == label) {
            pts.push((x, y));
        }
    }
    for (_, pts) in series.iter_mut() {
        pts.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
    series.retain(|(_, pts)| !pts.is_empty());
    series
}

/// Plot the records whose label is in `selected`. SVG when the extension is `.svg`, PNG otherwise.
pub fn plot_selected<P: AsRef<Path>>(
    records: &[Record],
    selected: &[Label],
    spec: &ChartSpec,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    let series = collect_series(records, selected, spec);
    if series.is_empty() {
        return Err(anyhow!("no data to plot"));
    }

    let with_text = match &spec.font {
        Some(font) => {
            ensure_font_registered(font)?;
            true
        }
        None => false,
    };

    let all = || series.iter().flat_map(|(_, pts)| pts.iter());
    let (min_x, max_x) = padded_range(all().map(|p| p.0).chain(spec.marker))
        .ok_or_else(|| anyhow!("no valid x values"))?;
    let (min_y, max_y) =
        padded_range(all().map(|p| p.1)).ok_or_else(|| anyhow!("no numeric values to plot"))?;

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let num_locale = map_locale(&spec.locale);
    let bounds = ((min_x, max_x), (min_y, max_y));

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, &series, bounds, spec, num_locale, with_text)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, &series, bounds, spec, num_locale, with_text)?;
    }
    log::debug!("wrote {} series to {}", series.len(), out_path.display());
    Ok(())
}

/// Helper that draws to any Plotters backend.
#[allow(clippy::type_complexity)]
fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    series: &[Series],
    ((min_x, max_x), (min_y, max_y)): ((f64, f64), (f64, f64)),
    spec: &ChartSpec,
    num_locale: &Locale,
    with_text: bool,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if with_text {
        builder
            .caption(&spec.title, (FontFamily::SansSerif, 24))
            .set_label_area_size(LabelAreaPosition::Left, 80)
            .set_label_area_size(LabelAreaPosition::Bottom, 44);
    }
    let mut chart = builder
        .build_cartesian_2d(min_x..max_x, min_y..max_y)
        .map_err(|e| anyhow!("{:?}", e))?;

    if with_text {
        // Y uses locale thousands separators for large magnitudes
        let y_label_fmt = |v: &f64| {
            if v.abs() >= 1000.0 {
                (v.round() as i64).to_formatted_string(num_locale)
            } else {
                format!("{:.2}", v)
            }
        };
        let x_label_fmt = |x: &f64| {
            if !spec.x_ticks.is_empty() {
                // category positions: only whole positions carry a name
                return match (x.fract() == 0.0 && *x >= 0.0).then(|| *x as usize) {
                    Some(i) => spec.x_ticks.get(i).cloned().unwrap_or_default(),
                    None => String::new(),
                };
            }
            if x.fract() == 0.0 {
                format!("{}", *x as i64)
            } else {
                format!("{:.2}", x)
            }
        };
        chart
            .configure_mesh()
            .x_desc(spec.x_field.as_str())
            .y_desc(spec.value_field.as_str())
            .x_labels(12)
            .y_labels(10)
            .x_label_formatter(&x_label_fmt)
            .y_label_formatter(&y_label_fmt)
            .label_style((FontFamily::SansSerif, 14))
            .axis_desc_style((FontFamily::SansSerif, 16))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    for (idx, (label, pts)) in series.iter().enumerate() {
        let color = office_color(idx);
        let style = ShapeStyle {
            color,
            filled: false,
            stroke_width: 2,
        };

        chart
            .draw_series(LineSeries::new(pts.iter().copied(), style))
            .map_err(|e| anyhow!("{:?}", e))?
            .label(label.to_string())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], color));

        chart
            .draw_series(pts.iter().map(|&p| Circle::new(p, 3, color.filled())))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    if let Some(m) = spec.marker {
        let red = RGBColor(244, 67, 54);
        chart
            .draw_series(LineSeries::new(
                vec![(m, min_y), (m, max_y)],
                red.stroke_width(2),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    if with_text {
        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.85))
            .label_font((FontFamily::SansSerif, 14))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
