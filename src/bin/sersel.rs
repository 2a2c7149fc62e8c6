use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use series_select::config::{AutoFilter, AutoFilterParams, DEFAULT_MAX_SIZE, ResolvedAutoFilter};
use series_select::models::{Label, Record, resolve_label};
use series_select::select::{Outcome, select_detailed};
use series_select::{SelectOptions, axis, filter, stats, storage, viz};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sersel",
    version,
    about = "Select the comparable series of a multi-line chart"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the selected labels, one per line.
    Select(SelectCmd),
    /// Write only the records of the selected labels.
    Filter(FilterCmd),
    /// Render the selected series as a line chart.
    Plot(PlotCmd),
    /// Print per-label statistics.
    Stats(StatsCmd),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct SelectArgs {
    /// Input table (.csv or .json array of objects)
    #[arg(short, long)]
    input: PathBuf,
    /// Field that names each series
    #[arg(short, long)]
    label: String,
    /// Numeric field compared across series
    #[arg(short, long)]
    value: String,
    /// Maximum number of labels to keep
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE)]
    max_size: usize,
    /// Label that is always kept (matched by its text)
    #[arg(long)]
    base_label: Option<String>,
    /// Chart `auto` parameter as JSON: true, false, or an override object
    #[arg(long)]
    auto: Option<String>,
}

#[derive(Args, Debug)]
struct SelectCmd {
    #[command(flatten)]
    sel: SelectArgs,
    /// Report how the selection was reached on stderr.
    #[arg(long, default_value_t = false)]
    explain: bool,
}

#[derive(Args, Debug)]
struct FilterCmd {
    #[command(flatten)]
    sel: SelectArgs,
    /// Output file (format inferred by --format or extension).
    #[arg(long)]
    out: PathBuf,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Order the saved rows by this field (numbers or years; other values last)
    #[arg(long)]
    sort: Option<String>,
}

#[derive(Args, Debug)]
struct PlotCmd {
    #[command(flatten)]
    sel: SelectArgs,
    /// Field on the horizontal axis
    #[arg(short = 'x', long)]
    x: String,
    /// Chart path (.svg or .png)
    #[arg(long)]
    plot: PathBuf,
    /// Width of the plot (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the plot (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// TrueType font for title, ticks and legend
    #[arg(long)]
    font: Option<PathBuf>,
    /// Chart title
    #[arg(long, default_value = "Selected series")]
    title: String,
    /// Locale for tick labels (en, de, fr, ...)
    #[arg(long, default_value = "en")]
    locale: String,
    /// Draw a vertical marker at this x value: a number, a year, or a `YYYY-MM-DD` date on a date axis
    #[arg(long)]
    marker: Option<String>,
    /// Zero values below the noise floor before plotting
    #[arg(long, default_value_t = false)]
    clamp: bool,
}

#[derive(Args, Debug)]
struct StatsCmd {
    #[arg(short, long)]
    input: PathBuf,
    #[arg(short, long)]
    label: String,
    #[arg(short, long)]
    value: String,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Select(args) => cmd_select(args),
        Command::Filter(args) => cmd_filter(args),
        Command::Plot(args) => cmd_plot(args),
        Command::Stats(args) => cmd_stats(args),
    }
}

/// Merge command-line flags and the optional `--auto` object. `None` when filtering is off.
///
/// `--base-label` is matched against the label field in effect, which `--auto` may replace.
fn resolve(args: &SelectArgs, records: &[Record]) -> Result<Option<ResolvedAutoFilter>> {
    let params = match args.auto.as_deref() {
        None => AutoFilterParams::default(),
        Some(json) => match AutoFilter::parse(json)? {
            AutoFilter::Off => return Ok(None),
            AutoFilter::On(p) => p,
        },
    };
    let label_field = params.label_field.unwrap_or_else(|| args.label.clone());
    let value_field = params.value_field.unwrap_or_else(|| args.value.clone());
    let base_label = params.base_label.or_else(|| {
        args.base_label
            .as_deref()
            .map(|t| resolve_label(records, &label_field, t))
    });
    Ok(Some(ResolvedAutoFilter {
        label_field,
        value_field,
        options: SelectOptions {
            max_size: params.max_size.unwrap_or(args.max_size),
            base_label,
        },
    }))
}

/// Fields in effect plus the selected labels.
struct Picked {
    label_field: String,
    value_field: String,
    labels: Vec<Label>,
}

/// Selected labels, or every label in first-seen order when filtering is off.
fn selected_labels(args: &SelectArgs, records: &[Record], explain: bool) -> Result<Picked> {
    match resolve(args, records)? {
        Some(r) => {
            let sel = select_detailed(records, &r.label_field, &r.value_field, &r.options);
            if explain {
                match &sel.outcome {
                    Outcome::Pinned => eprintln!("pinned to base label"),
                    Outcome::BestPivot { pivot } => eprintln!("best pivot: {}", pivot),
                    Outcome::DegenerateFallback => eprintln!("no comparable range; flat labels only"),
                }
                if !sel.degenerate.is_empty() {
                    let flat: Vec<String> = sel.degenerate.iter().map(|l| l.to_string()).collect();
                    eprintln!("flat: {}", flat.join(", "));
                }
            }
            Ok(Picked {
                label_field: r.label_field,
                value_field: r.value_field,
                labels: sel.labels,
            })
        }
        None => {
            let mut all: Vec<Label> = Vec::new();
            for l in records.iter().map(|r| Label::of(r, &args.label)) {
                if !all.contains(&l) {
                    all.push(l);
                }
            }
            Ok(Picked {
                label_field: args.label.clone(),
                value_field: args.value.clone(),
                labels: all,
            })
        }
    }
}

fn cmd_select(args: SelectCmd) -> Result<()> {
    let records = storage::load_records(&args.sel.input)?;
    let picked = selected_labels(&args.sel, &records, args.explain)?;
    for l in picked.labels {
        println!("{}", l);
    }
    Ok(())
}

fn cmd_filter(args: FilterCmd) -> Result<()> {
    let records = storage::load_records(&args.sel.input)?;
    let picked = selected_labels(&args.sel, &records, false)?;
    let mut kept = filter::retain_selected(&records, &picked.label_field, &picked.labels);
    if let Some(field) = &args.sort {
        axis::sort_ticks(&mut kept, field);
    }

    let fmt = match args.format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => args.out.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_csv(&kept, &args.out)?,
        "json" => storage::save_json(&kept, &args.out)?,
        other => anyhow::bail!("unsupported format: {}", other),
    }
    eprintln!("Saved {} rows to {}", kept.len(), args.out.display());
    Ok(())
}

fn cmd_plot(args: PlotCmd) -> Result<()> {
    let mut records = storage::load_records(&args.sel.input)?;
    let picked = selected_labels(&args.sel, &records, false)?;
    if args.clamp {
        let n = filter::clamp_noise_floor(&mut records, &picked.value_field, filter::NOISE_FLOOR);
        log::info!("clamped {} values below the noise floor", n);
    }

    let mut spec = viz::ChartSpec::new(&picked.label_field, &args.x, &picked.value_field);
    spec.title = args.title;
    spec.locale = args.locale;
    spec.font = args.font;

    let marker = args.marker.as_deref().map(str::trim);
    if axis::infer_axis_kind(&records, &args.x) == Some(axis::AxisKind::TimeCategory) {
        // dates are drawn one category per day, at their chronological position
        spec.marker = match marker {
            Some(m) => {
                let pos = axis::annotation_position(&records, &args.x, &Value::from(m))
                    .ok_or_else(|| anyhow::anyhow!("--marker {} is not a value of {}", m, args.x))?;
                Some(pos as f64)
            }
            None => None,
        };
        spec.x_ticks = axis::index_categories(&mut records, &args.x)
            .iter()
            .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
            .collect();
    } else {
        spec.marker = marker
            .map(|m| {
                m.parse::<f64>()
                    .map_err(|_| anyhow::anyhow!("invalid --marker, expected a number on the x axis: {}", m))
            })
            .transpose()?;
    }

    viz::plot_selected(&records, &picked.labels, &spec, &args.plot, args.width, args.height)?;
    eprintln!("Wrote plot to {}", args.plot.display());
    Ok(())
}

fn cmd_stats(args: StatsCmd) -> Result<()> {
    let records = storage::load_records(&args.input)?;
    for s in stats::label_summary(&records, &args.label, &args.value) {
        println!(
            "{}  count={} missing={}  min={} max={} mean={} median={}{}",
            s.label,
            s.count,
            s.missing,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median),
            if s.degenerate { "  (flat)" } else { "" }
        );
    }
    Ok(())
}
