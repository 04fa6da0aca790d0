//! Generate command implementation.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use log::info;
use serde::Serialize;

use spaghetti::{RunReport, SpaghettiConfig, StrandOutcome, Termination, run};

use super::common::{CliResult, InputArgs, OutputFormat, StrandOptions, load_document, write_output};
use super::config::ConfigFile;
use super::preview::render_png;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output file (- for stdout, default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Svg)]
    pub format: OutputFormat,

    /// YAML config file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Random seed (drawn at random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Also render the resulting SVG to a PNG
    #[arg(long, value_name = "PNG")]
    pub preview: Option<PathBuf>,

    #[command(flatten)]
    pub options: StrandOptions,
}

/// A strand in JSON output format.
#[derive(Serialize)]
struct JsonStrand {
    index: usize,
    path: String,
    points: usize,
    walk_length: f64,
    curve_length: f64,
    rejections: u32,
    termination: &'static str,
}

#[derive(Serialize)]
struct JsonBox {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

/// JSON output for a whole run.
#[derive(Serialize)]
struct JsonRun {
    generated_at: String,
    seed: u64,
    bbox: JsonBox,
    grid_rows: usize,
    grid_cols: usize,
    regions: usize,
    stroke_color: String,
    stroke_width: f64,
    handles: &'static str,
    strands: Vec<JsonStrand>,
    skipped: usize,
    failed: usize,
}

/// Resolve the run configuration: defaults, then the config file, then flags.
/// Returns the config and the seed the file asked for, if any.
pub fn resolve_config(
    config_path: Option<&std::path::Path>,
    options: &StrandOptions,
) -> CliResult<(SpaghettiConfig, Option<u64>)> {
    let mut config = SpaghettiConfig::default();
    let mut file_seed = None;
    if let Some(path) = config_path {
        let file = ConfigFile::load(path)?;
        file.apply_to(&mut config)?;
        file_seed = file.seed;
    }
    options.apply_to(&mut config)?;
    Ok((config, file_seed))
}

/// Execute the generate command.
pub fn cmd_generate(args: &GenerateArgs) -> CliResult {
    let (mut config, file_seed) = resolve_config(args.config.as_deref(), &args.options)?;
    let mut doc = load_document(&args.input, &mut config)?;

    let seed = args.seed.or(file_seed).unwrap_or_else(rand::random);
    info!("seed {}", seed);

    let start = Instant::now();
    let report = run(&mut doc, &config, seed)?;
    eprintln!(
        "Generated {} of {} strands in {:?} (seed {})",
        report.drawn_count(),
        config.num_strands,
        start.elapsed(),
        seed
    );
    if report.failed_count() > 0 {
        eprintln!("{} strands failed; see log for details", report.failed_count());
    }

    let svg = doc.to_svg_string()?;
    if let Some(png) = &args.preview {
        render_png(&svg, png)?;
        eprintln!("Preview written to: {}", png.display());
    }

    let output = match args.format {
        OutputFormat::Svg => svg,
        OutputFormat::Json => serde_json::to_string_pretty(&json_report(&report, &config))?,
    };
    write_output(args.output.as_deref(), &output)
}

fn json_report(report: &RunReport, config: &SpaghettiConfig) -> JsonRun {
    let strands = report
        .strands
        .iter()
        .enumerate()
        .filter_map(|(index, outcome)| match outcome {
            StrandOutcome::Drawn(s) => Some(JsonStrand {
                index,
                path: s.path_data.clone(),
                points: s.point_count,
                walk_length: s.walk_length,
                curve_length: s.curve_length,
                rejections: s.rejections,
                termination: match s.termination {
                    Termination::LengthReached => "length",
                    Termination::Stuck => "stuck",
                },
            }),
            _ => None,
        })
        .collect();

    let (x_min, y_min, x_max, y_max) = report.bbox.as_tuple();
    JsonRun {
        generated_at: chrono::Utc::now().to_rfc3339(),
        seed: report.seed,
        bbox: JsonBox { x_min, y_min, x_max, y_max },
        grid_rows: report.grid_rows,
        grid_cols: report.grid_cols,
        regions: report.region_count,
        stroke_color: config.stroke_color.clone(),
        stroke_width: report.stroke_width,
        handles: config.handles.name(),
        strands,
        skipped: report.skipped_count(),
        failed: report.failed_count(),
    }
}
