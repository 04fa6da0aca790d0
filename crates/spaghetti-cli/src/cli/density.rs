//! Density command: dump the density map a run would walk over.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use spaghetti::{BoundingBox, DensityGrid, DocumentAdapter, SpaghettiConfig, SpaghettiError};

use super::common::{CliResult, InputArgs, StrandOptions, load_document, write_output};
use super::generate::resolve_config;

#[derive(Args, Debug)]
pub struct DensityArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Emit the grid as JSON instead of ASCII
    #[arg(long)]
    pub json: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// YAML config file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub options: StrandOptions,
}

#[derive(Serialize)]
struct JsonGrid {
    x_min: f64,
    y_min: f64,
    resolution: f64,
    rows: usize,
    cols: usize,
    regions: usize,
    dense_fraction: f64,
    /// Row-major densities.
    cells: Vec<Vec<f64>>,
}

/// Build the grid `run` would build for this document and config.
pub fn build_grid<D: DocumentAdapter + ?Sized>(
    doc: &D,
    config: &SpaghettiConfig,
) -> CliResult<(DensityGrid, BoundingBox, usize)> {
    config.validate()?;
    let bbox = doc
        .bounding_box(config.use_page)
        .ok_or(SpaghettiError::NoBoundingBox)?
        .shrink(config.margin)?;
    let regions = doc.filled_regions();
    let grid = DensityGrid::build(
        &bbox,
        config.sample_resolution,
        &regions,
        config.min_density,
        config.max_density,
    )?;
    Ok((grid, bbox, regions.len()))
}

/// Execute the density command.
pub fn cmd_density(args: &DensityArgs) -> CliResult {
    let (mut config, _) = resolve_config(args.config.as_deref(), &args.options)?;
    let doc = load_document(&args.input, &mut config)?;
    let (grid, bbox, region_count) = build_grid(&doc, &config)?;

    let dense_fraction = grid.dense_fraction(config.max_density);
    eprintln!(
        "Density map {}x{} (cell {}) from {} filled regions, {:.0}% dense",
        grid.cols(),
        grid.rows(),
        grid.resolution(),
        region_count,
        dense_fraction * 100.0
    );

    let output = if args.json {
        let cells = grid.cells().chunks(grid.cols()).map(<[f64]>::to_vec).collect();
        let json = JsonGrid {
            x_min: bbox.x_min(),
            y_min: bbox.y_min(),
            resolution: grid.resolution(),
            rows: grid.rows(),
            cols: grid.cols(),
            regions: region_count,
            dense_fraction,
            cells,
        };
        serde_json::to_string_pretty(&json)?
    } else {
        grid.to_ascii(config.max_density)
    };
    write_output(args.output.as_deref(), &output)
}
