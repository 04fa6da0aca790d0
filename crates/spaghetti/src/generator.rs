//! Strand generation and the batch run over a document.

use log::{debug, info, warn};

use crate::config::SpaghettiConfig;
use crate::curve::{Strand, fit_strand};
use crate::density::DensityGrid;
use crate::document::DocumentAdapter;
use crate::error::{Result, SpaghettiError};
use crate::geometry::BoundingBox;
use crate::rng::{RandomSource, Rng};
use crate::walk::{Termination, Walk, WalkParams, random_walk};

/// Strokes thinner than this are widened before reaching the sink.
pub const MIN_STROKE_WIDTH: f64 = 1.0;

/// Walk once and fit the result.
///
/// The strand is `None` when the walk ends with fewer than two control
/// points. The walk is returned either way for its statistics.
pub fn generate_strand<R: RandomSource + ?Sized>(
    bbox: &BoundingBox,
    grid: &DensityGrid,
    params: &WalkParams,
    rng: &mut R,
) -> (Option<Strand>, Walk) {
    let walk = random_walk(bbox, grid, params, rng);
    let strand = fit_strand(&walk.points, params.handle_length());
    (strand, walk)
}

/// What happened to one requested strand.
#[derive(Debug, Clone, PartialEq)]
pub enum StrandOutcome {
    Drawn(StrandSummary),
    /// Fewer than two control points; nothing to draw.
    Skipped,
    /// The strand could not be produced or delivered; the run continued.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrandSummary {
    pub path_data: String,
    pub point_count: usize,
    /// Distance covered by accepted walk steps.
    pub walk_length: f64,
    /// Arc length of the fitted curve.
    pub curve_length: f64,
    pub rejections: u32,
    pub termination: Termination,
}

/// Outcome of a [`run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub seed: u64,
    /// The margin-shrunk box strands were confined to.
    pub bbox: BoundingBox,
    pub grid_rows: usize,
    pub grid_cols: usize,
    pub region_count: usize,
    /// Stroke width handed to the sink, after the [`MIN_STROKE_WIDTH`] clamp.
    pub stroke_width: f64,
    /// One entry per requested strand, in index order.
    pub strands: Vec<StrandOutcome>,
}

impl RunReport {
    pub fn drawn(&self) -> impl Iterator<Item = &StrandSummary> {
        self.strands.iter().filter_map(|s| match s {
            StrandOutcome::Drawn(summary) => Some(summary),
            _ => None,
        })
    }

    pub fn drawn_count(&self) -> usize {
        self.drawn().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.strands.iter().filter(|s| matches!(s, StrandOutcome::Skipped)).count()
    }

    pub fn failed_count(&self) -> usize {
        self.strands.iter().filter(|s| matches!(s, StrandOutcome::Failed(_))).count()
    }
}

/// Generate every strand of `config` into `doc`.
///
/// Input problems (invalid config, no bounding box, box collapsed by the
/// margin) fail before anything is generated. After that the run is best
/// effort: a strand that cannot be produced or appended is recorded as
/// failed and the remaining strands still run.
pub fn run<D: DocumentAdapter + ?Sized>(
    doc: &mut D,
    config: &SpaghettiConfig,
    seed: u64,
) -> Result<RunReport> {
    config.validate()?;

    let outer = doc
        .bounding_box(config.use_page)
        .ok_or(SpaghettiError::NoBoundingBox)?;
    debug!(
        "bounding box = ({:.1}, {:.1}, {:.1}, {:.1})",
        outer.x_min(), outer.y_min(), outer.x_max(), outer.y_max()
    );
    let bbox = outer.shrink(config.margin)?;

    let regions = doc.filled_regions();
    let grid = DensityGrid::build(
        &bbox,
        config.sample_resolution,
        &regions,
        config.min_density,
        config.max_density,
    )?;
    info!(
        "density map {}x{} from {} filled regions ({:.0}% dense)",
        grid.cols(),
        grid.rows(),
        regions.len(),
        grid.dense_fraction(config.max_density) * 100.0
    );

    let params = config.walk_params();
    let stroke_width = config.stroke_width.max(MIN_STROKE_WIDTH);

    let mut strands = Vec::with_capacity(config.num_strands);
    for index in 0..config.num_strands {
        let mut rng = Rng::for_strand(seed, index);
        let outcome = draw_strand(doc, &bbox, &grid, &params, &mut rng, index, config, stroke_width);
        if let StrandOutcome::Failed(reason) = &outcome {
            warn!("strand {index} failed: {reason}");
        }
        strands.push(outcome);
    }

    let report = RunReport {
        seed,
        bbox,
        grid_rows: grid.rows(),
        grid_cols: grid.cols(),
        region_count: regions.len(),
        stroke_width,
        strands,
    };
    info!(
        "generated {} of {} strands ({} skipped, {} failed)",
        report.drawn_count(),
        config.num_strands,
        report.skipped_count(),
        report.failed_count()
    );
    Ok(report)
}

#[allow(clippy::too_many_arguments)]
fn draw_strand<D: DocumentAdapter + ?Sized>(
    doc: &mut D,
    bbox: &BoundingBox,
    grid: &DensityGrid,
    params: &WalkParams,
    rng: &mut Rng,
    index: usize,
    config: &SpaghettiConfig,
    stroke_width: f64,
) -> StrandOutcome {
    let (strand, walk) = generate_strand(bbox, grid, params, rng);
    let Some(strand) = strand else {
        debug!("strand {index}: {} control points, skipped", walk.points.len());
        return StrandOutcome::Skipped;
    };

    if !strand.is_finite() {
        return StrandOutcome::Failed(SpaghettiError::NonFiniteStrand(index).to_string());
    }

    let path_data = strand.to_path_data();
    if let Err(e) = doc.append_curve(&path_data, &config.stroke_color, stroke_width) {
        return StrandOutcome::Failed(e.to_string());
    }

    debug!(
        "strand {index}: {} points, {:.1} units, {} rejections, {:?}",
        strand.point_count(),
        walk.total_length,
        walk.rejections,
        walk.termination
    );

    StrandOutcome::Drawn(StrandSummary {
        path_data,
        point_count: strand.point_count(),
        walk_length: walk.total_length,
        curve_length: strand.length(),
        rejections: walk.rejections,
        termination: walk.termination,
    })
}
