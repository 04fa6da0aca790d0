//! Coarse density map sampled by the strand walk.
//!
//! The bounding box is rasterized into square cells of `resolution` units.
//! A cell whose center lies inside the bounding rectangle of any filled
//! region gets the maximum density, every other cell the minimum. Shape
//! containment is approximated by bounding-box containment on purpose:
//! switching to true polygon containment changes the look of the output.

use log::warn;

use crate::error::{Result, SpaghettiError};
use crate::geometry::{BoundingBox, FilledRegion, Point};

/// Upper bound on `rows * cols`, about 128 MB of cells.
pub const MAX_CELLS: usize = 16_000_000;

/// A read-only grid of densities covering a [`BoundingBox`].
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    origin: Point,
    resolution: f64,
    rows: usize,
    cols: usize,
    /// Row-major, `rows * cols` entries.
    cells: Vec<f64>,
}

impl DensityGrid {
    /// Build the density map for `bbox`.
    ///
    /// A non-positive or non-finite `resolution` is treated as `1.0`. Fails
    /// with [`SpaghettiError::InvalidConfig`] when the grid would need more
    /// than [`MAX_CELLS`] cells.
    pub fn build(
        bbox: &BoundingBox,
        resolution: f64,
        regions: &[FilledRegion],
        min_density: f64,
        max_density: f64,
    ) -> Result<Self> {
        let resolution = if resolution.is_finite() && resolution > 0.0 {
            resolution
        } else {
            warn!("sample resolution {resolution} is not positive, using 1.0");
            1.0
        };

        let cols_f = (bbox.width() / resolution).floor().max(1.0);
        let rows_f = (bbox.height() / resolution).floor().max(1.0);
        if cols_f * rows_f > MAX_CELLS as f64 {
            return Err(SpaghettiError::InvalidConfig(format!(
                "sample resolution {resolution} needs a {cols_f}x{rows_f} density map, over the {MAX_CELLS} cell limit"
            )));
        }
        let cols = cols_f as usize;
        let rows = rows_f as usize;
        let origin = Point::new(bbox.x_min(), bbox.y_min());

        if regions.is_empty() {
            return Ok(Self {
                origin,
                resolution,
                rows,
                cols,
                cells: vec![min_density; rows * cols],
            });
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            let y = origin.y + (row as f64 + 0.5) * resolution;
            for col in 0..cols {
                let x = origin.x + (col as f64 + 0.5) * resolution;
                let inside = regions.iter().any(|r| r.contains(x, y));
                cells.push(if inside { max_density } else { min_density });
            }
        }

        Ok(Self { origin, resolution, rows, cols, cells })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Density of one cell, `None` when out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Clamped `(row, col)` of the cell containing a world point.
    ///
    /// Total for every input: `as` casts saturate infinities and map NaN to
    /// zero before the clamp.
    pub fn cell_index(&self, x: f64, y: f64) -> (usize, usize) {
        let col = ((x - self.origin.x) / self.resolution).floor() as i64;
        let row = ((y - self.origin.y) / self.resolution).floor() as i64;
        (
            row.clamp(0, self.rows as i64 - 1) as usize,
            col.clamp(0, self.cols as i64 - 1) as usize,
        )
    }

    /// Density at a world point, using the nearest in-range cell for points
    /// outside the box.
    #[inline]
    pub fn density_at(&self, x: f64, y: f64) -> f64 {
        let (row, col) = self.cell_index(x, y);
        self.cells[row * self.cols + col]
    }

    /// World coordinates of a cell's center.
    pub fn cell_center(&self, row: usize, col: usize) -> Point {
        Point::new(
            self.origin.x + (col as f64 + 0.5) * self.resolution,
            self.origin.y + (row as f64 + 0.5) * self.resolution,
        )
    }

    /// Share of cells at or above `threshold`.
    pub fn dense_fraction(&self, threshold: f64) -> f64 {
        let dense = self.cells.iter().filter(|&&d| d >= threshold).count();
        dense as f64 / self.cells.len() as f64
    }

    /// One character per cell: `#` for cells at or above `threshold`, `.`
    /// otherwise. Rows are newline-terminated.
    pub fn to_ascii(&self, threshold: f64) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        for row in self.cells.chunks(self.cols) {
            out.extend(row.iter().map(|&d| if d >= threshold { '#' } else { '.' }));
            out.push('\n');
        }
        out
    }
}
