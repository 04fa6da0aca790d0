//! The boundary between the generator and whatever holds the artwork.
//!
//! A run only needs three things from its host: the area to fill, the filled
//! shapes inside it, and somewhere to put finished curves.

use crate::error::Result;
use crate::geometry::{BoundingBox, FilledRegion};

pub trait DocumentAdapter {
    /// Page bounds when `use_page` is true, selection extents otherwise.
    /// `None` when the requested bounds cannot be determined.
    fn bounding_box(&self, use_page: bool) -> Option<BoundingBox>;

    /// Bounding rectangles of every shape whose fill is set and not `none`.
    fn filled_regions(&self) -> Vec<FilledRegion>;

    /// Accept one finished curve.
    fn append_curve(&mut self, path_data: &str, stroke_color: &str, stroke_width: f64) -> Result<()>;
}

/// A curve handed to a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub path_data: String,
    pub stroke_color: String,
    pub stroke_width: f64,
}

/// An adapter backed by plain values, for tests and library callers that
/// manage their own canvas.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pub page: Option<BoundingBox>,
    pub selection: Option<BoundingBox>,
    pub regions: Vec<FilledRegion>,
    pub curves: Vec<Curve>,
}

impl MemoryDocument {
    pub fn with_page(page: BoundingBox) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    pub fn with_regions(mut self, regions: Vec<FilledRegion>) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_selection(mut self, selection: BoundingBox) -> Self {
        self.selection = Some(selection);
        self
    }
}

impl DocumentAdapter for MemoryDocument {
    fn bounding_box(&self, use_page: bool) -> Option<BoundingBox> {
        if use_page { self.page } else { self.selection }
    }

    fn filled_regions(&self) -> Vec<FilledRegion> {
        self.regions.clone()
    }

    fn append_curve(&mut self, path_data: &str, stroke_color: &str, stroke_width: f64) -> Result<()> {
        self.curves.push(Curve {
            path_data: path_data.to_string(),
            stroke_color: stroke_color.to_string(),
            stroke_width,
        });
        Ok(())
    }
}
