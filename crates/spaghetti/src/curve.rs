//! Fitting cubic Béziers through a walk's control points.
//!
//! Each consecutive pair of control points becomes one cubic segment whose
//! handles leave the first point along its heading and arrive at the second
//! point along its heading. Sharing headings between neighbouring segments
//! keeps the tangent continuous, so the strand reads as one smooth line.

use lyon_geom::{CubicBezierSegment, point};

use crate::geometry::{ControlPoint, Point};

/// Tolerance used when measuring strands.
pub const FLATTEN_TOLERANCE: f64 = 0.1;

/// A finished strand: a start point and a chain of cubic segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Strand {
    segments: Vec<CubicBezierSegment<f64>>,
}

/// Fit a strand through `points` with handles of `handle_length`.
///
/// Returns `None` for fewer than two points: there is nothing to draw.
pub fn fit_strand(points: &[ControlPoint], handle_length: f64) -> Option<Strand> {
    if points.len() < 2 {
        return None;
    }

    let segments = points
        .windows(2)
        .map(|pair| {
            let (p1, p2) = (pair[0], pair[1]);
            let (sin1, cos1) = p1.heading.sin_cos();
            let (sin2, cos2) = p2.heading.sin_cos();
            CubicBezierSegment {
                from: point(p1.x, p1.y),
                ctrl1: point(p1.x + handle_length * cos1, p1.y + handle_length * sin1),
                ctrl2: point(p2.x - handle_length * cos2, p2.y - handle_length * sin2),
                to: point(p2.x, p2.y),
            }
        })
        .collect();

    Some(Strand { segments })
}

impl Strand {
    pub fn start(&self) -> Point {
        let from = self.segments[0].from;
        Point::new(from.x, from.y)
    }

    pub fn segments(&self) -> &[CubicBezierSegment<f64>] {
        &self.segments
    }

    /// Number of control points the strand was fitted through.
    pub fn point_count(&self) -> usize {
        self.segments.len() + 1
    }

    /// `true` when every coordinate, handles included, is finite.
    pub fn is_finite(&self) -> bool {
        self.segments.iter().all(|s| {
            [s.from, s.ctrl1, s.ctrl2, s.to]
                .iter()
                .all(|p| p.x.is_finite() && p.y.is_finite())
        })
    }

    /// SVG path data: one `M` followed by one `C` per segment, two decimals.
    pub fn to_path_data(&self) -> String {
        let start = self.start();
        let mut d = format!("M {:.2},{:.2}", start.x, start.y);
        for s in &self.segments {
            d.push_str(&format!(
                " C {:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
                s.ctrl1.x, s.ctrl1.y, s.ctrl2.x, s.ctrl2.y, s.to.x, s.to.y
            ));
        }
        d
    }

    /// Approximate arc length of the whole strand.
    pub fn length(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| s.approximate_length(FLATTEN_TOLERANCE))
            .sum()
    }
}
