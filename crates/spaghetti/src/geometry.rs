//! Core geometry types for spaghetti.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! The `#[derive(...)]` macro auto-generates common functionality:
//! - `Debug` = lets you print with `{:?}`
//! - `Clone` / `Copy` = small stack values that can be duplicated freely
//! - `PartialEq` = can compare with `==`
//!
//! Every type here is `Copy`: they are a handful of `f64`s, cheaper to copy
//! than to borrow.

use crate::error::{Result, SpaghettiError};

/// A 2D point with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The area strands are confined to.
///
/// Fields are private so the `x_max > x_min && y_max > y_min` invariant
/// can only be established through [`BoundingBox::new`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    x_min: f64,
    y_min: f64,
    x_max: f64,
    y_max: f64,
}

/// Bounding rectangle of one filled shape in the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilledRegion {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// A vertex of a strand's random walk plus the heading (radians) the walk
/// was travelling in when it got there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl BoundingBox {
    /// Create a box, rejecting empty, inverted or non-finite extents.
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<Self> {
        let finite = [x_min, y_min, x_max, y_max].iter().all(|v| v.is_finite());
        if !finite || x_max <= x_min || y_max <= y_min {
            return Err(SpaghettiError::BoxTooSmall {
                width: x_max - x_min,
                height: y_max - y_min,
            });
        }
        Ok(Self { x_min, y_min, x_max, y_max })
    }

    #[inline]
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    #[inline]
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    #[inline]
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    #[inline]
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Inset every edge by `margin`.
    ///
    /// Fails with [`SpaghettiError::BoxTooSmall`] when the inset box has no
    /// area left.
    pub fn shrink(&self, margin: f64) -> Result<Self> {
        Self::new(
            self.x_min + margin,
            self.y_min + margin,
            self.x_max - margin,
            self.y_max - margin,
        )
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }

    /// The box as `(x_min, y_min, x_max, y_max)`.
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.x_min, self.y_min, self.x_max, self.y_max)
    }
}

impl FilledRegion {
    #[inline]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// Inclusive on all four edges.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.left <= x && x <= self.right && self.top <= y && y <= self.bottom
    }
}

impl ControlPoint {
    #[inline]
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self { x, y, heading }
    }
}
