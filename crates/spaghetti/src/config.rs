//! Run configuration.

use crate::error::{Result, SpaghettiError};
use crate::walk::{HandleMode, WalkParams};

/// Every option of a spaghetti run.
///
/// Defaults match the classic settings: eight strands sharing 5000 units of
/// line, 10-unit segments, 30° wiggle.
#[derive(Clone, Debug, PartialEq)]
pub struct SpaghettiConfig {
    /// Total length, split evenly across strands.
    pub line_length: f64,
    pub segment_length: f64,
    /// Maximum wiggle, degrees.
    pub wiggle_amount: f64,
    /// Density in empty areas (0-1).
    pub min_density: f64,
    /// Density inside filled shapes (0-1).
    pub max_density: f64,
    /// Density grid cell size.
    pub sample_resolution: f64,
    /// Page bounds when true, selection bounds otherwise.
    pub use_page: bool,
    /// Inset applied to the bounding box.
    pub margin: f64,
    /// 0 = straight, 1 = very curvy.
    pub max_curvature: f64,
    pub smoothness: f64,
    pub num_strands: usize,
    pub stroke_width: f64,
    pub stroke_color: String,
    pub handles: HandleMode,
}

impl Default for SpaghettiConfig {
    fn default() -> Self {
        Self {
            line_length: 5000.0,
            segment_length: 10.0,
            wiggle_amount: 30.0,
            min_density: 0.3,
            max_density: 1.0,
            sample_resolution: 10.0,
            use_page: true,
            margin: 10.0,
            max_curvature: 0.3,
            smoothness: 3.0,
            num_strands: 8,
            stroke_width: 0.5,
            stroke_color: "#000000ff".to_string(),
            handles: HandleMode::Heading,
        }
    }
}

impl SpaghettiConfig {
    pub fn with_line_length(mut self, line_length: f64) -> Self {
        self.line_length = line_length;
        self
    }

    pub fn with_segment_length(mut self, segment_length: f64) -> Self {
        self.segment_length = segment_length;
        self
    }

    pub fn with_num_strands(mut self, num_strands: usize) -> Self {
        self.num_strands = num_strands;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_use_page(mut self, use_page: bool) -> Self {
        self.use_page = use_page;
        self
    }

    /// Check every option, reporting the first offending one.
    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: String) -> Result<()> {
            Err(SpaghettiError::InvalidConfig(msg))
        }

        let positive = [
            ("line_length", self.line_length),
            ("segment_length", self.segment_length),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!("{name} must be a positive number, got {value}"));
            }
        }

        let unit = [
            ("min_density", self.min_density),
            ("max_density", self.max_density),
            ("max_curvature", self.max_curvature),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{name} must be within 0..=1, got {value}"));
            }
        }

        let finite = [
            ("wiggle_amount", self.wiggle_amount),
            ("smoothness", self.smoothness),
            ("stroke_width", self.stroke_width),
            ("sample_resolution", self.sample_resolution),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return invalid(format!("{name} must be finite, got {value}"));
            }
        }

        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return invalid(format!("margin must be zero or positive, got {}", self.margin));
        }
        if self.num_strands == 0 {
            return invalid("num_strands must be at least 1".to_string());
        }
        if self.stroke_color.trim().is_empty() {
            return invalid("stroke_color must not be empty".to_string());
        }
        Ok(())
    }

    /// Walk parameters for one strand of this run.
    pub fn walk_params(&self) -> WalkParams {
        WalkParams {
            length_budget: self.line_length / self.num_strands.max(1) as f64,
            segment_length: self.segment_length,
            wiggle_degrees: self.wiggle_amount,
            max_curvature: self.max_curvature,
            smoothness: self.smoothness,
            handles: self.handles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SpaghettiConfig::default().validate().is_ok());
    }

    #[test]
    fn length_budget_is_split_across_strands() {
        let config = SpaghettiConfig::default()
            .with_line_length(1000.0)
            .with_num_strands(4);
        assert_eq!(config.walk_params().length_budget, 250.0);
        assert_eq!(config.walk_params().step_length(), 20.0);
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            SpaghettiConfig::default().with_num_strands(0),
            SpaghettiConfig::default().with_segment_length(0.0),
            SpaghettiConfig::default().with_line_length(f64::INFINITY),
            SpaghettiConfig::default().with_margin(-1.0),
            SpaghettiConfig { min_density: 1.5, ..SpaghettiConfig::default() },
            SpaghettiConfig { max_curvature: -0.1, ..SpaghettiConfig::default() },
            SpaghettiConfig { stroke_color: "  ".to_string(), ..SpaghettiConfig::default() },
            SpaghettiConfig { smoothness: f64::NAN, ..SpaghettiConfig::default() },
        ];
        for config in cases {
            let err = config.validate().unwrap_err();
            assert!(matches!(err, SpaghettiError::InvalidConfig(_)), "{config:?}");
        }
    }
}
