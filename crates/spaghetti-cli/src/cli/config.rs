//! YAML config files.
//!
//! A config file names any subset of the run options; missing keys keep
//! their defaults and command-line flags override whatever the file says.
//!
//! ```yaml
//! line_length: 12000
//! num_strands: 4
//! wiggle_amount: 45
//! stroke_color: "#c03030"
//! handles: tension
//! seed: 7
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use spaghetti::SpaghettiConfig;

use super::common::{CliResult, parse_handles};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub line_length: Option<f64>,
    #[serde(default)]
    pub segment_length: Option<f64>,
    #[serde(default)]
    pub wiggle_amount: Option<f64>,
    #[serde(default)]
    pub min_density: Option<f64>,
    #[serde(default)]
    pub max_density: Option<f64>,
    #[serde(default)]
    pub sample_resolution: Option<f64>,
    #[serde(default)]
    pub use_page: Option<bool>,
    #[serde(default)]
    pub margin: Option<f64>,
    #[serde(default)]
    pub max_curvature: Option<f64>,
    #[serde(default)]
    pub smoothness: Option<f64>,
    #[serde(default)]
    pub num_strands: Option<usize>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub stroke_color: Option<String>,
    #[serde(default)]
    pub handles: Option<String>,
    /// Used when `--seed` is not given.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        Self::from_yaml(&content)
            .map_err(|e| format!("Invalid config {}: {}", path.display(), e).into())
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Overlay the keys present in the file onto `config`.
    pub fn apply_to(&self, config: &mut SpaghettiConfig) -> CliResult {
        if let Some(v) = self.line_length { config.line_length = v; }
        if let Some(v) = self.segment_length { config.segment_length = v; }
        if let Some(v) = self.wiggle_amount { config.wiggle_amount = v; }
        if let Some(v) = self.min_density { config.min_density = v; }
        if let Some(v) = self.max_density { config.max_density = v; }
        if let Some(v) = self.sample_resolution { config.sample_resolution = v; }
        if let Some(v) = self.use_page { config.use_page = v; }
        if let Some(v) = self.margin { config.margin = v; }
        if let Some(v) = self.max_curvature { config.max_curvature = v; }
        if let Some(v) = self.smoothness { config.smoothness = v; }
        if let Some(v) = self.num_strands { config.num_strands = v; }
        if let Some(v) = self.stroke_width { config.stroke_width = v; }
        if let Some(v) = &self.stroke_color { config.stroke_color = v.clone(); }
        if let Some(name) = &self.handles {
            config.handles = parse_handles(name)?;
        }
        Ok(())
    }
}
