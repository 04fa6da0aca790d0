//! Common utilities shared across CLI commands.

use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use clap::{Args, ValueEnum};
use log::warn;

use spaghetti::{HandleMode, SpaghettiConfig, SvgDocument};

pub type CliResult<T = ()> = Result<T, Box<dyn Error>>;

/// Output format for generated strands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Svg,
    Json,
}

/// Where the strands go: an SVG file, stdin, or an empty page.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input SVG file ('-' for stdin)
    pub input: Option<String>,

    /// Start from an empty page instead of a file, e.g. `297x210`
    #[arg(long, value_name = "WxH", conflicts_with = "input")]
    pub blank: Option<String>,

    /// Use the extents of these element ids instead of the page
    #[arg(long, value_delimiter = ',', value_name = "ID,...")]
    pub selection: Option<Vec<String>>,
}

/// Strand options; each one overrides the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct StrandOptions {
    /// Total line length, split across strands
    #[arg(long)]
    pub line_length: Option<f64>,

    /// Nominal segment length (the walk steps twice this far)
    #[arg(long)]
    pub segment_length: Option<f64>,

    /// Maximum wiggle in degrees
    #[arg(long)]
    pub wiggle: Option<f64>,

    /// Density in empty areas (0-1)
    #[arg(long)]
    pub min_density: Option<f64>,

    /// Density inside filled shapes (0-1)
    #[arg(long)]
    pub max_density: Option<f64>,

    /// Density grid cell size
    #[arg(long)]
    pub resolution: Option<f64>,

    /// Inset from the bounding box edges
    #[arg(long)]
    pub margin: Option<f64>,

    /// 0 = straight, 1 = very curvy
    #[arg(long)]
    pub max_curvature: Option<f64>,

    /// Handle tension for `--handles tension`
    #[arg(long)]
    pub smoothness: Option<f64>,

    /// Number of strands
    #[arg(short = 'n', long)]
    pub strands: Option<usize>,

    #[arg(long)]
    pub stroke_width: Option<f64>,

    #[arg(long)]
    pub stroke_color: Option<String>,

    /// Handle sizing: heading or tension
    #[arg(long)]
    pub handles: Option<String>,
}

impl StrandOptions {
    /// Overlay the flags that were given onto `config`.
    pub fn apply_to(&self, config: &mut SpaghettiConfig) -> CliResult {
        if let Some(v) = self.line_length { config.line_length = v; }
        if let Some(v) = self.segment_length { config.segment_length = v; }
        if let Some(v) = self.wiggle { config.wiggle_amount = v; }
        if let Some(v) = self.min_density { config.min_density = v; }
        if let Some(v) = self.max_density { config.max_density = v; }
        if let Some(v) = self.resolution { config.sample_resolution = v; }
        if let Some(v) = self.margin { config.margin = v; }
        if let Some(v) = self.max_curvature { config.max_curvature = v; }
        if let Some(v) = self.smoothness { config.smoothness = v; }
        if let Some(v) = self.strands { config.num_strands = v; }
        if let Some(v) = self.stroke_width { config.stroke_width = v; }
        if let Some(v) = &self.stroke_color { config.stroke_color = v.clone(); }
        if let Some(name) = &self.handles {
            config.handles = parse_handles(name)?;
        }
        Ok(())
    }
}

pub fn parse_handles(name: &str) -> CliResult<HandleMode> {
    HandleMode::from_name(name)
        .ok_or_else(|| format!("Unknown handle mode: {}. Use 'heading' or 'tension'.", name).into())
}

/// Parse a `WxH` page size.
pub fn parse_page_size(value: &str) -> CliResult<(f64, f64)> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("Invalid page size '{}', expected WxH", value))?;
    let width: f64 = w.trim().parse().map_err(|_| format!("Invalid width '{}'", w))?;
    let height: f64 = h.trim().parse().map_err(|_| format!("Invalid height '{}'", h))?;
    Ok((width, height))
}

/// Read SVG content from a file, or stdin for `-`.
pub fn read_svg(path: &str) -> CliResult<String> {
    if path == "-" {
        eprintln!("Reading SVG from stdin...");
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        eprintln!("Loading: {}", path);
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e).into())
    }
}

/// Load the document named by `input`, applying the id selection if any.
///
/// A selection switches the run to selection bounds.
pub fn load_document(input: &InputArgs, config: &mut SpaghettiConfig) -> CliResult<SvgDocument> {
    let mut doc = match (&input.input, &input.blank) {
        (_, Some(size)) => {
            let (width, height) = parse_page_size(size)?;
            SvgDocument::blank(width, height)?
        }
        (Some(path), None) => SvgDocument::parse(&read_svg(path)?)?,
        (None, None) => return Err("SVG file required (use '-' for stdin) or --blank WxH".into()),
    };

    if let Some(ids) = &input.selection {
        for id in doc.select(ids) {
            warn!("no element with id '{}'", id);
        }
        config.use_page = false;
    }

    Ok(doc)
}

/// Write to `path`, or stdout when it is `None` or `-`.
pub fn write_output(path: Option<&Path>, content: &str) -> CliResult {
    match path {
        Some(p) if p != Path::new("-") => {
            fs::write(p, content)?;
            eprintln!("Output written to: {}", p.display());
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_parsing() {
        assert_eq!(parse_page_size("297x210").unwrap(), (297.0, 210.0));
        assert_eq!(parse_page_size("100X50.5").unwrap(), (100.0, 50.5));
        assert!(parse_page_size("100").is_err());
        assert!(parse_page_size("ax10").is_err());
    }

    #[test]
    fn flags_override_config() {
        let mut config = SpaghettiConfig::default();
        let options = StrandOptions {
            strands: Some(3),
            wiggle: Some(45.0),
            handles: Some("tension".to_string()),
            ..StrandOptions::default()
        };
        options.apply_to(&mut config).unwrap();

        assert_eq!(config.num_strands, 3);
        assert_eq!(config.wiggle_amount, 45.0);
        assert_eq!(config.handles, HandleMode::Tension);
        assert_eq!(config.line_length, 5000.0);
    }

    #[test]
    fn unknown_handle_mode_is_rejected() {
        let options = StrandOptions {
            handles: Some("loose".to_string()),
            ..StrandOptions::default()
        };
        assert!(options.apply_to(&mut SpaghettiConfig::default()).is_err());
    }
}
