//! Error type shared by the whole crate.
//!
//! Input errors (no bounding box, box collapsed by the margin, bad config)
//! abort a run before any strand is generated. Per-strand faults such as
//! [`SpaghettiError::NonFiniteStrand`] are reported by the batch runner and
//! never abort the remaining strands.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpaghettiError {
    #[error("could not determine bounding box; select objects or check the page size")]
    NoBoundingBox,

    #[error("bounding box too small after applying margins ({width:.2} x {height:.2})")]
    BoxTooSmall { width: f64, height: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("strand {0} produced non-finite coordinates")]
    NonFiniteStrand(usize),
}

pub type Result<T> = std::result::Result<T, SpaghettiError>;
