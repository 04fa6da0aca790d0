//! # spaghetti
//!
//! Wiggly "spaghetti" strands for vector artwork. Each strand is a biased
//! random walk confined to a bounding box, fitted with cubic Béziers. Areas
//! covered by filled shapes get a higher density, which makes the walk
//! wiggle more erratically there.
//!
//! ```
//! use spaghetti::{BoundingBox, MemoryDocument, SpaghettiConfig, run};
//!
//! let page = BoundingBox::new(0.0, 0.0, 800.0, 600.0).unwrap();
//! let mut doc = MemoryDocument::with_page(page);
//! let report = run(&mut doc, &SpaghettiConfig::default(), 42).unwrap();
//! assert_eq!(report.strands.len(), 8);
//! ```
//!
//! ## Rust Lesson #7: Modules
//!
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level

pub mod config;
pub mod curve;
pub mod density;
pub mod document;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod rng;
pub mod svg;
pub mod walk;

// Re-export common types at crate root for convenience.
pub use config::SpaghettiConfig;
pub use curve::{Strand, fit_strand};
pub use density::DensityGrid;
pub use document::{Curve, DocumentAdapter, MemoryDocument};
pub use error::{Result, SpaghettiError};
pub use generator::{RunReport, StrandOutcome, StrandSummary, generate_strand, run};
pub use geometry::{BoundingBox, ControlPoint, FilledRegion, Point};
pub use rng::{RandomSource, Rng};
pub use svg::SvgDocument;
pub use walk::{HandleMode, Termination, Walk, WalkParams, random_walk};
