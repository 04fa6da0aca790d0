//! CLI command implementations.
//!
//! - `generate` - Draw spaghetti strands into an SVG
//! - `density` - Dump the density map a run would use
//! - `benchmark` - Time strand generation

pub mod common;
pub mod config;
pub mod generate;
pub mod density;
pub mod benchmark;
pub mod preview;

pub use generate::{GenerateArgs, cmd_generate};
pub use density::{DensityArgs, cmd_density};
pub use benchmark::{BenchmarkArgs, cmd_benchmark};
