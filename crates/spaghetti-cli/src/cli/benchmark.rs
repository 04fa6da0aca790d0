//! Benchmark command implementation.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;

use spaghetti::{DocumentAdapter, MemoryDocument, SpaghettiError, run};

use super::common::{CliResult, InputArgs, StrandOptions, load_document};
use super::generate::resolve_config;

#[derive(Args, Debug)]
pub struct BenchmarkArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Number of runs to time
    #[arg(short, long, default_value_t = 10)]
    pub iterations: usize,

    /// Seed of the first run; later runs use the following seeds
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// YAML config file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub options: StrandOptions,
}

/// Execute the benchmark command.
pub fn cmd_benchmark(args: &BenchmarkArgs) -> CliResult {
    if args.iterations == 0 {
        return Err("--iterations must be at least 1".into());
    }
    let (mut config, _) = resolve_config(args.config.as_deref(), &args.options)?;

    let start_load = Instant::now();
    let doc = load_document(&args.input, &mut config)?;
    let bbox = doc
        .bounding_box(config.use_page)
        .ok_or(SpaghettiError::NoBoundingBox)?;
    let regions = doc.filled_regions();
    eprintln!("Loaded {} filled regions in {:?}", regions.len(), start_load.elapsed());

    // Runs go to an in-memory sink so serialization stays out of the timing.
    let template = MemoryDocument {
        page: Some(bbox),
        selection: Some(bbox),
        regions,
        curves: Vec::new(),
    };

    eprintln!("\nRunning {} iterations...", args.iterations);
    let mut drawn = 0;
    let mut control_points = 0;
    let mut curve_length = 0.0;
    let start = Instant::now();

    for i in 0..args.iterations {
        let mut sink = template.clone();
        let report = run(&mut sink, &config, args.seed.wrapping_add(i as u64))?;
        drawn += report.drawn_count();
        for strand in report.drawn() {
            control_points += strand.point_count;
            curve_length += strand.curve_length;
        }
    }

    let elapsed = start.elapsed();
    let ms = elapsed.as_secs_f64() * 1000.0;

    println!();
    println!("═══════════════════════════════════════════════");
    println!("  SPAGHETTI BENCHMARK");
    println!("═══════════════════════════════════════════════");
    println!("  Box: {:.1} x {:.1}", bbox.width(), bbox.height());
    println!("  Iterations: {}", args.iterations);
    println!("  Strands drawn: {}", drawn);
    println!("  Control points: {}", control_points);
    println!("  Curve length: {:.0}", curve_length);
    println!("  Time: {:?}", elapsed);
    println!("  Time (ms): {:.2}", ms);
    println!("  Avg per run: {:.3}ms", ms / args.iterations as f64);
    if drawn > 0 {
        println!("  Avg per strand: {:.3}ms", ms / drawn as f64);
    }
    println!("═══════════════════════════════════════════════");
    Ok(())
}
