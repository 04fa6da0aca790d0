//! spaghetti - draw wiggly strands into SVG artwork
//!
//! Usage:
//!   spaghetti generate <svg|-> [options]       Add strands to an SVG
//!   spaghetti generate --blank 297x210         Start from an empty page
//!   spaghetti density <svg> [--json]           Show the density map
//!   spaghetti benchmark <svg> [-i N]           Time strand generation

mod cli;

use clap::{Parser, Subcommand};
use cli::{BenchmarkArgs, DensityArgs, GenerateArgs};

#[derive(Parser, Debug)]
#[command(name = "spaghetti", version, about = "Wiggly spaghetti strands for SVG artwork")]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw strands into an SVG document
    Generate(GenerateArgs),
    /// Show the density map strands would walk over
    Density(DensityArgs),
    /// Benchmark strand generation
    Benchmark(BenchmarkArgs),
}

fn main() {
    let args = Cli::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let result = match &args.command {
        Command::Generate(a) => cli::cmd_generate(a),
        Command::Density(a) => cli::cmd_density(a),
        Command::Benchmark(a) => cli::cmd_benchmark(a),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "spaghetti", "generate", "--blank", "200x100", "-n", "3", "--seed", "5", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Generate(a) => {
                assert_eq!(a.input.blank.as_deref(), Some("200x100"));
                assert_eq!(a.options.strands, Some(3));
                assert_eq!(a.seed, Some(5));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn blank_conflicts_with_input() {
        assert!(Cli::try_parse_from(["spaghetti", "generate", "in.svg", "--blank", "10x10"]).is_err());
    }
}
