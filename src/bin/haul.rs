//! haul CLI binary entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use haul::cli::run_move_json;

/// Cross-module symbol motion engine for Python codebases.
#[derive(Parser)]
#[command(name = "haul")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Move a top-level symbol to another module.
    Move {
        /// Project root directory
        root_path: PathBuf,

        /// Dotted name of the module defining the symbol
        module_start: String,

        /// 1-based line of the symbol
        line: u32,

        /// 0-based column of the symbol
        column: u32,

        /// Dotted name of the destination module
        module_end: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Move {
            root_path,
            module_start,
            line,
            column,
            module_end,
        } => {
            // The outcome lives in the JSON; the exit code stays 0 so
            // callers always parse stdout.
            println!(
                "{}",
                run_move_json(&root_path, &module_start, line, column, &module_end)
            );
        }
    }
    ExitCode::SUCCESS
}
