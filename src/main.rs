//! Strata CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Hierarchical dependency graph analysis and reporting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the batch pipeline over an extracted declarations file
    Process {
        /// Declarations JSON produced by an extractor
        #[arg(short, long)]
        input: PathBuf,

        /// Base name of the report to write
        #[arg(short, long, default_value = "report")]
        output: String,

        /// Directory the report is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Treat every declaration as exposed instead of applying the
        /// per-language visibility rule
        #[arg(long)]
        expose_all: bool,
    },
    /// Validate the structure of an existing report
    Validate {
        /// Report file to check
        #[arg(short, long)]
        report: PathBuf,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "strata={0},strata_core={0},strata_pipeline={0},strata_view={0}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Strata v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Process {
            input,
            output,
            out_dir,
            expose_all,
        } => commands::process(input, output, out_dir, expose_all),
        Commands::Validate { report } => commands::validate(report),
        Commands::Version => {
            println!("Strata v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
