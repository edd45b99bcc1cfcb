//! qlog CLI - Log analysis for tabular Q-learning simulation runs
//!
//! This CLI provides a unified interface for:
//! - Extracting the per-episode maximum Q-value of state 0 from a client log
//! - Reconciling client and server episode summaries of a run
//! - Plotting averaged curves and rolling statistics of extracted tables
//! - Plotting the termination-step distributions used by the runs

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qlog")]
#[command(version, about = "Log analysis for Q-learning simulation runs", long_about = None)]
struct Cli {
    /// Log debug details (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append per-episode max Q-values of state 0 to a CSV table
    MaxQ(qlog::cli::commands::max_q::MaxQArgs),

    /// Compare client and server logs and append the result to a CSV table
    Assess(qlog::cli::commands::assess::AssessArgs),

    /// Plot averaged and rolling statistics of an extracted table
    Plot(qlog::cli::commands::plot::PlotArgs),

    /// Plot termination-step probability mass functions
    Pmf(qlog::cli::commands::pmf::PmfArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    qlog::cli::init_logging(cli.verbose);

    match cli.command {
        Commands::MaxQ(args) => qlog::cli::commands::max_q::execute(args),
        Commands::Assess(args) => qlog::cli::commands::assess::execute(args),
        Commands::Plot(args) => qlog::cli::commands::plot::execute(args),
        Commands::Pmf(args) => qlog::cli::commands::pmf::execute(args),
    }
}
