//! Max-Q command - Extract per-episode maxima of state 0 from a client log

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{
        output::{create_spinner, print_section, print_stats_table},
        prompt::path_or_prompt,
        summary::write_summary,
    },
    pipeline::{ExtractConfig, ExtractionReport, extract_max_q},
    table::TableLayout,
};

#[derive(Parser, Debug)]
#[command(about = "Extract the per-episode maximum Q-value of state 0")]
pub struct MaxQArgs {
    /// Client log to scan (asked for interactively when omitted)
    #[arg(long, short = 'l')]
    pub log: Option<PathBuf>,

    /// CSV table to append to (asked for interactively when omitted)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Add the MaxQDiff column with the change from the previous episode
    #[arg(long)]
    pub with_deltas: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Do not show a spinner while parsing
    #[arg(long)]
    pub quiet: bool,
}

pub fn execute(args: MaxQArgs) -> Result<()> {
    let log_path = path_or_prompt(args.log, "Enter the full path to the client log file: ")?;
    let output_path = path_or_prompt(args.output, "Enter the full path for the output CSV file: ")?;

    let layout = if args.with_deltas {
        TableLayout::WithDeltas
    } else {
        TableLayout::MaxQ
    };
    let config = ExtractConfig::new(log_path, output_path).with_layout(layout);

    let spinner = if args.quiet {
        None
    } else {
        Some(create_spinner(&format!(
            "Parsing {}...",
            config.log_path.display()
        ))?)
    };
    let result = extract_max_q(&config);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let report = result.with_context(|| {
        format!(
            "extracting max Q-values from {}",
            config.log_path.display()
        )
    })?;

    print_report(&config, &report);

    if let Some(raw) = &args.summary {
        let path = write_summary(raw, &report)?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}

fn print_report(config: &ExtractConfig, report: &ExtractionReport) {
    print_section("Max Q-value extraction");
    print_stats_table(&[
        ("Run number", report.run.to_string()),
        ("Layout", report.layout.to_string()),
        ("Episodes", report.episodes.to_string()),
        ("Without state-0 update", report.empty_episodes.to_string()),
        ("Rows appended", report.rows_written.to_string()),
        ("Header written", report.header_written.to_string()),
    ]);
    println!(
        "\nAppended run {} results to {}",
        report.run,
        config.output_path.display()
    );
}
