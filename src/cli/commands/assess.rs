//! Assess command - Reconcile client and server logs of one run

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{
        output::{
            create_spinner, format_optional_float, print_section, print_stats_table,
            print_subsection,
        },
        prompt::path_or_prompt,
        summary::write_summary,
    },
    compare::Assessment,
    pipeline::{AssessConfig, AssessmentReport, assess_system},
};

/// Mismatching episodes listed on the console before truncating.
const MAX_LISTED_MISMATCHES: usize = 20;

#[derive(Parser, Debug)]
#[command(about = "Compare client and server episode summaries of one run")]
pub struct AssessArgs {
    /// Client log (asked for interactively when omitted)
    #[arg(long)]
    pub client_log: Option<PathBuf>,

    /// Server log (asked for interactively when omitted)
    #[arg(long)]
    pub server_log: Option<PathBuf>,

    /// CSV table to append to (asked for interactively when omitted)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Do not show a spinner while parsing
    #[arg(long)]
    pub quiet: bool,
}

pub fn execute(args: AssessArgs) -> Result<()> {
    let client_log = path_or_prompt(args.client_log, "Enter the full path to the client log file: ")?;
    let server_log = path_or_prompt(args.server_log, "Enter the full path to the server log file: ")?;
    let output = path_or_prompt(args.output, "Enter the full path to the output CSV file: ")?;
    let config = AssessConfig::new(client_log, server_log, output);

    let spinner = if args.quiet {
        None
    } else {
        Some(create_spinner("Comparing client and server logs...")?)
    };
    let result = assess_system(&config);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let (report, assessment) = result.context("comparing client and server logs")?;

    print_report(&report);
    print_mismatches(&assessment);
    println!(
        "\nComparison complete. Results appended to {}",
        config.output_path.display()
    );

    if let Some(raw) = &args.summary {
        let path = write_summary(raw, &report)?;
        println!("Summary written to {}", path.display());
    }

    Ok(())
}

fn print_report(report: &AssessmentReport) {
    print_section("System assessment");
    print_stats_table(&[
        ("Run number", report.run.to_string()),
        ("Client episodes", report.client_episodes.to_string()),
        ("Server episodes", report.server_episodes.to_string()),
        ("Compared episodes", report.compared_episodes.to_string()),
        ("Step mismatches", report.step_mismatches.to_string()),
        ("Reward mismatches", report.reward_mismatches.to_string()),
        ("Server error lines", report.server_error_lines.to_string()),
        ("Rows appended", report.rows_written.to_string()),
    ]);
}

fn print_mismatches(assessment: &Assessment) {
    let mismatched: Vec<_> = assessment
        .records
        .iter()
        .filter(|r| r.steps_mismatch || r.reward_mismatch)
        .collect();
    if mismatched.is_empty() {
        return;
    }

    print_subsection("Mismatching episodes");
    for record in mismatched.iter().take(MAX_LISTED_MISMATCHES) {
        println!(
            "  episode {:>5}  steps {:>5} / {:<5}  reward {} / {}",
            record.episode,
            record.client_steps.map_or("-".to_string(), |s| s.to_string()),
            record.server_steps.map_or("-".to_string(), |s| s.to_string()),
            format_optional_float(record.client_reward),
            format_optional_float(record.server_reward),
        );
    }
    if mismatched.len() > MAX_LISTED_MISMATCHES {
        println!("  ... and {} more", mismatched.len() - MAX_LISTED_MISMATCHES);
    }
}
