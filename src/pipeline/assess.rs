//! Client log + server log → next run number → comparison table

use serde::{Deserialize, Serialize};

use super::AssessConfig;
use crate::{
    Result,
    compare::{self, Assessment},
    parser,
    table::{self, TableWriter},
    types::RunNumber,
};

/// What one assessment found and appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub run: RunNumber,
    pub client_episodes: usize,
    pub server_episodes: usize,
    pub compared_episodes: usize,
    pub step_mismatches: usize,
    pub reward_mismatches: usize,
    pub server_error_lines: usize,
    pub rows_written: usize,
    pub header_written: bool,
}

/// Reconcile both logs of one run and append the comparison rows.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, either log cannot be read
/// or the table cannot be written.
pub fn assess_system(config: &AssessConfig) -> Result<(AssessmentReport, Assessment)> {
    config.validate()?;

    let run = table::next_run_number(&config.output_path)?;
    log::info!(
        "next run number for '{}' is {run}",
        config.output_path.display()
    );

    let client = parser::parse_client_log_file(&config.client_log)?;
    let server = parser::parse_server_log_file(&config.server_log)?;

    let assessment =
        compare::compare_episodes(run, &client.episodes, &server.episodes, server.error_lines);
    let outcome = TableWriter::append(&config.output_path, &assessment.records)?;

    if !assessment.is_consistent() {
        log::warn!(
            "run {run}: {} step and {} reward mismatches",
            assessment.step_mismatches,
            assessment.reward_mismatches
        );
    }

    let report = AssessmentReport {
        run,
        client_episodes: client.episodes.len(),
        server_episodes: server.episodes.len(),
        compared_episodes: assessment.records.len(),
        step_mismatches: assessment.step_mismatches,
        reward_mismatches: assessment.reward_mismatches,
        server_error_lines: assessment.server_error_lines,
        rows_written: outcome.rows_written,
        header_written: outcome.header_written,
    };
    Ok((report, assessment))
}
