//! Client log → next run number → max-Q table

use serde::{Deserialize, Serialize};

use super::ExtractConfig;
use crate::{
    Result,
    parser::{self, EpisodeMaxQ},
    table::{self, DeltaRow, MaxQRow, TableLayout, TableWriter},
    types::RunNumber,
};

/// What one extraction appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub run: RunNumber,
    pub layout: TableLayout,
    pub episodes: usize,
    /// Episodes that closed without any state-0 update
    pub empty_episodes: usize,
    pub rows_written: usize,
    pub header_written: bool,
}

/// Parse the client log, number the run and append one row per episode.
///
/// The run number is read from the table before the log is parsed, so a
/// missing log leaves the table untouched.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the log cannot be read or
/// the table cannot be written.
pub fn extract_max_q(config: &ExtractConfig) -> Result<ExtractionReport> {
    config.validate()?;

    let run = table::next_run_number(&config.output_path)?;
    log::info!(
        "next run number for '{}' is {run}",
        config.output_path.display()
    );

    let episodes = parser::parse_max_q_file(&config.log_path)?;
    let outcome = append_episodes(config, run, &episodes)?;
    log::info!(
        "appended run {run} ({} rows) to '{}'",
        outcome.rows_written,
        config.output_path.display()
    );

    Ok(ExtractionReport {
        run,
        layout: config.layout,
        episodes: episodes.len(),
        empty_episodes: episodes.iter().filter(|e| e.max_q.is_none()).count(),
        rows_written: outcome.rows_written,
        header_written: outcome.header_written,
    })
}

fn append_episodes(
    config: &ExtractConfig,
    run: RunNumber,
    episodes: &[EpisodeMaxQ],
) -> Result<table::AppendOutcome> {
    match config.layout {
        TableLayout::MaxQ => {
            let mut rows: Vec<MaxQRow> = episodes.iter().map(|e| MaxQRow::new(run, e)).collect();
            rows.sort_by_key(|r| r.episode);
            TableWriter::append(&config.output_path, &rows)
        }
        TableLayout::WithDeltas => {
            let rows: Vec<DeltaRow> = parser::with_deltas(episodes)
                .iter()
                .map(|e| DeltaRow::new(run, e))
                .collect();
            TableWriter::append(&config.output_path, &rows)
        }
    }
}
