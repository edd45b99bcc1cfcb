//! Row layouts of the tables produced by the extraction pipelines

use std::{fmt, fs::File, path::Path};

use serde::{Deserialize, Serialize};

use super::{TableRow, format_float};
use crate::{
    Error, Result,
    parser::{EpisodeDelta, EpisodeMaxQ},
    types::{EpisodeNumber, RunNumber},
};

/// Which max-Q table layout to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableLayout {
    /// `RunNumber,EpisodeNumber,MaxQValueForState0`
    #[default]
    MaxQ,
    /// `RunNumber,EpisodeNumber,MaxQValueForState0,MaxQDiff`
    WithDeltas,
}

impl TableLayout {
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            TableLayout::MaxQ => MaxQRow::HEADER,
            TableLayout::WithDeltas => DeltaRow::HEADER,
        }
    }
}

impl fmt::Display for TableLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableLayout::MaxQ => write!(f, "max-q"),
            TableLayout::WithDeltas => write!(f, "with-deltas"),
        }
    }
}

/// One episode's maximum state-0 Q-value within a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxQRow {
    pub run: RunNumber,
    pub episode: EpisodeNumber,
    pub max_q: Option<f64>,
}

impl MaxQRow {
    pub fn new(run: RunNumber, episode: &EpisodeMaxQ) -> Self {
        Self {
            run,
            episode: episode.episode,
            max_q: episode.max_q,
        }
    }
}

impl TableRow for MaxQRow {
    const HEADER: &'static [&'static str] = &["RunNumber", "EpisodeNumber", "MaxQValueForState0"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.run.to_string(),
            self.episode.to_string(),
            format_float(self.max_q),
        ]
    }
}

/// One episode's maximum and its change since the previous episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaRow {
    pub run: RunNumber,
    pub episode: EpisodeNumber,
    pub max_q: Option<f64>,
    pub delta: Option<f64>,
}

impl DeltaRow {
    pub fn new(run: RunNumber, episode: &EpisodeDelta) -> Self {
        Self {
            run,
            episode: episode.episode,
            max_q: episode.max_q,
            delta: episode.delta,
        }
    }
}

impl TableRow for DeltaRow {
    const HEADER: &'static [&'static str] = &[
        "RunNumber",
        "EpisodeNumber",
        "MaxQValueForState0",
        "MaxQDiff",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.run.to_string(),
            self.episode.to_string(),
            format_float(self.max_q),
            format_float(self.delta),
        ]
    }
}

/// A max-Q table row read back from disk (either layout).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MaxQRecord {
    #[serde(rename = "RunNumber")]
    pub run: u64,
    #[serde(rename = "EpisodeNumber")]
    pub episode: EpisodeNumber,
    #[serde(rename = "MaxQValueForState0")]
    pub max_q: Option<f64>,
    #[serde(rename = "MaxQDiff", default)]
    pub delta: Option<f64>,
}

/// A comparison table row read back from disk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComparisonRow {
    #[serde(rename = "Run")]
    pub run: u64,
    #[serde(rename = "Episode")]
    pub episode: EpisodeNumber,
    #[serde(rename = "ClientSteps")]
    pub client_steps: Option<u32>,
    #[serde(rename = "ServerSteps")]
    pub server_steps: Option<u32>,
    #[serde(rename = "StepsMismatch")]
    pub steps_mismatch: u8,
    #[serde(rename = "ClientReward")]
    pub client_reward: Option<f64>,
    #[serde(rename = "ServerReward")]
    pub server_reward: Option<f64>,
    #[serde(rename = "RewardMismatch")]
    pub reward_mismatch: u8,
    #[serde(rename = "ServerErrorCount")]
    pub server_error_count: Option<usize>,
}

fn read_table<T>(path: &Path) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let file = File::open(path)
        .map_err(|source| Error::io(format!("open table '{}'", path.display()), source))?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()
        .map_err(Error::from)
}

/// Read every row of a max-Q table.
///
/// # Errors
///
/// Returns an error if the file is missing or a row does not match the layout.
pub fn read_max_q_table(path: &Path) -> Result<Vec<MaxQRecord>> {
    read_table(path)
}

/// Read every row of a comparison table.
///
/// # Errors
///
/// Returns an error if the file is missing or a row does not match the layout.
pub fn read_comparison_table(path: &Path) -> Result<Vec<ComparisonRow>> {
    read_table(path)
}
