//! End-of-episode summary blocks printed by the client and the server
//!
//! Client block:
//!
//! ```text
//! === End of Episode Summary ===
//! Steps Taken: 20/30
//! Discounted Episode Reward: -5.627220814338541
//! ```
//!
//! Server block:
//!
//! ```text
//! End of episode summary:
//!  - Total Episodes: 1
//!  - Successful Episodes: 0
//!  - Steps Taken: 26
//!  - Discounted Episode Reward: -8.595328550337097
//! ```
//!
//! The lines following a header are tokenized into a label/value map before any
//! field is read, so fields are found by label rather than by line offset.

use std::{collections::BTreeMap, path::Path, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{
    EPISODE_END_MARKER, REWARD_LABEL, SERVER_SUMMARY_HEADER, STEPS_LABEL, leading_number,
    read_log,
};
use crate::{
    Result,
    types::{EpisodeNumber, EpisodeSummary},
};

/// Lines following the client marker that belong to its summary block.
const CLIENT_BLOCK_LINES: usize = 2;

/// Lines following the server header that belong to its summary block.
const SERVER_BLOCK_LINES: usize = 4;

static CLIENT_STEPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)/").expect("client steps pattern is valid"));

static SERVER_STEPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)").expect("server steps pattern is valid"));

static ERROR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)error").expect("error pattern is valid"));

/// Label/value pairs of one summary block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryBlock {
    fields: BTreeMap<String, String>,
}

impl SummaryBlock {
    /// Tokenize block lines of the form `[- ]Label: value`.
    ///
    /// Whitespace around the colon is optional. Lines without a colon or with
    /// an empty label are ignored. When a label repeats, the first occurrence
    /// wins.
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut fields = BTreeMap::new();
        for line in lines {
            let line = line.trim();
            let line = line.strip_prefix('-').unwrap_or(line).trim_start();
            if let Some((label, value)) = line.split_once(':') {
                let label = label.trim();
                if !label.is_empty() {
                    fields
                        .entry(label.to_string())
                        .or_insert_with(|| value.trim().to_string());
                }
            }
        }
        Self { fields }
    }

    /// Raw value stored under `label`.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields.get(label).map(String::as_str)
    }

    fn steps(&self, pattern: &Regex) -> Option<u32> {
        let value = self.get(STEPS_LABEL)?;
        pattern.captures(value)?.get(1)?.as_str().parse().ok()
    }

    fn reward(&self) -> Option<f64> {
        self.get(REWARD_LABEL).and_then(leading_number)
    }
}

/// Per-episode summaries observed by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientLog {
    pub episodes: BTreeMap<EpisodeNumber, EpisodeSummary>,
}

/// Per-episode summaries observed by the server, plus its error line count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerLog {
    pub episodes: BTreeMap<EpisodeNumber, EpisodeSummary>,
    /// Lines anywhere in the log containing "error" in any letter case
    pub error_lines: usize,
}

/// Parse the client's summary blocks.
///
/// Every marker line starts a new episode. A marker too close to the end of the
/// log to hold a full block produces no record, but still consumes its episode
/// number.
pub fn parse_client_log(text: &str) -> ClientLog {
    let lines: Vec<&str> = text.lines().collect();
    let mut episodes = BTreeMap::new();
    let mut episode: EpisodeNumber = 0;
    let mut i = 0;

    while i < lines.len() {
        if lines[i].trim() == EPISODE_END_MARKER {
            episode += 1;
            if i + CLIENT_BLOCK_LINES < lines.len() {
                let block = SummaryBlock::from_lines(
                    lines[i + 1..=i + CLIENT_BLOCK_LINES].iter().copied(),
                );
                let summary = EpisodeSummary::new(block.steps(&CLIENT_STEPS), block.reward());
                log::trace!("client episode {episode}: {summary:?}");
                episodes.insert(episode, summary);
                i += CLIENT_BLOCK_LINES;
            } else {
                log::warn!("client episode {episode}: summary block truncated, skipping");
            }
        }
        i += 1;
    }

    ClientLog { episodes }
}

/// Parse the server's summary blocks and count its error lines.
///
/// Every header line starts a new episode; scanning resumes after the block
/// whether or not it was complete.
pub fn parse_server_log(text: &str) -> ServerLog {
    let lines: Vec<&str> = text.lines().collect();
    let error_lines = count_error_lines(&lines);
    let mut episodes = BTreeMap::new();
    let mut episode: EpisodeNumber = 0;
    let mut i = 0;

    while i < lines.len() {
        if lines[i].contains(SERVER_SUMMARY_HEADER) {
            episode += 1;
            if i + SERVER_BLOCK_LINES < lines.len() {
                let block = SummaryBlock::from_lines(
                    lines[i + 1..=i + SERVER_BLOCK_LINES].iter().copied(),
                );
                let summary = EpisodeSummary::new(block.steps(&SERVER_STEPS), block.reward());
                log::trace!("server episode {episode}: {summary:?}");
                episodes.insert(episode, summary);
            } else {
                log::warn!("server episode {episode}: summary block truncated, skipping");
            }
            i += SERVER_BLOCK_LINES + 1;
        } else {
            i += 1;
        }
    }

    ServerLog {
        episodes,
        error_lines,
    }
}

/// Count lines mentioning "error" in any letter case.
pub fn count_error_lines(lines: &[&str]) -> usize {
    lines.iter().filter(|line| ERROR_LINE.is_match(line)).count()
}

/// Read and parse a client log.
///
/// # Errors
///
/// Returns an error if the log cannot be read.
pub fn parse_client_log_file(path: &Path) -> Result<ClientLog> {
    let parsed = parse_client_log(&read_log(path)?);
    log::debug!(
        "client log '{}': {} episode summaries",
        path.display(),
        parsed.episodes.len()
    );
    Ok(parsed)
}

/// Read and parse a server log.
///
/// # Errors
///
/// Returns an error if the log cannot be read.
pub fn parse_server_log_file(path: &Path) -> Result<ServerLog> {
    let parsed = parse_server_log(&read_log(path)?);
    log::debug!(
        "server log '{}': {} episode summaries, {} error lines",
        path.display(),
        parsed.episodes.len(),
        parsed.error_lines
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_strips_bullets_and_splits_on_first_colon() {
        let block = SummaryBlock::from_lines([
            " - Total Episodes: 1",
            "- Steps Taken: 26",
            "Note: a: b",
            "no separator here",
            ": orphan value",
        ]);
        assert_eq!(block.get("Total Episodes"), Some("1"));
        assert_eq!(block.get("Steps Taken"), Some("26"));
        assert_eq!(block.get("Note"), Some("a: b"));
        assert_eq!(block.get(""), None);
    }

    #[test]
    fn client_block_is_parsed() {
        let log = "=== End of Episode Summary ===\n\
                   Steps Taken: 20/30\n\
                   Discounted Episode Reward: -5.627220814338541\n\
                   ===============================================\n";
        let parsed = parse_client_log(log);
        assert_eq!(
            parsed.episodes.get(&1),
            Some(&EpisodeSummary::new(Some(20), Some(-5.627220814338541)))
        );
    }

    #[test]
    fn values_may_follow_the_colon_directly() {
        let log = "=== End of Episode Summary ===\n\
                   Steps Taken:20/30\n\
                   Discounted Episode Reward:-1.5\n";
        let parsed = parse_client_log(log);
        assert_eq!(parsed.episodes[&1], EpisodeSummary::new(Some(20), Some(-1.5)));
    }

    #[test]
    fn client_steps_need_the_slash_form() {
        let log = "=== End of Episode Summary ===\n\
                   Steps Taken: 20\n\
                   Discounted Episode Reward: oops\n";
        let parsed = parse_client_log(log);
        assert_eq!(parsed.episodes[&1], EpisodeSummary::new(None, None));
    }

    #[test]
    fn truncated_client_block_consumes_episode_number() {
        let log = "=== End of Episode Summary ===\n\
                   Steps Taken: 3/30\n\
                   Discounted Episode Reward: 1.0\n\
                   === End of Episode Summary ===\n\
                   Steps Taken: 4/30\n";
        let parsed = parse_client_log(log);
        assert_eq!(parsed.episodes.len(), 1);
        assert!(parsed.episodes.contains_key(&1));
        assert!(!parsed.episodes.contains_key(&2));
    }

    #[test]
    fn server_blocks_and_errors() {
        let log = "Server started\n\
                   End of episode summary:\n\
                   \x20- Total Episodes: 1\n\
                   \x20- Successful Episodes: 0\n\
                   \x20- Steps Taken: 26\n\
                   \x20- Discounted Episode Reward: -8.595328550337097\n\
                   ERROR: lost connection\n\
                   End of episode summary:\n\
                   \x20- Total Episodes: 2\n\
                   \x20- Successful Episodes: 1\n\
                   \x20- Steps Taken: 12\n\
                   \x20- Discounted Episode Reward: 3.5\n\
                   recovered from previous Error\n";
        let parsed = parse_server_log(log);
        assert_eq!(parsed.error_lines, 2);
        assert_eq!(
            parsed.episodes[&1],
            EpisodeSummary::new(Some(26), Some(-8.595328550337097))
        );
        assert_eq!(parsed.episodes[&2], EpisodeSummary::new(Some(12), Some(3.5)));
    }

    #[test]
    fn server_header_is_case_sensitive() {
        let log = "End of Episode Summary:\n\
                   \x20- Total Episodes: 1\n\
                   \x20- Successful Episodes: 0\n\
                   \x20- Steps Taken: 26\n\
                   \x20- Discounted Episode Reward: 1.0\n";
        assert!(parse_server_log(log).episodes.is_empty());
    }

    #[test]
    fn truncated_server_block_is_skipped() {
        let log = "End of episode summary:\n\
                   \x20- Total Episodes: 1\n\
                   \x20- Steps Taken: 26\n";
        let parsed = parse_server_log(log);
        assert!(parsed.episodes.is_empty());
    }
}
