//! Per-episode maximum Q-value for the reference state 0
//!
//! The client prints a line for every Q-value update:
//!
//! ```text
//! Updated Q-value for state 0, action 2: 3.5
//! ```
//!
//! and a marker line after every episode:
//!
//! ```text
//! === End of Episode Summary ===
//! ```
//!
//! The scan folds the lines into a list of closed episodes, each holding the
//! largest state-0 value seen since the previous marker.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{EPISODE_END_MARKER, Q_VALUE_LINE, read_log};
use crate::{Result, types::EpisodeNumber};

/// Largest Q-value for state 0 observed during one episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeMaxQ {
    pub episode: EpisodeNumber,
    /// `None` when no state-0 update was printed before the marker
    pub max_q: Option<f64>,
}

/// An episode's maximum together with its change from the previous episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeDelta {
    pub episode: EpisodeNumber,
    pub max_q: Option<f64>,
    pub delta: Option<f64>,
}

#[derive(Debug, Default)]
struct Scan {
    closed: Vec<EpisodeMaxQ>,
    running: Option<f64>,
}

impl Scan {
    fn consume(mut self, line: &str) -> Self {
        if let Some(value) = state_zero_value(line) {
            if self.running.is_none_or(|best| value > best) {
                self.running = Some(value);
            }
        }
        if line == EPISODE_END_MARKER {
            let episode = self.closed.len() as EpisodeNumber + 1;
            log::trace!("episode {episode} closed with max {:?}", self.running);
            self.closed.push(EpisodeMaxQ {
                episode,
                max_q: self.running.take(),
            });
        }
        self
    }
}

fn state_zero_value(line: &str) -> Option<f64> {
    let caps = Q_VALUE_LINE.captures(line)?;
    caps.get(1)?.as_str().parse::<f64>().ok()
}

/// Extract the maximum state-0 Q-value of every episode in `text`.
///
/// Episodes are numbered from 1 in the order their marker lines appear. Updates
/// printed after the last marker belong to no episode and are dropped.
///
/// # Examples
///
/// ```
/// use qlog::parser::parse_max_q;
///
/// let log = "Updated Q-value for state 0, action 2: 3.5\n\
///            === End of Episode Summary ===\n\
///            === End of Episode Summary ===\n";
/// let episodes = parse_max_q(log);
/// assert_eq!(episodes.len(), 2);
/// assert_eq!(episodes[0].max_q, Some(3.5));
/// assert_eq!(episodes[1].max_q, None);
/// ```
pub fn parse_max_q(text: &str) -> Vec<EpisodeMaxQ> {
    text.lines()
        .map(str::trim)
        .fold(Scan::default(), Scan::consume)
        .closed
}

/// Read `path` and extract per-episode maxima.
///
/// # Errors
///
/// Returns an error if the log cannot be read.
pub fn parse_max_q_file(path: &Path) -> Result<Vec<EpisodeMaxQ>> {
    let text = read_log(path)?;
    let episodes = parse_max_q(&text);
    log::debug!(
        "parsed {} episodes from '{}'",
        episodes.len(),
        path.display()
    );
    Ok(episodes)
}

/// Pair every episode with the signed change from the episode before it.
///
/// Input is processed in ascending episode order. The first episode, and any
/// episode where either side is `None`, has no delta.
pub fn with_deltas(episodes: &[EpisodeMaxQ]) -> Vec<EpisodeDelta> {
    let mut ordered = episodes.to_vec();
    ordered.sort_by_key(|e| e.episode);

    let mut previous: Option<EpisodeMaxQ> = None;
    ordered
        .into_iter()
        .map(|current| {
            let delta = previous
                .filter(|prev| prev.episode + 1 == current.episode)
                .and_then(|prev| Some(current.max_q? - prev.max_q?));
            previous = Some(current);
            EpisodeDelta {
                episode: current.episode,
                max_q: current.max_q,
                delta,
            }
        })
        .collect()
}
