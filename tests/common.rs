//! Common test utilities for the qlog test suite.
//!
//! This module builds synthetic client and server logs in the formats the
//! simulation prints, and provides float comparison helpers.

#![allow(dead_code)]

use std::{fmt::Write as _, fs, path::Path};

/// One simulated episode as the client and server would report it.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeFixture {
    /// Q-value updates for state 0 during the episode
    pub q_updates: &'static [f64],
    pub steps: u32,
    pub reward: f64,
}

/// Render a client log: Q-value updates followed by the summary block.
///
/// Updates for other states are interleaved so the state-0 filter is exercised.
pub fn client_log(episodes: &[EpisodeFixture]) -> String {
    let mut log = String::from("Client connected to server\n");
    for (idx, episode) in episodes.iter().enumerate() {
        for (action, value) in episode.q_updates.iter().enumerate() {
            writeln!(log, "Updated Q-value for state 0, action {action}: {value}").unwrap();
            writeln!(log, "Updated Q-value for state 12, action {action}: 1000.0").unwrap();
        }
        writeln!(log, "=== End of Episode Summary ===").unwrap();
        writeln!(log, "Steps Taken: {}/30", episode.steps).unwrap();
        writeln!(log, "Discounted Episode Reward: {}", episode.reward).unwrap();
        writeln!(log, "===============================================").unwrap();
        writeln!(log, "Starting episode {}", idx + 2).unwrap();
    }
    log
}

/// Render a server log with one summary block per episode.
pub fn server_log(episodes: &[EpisodeFixture]) -> String {
    let mut log = String::from("Server listening\n");
    for (idx, episode) in episodes.iter().enumerate() {
        writeln!(log, "End of episode summary:").unwrap();
        writeln!(log, " - Total Episodes: {}", idx + 1).unwrap();
        writeln!(log, " - Successful Episodes: 0").unwrap();
        writeln!(log, " - Steps Taken: {}", episode.steps).unwrap();
        writeln!(log, " - Discounted Episode Reward: {}", episode.reward).unwrap();
    }
    log
}

pub fn write_file(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Assert two floats agree within `tol`.
pub fn assert_approx_eq(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected} within {tol}, got {actual}"
    );
}

pub const THREE_EPISODES: [EpisodeFixture; 3] = [
    EpisodeFixture {
        q_updates: &[0.5, 2.25, 1.0],
        steps: 20,
        reward: -5.627220814338541,
    },
    EpisodeFixture {
        q_updates: &[],
        steps: 30,
        reward: -8.595328550337097,
    },
    EpisodeFixture {
        q_updates: &[3.0, -1.0],
        steps: 12,
        reward: 3.5,
    },
];
