//! Reconciliation of client- and server-observed episode summaries
//!
//! Both sides of a run report steps taken and the discounted reward of every
//! episode. The comparator outer-joins the two per-episode maps and flags every
//! episode where the sides disagree or one side is missing.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    table::{TableRow, format_flag, format_float, format_optional},
    types::{EpisodeNumber, EpisodeSummary, RunNumber},
};

/// Largest absolute reward difference still treated as agreement.
pub const REWARD_TOLERANCE: f64 = 1e-9;

/// Client and server view of one episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub run: RunNumber,
    pub episode: EpisodeNumber,
    pub client_steps: Option<u32>,
    pub server_steps: Option<u32>,
    pub steps_mismatch: bool,
    pub client_reward: Option<f64>,
    pub server_reward: Option<f64>,
    pub reward_mismatch: bool,
    /// Always `None`; the table column is kept but left blank
    pub server_error_count: Option<usize>,
}

impl TableRow for ComparisonRecord {
    const HEADER: &'static [&'static str] = &[
        "Run",
        "Episode",
        "ClientSteps",
        "ServerSteps",
        "StepsMismatch",
        "ClientReward",
        "ServerReward",
        "RewardMismatch",
        "ServerErrorCount",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.run.to_string(),
            self.episode.to_string(),
            format_optional(self.client_steps),
            format_optional(self.server_steps),
            format_flag(self.steps_mismatch),
            format_float(self.client_reward),
            format_float(self.server_reward),
            format_flag(self.reward_mismatch),
            format_optional(self.server_error_count),
        ]
    }
}

/// Outcome of reconciling one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub run: RunNumber,
    pub records: Vec<ComparisonRecord>,
    pub step_mismatches: usize,
    pub reward_mismatches: usize,
    pub server_error_lines: usize,
}

impl Assessment {
    /// True when every episode agrees on both steps and reward.
    pub fn is_consistent(&self) -> bool {
        self.step_mismatches == 0 && self.reward_mismatches == 0
    }
}

/// Whether two optional step counts disagree; a missing side always does.
pub fn steps_mismatch(client: Option<u32>, server: Option<u32>) -> bool {
    match (client, server) {
        (Some(c), Some(s)) => c != s,
        _ => true,
    }
}

/// Whether two optional rewards disagree beyond [`REWARD_TOLERANCE`].
pub fn reward_mismatch(client: Option<f64>, server: Option<f64>) -> bool {
    match (client, server) {
        (Some(c), Some(s)) => (c - s).abs() > REWARD_TOLERANCE,
        _ => true,
    }
}

/// Compare every episode present on either side, in ascending order.
pub fn compare_episodes(
    run: RunNumber,
    client: &BTreeMap<EpisodeNumber, EpisodeSummary>,
    server: &BTreeMap<EpisodeNumber, EpisodeSummary>,
    server_error_lines: usize,
) -> Assessment {
    let episodes: BTreeSet<EpisodeNumber> = client.keys().chain(server.keys()).copied().collect();

    let records: Vec<ComparisonRecord> = episodes
        .into_iter()
        .map(|episode| {
            let c = client.get(&episode).copied().unwrap_or_default();
            let s = server.get(&episode).copied().unwrap_or_default();
            ComparisonRecord {
                run,
                episode,
                client_steps: c.steps,
                server_steps: s.steps,
                steps_mismatch: steps_mismatch(c.steps, s.steps),
                client_reward: c.reward,
                server_reward: s.reward,
                reward_mismatch: reward_mismatch(c.reward, s.reward),
                server_error_count: None,
            }
        })
        .collect();

    let step_mismatches = records.iter().filter(|r| r.steps_mismatch).count();
    let reward_mismatches = records.iter().filter(|r| r.reward_mismatch).count();

    Assessment {
        run,
        records,
        step_mismatches,
        reward_mismatches,
        server_error_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(steps: u32, reward: f64) -> BTreeMap<EpisodeNumber, EpisodeSummary> {
        BTreeMap::from([(1, EpisodeSummary::new(Some(steps), Some(reward)))])
    }

    #[test]
    fn identical_sides_agree() {
        let result = compare_episodes(RunNumber::FIRST, &single(20, -5.0), &single(20, -5.0), 0);
        assert_eq!(result.records.len(), 1);
        assert!(!result.records[0].steps_mismatch);
        assert!(!result.records[0].reward_mismatch);
        assert!(result.is_consistent());
    }

    #[test]
    fn differing_steps_only_flag_steps() {
        let result = compare_episodes(RunNumber::FIRST, &single(20, -5.0), &single(21, -5.0), 0);
        assert!(result.records[0].steps_mismatch);
        assert!(!result.records[0].reward_mismatch);
        assert_eq!(result.step_mismatches, 1);
        assert_eq!(result.reward_mismatches, 0);
    }

    #[test]
    fn reward_tolerance_is_strict() {
        assert!(!reward_mismatch(Some(1.0), Some(1.0 + 5e-10)));
        assert!(reward_mismatch(Some(1.0), Some(1.0 + 1e-8)));
        assert!(reward_mismatch(None, Some(1.0)));
    }

    #[test]
    fn outer_join_flags_missing_sides() {
        let client = BTreeMap::from([
            (1, EpisodeSummary::new(Some(5), Some(1.0))),
            (3, EpisodeSummary::new(Some(7), Some(2.0))),
        ]);
        let server = BTreeMap::from([
            (1, EpisodeSummary::new(Some(5), Some(1.0))),
            (2, EpisodeSummary::new(Some(6), None)),
        ]);
        let result = compare_episodes(RunNumber::new(4).unwrap(), &client, &server, 3);

        let episodes: Vec<_> = result.records.iter().map(|r| r.episode).collect();
        assert_eq!(episodes, vec![1, 2, 3]);
        assert!(result.records[1].steps_mismatch);
        assert!(result.records[1].reward_mismatch);
        assert!(result.records[2].steps_mismatch);
        assert_eq!(result.server_error_lines, 3);
        assert!(result.records.iter().all(|r| r.server_error_count.is_none()));
    }

    #[test]
    fn row_fields_leave_error_count_blank() {
        let result = compare_episodes(RunNumber::FIRST, &single(20, -5.0), &BTreeMap::new(), 9);
        assert_eq!(
            result.records[0].fields(),
            vec!["1", "1", "20", "", "1", "-5.000000", "", "1", ""]
        );
    }
}
