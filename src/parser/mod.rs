//! Parsers for the text logs printed by the Q-learning client and server
//!
//! Two log shapes are understood:
//! - Q-value traces, where the client prints every Q-value update and closes an
//!   episode with a fixed marker line ([`q_values`]).
//! - End-of-episode summary blocks printed by both client and server, carrying
//!   step counts and discounted rewards ([`summary`]).
//!
//! Parsing never fails on malformed content: unparseable numbers degrade to
//! `None` and truncated blocks are skipped. Only reading the file itself can fail.

use std::{fs, path::Path, sync::LazyLock};

use regex::Regex;

use crate::{Error, Result};

pub mod q_values;
pub mod summary;

pub use q_values::{EpisodeDelta, EpisodeMaxQ, parse_max_q, parse_max_q_file, with_deltas};
pub use summary::{
    ClientLog, ServerLog, SummaryBlock, count_error_lines, parse_client_log,
    parse_client_log_file, parse_server_log, parse_server_log_file,
};

/// Marker line the client prints after every episode.
pub const EPISODE_END_MARKER: &str = "=== End of Episode Summary ===";

/// Header of the summary block the server prints after every episode.
pub const SERVER_SUMMARY_HEADER: &str = "End of episode summary:";

/// Label of the step count line inside summary blocks.
pub const STEPS_LABEL: &str = "Steps Taken";

/// Label of the discounted reward line inside summary blocks.
pub const REWARD_LABEL: &str = "Discounted Episode Reward";

/// A signed decimal number with optional fraction and exponent.
const NUMBER: &str = r"[-+]?\d*\.?\d+(?:[eE][-+]?\d+)?";

pub(crate) static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^({NUMBER})")).expect("number pattern is valid"));

pub(crate) static Q_VALUE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^Updated Q-value for state 0, action \d+:\s+({NUMBER})"
    ))
    .expect("q-value pattern is valid")
});

/// Read a whole log file into memory.
///
/// # Errors
///
/// Returns [`Error::Io`] naming the path if the file is missing or unreadable.
pub fn read_log(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|source| Error::io(format!("read log file '{}'", path.display()), source))
}

/// Parse the leading number of a field value, if any.
pub(crate) fn leading_number(value: &str) -> Option<f64> {
    NUMBER_PREFIX
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_number_accepts_exponents_and_signs() {
        assert_eq!(leading_number("-5.627220814338541"), Some(-5.627220814338541));
        assert_eq!(leading_number("+2e-3 trailing"), Some(0.002));
        assert_eq!(leading_number(".5"), Some(0.5));
        assert_eq!(leading_number("abc"), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn missing_log_reports_path() {
        let err = read_log(Path::new("/definitely/not/here.log")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.log"));
    }
}
