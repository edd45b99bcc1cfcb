//! Newtype wrappers for improved type safety and domain modeling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Episode numbers are 1-based and assigned in the order boundaries appear in a log.
pub type EpisodeNumber = u32;

/// Identifier of one full client/server simulation run.
///
/// Run numbers start at 1 and only ever grow across invocations that append to
/// the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunNumber(u64);

impl RunNumber {
    /// The run number used for an empty or missing table.
    pub const FIRST: RunNumber = RunNumber(1);

    /// Create a run number, rejecting zero.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `value` is zero.
    pub fn new(value: u64) -> Result<Self, crate::Error> {
        if value == 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: "run numbers start at 1".to_string(),
            });
        }
        Ok(RunNumber(value))
    }

    /// The run number following the largest one already recorded.
    ///
    /// `None` (nothing recorded) maps to [`RunNumber::FIRST`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `max_recorded` is
    /// already `u64::MAX`.
    pub fn after(max_recorded: Option<u64>) -> Result<Self, crate::Error> {
        match max_recorded {
            Some(max) => max.checked_add(1).map(RunNumber).ok_or_else(|| {
                crate::Error::InvalidConfiguration {
                    message: format!("run number {max} cannot be followed by another run"),
                }
            }),
            None => Ok(Self::FIRST),
        }
    }

    /// Get the inner value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Default for RunNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl From<RunNumber> for u64 {
    fn from(run: RunNumber) -> Self {
        run.0
    }
}

impl fmt::Display for RunNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metrics printed in one end-of-episode summary block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Steps taken during the episode
    pub steps: Option<u32>,
    /// Discounted episode reward
    pub reward: Option<f64>,
}

impl EpisodeSummary {
    pub fn new(steps: Option<u32>, reward: Option<f64>) -> Self {
        Self { steps, reward }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_a_run_number() {
        assert!(RunNumber::new(0).is_err());
        assert_eq!(RunNumber::new(7).unwrap().value(), 7);
    }

    #[test]
    fn run_after_nothing_is_first() {
        assert_eq!(RunNumber::after(None).unwrap(), RunNumber::FIRST);
        assert_eq!(RunNumber::after(Some(0)).unwrap().value(), 1);
        assert_eq!(RunNumber::after(Some(41)).unwrap().value(), 42);
    }

    #[test]
    fn largest_run_has_no_successor() {
        assert!(RunNumber::after(Some(u64::MAX)).is_err());
        assert_eq!(
            RunNumber::after(Some(u64::MAX - 1)).unwrap().value(),
            u64::MAX
        );
    }
}
