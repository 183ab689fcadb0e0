//! Run outcomes and diagnostics.
//!
//! A [`HomingOutcome`] is what a homing run hands back to the flight session:
//! how the run ended ([`HomingStatus`]) plus the counters the loop kept.
//!
//! # Example
//!
//! ```
//! use homing_types::{Direction, HomingOutcome, HomingStatus, SignalScore};
//! use std::time::Duration;
//!
//! let outcome = HomingOutcome::new(HomingStatus::Arrived, "fixed-step")
//!     .with_moves_made(4)
//!     .with_explorations_made(1)
//!     .with_last_score(SignalScore::new(28.5))
//!     .with_final_direction(Direction::Land)
//!     .with_elapsed(Duration::from_secs(42));
//!
//! assert!(outcome.is_arrived());
//! assert_eq!(outcome.moves_made(), 4);
//! ```

use std::time::Duration;

use crate::direction::Direction;
use crate::score::SignalScore;

/// How a homing run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HomingStatus {
    /// The score crossed the landing threshold; the vehicle should land.
    Arrived,
    /// The move budget ran out before arrival.
    Exhausted,
    /// The signal source stayed unavailable after a retry.
    Aborted,
}

impl HomingStatus {
    /// Returns `true` for [`HomingStatus::Arrived`].
    #[must_use]
    pub const fn is_arrived(self) -> bool {
        matches!(self, Self::Arrived)
    }
}

impl std::fmt::Display for HomingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Arrived => "arrived",
            Self::Exhausted => "exhausted",
            Self::Aborted => "aborted",
        })
    }
}

/// Result of one homing run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HomingOutcome {
    status: HomingStatus,
    profile: String,
    moves_made: usize,
    explorations_made: usize,
    regressions: usize,
    random_moves: usize,
    fine_moves: usize,
    fine_interrupted: bool,
    last_score: Option<SignalScore>,
    final_direction: Direction,
    elapsed: Duration,
}

impl HomingOutcome {
    /// Creates an outcome with zeroed counters.
    #[must_use]
    pub fn new(status: HomingStatus, profile: impl Into<String>) -> Self {
        Self {
            status,
            profile: profile.into(),
            moves_made: 0,
            explorations_made: 0,
            regressions: 0,
            random_moves: 0,
            fine_moves: 0,
            fine_interrupted: false,
            last_score: None,
            final_direction: Direction::None,
            elapsed: Duration::ZERO,
        }
    }

    /// Sets the number of committed moves.
    #[must_use]
    pub const fn with_moves_made(mut self, count: usize) -> Self {
        self.moves_made = count;
        self
    }

    /// Sets the number of nine-point explorations.
    #[must_use]
    pub const fn with_explorations_made(mut self, count: usize) -> Self {
        self.explorations_made = count;
        self
    }

    /// Sets the number of exploit steps that were reversed.
    #[must_use]
    pub const fn with_regressions(mut self, count: usize) -> Self {
        self.regressions = count;
        self
    }

    /// Sets the number of random fallback moves.
    #[must_use]
    pub const fn with_random_moves(mut self, count: usize) -> Self {
        self.random_moves = count;
        self
    }

    /// Sets the number of committed fine-approach moves.
    #[must_use]
    pub const fn with_fine_moves(mut self, count: usize) -> Self {
        self.fine_moves = count;
        self
    }

    /// Marks the fine approach as cut short by a signal outage.
    #[must_use]
    pub const fn with_fine_interrupted(mut self, interrupted: bool) -> Self {
        self.fine_interrupted = interrupted;
        self
    }

    /// Sets the last score the run measured.
    #[must_use]
    pub const fn with_last_score(mut self, score: SignalScore) -> Self {
        self.last_score = Some(score);
        self
    }

    /// Sets the heading the run finished on.
    #[must_use]
    pub const fn with_final_direction(mut self, direction: Direction) -> Self {
        self.final_direction = direction;
        self
    }

    /// Sets the wall time the run took.
    #[must_use]
    pub const fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Returns how the run ended.
    #[must_use]
    pub const fn status(&self) -> HomingStatus {
        self.status
    }

    /// Returns `true` if the run arrived.
    #[must_use]
    pub const fn is_arrived(&self) -> bool {
        self.status.is_arrived()
    }

    /// Returns the profile name.
    #[must_use]
    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Returns the number of committed moves.
    #[must_use]
    pub const fn moves_made(&self) -> usize {
        self.moves_made
    }

    /// Returns the number of nine-point explorations.
    #[must_use]
    pub const fn explorations_made(&self) -> usize {
        self.explorations_made
    }

    /// Returns the number of exploit steps that were reversed.
    #[must_use]
    pub const fn regressions(&self) -> usize {
        self.regressions
    }

    /// Returns the number of random fallback moves.
    #[must_use]
    pub const fn random_moves(&self) -> usize {
        self.random_moves
    }

    /// Returns the number of committed fine-approach moves.
    #[must_use]
    pub const fn fine_moves(&self) -> usize {
        self.fine_moves
    }

    /// Whether the fine approach stopped because the signal dropped out.
    ///
    /// The run still counts as arrived: the vehicle is back on the last
    /// validated fine step, inside the landing threshold.
    #[must_use]
    pub const fn fine_interrupted(&self) -> bool {
        self.fine_interrupted
    }

    /// Returns the last score the run measured, if any.
    #[must_use]
    pub const fn last_score(&self) -> Option<SignalScore> {
        self.last_score
    }

    /// Returns the heading the run finished on ([`Direction::Land`] on arrival).
    #[must_use]
    pub const fn final_direction(&self) -> Direction {
        self.final_direction
    }

    /// Returns the wall time the run took.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_outcome_is_zeroed() {
        let outcome = HomingOutcome::new(HomingStatus::Exhausted, "variable-step");
        assert_eq!(outcome.status(), HomingStatus::Exhausted);
        assert!(!outcome.is_arrived());
        assert_eq!(outcome.profile(), "variable-step");
        assert_eq!(outcome.moves_made(), 0);
        assert_eq!(outcome.explorations_made(), 0);
        assert_eq!(outcome.regressions(), 0);
        assert_eq!(outcome.random_moves(), 0);
        assert_eq!(outcome.fine_moves(), 0);
        assert!(!outcome.fine_interrupted());
        assert!(outcome.last_score().is_none());
        assert_eq!(outcome.final_direction(), Direction::None);
        assert_eq!(outcome.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_builder_counters() {
        let outcome = HomingOutcome::new(HomingStatus::Arrived, "fixed-step")
            .with_moves_made(7)
            .with_explorations_made(2)
            .with_regressions(1)
            .with_random_moves(1)
            .with_fine_moves(3)
            .with_fine_interrupted(true)
            .with_final_direction(Direction::Land);
        assert_eq!(outcome.moves_made(), 7);
        assert_eq!(outcome.explorations_made(), 2);
        assert_eq!(outcome.regressions(), 1);
        assert_eq!(outcome.random_moves(), 1);
        assert_eq!(outcome.fine_moves(), 3);
        assert!(outcome.fine_interrupted());
        assert_eq!(outcome.final_direction(), Direction::Land);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(HomingStatus::Arrived.to_string(), "arrived");
        assert_eq!(HomingStatus::Exhausted.to_string(), "exhausted");
        assert_eq!(HomingStatus::Aborted.to_string(), "aborted");
    }
}
