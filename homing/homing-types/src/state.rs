//! Per-run navigation state.

use crate::direction::Direction;

/// Mutable state of one homing run.
///
/// Created when a run starts and dropped when it ends; nothing survives
/// between runs.
///
/// Invariant: while [`previous_direction`](Self::previous_direction) is a
/// compass point, the last move was in that direction and did not worsen the
/// score measured at the start of its iteration.
///
/// # Example
///
/// ```
/// use homing_types::{Direction, NavigationState};
///
/// let mut state = NavigationState::new(0.5);
/// assert!(state.is_exploring());
///
/// state.commit(Direction::East);
/// assert_eq!(state.previous_direction(), Direction::East);
/// assert_eq!(state.move_count(), 1);
///
/// state.reset_heading();
/// assert!(state.is_exploring());
/// assert_eq!(state.move_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigationState {
    previous_direction: Direction,
    move_count: usize,
    step_size: f64,
}

impl NavigationState {
    /// Starts a run with no heading and no moves.
    #[must_use]
    pub const fn new(step_size: f64) -> Self {
        Self {
            previous_direction: Direction::None,
            move_count: 0,
            step_size,
        }
    }

    /// The committed heading, or [`Direction::None`] while exploring.
    #[must_use]
    pub const fn previous_direction(&self) -> Direction {
        self.previous_direction
    }

    /// Number of committed (non-corrective) moves so far.
    #[must_use]
    pub const fn move_count(&self) -> usize {
        self.move_count
    }

    /// Jump size for the current iteration.
    #[must_use]
    pub const fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Returns `true` if the next iteration must explore.
    #[must_use]
    pub const fn is_exploring(&self) -> bool {
        matches!(self.previous_direction, Direction::None)
    }

    /// Returns `true` once `budget` committed moves have been made.
    #[must_use]
    pub const fn budget_spent(&self, budget: usize) -> bool {
        self.move_count >= budget
    }

    /// Sets the jump size for the current iteration.
    pub fn set_step_size(&mut self, step_size: f64) {
        self.step_size = step_size;
    }

    /// Records a committed move and keeps `heading` for the next iteration.
    ///
    /// Passing [`Direction::None`] records the move but leaves the run
    /// exploring (used for the random fallback).
    pub fn commit(&mut self, heading: Direction) {
        self.previous_direction = heading;
        self.move_count += 1;
    }

    /// Records a committed move without touching the heading.
    pub fn count_move(&mut self) {
        self.move_count += 1;
    }

    /// Drops the heading so the next iteration explores.
    pub fn reset_heading(&mut self) {
        self.previous_direction = Direction::None;
    }

    /// Marks the run as landed.
    pub fn land(&mut self) {
        self.previous_direction = Direction::Land;
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(0.0)
    }
}
