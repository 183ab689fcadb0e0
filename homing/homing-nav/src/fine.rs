//! Small-step refinement near the source.
//!
//! Coarse jumps overshoot once the vehicle is close. After the landing
//! threshold is crossed, the fine approach keeps nudging along the committed
//! heading in small steps for as long as each step is strictly better than the
//! score measured on entry, and backs out the first step that is not.

use homing_types::{HomingError, HomingResult, NavigationState, SignalScore};
use tracing::{debug, warn};

use crate::motion::fly_direction;
use crate::sampler::SignalSampler;
use crate::traits::{Mover, RawSignalSource};

/// What a fine approach did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FineApproachReport {
    /// Committed fine steps.
    pub moves: usize,
    /// Score after the last committed step (the entry score if none).
    pub last_score: SignalScore,
    /// Whether the approach stopped because the signal source dropped out.
    pub interrupted: bool,
}

/// Fine-approach settings.
///
/// # Example
///
/// ```
/// use homing_nav::fine::FineApproach;
/// use homing_nav::sampler::SignalSampler;
/// use homing_nav::sim::{RecordingMover, ScriptedSignal};
/// use homing_types::{Direction, NavigationState, SignalScore};
///
/// let mut state = NavigationState::new(0.5);
/// state.commit(Direction::North);
///
/// // One step that beats the entry score, then one that does not.
/// let mut sampler = SignalSampler::new(ScriptedSignal::sequence(vec![-28.0, -31.0]));
/// let mut mover = RecordingMover::new();
///
/// let fine = FineApproach::new(0.1, 1, 20);
/// assert!((fine.step_size() - 0.1).abs() < 1e-12);
///
/// let report = fine
///     .approach(&mut mover, &mut sampler, &mut state, SignalScore::new(30.0))
///     .unwrap();
///
/// assert_eq!(report.moves, 1);
/// assert_eq!(state.move_count(), 2);
/// assert_eq!(mover.moves().len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FineApproach {
    step_size: f64,
    sample_count: usize,
    move_budget: usize,
}

impl FineApproach {
    /// Creates a fine approach with the given step, sampling, and budget.
    ///
    /// The budget is shared with the outer loop: the approach stops once the
    /// state's committed moves reach it.
    #[must_use]
    pub const fn new(step_size: f64, sample_count: usize, move_budget: usize) -> Self {
        Self {
            step_size,
            sample_count,
            move_budget,
        }
    }

    /// Returns the fine step length.
    #[must_use]
    pub const fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Runs the approach along the state's committed heading.
    ///
    /// Every step is judged against `entry_score`, not against the previous
    /// fine step. Does nothing if the state has no compass heading.
    ///
    /// # Errors
    ///
    /// Returns [`HomingError::MotionFault`] if a move is rejected. A signal
    /// outage is not an error here: the unvalidated step is backed out and
    /// the report is marked as interrupted.
    pub fn approach<M, S>(
        &self,
        mover: &mut M,
        sampler: &mut SignalSampler<S>,
        state: &mut NavigationState,
        entry_score: SignalScore,
    ) -> HomingResult<FineApproachReport>
    where
        M: Mover + ?Sized,
        S: RawSignalSource,
    {
        let heading = state.previous_direction();
        let mut report = FineApproachReport {
            moves: 0,
            last_score: entry_score,
            interrupted: false,
        };
        if !heading.is_compass() {
            return Ok(report);
        }
        debug!(
            %heading,
            step = self.step_size,
            entry = entry_score.value(),
            "starting fine approach"
        );

        while !state.budget_spent(self.move_budget) {
            fly_direction(mover, heading, self.step_size)?;

            let score = match sampler.sample_with_retry(self.sample_count) {
                Ok(score) => score,
                Err(HomingError::SensorUnavailable(outage)) => {
                    warn!(reason = %outage.reason, "signal lost during fine approach, backing out");
                    fly_direction(mover, heading.opposite(), self.step_size)?;
                    report.interrupted = true;
                    break;
                }
                Err(other) => return Err(other),
            };

            if score.is_better_than(entry_score) {
                state.count_move();
                report.moves += 1;
                report.last_score = score;
                debug!(score = score.value(), "fine step committed");
            } else {
                fly_direction(mover, heading.opposite(), self.step_size)?;
                debug!(score = score.value(), "fine step did not improve, backed out");
                break;
            }
        }

        Ok(report)
    }
}
