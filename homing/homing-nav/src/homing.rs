//! The homing loop.
//!
//! [`HomingNavigator`] owns a [`Mover`], a [`RawSignalSource`], and a random
//! number generator, and runs one of two flight profiles against them:
//!
//! - [`run_fixed_step_homing`](HomingNavigator::run_fixed_step_homing): the
//!   same jump size for every move
//! - [`run_variable_step_homing`](HomingNavigator::run_variable_step_homing):
//!   a jump size picked from the current score, plus a fine approach once the
//!   landing threshold is crossed
//!
//! Both alternate between exploring (a nine-point survey when there is no
//! committed heading) and exploiting (repeating the committed heading while it
//! keeps the score from getting worse). A move that makes the score worse is
//! reversed and the loop goes back to exploring.
//!
//! # Example
//!
//! ```
//! use homing_nav::sim::{LinearField, SimulatedWorld};
//! use homing_nav::HomingNavigator;
//! use homing_types::{FixedStepProfile, HomingStatus};
//! use nalgebra::Point2;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! // Source three steps east; a score of 42 or less means within one step.
//! let world = SimulatedWorld::new(LinearField::new(Point2::new(3.0, 0.0), 40.0, 2.0));
//! let mut navigator =
//!     HomingNavigator::with_rng(world.mover(), world.sensor(), StdRng::seed_from_u64(7));
//!
//! let profile = FixedStepProfile::new(1.0, 1, 42.0, 20);
//! let outcome = navigator.run_fixed_step_homing(&profile).unwrap();
//!
//! assert_eq!(outcome.status(), HomingStatus::Arrived);
//! assert_eq!(outcome.explorations_made(), 1);
//! assert_eq!(outcome.moves_made(), 4);
//! ```

use std::time::Instant;

use homing_types::{
    Direction, DriftPolicy, FixedStepProfile, HomingError, HomingOutcome, HomingResult,
    HomingStatus, NavigationState, SignalScore, VariableStepProfile,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::explorer::NinePointExplorer;
use crate::fine::FineApproach;
use crate::motion::fly_direction;
use crate::sampler::SignalSampler;
use crate::traits::{Mover, RawSignalSource};

/// How a loop picks its jump size.
#[derive(Debug, Clone, Copy)]
enum StepPolicy<'a> {
    Fixed(f64),
    Ranged(&'a VariableStepProfile),
}

impl StepPolicy<'_> {
    fn step_for(self, score: SignalScore) -> f64 {
        match self {
            Self::Fixed(step) => step,
            Self::Ranged(profile) => profile.step_for(score),
        }
    }

    const fn initial_step(self) -> f64 {
        match self {
            Self::Fixed(step) => step,
            Self::Ranged(profile) => profile.near_step(),
        }
    }
}

/// Everything the shared loop needs to know about a profile.
#[derive(Debug, Clone, Copy)]
struct LoopPlan<'a> {
    name: &'static str,
    steps: StepPolicy<'a>,
    fine_step: Option<f64>,
    sample_count: usize,
    landing_threshold: f64,
    move_budget: usize,
    drift_policy: DriftPolicy,
}

/// Counters kept while a run is in progress.
#[derive(Debug, Default)]
struct RunTally {
    explorations: usize,
    regressions: usize,
    random_moves: usize,
    fine_moves: usize,
    fine_interrupted: bool,
    last_score: Option<SignalScore>,
}

/// Signal-strength homing navigator.
///
/// Generic over the vehicle link `M`, the signal source `S`, and the random
/// number generator `R` used for the random fallback move. The navigator keeps
/// no state between runs; each run builds its own [`NavigationState`].
#[derive(Debug)]
pub struct HomingNavigator<M, S, R = StdRng> {
    mover: M,
    sampler: SignalSampler<S>,
    rng: R,
}

impl<M, S> HomingNavigator<M, S, StdRng> {
    /// Creates a navigator whose random fallback is seeded from the OS.
    #[must_use]
    pub fn new(mover: M, source: S) -> Self {
        Self::with_rng(mover, source, StdRng::from_entropy())
    }
}

impl<M, S, R> HomingNavigator<M, S, R> {
    /// Creates a navigator with an explicit random number generator.
    #[must_use]
    pub const fn with_rng(mover: M, source: S, rng: R) -> Self {
        Self {
            mover,
            sampler: SignalSampler::new(source),
            rng,
        }
    }

    /// Returns the vehicle link.
    #[must_use]
    pub const fn mover(&self) -> &M {
        &self.mover
    }

    /// Returns the signal source.
    #[must_use]
    pub const fn source(&self) -> &S {
        self.sampler.source()
    }

    /// Takes the navigator apart.
    #[must_use]
    pub fn into_parts(self) -> (M, S, R) {
        (self.mover, self.sampler.into_inner(), self.rng)
    }
}

impl<M: Mover, S: RawSignalSource, R: Rng> HomingNavigator<M, S, R> {
    /// Runs the fixed-step homing loop.
    ///
    /// # Errors
    ///
    /// - [`HomingError::InvalidConfig`] if the profile fails validation
    /// - [`HomingError::MotionFault`] if the vehicle rejects a move
    ///
    /// A signal outage that survives the retry ends the run with
    /// [`HomingStatus::Aborted`] instead of an error.
    pub fn run_fixed_step_homing(
        &mut self,
        profile: &FixedStepProfile,
    ) -> HomingResult<HomingOutcome> {
        profile.validate()?;
        self.run(&LoopPlan {
            name: "fixed-step",
            steps: StepPolicy::Fixed(profile.step_size()),
            fine_step: None,
            sample_count: profile.sample_count(),
            landing_threshold: profile.landing_threshold(),
            move_budget: profile.move_budget(),
            drift_policy: profile.drift_policy(),
        })
    }

    /// Runs the variable-step homing loop with a fine approach on arrival.
    ///
    /// # Errors
    ///
    /// Same as [`run_fixed_step_homing`](Self::run_fixed_step_homing).
    pub fn run_variable_step_homing(
        &mut self,
        profile: &VariableStepProfile,
    ) -> HomingResult<HomingOutcome> {
        profile.validate()?;
        self.run(&LoopPlan {
            name: "variable-step",
            steps: StepPolicy::Ranged(profile),
            fine_step: Some(profile.fine_step()),
            sample_count: profile.sample_count(),
            landing_threshold: profile.landing_threshold(),
            move_budget: profile.move_budget(),
            drift_policy: profile.drift_policy(),
        })
    }

    fn run(&mut self, plan: &LoopPlan<'_>) -> HomingResult<HomingOutcome> {
        let started = Instant::now();
        let mut state = NavigationState::new(plan.steps.initial_step());
        let mut tally = RunTally::default();

        info!(
            profile = plan.name,
            budget = plan.move_budget,
            threshold = plan.landing_threshold,
            samples = plan.sample_count,
            "homing run started"
        );

        let status = loop {
            if state.budget_spent(plan.move_budget) {
                break HomingStatus::Exhausted;
            }

            let Some(current) =
                absorb_outage(self.sampler.sample_with_retry(plan.sample_count))?
            else {
                break HomingStatus::Aborted;
            };
            tally.last_score = Some(current);

            if current.is_within(plan.landing_threshold) {
                if let Some(fine_step) = plan.fine_step {
                    let fine = FineApproach::new(fine_step, plan.sample_count, plan.move_budget);
                    debug!(
                        step = fine.step_size(),
                        score = current.value(),
                        "entering fine approach"
                    );
                    let report =
                        fine.approach(&mut self.mover, &mut self.sampler, &mut state, current)?;
                    tally.fine_moves = report.moves;
                    tally.fine_interrupted = report.interrupted;
                    tally.last_score = Some(report.last_score);
                }
                state.land();
                break HomingStatus::Arrived;
            }

            state.set_step_size(plan.steps.step_for(current));
            debug!(
                moves = state.move_count(),
                score = current.value(),
                step = state.step_size(),
                heading = %state.previous_direction(),
                "homing iteration"
            );

            if state.is_exploring() {
                tally.explorations += 1;
                let explorer = NinePointExplorer::new(state.step_size(), plan.sample_count)
                    .with_drift_policy(plan.drift_policy);
                let Some(exploration) =
                    absorb_outage(explorer.explore(&mut self.mover, &mut self.sampler))?
                else {
                    break HomingStatus::Aborted;
                };

                let heading = exploration.direction();
                if heading.is_compass() {
                    fly_direction(&mut self.mover, heading, state.step_size())?;
                    state.commit(heading);
                } else {
                    let fallback = Direction::random(&mut self.rng);
                    debug!(%fallback, "no neighbor improved, taking a random step");
                    fly_direction(&mut self.mover, fallback, state.step_size())?;
                    state.commit(Direction::None);
                    tally.random_moves += 1;
                }
                continue;
            }

            let heading = state.previous_direction();
            fly_direction(&mut self.mover, heading, state.step_size())?;
            let Some(new_score) =
                absorb_outage(self.sampler.sample_with_retry(plan.sample_count))?
            else {
                break HomingStatus::Aborted;
            };
            tally.last_score = Some(new_score);

            if new_score.is_worse_than(current) {
                warn!(
                    %heading,
                    before = current.value(),
                    after = new_score.value(),
                    "signal got worse, reversing"
                );
                fly_direction(&mut self.mover, heading.opposite(), state.step_size())?;
                state.reset_heading();
                tally.regressions += 1;
            } else {
                state.count_move();
            }
        };

        let outcome = HomingOutcome::new(status, plan.name)
            .with_moves_made(state.move_count())
            .with_explorations_made(tally.explorations)
            .with_regressions(tally.regressions)
            .with_random_moves(tally.random_moves)
            .with_fine_moves(tally.fine_moves)
            .with_fine_interrupted(tally.fine_interrupted)
            .with_final_direction(state.previous_direction())
            .with_elapsed(started.elapsed());
        let outcome = match tally.last_score {
            Some(score) => outcome.with_last_score(score),
            None => outcome,
        };

        info!(
            profile = plan.name,
            status = %outcome.status(),
            moves = outcome.moves_made(),
            explorations = outcome.explorations_made(),
            regressions = outcome.regressions(),
            fine_interrupted = outcome.fine_interrupted(),
            "homing run finished"
        );
        Ok(outcome)
    }
}

/// Turns an unresolved signal outage into `Ok(None)` so the loop can abort.
fn absorb_outage<T>(result: HomingResult<T>) -> HomingResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(HomingError::SensorUnavailable(outage)) => {
            warn!(reason = %outage.reason, "signal source lost, aborting run");
            Ok(None)
        }
        Err(other) => Err(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sim::{RecordingMover, ScriptedSignal};
    use approx::assert_relative_eq;
    use homing_types::RelativeMove;

    fn navigator(
        readings: Vec<f64>,
    ) -> HomingNavigator<RecordingMover, ScriptedSignal, StdRng> {
        HomingNavigator::with_rng(
            RecordingMover::new(),
            ScriptedSignal::sequence(readings),
            StdRng::seed_from_u64(42),
        )
    }

    fn one_sample_profile() -> FixedStepProfile {
        FixedStepProfile::new(1.0, 1, 30.0, 20)
    }

    // ==== Termination Tests ====

    #[test]
    fn test_arrives_without_moving_when_already_close() {
        let mut nav = navigator(vec![-25.0]);
        let outcome = nav.run_fixed_step_homing(&one_sample_profile()).unwrap();
        assert_eq!(outcome.status(), HomingStatus::Arrived);
        assert_eq!(outcome.moves_made(), 0);
        assert_eq!(outcome.explorations_made(), 0);
        assert_eq!(outcome.final_direction(), Direction::Land);
        assert!(nav.mover().moves().is_empty());
        assert_eq!(outcome.profile(), "fixed-step");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut nav = navigator(vec![-30.0]);
        let outcome = nav.run_fixed_step_homing(&one_sample_profile()).unwrap();
        assert!(outcome.is_arrived());
    }

    #[test]
    fn test_flat_field_exhausts_with_random_moves() {
        let mut nav = HomingNavigator::with_rng(
            RecordingMover::new(),
            ScriptedSignal::constant(-50.0),
            StdRng::seed_from_u64(1),
        );
        let profile = one_sample_profile().with_move_budget(3);
        let outcome = nav.run_fixed_step_homing(&profile).unwrap();

        assert_eq!(outcome.status(), HomingStatus::Exhausted);
        assert_eq!(outcome.moves_made(), 3);
        assert_eq!(outcome.explorations_made(), 3);
        assert_eq!(outcome.random_moves(), 3);
        assert_eq!(outcome.final_direction(), Direction::None);
    }

    #[test]
    fn test_never_exceeds_budget() {
        for budget in 1..6 {
            let mut nav = HomingNavigator::with_rng(
                RecordingMover::new(),
                ScriptedSignal::constant(-50.0),
                StdRng::seed_from_u64(budget as u64),
            );
            let profile = one_sample_profile().with_move_budget(budget);
            let outcome = nav.run_fixed_step_homing(&profile).unwrap();
            assert_eq!(outcome.moves_made(), budget);
        }
    }

    #[test]
    fn test_invalid_profile_is_rejected_before_moving() {
        let mut nav = navigator(vec![-50.0]);
        let profile = one_sample_profile().with_sample_count(0);
        let error = nav.run_fixed_step_homing(&profile).unwrap_err();
        assert!(error.is_invalid_config());
        assert_eq!(nav.source().reads(), 0);
    }

    // ==== Exploit Tests ====

    #[test]
    fn test_explore_then_exploit_north() {
        // Start, survey (center + 8), then three exploit samples.
        let mut readings = vec![50.0, 50.0, 40.0];
        readings.extend([50.0; 7]);
        readings.extend([45.0, 44.0, 28.0]);
        let mut nav = navigator(readings);
        let outcome = nav.run_fixed_step_homing(&one_sample_profile()).unwrap();

        // One committed move after the survey, one exploit step, then arrival.
        assert_eq!(outcome.status(), HomingStatus::Arrived);
        assert_eq!(outcome.explorations_made(), 1);
        assert_eq!(outcome.moves_made(), 2);
        assert_eq!(outcome.regressions(), 0);
        assert_relative_eq!(outcome.last_score().unwrap().value(), 28.0);
    }

    #[test]
    fn test_equal_score_keeps_heading() {
        let mut readings = vec![50.0, 50.0, 40.0];
        readings.extend([50.0; 7]);
        readings.extend([45.0, 45.0, 20.0]);
        let mut nav = navigator(readings);
        let outcome = nav.run_fixed_step_homing(&one_sample_profile()).unwrap();
        assert_eq!(outcome.regressions(), 0);
        assert_eq!(outcome.moves_made(), 2);
    }

    // ==== Regression Tests ====

    #[test]
    fn test_regression_reverses_and_reexplores() {
        let mut readings = vec![50.0, 50.0, 40.0];
        readings.extend([50.0; 7]);
        readings.extend([45.0, 47.0, 25.0]);
        let mut nav = navigator(readings);
        let outcome = nav.run_fixed_step_homing(&one_sample_profile()).unwrap();

        assert_eq!(outcome.status(), HomingStatus::Arrived);
        assert_eq!(outcome.moves_made(), 1);
        assert_eq!(outcome.explorations_made(), 1);
        assert_eq!(outcome.regressions(), 1);

        let moves = nav.mover().moves();
        assert_eq!(moves.len(), 11);
        assert_eq!(
            &moves[8..],
            &[
                (RelativeMove::Forward, 1.0),
                (RelativeMove::Forward, 1.0),
                (RelativeMove::Back, 1.0),
            ]
        );
        // Back where the committed north move left it.
        assert_relative_eq!(nav.mover().displacement().x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(nav.mover().displacement().y, 2.0, epsilon = 1e-12);
    }

    // ==== Fault Tests ====

    #[test]
    fn test_outage_aborts() {
        let mut nav = navigator(vec![-50.0]);
        let outcome = nav.run_fixed_step_homing(&one_sample_profile()).unwrap();
        assert_eq!(outcome.status(), HomingStatus::Aborted);
        assert_eq!(outcome.explorations_made(), 1);
        assert_relative_eq!(outcome.last_score().unwrap().value(), 50.0);
    }

    #[test]
    fn test_outage_on_first_sample_aborts_without_score() {
        let mut nav = navigator(Vec::new());
        let outcome = nav.run_fixed_step_homing(&one_sample_profile()).unwrap();
        assert_eq!(outcome.status(), HomingStatus::Aborted);
        assert!(outcome.last_score().is_none());
    }

    #[test]
    fn test_recovered_outage_does_not_abort() {
        let mut nav = HomingNavigator::with_rng(
            RecordingMover::new(),
            ScriptedSignal::constant(-20.0).failing_first(1),
            StdRng::seed_from_u64(3),
        );
        let outcome = nav.run_fixed_step_homing(&one_sample_profile()).unwrap();
        assert!(outcome.is_arrived());
    }

    #[test]
    fn test_motion_fault_is_fatal() {
        let mut nav = HomingNavigator::with_rng(
            RecordingMover::new().rejecting_after(0),
            ScriptedSignal::constant(-50.0),
            StdRng::seed_from_u64(3),
        );
        let error = nav.run_fixed_step_homing(&one_sample_profile()).unwrap_err();
        assert!(error.is_motion_fault());
    }

    // ==== Variable-Step Tests ====

    fn variable_profile() -> VariableStepProfile {
        VariableStepProfile::new(1, 30.0, 55.0, 1.5, 0.5, 0.1, 20)
    }

    #[test]
    fn test_far_score_uses_far_step_then_fine_approach() {
        let mut readings = vec![60.0, 60.0, 50.0];
        readings.extend([60.0; 7]);
        // 28.5 is worse than 28 but still beats the 29 measured on arrival.
        readings.extend([29.0, 28.0, 28.5, 35.0]);
        let mut nav = navigator(readings);
        let outcome = nav.run_variable_step_homing(&variable_profile()).unwrap();

        assert_eq!(outcome.status(), HomingStatus::Arrived);
        assert_eq!(outcome.profile(), "variable-step");
        assert_eq!(outcome.moves_made(), 3);
        assert_eq!(outcome.fine_moves(), 2);
        assert!(!outcome.fine_interrupted());
        assert_eq!(outcome.final_direction(), Direction::Land);
        assert_relative_eq!(outcome.last_score().unwrap().value(), 28.5);

        let moves = nav.mover().moves();
        assert!(moves[..8].iter().all(|&(_, d)| (d - 1.5).abs() < 1e-12));
        assert_eq!(
            &moves[8..],
            &[
                (RelativeMove::Forward, 1.5),
                (RelativeMove::Forward, 0.1),
                (RelativeMove::Forward, 0.1),
                (RelativeMove::Forward, 0.1),
                (RelativeMove::Back, 0.1),
            ]
        );
    }

    #[test]
    fn test_signal_loss_during_fine_approach_is_reported() {
        let mut readings = vec![60.0, 60.0, 50.0];
        readings.extend([60.0; 7]);
        // The source goes silent after the first fine step is confirmed.
        readings.extend([29.0, 28.0]);
        let mut nav = navigator(readings);
        let outcome = nav.run_variable_step_homing(&variable_profile()).unwrap();

        assert_eq!(outcome.status(), HomingStatus::Arrived);
        assert!(outcome.fine_interrupted());
        assert_eq!(outcome.fine_moves(), 1);
        assert_eq!(outcome.moves_made(), 2);
        assert_eq!(outcome.final_direction(), Direction::Land);
        assert_relative_eq!(outcome.last_score().unwrap().value(), 28.0);
        assert_eq!(
            &nav.mover().moves()[8..],
            &[
                (RelativeMove::Forward, 1.5),
                (RelativeMove::Forward, 0.1),
                (RelativeMove::Forward, 0.1),
                (RelativeMove::Back, 0.1),
            ]
        );
    }

    #[test]
    fn test_clean_arrival_is_not_interrupted() {
        let mut nav = navigator(vec![-10.0]);
        let outcome = nav.run_fixed_step_homing(&one_sample_profile()).unwrap();
        assert!(outcome.is_arrived());
        assert!(!outcome.fine_interrupted());
    }

    #[test]
    fn test_near_score_uses_near_step() {
        let mut readings = vec![50.0, 50.0, 40.0];
        readings.extend([50.0; 7]);
        readings.push(20.0);
        let mut nav = navigator(readings);
        nav.run_variable_step_homing(&variable_profile()).unwrap();
        assert!(nav
            .mover()
            .moves()
            .iter()
            .all(|&(_, d)| (d - 0.5).abs() < 1e-12 || (d - 0.1).abs() < 1e-12));
    }

    #[test]
    fn test_fine_approach_skipped_without_heading() {
        let mut nav = navigator(vec![-10.0]);
        let outcome = nav.run_variable_step_homing(&variable_profile()).unwrap();
        assert!(outcome.is_arrived());
        assert_eq!(outcome.fine_moves(), 0);
        assert!(nav.mover().moves().is_empty());
    }

    #[test]
    fn test_variable_profile_validated() {
        let mut nav = navigator(vec![-50.0]);
        let profile = variable_profile().with_far_threshold(10.0);
        assert!(nav.run_variable_step_homing(&profile).unwrap_err().is_invalid_config());
    }

    #[test]
    fn test_into_parts_returns_collaborators() {
        let mut nav = navigator(vec![-10.0]);
        nav.run_fixed_step_homing(&one_sample_profile()).unwrap();
        let (mover, source, _rng) = nav.into_parts();
        assert!(mover.moves().is_empty());
        assert_eq!(source.reads(), 1);
    }
}
