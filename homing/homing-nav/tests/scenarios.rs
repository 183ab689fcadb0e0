//! End-to-end homing scenarios against the simulated world.

#![allow(clippy::unwrap_used)]

use homing_nav::sim::{LinearField, PathLossField, SimulatedWorld};
use homing_nav::HomingNavigator;
use homing_types::{
    Direction, DriftPolicy, FixedStepProfile, HomingStatus, RelativeMove, VariableStepProfile,
};
use nalgebra::Point2;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A linear field whose score is 42 or less within one metre of `source`.
fn one_metre_field(source: Point2<f64>) -> SimulatedWorld {
    SimulatedWorld::new(LinearField::new(source, 40.0, 2.0))
}

fn navigator(
    world: &SimulatedWorld,
    seed: u64,
) -> HomingNavigator<homing_nav::sim::SimMover, homing_nav::sim::SimSensor> {
    HomingNavigator::with_rng(world.mover(), world.sensor(), StdRng::seed_from_u64(seed))
}

// ============================================================================
// Straight-line approach
// ============================================================================

#[test]
fn test_source_three_steps_east() {
    let world = one_metre_field(Point2::new(3.0, 0.0));
    let mut nav = navigator(&world, 11);

    let outcome = nav
        .run_fixed_step_homing(&FixedStepProfile::new(1.0, 1, 42.0, 20))
        .unwrap();

    assert_eq!(outcome.status(), HomingStatus::Arrived);
    assert_eq!(outcome.explorations_made(), 1);
    assert_eq!(outcome.moves_made(), 4);
    assert_eq!(outcome.final_direction(), Direction::Land);

    // Survey first, then nothing but eastward moves.
    let moves = world.moves();
    let after_survey = &moves[8..];
    assert!((3..=4).contains(&after_survey.len()));
    assert!(after_survey.iter().all(|&(m, _)| m == RelativeMove::Right));

    assert!(world.score_at(&world.position()).is_within(42.0));
}

#[test]
fn test_straight_line_bound_both_drift_policies() {
    for policy in [DriftPolicy::Keep, DriftPolicy::ReturnToCenter] {
        for k in 2..=8_u32 {
            let distance = f64::from(k);
            let world = one_metre_field(Point2::new(distance, 0.0));
            let mut nav = navigator(&world, u64::from(k));
            let profile = FixedStepProfile::new(1.0, 1, 42.0, 20).with_drift_policy(policy);

            let outcome = nav.run_fixed_step_homing(&profile).unwrap();

            assert_eq!(outcome.status(), HomingStatus::Arrived, "k={k} {policy:?}");
            assert_eq!(outcome.explorations_made(), 1, "k={k} {policy:?}");
            // One step per metre plus at most one to make up the survey drift.
            assert!(outcome.moves_made() <= k as usize + 1, "k={k} {policy:?}");
            assert!(outcome.moves_made() <= profile.move_budget());
        }
    }
}

#[test]
fn test_return_to_center_saves_the_drift_step() {
    let keep = {
        let world = one_metre_field(Point2::new(5.0, 0.0));
        navigator(&world, 1)
            .run_fixed_step_homing(&FixedStepProfile::new(1.0, 1, 42.0, 20))
            .unwrap()
    };
    let centered = {
        let world = one_metre_field(Point2::new(5.0, 0.0));
        let profile =
            FixedStepProfile::new(1.0, 1, 42.0, 20).with_drift_policy(DriftPolicy::ReturnToCenter);
        navigator(&world, 1).run_fixed_step_homing(&profile).unwrap()
    };
    assert_eq!(keep.moves_made(), 6);
    assert_eq!(centered.moves_made(), 4);
}

// ============================================================================
// Other fields
// ============================================================================

#[test]
fn test_path_loss_field_arrives_within_budget() {
    let sources = [
        Point2::new(6.0, 4.0),
        Point2::new(-5.0, 7.0),
        Point2::new(0.0, -9.0),
        Point2::new(10.0, -3.0),
    ];
    for (i, source) in sources.into_iter().enumerate() {
        let world = SimulatedWorld::new(PathLossField::new(source));
        let mut nav = navigator(&world, i as u64);
        let profile = FixedStepProfile::new(1.0, 1, 51.0, 30);

        let outcome = nav.run_fixed_step_homing(&profile).unwrap();

        assert_eq!(outcome.status(), HomingStatus::Arrived, "source {source}");
        assert!(outcome.moves_made() <= 30);
        assert!(world.score_at(&world.position()).is_within(51.0));
    }
}

#[test]
fn test_noisy_sensor_is_averaged_out() {
    let world = SimulatedWorld::new(LinearField::new(Point2::new(5.0, 5.0), 20.0, 5.0))
        .with_seed(2024)
        .with_noise(0.3)
        .unwrap();
    let mut nav = navigator(&world, 5);
    let profile = FixedStepProfile::new(1.0, 10, 26.0, 40);

    let outcome = nav.run_fixed_step_homing(&profile).unwrap();

    assert_eq!(outcome.status(), HomingStatus::Arrived);
    assert!(world.score_at(&world.position()).is_within(27.0));
}

#[test]
fn test_variable_step_lands_after_fine_approach() {
    let world = SimulatedWorld::new(LinearField::new(Point2::new(8.0, 8.0), 20.0, 5.0));
    let mut nav = navigator(&world, 8);
    let profile = VariableStepProfile::new(1, 25.0, 55.0, 1.5, 0.5, 0.1, 60);

    let outcome = nav.run_variable_step_homing(&profile).unwrap();

    assert_eq!(outcome.status(), HomingStatus::Arrived);
    assert_eq!(outcome.final_direction(), Direction::Land);
    let last = outcome.last_score().unwrap();
    assert!(last.is_within(25.0));
    assert!((world.score_at(&world.position()).value() - last.value()).abs() < 1e-9);
}

// ============================================================================
// Faults
// ============================================================================

#[test]
fn test_single_dropout_is_retried() {
    let world = one_metre_field(Point2::new(3.0, 0.0)).with_sensor_outages([0, 5]);
    let outcome = navigator(&world, 3)
        .run_fixed_step_homing(&FixedStepProfile::new(1.0, 1, 42.0, 20))
        .unwrap();
    assert_eq!(outcome.status(), HomingStatus::Arrived);
    assert_eq!(outcome.moves_made(), 4);
}

#[test]
fn test_dead_sensor_aborts() {
    let world = one_metre_field(Point2::new(3.0, 0.0)).with_sensor_dead_after(5);
    let outcome = navigator(&world, 3)
        .run_fixed_step_homing(&FixedStepProfile::new(1.0, 1, 42.0, 20))
        .unwrap();
    assert_eq!(outcome.status(), HomingStatus::Aborted);
    assert!(!outcome.is_arrived());
}

#[test]
fn test_rejected_move_is_an_error() {
    let world = one_metre_field(Point2::new(3.0, 0.0)).with_motion_fault_after(3);
    let error = navigator(&world, 3)
        .run_fixed_step_homing(&FixedStepProfile::new(1.0, 1, 42.0, 20))
        .unwrap_err();
    assert!(error.is_motion_fault());
    assert_eq!(world.moves().len(), 3);
}
