//! Signal-strength homing for small aerial vehicles.
//!
//! This crate flies a vehicle toward a radio transmitter using nothing but a
//! scalar signal reading, on top of the value types in `homing-types`.
//!
//! # Overview
//!
//! - **Capabilities** ([`Mover`], [`RawSignalSource`]): the two traits the
//!   flight infrastructure implements
//! - **Sampling** ([`SignalSampler`]): averaged scores with one retry on outage
//! - **Exploration** ([`NinePointExplorer`]): a survey of the eight compass
//!   neighbors that picks the strongest one
//! - **Homing** ([`HomingNavigator`]): the explore/exploit loop, in a
//!   fixed-step and a variable-step profile
//! - **Motion** ([`fly_direction`], [`AccelerationCompensated`]): compass
//!   headings as body moves
//! - **Simulation** ([`sim`]): a simulated world and scripted mocks
//!
//! # Quick Start
//!
//! ```
//! use homing_nav::sim::{LinearField, SimulatedWorld};
//! use homing_nav::HomingNavigator;
//! use homing_types::{FixedStepProfile, HomingStatus};
//! use nalgebra::Point2;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! // Transmitter three metres east of the start.
//! let world = SimulatedWorld::new(LinearField::new(Point2::new(3.0, 0.0), 40.0, 2.0));
//!
//! let mut navigator =
//!     HomingNavigator::with_rng(world.mover(), world.sensor(), StdRng::seed_from_u64(1));
//! let profile = FixedStepProfile::new(1.0, 1, 42.0, 20);
//!
//! let outcome = navigator.run_fixed_step_homing(&profile).unwrap();
//! assert_eq!(outcome.status(), HomingStatus::Arrived);
//! assert!(world.score_at(&world.position()).is_within(42.0));
//! ```
//!
//! # Profiles
//!
//! | Profile | Step | Arrival |
//! |---------|------|---------|
//! | Fixed-step | Constant | Land as soon as the threshold is crossed |
//! | Variable-step | Far step above the far threshold, near step below | Fine approach along the last heading, then land |
//!
//! # Logging
//!
//! The crate emits `tracing` events (run start and end at `info`, iterations
//! and survey samples at `debug`, retries and regressions at `warn`) and never
//! installs a subscriber.

#![doc(html_root_url = "https://docs.rs/homing-nav/0.7.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod explorer;
pub mod fine;
pub mod homing;
pub mod motion;
pub mod sampler;
pub mod sim;
pub mod traits;

// Re-export main types for convenience
pub use explorer::{Exploration, NinePointExplorer};
pub use fine::{FineApproach, FineApproachReport};
pub use homing::HomingNavigator;
pub use motion::{fly_direction, AccelerationCompensated};
pub use sampler::SignalSampler;
pub use traits::{Mover, RawSignalSource};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod integration_tests {
    use super::*;
    use crate::sim::{LinearField, SimulatedWorld};
    use homing_types::{DriftPolicy, FixedStepProfile, HomingStatus, VariableStepProfile};
    use nalgebra::Point2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Compensated moves overshoot, but the loop still homes.
    #[test]
    fn test_homing_through_compensated_mover() {
        let world = SimulatedWorld::new(LinearField::new(Point2::new(0.0, -4.0), 20.0, 3.0));
        let mover = AccelerationCompensated::new(world.mover());
        let mut navigator =
            HomingNavigator::with_rng(mover, world.sensor(), StdRng::seed_from_u64(2));

        let profile = FixedStepProfile::new(0.5, 1, 24.0, 40);
        let outcome = navigator.run_fixed_step_homing(&profile).unwrap();

        assert_eq!(outcome.status(), HomingStatus::Arrived);
        assert!(world.score_at(&world.position()).is_within(24.0));
    }

    /// Returning to center lands on the same heading as keeping the drift.
    #[test]
    fn test_drift_policies_agree_on_heading() {
        for policy in [DriftPolicy::Keep, DriftPolicy::ReturnToCenter] {
            let world = SimulatedWorld::new(LinearField::new(Point2::new(-6.0, 0.0), 10.0, 1.0));
            let explorer = NinePointExplorer::new(1.0, 1).with_drift_policy(policy);
            let mut mover = world.mover();
            let mut sampler = SignalSampler::new(world.sensor());
            let exploration = explorer.explore(&mut mover, &mut sampler).unwrap();
            assert_eq!(exploration.direction(), homing_types::Direction::West);
        }
    }

    /// The variable-step loop takes far steps first and arrives.
    #[test]
    fn test_variable_step_on_simulated_world() {
        let world = SimulatedWorld::new(LinearField::new(Point2::new(8.0, 8.0), 20.0, 5.0));
        let mut navigator =
            HomingNavigator::with_rng(world.mover(), world.sensor(), StdRng::seed_from_u64(4));
        let profile = VariableStepProfile::new(1, 25.0, 55.0, 1.5, 0.5, 0.1, 60);

        let outcome = navigator.run_variable_step_homing(&profile).unwrap();
        assert_eq!(outcome.status(), HomingStatus::Arrived);
        assert!(world.moves().iter().any(|&(_, d)| (d - 1.5).abs() < 1e-12));
        assert!(outcome.moves_made() <= 60);
    }
}
