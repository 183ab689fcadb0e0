//! Nine-point exploration around the current position.
//!
//! The explorer measures the center, then walks a fixed eight-move loop that
//! visits every compass neighbor without passing back through the center:
//!
//! ```text
//!   NW    N  →  NE      move order: forward, right, back, back,
//!   ↑     ↑     ↓                   left, left, forward, forward
//!   W     C     E
//!   ↑           ↓       labels:     N, NE, E, SE, S, SW, W, NW
//!   SW ←  S  ←  SE
//! ```
//!
//! Each stop is sampled and labelled with the compass point it sits on
//! relative to the starting center. The best neighbor wins if it is strictly
//! better than the center.
//!
//! # Drift
//!
//! The loop ends on the north-west sample point, one diagonal step away from
//! where it started. With [`DriftPolicy::Keep`] the vehicle stays there and the
//! reported heading is flown from the drifted position; with
//! [`DriftPolicy::ReturnToCenter`] two extra moves bring it back first. Either
//! way [`Exploration::displacement`] reports where the vehicle ended up.

use homing_types::{Direction, DriftPolicy, HomingResult, RelativeMove, SignalScore};
use nalgebra::Vector2;
use tracing::debug;

use crate::motion::fly_direction;
use crate::sampler::SignalSampler;
use crate::traits::{Mover, RawSignalSource};

/// The eight traversal moves and the compass label of the point each reaches.
pub const TRAVERSAL: [(RelativeMove, Direction); 8] = [
    (RelativeMove::Forward, Direction::North),
    (RelativeMove::Right, Direction::NorthEast),
    (RelativeMove::Back, Direction::East),
    (RelativeMove::Back, Direction::SouthEast),
    (RelativeMove::Left, Direction::South),
    (RelativeMove::Left, Direction::SouthWest),
    (RelativeMove::Forward, Direction::West),
    (RelativeMove::Forward, Direction::NorthWest),
];

/// Compass point the traversal finishes on.
pub const TRAVERSAL_END: Direction = Direction::NorthWest;

/// Result of one nine-point exploration.
#[derive(Debug, Clone, PartialEq)]
pub struct Exploration {
    direction: Direction,
    center_score: SignalScore,
    best_candidate: (Direction, SignalScore),
    samples: Vec<(Direction, SignalScore)>,
    displacement: Vector2<f64>,
}

impl Exploration {
    /// The chosen heading, or [`Direction::None`] if no neighbor beat the center.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns `true` if a neighbor beat the center.
    #[must_use]
    pub const fn improved(&self) -> bool {
        !matches!(self.direction, Direction::None)
    }

    /// Score measured at the center before moving.
    #[must_use]
    pub const fn center_score(&self) -> SignalScore {
        self.center_score
    }

    /// Best neighbor seen, whether or not it beat the center.
    #[must_use]
    pub const fn best_candidate(&self) -> (Direction, SignalScore) {
        self.best_candidate
    }

    /// All eight neighbor samples in traversal order.
    #[must_use]
    pub fn samples(&self) -> &[(Direction, SignalScore)] {
        &self.samples
    }

    /// Score sampled at the neighbor labelled `direction`.
    #[must_use]
    pub fn score_for(&self, direction: Direction) -> Option<SignalScore> {
        self.samples
            .iter()
            .find(|(label, _)| *label == direction)
            .map(|(_, score)| *score)
    }

    /// Net displacement of the vehicle from the starting center.
    #[must_use]
    pub const fn displacement(&self) -> Vector2<f64> {
        self.displacement
    }
}

/// Samples the eight compass neighbors of the current position.
///
/// # Example
///
/// ```
/// use homing_nav::explorer::NinePointExplorer;
/// use homing_nav::sampler::SignalSampler;
/// use homing_nav::sim::{RecordingMover, ScriptedSignal};
/// use homing_types::Direction;
///
/// // center, then N, NE, E, SE, S, SW, W, NW
/// let readings = vec![-50.0, -40.0, -45.0, -48.0, -49.0, -50.0, -50.0, -50.0, -50.0];
/// let mut sampler = SignalSampler::new(ScriptedSignal::sequence(readings));
/// let mut mover = RecordingMover::new();
///
/// let explorer = NinePointExplorer::new(0.5, 1);
/// let exploration = explorer.explore(&mut mover, &mut sampler).unwrap();
///
/// assert_eq!(exploration.direction(), Direction::North);
/// assert_eq!(mover.moves().len(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NinePointExplorer {
    step_size: f64,
    sample_count: usize,
    drift_policy: DriftPolicy,
}

impl NinePointExplorer {
    /// Creates an explorer that moves `step_size` per leg and averages
    /// `sample_count` readings per point.
    #[must_use]
    pub const fn new(step_size: f64, sample_count: usize) -> Self {
        Self {
            step_size,
            sample_count,
            drift_policy: DriftPolicy::Keep,
        }
    }

    /// Sets what happens to the traversal drift.
    #[must_use]
    pub const fn with_drift_policy(mut self, policy: DriftPolicy) -> Self {
        self.drift_policy = policy;
        self
    }

    /// Returns the leg length.
    #[must_use]
    pub const fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Returns the readings averaged per point.
    #[must_use]
    pub const fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Returns the drift policy.
    #[must_use]
    pub const fn drift_policy(&self) -> DriftPolicy {
        self.drift_policy
    }

    /// Measures the center and all eight neighbors.
    ///
    /// Sampling goes through [`SignalSampler::sample_with_retry`], so each
    /// point gets one retry after an outage.
    ///
    /// # Errors
    ///
    /// - [`homing_types::HomingError::SensorUnavailable`] if a point could not
    ///   be sampled even after the retry
    /// - [`homing_types::HomingError::MotionFault`] if a move was rejected
    pub fn explore<M, S>(
        &self,
        mover: &mut M,
        sampler: &mut SignalSampler<S>,
    ) -> HomingResult<Exploration>
    where
        M: Mover + ?Sized,
        S: RawSignalSource,
    {
        let center_score = sampler.sample_with_retry(self.sample_count)?;
        debug!(center = center_score.value(), step = self.step_size, "exploring neighbors");

        let mut displacement = Vector2::zeros();
        let mut samples = Vec::with_capacity(TRAVERSAL.len());
        let mut best_candidate = (Direction::None, center_score);

        for (index, (motion, label)) in TRAVERSAL.into_iter().enumerate() {
            mover.move_by(motion, self.step_size)?;
            displacement += motion.unit_offset() * self.step_size;

            let score = sampler.sample_with_retry(self.sample_count)?;
            debug!(neighbor = %label, score = score.value(), "neighbor sampled");

            // The first neighbor seeds the search; the center is only the bar to beat.
            if index == 0 || score.is_better_than(best_candidate.1) {
                best_candidate = (label, score);
            }
            samples.push((label, score));
        }

        if self.drift_policy == DriftPolicy::ReturnToCenter {
            let back = TRAVERSAL_END.opposite();
            fly_direction(mover, back, self.step_size)?;
            displacement += back.unit_offset() * self.step_size;
        }

        let direction = if best_candidate.1.is_better_than(center_score) {
            best_candidate.0
        } else {
            Direction::None
        };
        debug!(
            %direction,
            best = %best_candidate.0,
            best_score = best_candidate.1.value(),
            center = center_score.value(),
            "exploration finished"
        );

        Ok(Exploration {
            direction,
            center_score,
            best_candidate,
            samples,
            displacement,
        })
    }
}
