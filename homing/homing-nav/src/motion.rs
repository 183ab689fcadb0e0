//! Flying compass headings with a body-axis mover.
//!
//! [`fly_direction`] turns a [`Direction`] into body moves; diagonals are
//! flown as two moves because the vehicle's own diagonal commands behave
//! unreliably. [`AccelerationCompensated`] stretches every commanded distance
//! to make up for the time the vehicle spends speeding up and slowing down.

use homing_types::{Direction, MotionFault, RelativeMove};
use tracing::trace;

use crate::traits::Mover;

/// Flies `direction` for `distance` on each body axis it uses.
///
/// Sentinels ([`Direction::None`], [`Direction::Land`]) produce no motion.
///
/// # Errors
///
/// Returns the first [`MotionFault`]; later moves are not attempted.
///
/// # Example
///
/// ```
/// use homing_nav::motion::fly_direction;
/// use homing_nav::sim::RecordingMover;
/// use homing_types::{Direction, RelativeMove};
///
/// let mut mover = RecordingMover::new();
/// fly_direction(&mut mover, Direction::SouthWest, 0.5).unwrap();
///
/// assert_eq!(
///     mover.moves(),
///     &[(RelativeMove::Back, 0.5), (RelativeMove::Left, 0.5)]
/// );
/// ```
pub fn fly_direction<M: Mover + ?Sized>(
    mover: &mut M,
    direction: Direction,
    distance: f64,
) -> Result<(), MotionFault> {
    trace!(%direction, distance, "flying heading");
    for &motion in direction.relative_moves() {
        mover.move_by(motion, distance)?;
    }
    Ok(())
}

/// A [`Mover`] wrapper that lengthens each move to offset acceleration losses.
///
/// A move of `d` at cruise speed `v` is commanded as
/// `v * ((d / v) * (1 + boost) + buffer)`, i.e. the flight time is boosted by
/// a fraction and padded by a fixed motor spin-up buffer.
///
/// # Example
///
/// ```
/// use homing_nav::motion::AccelerationCompensated;
/// use homing_nav::sim::RecordingMover;
/// use homing_nav::Mover;
/// use homing_types::RelativeMove;
///
/// let mut mover = AccelerationCompensated::new(RecordingMover::new());
/// mover.move_by(RelativeMove::Forward, 1.0).unwrap();
///
/// // 0.2 * ((1.0 / 0.2) * 1.1 + 0.04) = 1.108
/// let (_, commanded) = mover.inner().moves()[0];
/// assert!((commanded - 1.108).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct AccelerationCompensated<M> {
    inner: M,
    flight_speed: f64,
    time_boost: f64,
    motor_change_buffer: f64,
}

impl<M> AccelerationCompensated<M> {
    /// Wraps `inner` with the default compensation (0.2 m/s cruise speed,
    /// 10% time boost, 0.04 s motor buffer).
    #[must_use]
    pub const fn new(inner: M) -> Self {
        Self {
            inner,
            flight_speed: 0.2,
            time_boost: 0.1,
            motor_change_buffer: 0.04,
        }
    }

    /// Sets the cruise speed the vehicle flies at.
    #[must_use]
    pub const fn with_flight_speed(mut self, speed: f64) -> Self {
        self.flight_speed = speed;
        self
    }

    /// Sets the fractional increase in flight time.
    #[must_use]
    pub const fn with_time_boost(mut self, boost: f64) -> Self {
        self.time_boost = boost;
        self
    }

    /// Sets the fixed time added per move for motor spin-up.
    #[must_use]
    pub const fn with_motor_change_buffer(mut self, seconds: f64) -> Self {
        self.motor_change_buffer = seconds;
        self
    }

    /// Distance actually commanded for a requested `distance`.
    ///
    /// Zero stays zero; a non-positive speed disables compensation.
    #[must_use]
    pub fn compensated_distance(&self, distance: f64) -> f64 {
        if distance.abs() <= f64::EPSILON || self.flight_speed <= 0.0 {
            return distance;
        }
        let flight_time = distance / self.flight_speed;
        let adjusted_time = flight_time * (1.0 + self.time_boost) + self.motor_change_buffer;
        self.flight_speed * adjusted_time
    }

    /// Returns the wrapped mover.
    #[must_use]
    pub const fn inner(&self) -> &M {
        &self.inner
    }

    /// Unwraps the inner mover.
    #[must_use]
    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: Mover> Mover for AccelerationCompensated<M> {
    fn move_by(&mut self, motion: RelativeMove, distance: f64) -> Result<(), MotionFault> {
        let commanded = self.compensated_distance(distance);
        self.inner.move_by(motion, commanded)
    }
}
