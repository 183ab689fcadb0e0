//! Error types for homing operations.
//!
//! The two capability interfaces report narrow errors:
//!
//! - [`SensorUnavailable`] from a signal source that could not produce a reading
//! - [`MotionFault`] from a vehicle that rejected a move
//!
//! Both convert into [`HomingError`], the single error root returned by the
//! navigator.

use thiserror::Error;

use crate::direction::RelativeMove;

/// Result type alias for homing operations.
pub type HomingResult<T> = Result<T, HomingError>;

/// The signal source could not produce a reading within its own timeout.
///
/// This is recoverable: the navigator retries once with fewer samples
/// before giving up on the flight.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("signal source unavailable: {reason}")]
pub struct SensorUnavailable {
    /// Why the reading could not be taken.
    pub reason: String,
}

impl SensorUnavailable {
    /// Creates a sensor outage with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The vehicle rejected a motion command.
///
/// This is fatal: after a failed move the vehicle's physical state is
/// unknown, so the navigator never retries.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("motion fault while moving {motion:?} by {distance}: {reason}")]
pub struct MotionFault {
    /// The move that was rejected.
    pub motion: RelativeMove,
    /// The commanded distance.
    pub distance: f64,
    /// Why the vehicle rejected the command.
    pub reason: String,
}

impl MotionFault {
    /// Creates a motion fault for the given command.
    #[must_use]
    pub fn new(motion: RelativeMove, distance: f64, reason: impl Into<String>) -> Self {
        Self {
            motion,
            distance,
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during a homing flight.
///
/// # Example
///
/// ```
/// use homing_types::{HomingError, SensorUnavailable};
///
/// let error: HomingError = SensorUnavailable::new("scan timed out").into();
/// assert!(error.is_sensor_unavailable());
/// assert!(error.to_string().contains("scan timed out"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum HomingError {
    /// The signal source could not produce a reading.
    #[error(transparent)]
    SensorUnavailable(#[from] SensorUnavailable),

    /// The vehicle rejected a move.
    #[error(transparent)]
    MotionFault(#[from] MotionFault),

    /// An invalid profile or explorer parameter was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl HomingError {
    /// Creates an invalid configuration error with the given message.
    ///
    /// # Example
    ///
    /// ```
    /// use homing_types::HomingError;
    ///
    /// let error = HomingError::invalid_config("step_size must be positive");
    /// assert!(error.to_string().contains("step_size"));
    /// ```
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Returns `true` if this is a recoverable sensor outage.
    #[must_use]
    pub const fn is_sensor_unavailable(&self) -> bool {
        matches!(self, Self::SensorUnavailable(_))
    }

    /// Returns `true` if this is a fatal motion fault.
    #[must_use]
    pub const fn is_motion_fault(&self) -> bool {
        matches!(self, Self::MotionFault(_))
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidConfig(_))
    }
}
