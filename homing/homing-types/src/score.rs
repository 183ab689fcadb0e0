//! Unitless signal scores.
//!
//! A [`SignalScore`] is the magnitude of a negative-dBm-style reading, so
//! values near zero mean a strong signal (close to the source) and large values
//! mean a weak one. Every "better than" comparison in the navigator is a
//! "less than" on scores.

use std::cmp::Ordering;

/// A non-negative signal score where smaller is stronger.
///
/// # Example
///
/// ```
/// use homing_types::SignalScore;
///
/// let near = SignalScore::from_reading(-28.0);
/// let far = SignalScore::from_reading(-61.5);
///
/// assert!(near.is_better_than(far));
/// assert!((near.value() - 28.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalScore(f64);

impl SignalScore {
    /// A perfect score (the source itself).
    pub const ZERO: Self = Self(0.0);

    /// Creates a score from a magnitude; the sign is discarded.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value.abs())
    }

    /// Creates a score from one raw (signed) sensor reading.
    #[must_use]
    pub fn from_reading(reading: f64) -> Self {
        Self::new(reading)
    }

    /// Arithmetic mean of the absolute values of `readings`.
    ///
    /// Returns `None` for an empty slice.
    ///
    /// # Example
    ///
    /// ```
    /// use homing_types::SignalScore;
    ///
    /// let score = SignalScore::mean_of(&[-40.0, -44.0, 42.0]).unwrap();
    /// assert!((score.value() - 42.0).abs() < 1e-12);
    /// assert!(SignalScore::mean_of(&[]).is_none());
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_of(readings: &[f64]) -> Option<Self> {
        if readings.is_empty() {
            return None;
        }
        let sum: f64 = readings.iter().map(|r| r.abs()).sum();
        Some(Self(sum / readings.len() as f64))
    }

    /// Raw score value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns `true` if this score is strictly stronger than `other`.
    #[must_use]
    pub fn is_better_than(self, other: Self) -> bool {
        self.0 < other.0
    }

    /// Returns `true` if this score is strictly weaker than `other`.
    #[must_use]
    pub fn is_worse_than(self, other: Self) -> bool {
        self.0 > other.0
    }

    /// Returns `true` if the score is at or inside `threshold`.
    #[must_use]
    pub fn is_within(self, threshold: f64) -> bool {
        self.0 <= threshold
    }

    /// Total order over scores (NaN sorts last).
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::fmt::Display for SignalScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<SignalScore> for f64 {
    fn from(score: SignalScore) -> Self {
        score.0
    }
}
