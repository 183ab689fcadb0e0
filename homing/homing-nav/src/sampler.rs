//! Averaged signal scores from a raw source.
//!
//! The sampler is the navigator's only defence against measurement noise:
//! it takes several raw readings, folds each to its magnitude, and returns
//! the mean. No filtering, no outlier rejection, and no state carried between
//! calls.

use homing_types::{HomingError, HomingResult, SensorUnavailable, SignalScore};
use tracing::{trace, warn};

use crate::traits::RawSignalSource;

/// Sample count used for the single retry after an outage.
///
/// Half the requested count, never less than one.
///
/// # Example
///
/// ```
/// use homing_nav::sampler::reduced_sample_count;
///
/// assert_eq!(reduced_sample_count(10), 5);
/// assert_eq!(reduced_sample_count(1), 1);
/// ```
#[must_use]
pub const fn reduced_sample_count(count: usize) -> usize {
    let half = count / 2;
    if half == 0 { 1 } else { half }
}

/// Turns raw readings into [`SignalScore`]s.
///
/// # Example
///
/// ```
/// use homing_nav::sampler::SignalSampler;
/// use homing_nav::sim::ScriptedSignal;
///
/// let mut sampler = SignalSampler::new(ScriptedSignal::cycling(vec![-40.0, -44.0]));
/// let score = sampler.sample_score(4).unwrap();
/// assert!((score.value() - 42.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SignalSampler<S> {
    source: S,
}

impl<S> SignalSampler<S> {
    /// Creates a sampler over `source`.
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns the underlying source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns the underlying source mutably.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Unwraps the underlying source.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: RawSignalSource> SignalSampler<S> {
    /// Takes `count` readings and returns the mean of their magnitudes.
    ///
    /// # Errors
    ///
    /// - [`HomingError::InvalidConfig`] if `count` is zero
    /// - [`HomingError::SensorUnavailable`] if any reading fails or is not
    ///   a finite number
    pub fn sample_score(&mut self, count: usize) -> HomingResult<SignalScore> {
        if count == 0 {
            return Err(HomingError::invalid_config("sample count must be at least 1"));
        }

        let mut readings = Vec::with_capacity(count);
        for _ in 0..count {
            let reading = self.source.read()?;
            if !reading.is_finite() {
                return Err(SensorUnavailable::new(format!("non-finite reading {reading}")).into());
            }
            readings.push(reading);
        }

        let score = SignalScore::mean_of(&readings)
            .ok_or_else(|| HomingError::invalid_config("sample count must be at least 1"))?;
        trace!(count, score = score.value(), "sampled signal");
        Ok(score)
    }

    /// Like [`sample_score`](Self::sample_score), but retries once with
    /// [`reduced_sample_count`] readings after an outage.
    ///
    /// # Errors
    ///
    /// Returns the retry's error if the second attempt also fails. Errors
    /// other than [`HomingError::SensorUnavailable`] are returned at once.
    pub fn sample_with_retry(&mut self, count: usize) -> HomingResult<SignalScore> {
        match self.sample_score(count) {
            Err(HomingError::SensorUnavailable(outage)) => {
                let reduced = reduced_sample_count(count);
                warn!(
                    reason = %outage.reason,
                    count,
                    retry_count = reduced,
                    "signal source unavailable, retrying with fewer samples"
                );
                self.sample_score(reduced)
            }
            other => other,
        }
    }
}
