//! Flight profiles for the homing loop.
//!
//! Two profiles share one loop skeleton:
//!
//! - [`FixedStepProfile`]: every jump has the same length; the run lands as
//!   soon as the score crosses the landing threshold.
//! - [`VariableStepProfile`]: jumps are longer while the signal is weak, and a
//!   small-step fine approach runs once the landing threshold is crossed.
//!
//! Defaults are the field-tested flight constants: 10 samples per score,
//! landing at 30, a budget of 20 committed moves, 0.5 m jumps, and 1.5 m jumps
//! above a score of 55.
//!
//! # Example
//!
//! ```
//! use homing_types::{DriftPolicy, FixedStepProfile, VariableStepProfile};
//!
//! let fixed = FixedStepProfile::default()
//!     .with_step_size(0.25)
//!     .with_move_budget(40);
//! assert!(fixed.validate().is_ok());
//!
//! let ranged = VariableStepProfile::default()
//!     .with_fine_step(0.05)
//!     .with_drift_policy(DriftPolicy::ReturnToCenter);
//! assert!(ranged.validate().is_ok());
//! ```

use crate::error::{HomingError, HomingResult};
use crate::score::SignalScore;

/// What the nine-point explorer does about the drift its traversal causes.
///
/// The eight-move traversal never passes back through the center, so after
/// sampling the vehicle sits next to the north-west sample point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DriftPolicy {
    /// Stay where the traversal ended. The chosen heading is flown from there.
    #[default]
    Keep,
    /// Fly back to the center before reporting (two extra moves).
    ReturnToCenter,
}

fn check_step(name: &str, value: f64) -> HomingResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(HomingError::invalid_config(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

fn check_threshold(name: &str, value: f64) -> HomingResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(HomingError::invalid_config(format!(
            "{name} must be non-negative and finite, got {value}"
        )))
    }
}

fn check_common(sample_count: usize, move_budget: usize) -> HomingResult<()> {
    if sample_count == 0 {
        return Err(HomingError::invalid_config("sample_count must be at least 1"));
    }
    if move_budget == 0 {
        return Err(HomingError::invalid_config("move_budget must be at least 1"));
    }
    Ok(())
}

/// Fixed-step homing profile.
///
/// # Example
///
/// ```
/// use homing_types::FixedStepProfile;
///
/// let profile = FixedStepProfile::new(1.0, 5, 42.0, 30);
/// assert_eq!(profile.move_budget(), 30);
/// assert!((profile.step_size() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedStepProfile {
    step_size: f64,
    sample_count: usize,
    landing_threshold: f64,
    move_budget: usize,
    drift_policy: DriftPolicy,
}

impl FixedStepProfile {
    /// Creates a profile from the four loop parameters.
    #[must_use]
    pub const fn new(
        step_size: f64,
        sample_count: usize,
        landing_threshold: f64,
        move_budget: usize,
    ) -> Self {
        Self {
            step_size,
            sample_count,
            landing_threshold,
            move_budget,
            drift_policy: DriftPolicy::Keep,
        }
    }

    /// Fast, coarse preset for strong signals in open air: 1 m jumps and
    /// 5 readings per score.
    #[must_use]
    pub const fn coarse() -> Self {
        Self::new(1.0, 5, 30.0, 20)
    }

    /// Slow, careful preset for noisy environments: 0.25 m jumps, 20
    /// readings per score, and a larger budget to make up for the short steps.
    #[must_use]
    pub const fn careful() -> Self {
        Self::new(0.25, 20, 30.0, 60).with_drift_policy(DriftPolicy::ReturnToCenter)
    }

    /// Sets the jump size.
    #[must_use]
    pub const fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Sets the number of raw readings averaged per score.
    #[must_use]
    pub const fn with_sample_count(mut self, count: usize) -> Self {
        self.sample_count = count;
        self
    }

    /// Sets the score at or below which the vehicle lands.
    #[must_use]
    pub const fn with_landing_threshold(mut self, threshold: f64) -> Self {
        self.landing_threshold = threshold;
        self
    }

    /// Sets the maximum number of committed moves.
    #[must_use]
    pub const fn with_move_budget(mut self, budget: usize) -> Self {
        self.move_budget = budget;
        self
    }

    /// Sets the explorer drift policy.
    #[must_use]
    pub const fn with_drift_policy(mut self, policy: DriftPolicy) -> Self {
        self.drift_policy = policy;
        self
    }

    /// Returns the jump size.
    #[must_use]
    pub const fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Returns the number of raw readings averaged per score.
    #[must_use]
    pub const fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Returns the landing threshold.
    #[must_use]
    pub const fn landing_threshold(&self) -> f64 {
        self.landing_threshold
    }

    /// Returns the move budget.
    #[must_use]
    pub const fn move_budget(&self) -> usize {
        self.move_budget
    }

    /// Returns the explorer drift policy.
    #[must_use]
    pub const fn drift_policy(&self) -> DriftPolicy {
        self.drift_policy
    }

    /// Checks every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`HomingError::InvalidConfig`] for a non-positive step, a zero
    /// sample count or budget, or a negative threshold.
    pub fn validate(&self) -> HomingResult<()> {
        check_step("step_size", self.step_size)?;
        check_threshold("landing_threshold", self.landing_threshold)?;
        check_common(self.sample_count, self.move_budget)
    }
}

impl Default for FixedStepProfile {
    fn default() -> Self {
        Self::new(0.5, 10, 30.0, 20)
    }
}

/// Variable-step homing profile with a fine approach.
///
/// # Example
///
/// ```
/// use homing_types::{SignalScore, VariableStepProfile};
///
/// let profile = VariableStepProfile::default();
/// assert!((profile.step_for(SignalScore::new(70.0)) - 1.5).abs() < 1e-12);
/// assert!((profile.step_for(SignalScore::new(40.0)) - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableStepProfile {
    sample_count: usize,
    landing_threshold: f64,
    far_threshold: f64,
    far_step: f64,
    near_step: f64,
    fine_step: f64,
    move_budget: usize,
    drift_policy: DriftPolicy,
}

impl VariableStepProfile {
    /// Creates a profile from the seven loop parameters.
    #[must_use]
    pub const fn new(
        sample_count: usize,
        landing_threshold: f64,
        far_threshold: f64,
        far_step: f64,
        near_step: f64,
        fine_step: f64,
        move_budget: usize,
    ) -> Self {
        Self {
            sample_count,
            landing_threshold,
            far_threshold,
            far_step,
            near_step,
            fine_step,
            move_budget,
            drift_policy: DriftPolicy::Keep,
        }
    }

    /// Preset for long approaches: 3 m jumps while the score is above 65.
    #[must_use]
    pub const fn long_range() -> Self {
        Self::new(10, 30.0, 65.0, 3.0, 0.5, 0.1, 40)
    }

    /// Sets the number of raw readings averaged per score.
    #[must_use]
    pub const fn with_sample_count(mut self, count: usize) -> Self {
        self.sample_count = count;
        self
    }

    /// Sets the score at or below which the fine approach starts.
    #[must_use]
    pub const fn with_landing_threshold(mut self, threshold: f64) -> Self {
        self.landing_threshold = threshold;
        self
    }

    /// Sets the score above which the far step is used.
    #[must_use]
    pub const fn with_far_threshold(mut self, threshold: f64) -> Self {
        self.far_threshold = threshold;
        self
    }

    /// Sets the jump size used while the signal is weak.
    #[must_use]
    pub const fn with_far_step(mut self, step: f64) -> Self {
        self.far_step = step;
        self
    }

    /// Sets the standard jump size.
    #[must_use]
    pub const fn with_near_step(mut self, step: f64) -> Self {
        self.near_step = step;
        self
    }

    /// Sets the fine-approach jump size.
    #[must_use]
    pub const fn with_fine_step(mut self, step: f64) -> Self {
        self.fine_step = step;
        self
    }

    /// Sets the maximum number of committed moves.
    #[must_use]
    pub const fn with_move_budget(mut self, budget: usize) -> Self {
        self.move_budget = budget;
        self
    }

    /// Sets the explorer drift policy.
    #[must_use]
    pub const fn with_drift_policy(mut self, policy: DriftPolicy) -> Self {
        self.drift_policy = policy;
        self
    }

    /// Returns the number of raw readings averaged per score.
    #[must_use]
    pub const fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Returns the landing threshold.
    #[must_use]
    pub const fn landing_threshold(&self) -> f64 {
        self.landing_threshold
    }

    /// Returns the far threshold.
    #[must_use]
    pub const fn far_threshold(&self) -> f64 {
        self.far_threshold
    }

    /// Returns the far jump size.
    #[must_use]
    pub const fn far_step(&self) -> f64 {
        self.far_step
    }

    /// Returns the standard jump size.
    #[must_use]
    pub const fn near_step(&self) -> f64 {
        self.near_step
    }

    /// Returns the fine-approach jump size.
    #[must_use]
    pub const fn fine_step(&self) -> f64 {
        self.fine_step
    }

    /// Returns the move budget.
    #[must_use]
    pub const fn move_budget(&self) -> usize {
        self.move_budget
    }

    /// Returns the explorer drift policy.
    #[must_use]
    pub const fn drift_policy(&self) -> DriftPolicy {
        self.drift_policy
    }

    /// Jump size for an iteration that measured `score`.
    ///
    /// Scores strictly above the far threshold get the far step.
    #[must_use]
    pub fn step_for(&self, score: SignalScore) -> f64 {
        if score.value() > self.far_threshold {
            self.far_step
        } else {
            self.near_step
        }
    }

    /// Checks every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`HomingError::InvalidConfig`] for a non-positive step, a zero
    /// sample count or budget, a negative threshold, or a far threshold below
    /// the landing threshold.
    pub fn validate(&self) -> HomingResult<()> {
        check_step("far_step", self.far_step)?;
        check_step("near_step", self.near_step)?;
        check_step("fine_step", self.fine_step)?;
        check_threshold("landing_threshold", self.landing_threshold)?;
        check_threshold("far_threshold", self.far_threshold)?;
        if self.far_threshold < self.landing_threshold {
            return Err(HomingError::invalid_config(format!(
                "far_threshold ({}) must not be below landing_threshold ({})",
                self.far_threshold, self.landing_threshold
            )));
        }
        check_common(self.sample_count, self.move_budget)
    }
}

impl Default for VariableStepProfile {
    fn default() -> Self {
        Self::new(10, 30.0, 55.0, 1.5, 0.5, 0.1, 20)
    }
}
