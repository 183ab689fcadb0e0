//! Core types for signal-strength homing.
//!
//! This crate provides the value types shared by the homing navigator and the
//! flight infrastructure around it:
//!
//! - **Geometry**: the eight compass points plus the `None`/`Land` sentinels
//!   ([`Direction`]) and the four body moves a vehicle executes
//!   ([`RelativeMove`])
//! - **Scores**: unitless signal magnitudes where smaller is stronger
//!   ([`SignalScore`])
//! - **Profiles**: parameters for the fixed-step and variable-step loops
//!   ([`FixedStepProfile`], [`VariableStepProfile`], [`DriftPolicy`])
//! - **State**: the per-run loop state ([`NavigationState`])
//! - **Outcomes**: terminal status and diagnostics ([`HomingOutcome`],
//!   [`HomingStatus`])
//! - **Errors**: [`HomingError`] and the capability errors
//!   [`SensorUnavailable`] and [`MotionFault`]
//!
//! # Layer 0 Crate
//!
//! No I/O and no hardware. The navigator itself lives in `homing-nav`.
//!
//! # Example
//!
//! ```
//! use homing_types::{Direction, FixedStepProfile, NavigationState, SignalScore};
//!
//! let profile = FixedStepProfile::default();
//! let mut state = NavigationState::new(profile.step_size());
//!
//! let score = SignalScore::from_reading(-48.0);
//! assert!(!score.is_within(profile.landing_threshold()));
//!
//! state.commit(Direction::NorthEast);
//! assert_eq!(state.previous_direction().opposite(), Direction::SouthWest);
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all value types

#![doc(html_root_url = "https://docs.rs/homing-types/0.7.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod direction;
pub mod error;
pub mod outcome;
pub mod score;
pub mod state;

pub use config::{DriftPolicy, FixedStepProfile, VariableStepProfile};
pub use direction::{Direction, RelativeMove};
pub use error::{HomingError, HomingResult, MotionFault, SensorUnavailable};
pub use outcome::{HomingOutcome, HomingStatus};
pub use score::SignalScore;
pub use state::NavigationState;
