#![warn(missing_docs)]

//! # Adaptive Discrete PID Controller Library
//!
//! This library provides a discrete PID (Proportional-Integral-Derivative) controller in Rust,
//! intended for periodic control loops driving actuators, motors, thermal or position systems.
//!
//! It includes both functional and stateful implementations of the same control law.
//!
//! ## Features
//!
//! - Textbook PID on the error with a caller-supplied control-cycle duration `dt`.
//! - Optional output bounds. An upper bound alone is mirrored into a symmetric lower bound.
//! - Optional slew-rate limiting on the output.
//! - Anti reset-windup: Integral growth during a saturated cycle is rolled back.
//! - Optional overshoot-adaptive integral offloading: When the error grows while the output
//!   opposes its rate of change, the integral is pushed further along the error.
//! - Tuning is passed on every call and may change freely between calls.
//! - `no_std` compatible and generic over the float type.
//!
//! ## Usage
//!
//! ### Stateful PID Controller
//!
//! ```rust
//! use adaptive_pid::config::TuningConfigBuilder;
//! use adaptive_pid::pid::PidController;
//!
//! let config = TuningConfigBuilder::default()
//!     .kp(0.1)
//!     .ki(0.5)
//!     .kd(0.01)
//!     .dt(0.1)
//!     .output_limits(-100.0, 100.0)
//!     .build()
//!     .expect("Invalid PID config");
//!
//! let mut pid = PidController::new();
//! let mut measurement = 20.0;
//! for _ in 0..100 {
//!     let output = pid.update(0.0, measurement, &config);
//!     assert!((-100.0..=100.0).contains(&output));
//!     measurement += output;
//! }
//! ```
//!
//! ### Functional PID Controller
//!
//! The functional form makes the state explicit. `compute` is **functionally pure** and returns
//! a breakdown of the P, I and D contributions next to the output.
//!
//! ```rust
//! use adaptive_pid::config::TuningConfig;
//! use adaptive_pid::pid::{compute, PidState};
//!
//! let config = TuningConfig {
//!     ki: 0.5,
//!     max: Some(10.0),
//!     ..TuningConfig::default()
//! };
//!
//! let state = PidState::new();
//! let (report, state) = compute(state, 2.0, 1.0, &config);
//! assert_eq!(report.p, 1.0);
//! assert_eq!(report.i, 0.5);
//! assert_eq!(state.integral(), 1.0);
//! ```
//!
//! ### Diagnostics
//!
//! Enable the `tracing` feature to emit a `TRACE` level event with the error, the P, I and D
//! contributions and the overshoot state on every update.
#![no_std]

#[cfg(feature = "std")]
extern crate std;

/// Tuning parameters and their validation.
pub mod config;

/// The main module for the PID controller library.
pub mod pid;

#[doc(hidden)]
#[cfg(feature = "simulation")]
pub mod sim;

pub use config::{TuningConfig, TuningConfigBuilder, TuningError};
pub use pid::{PidController, PidState};

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
