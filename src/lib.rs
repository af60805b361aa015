//! # motion_profiles
//!
//! A small library for planning one-dimensional motion profiles
//! between two boundary states in Rust.
//!
//! This library provides the following modules:
//! - `trapezoid` for trapezoidal/triangular profiles with asymmetric
//!   acceleration and deceleration limits.
//! - `angular` for shortest-arc interpolation between two angles,
//!   built on the trapezoidal planner.
//! - `scurve` for jerk-limited S-curve profiles.
//! - `phase` for the per-segment phase records and the shared
//!   piecewise evaluator.
//! - `error` for the common error taxonomy.
//!
//! All planning is closed-form: `compute` selects a kinematic regime,
//! solves the phase durations analytically and stores an ordered phase
//! list; `evaluate` reconstructs position, velocity and acceleration
//! (and jerk, for S-curves) at any query time.

pub mod angular;
pub mod error;
pub mod phase;
pub mod scurve;
pub mod trapezoid;

// Re-export main types for convenience:
pub use angular::{normalize_angle, AngularProfile};
pub use error::{Advisory, Computed, InfeasibleKind, MotionError, Result};
pub use phase::{MotionState, Phase, Plan};
pub use scurve::{SCurveLimits, SCurveProfile, SCurveRegime};
pub use trapezoid::{Regime, TrapezoidLimits, TrapezoidProfile};
