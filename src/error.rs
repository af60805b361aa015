//! Error types for motion profile planning.

use thiserror::Error;

/// Reason a trajectory could not be solved for the given boundary
/// states and limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfeasibleKind {
    /// The quadratic for the acceleration-phase duration has no real root.
    NoRealRoot,
    /// Real roots exist but none is positive.
    NoPositiveRoot,
    /// Braking from the current velocity needs (nearly) the whole
    /// available displacement. Expected when replanning onto an axis
    /// that is already in motion.
    BrakingDistanceExhausted,
    /// The cruise phase solved to a negative duration.
    NegativeCruise,
}

/// Main error type for the planning engines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// A kinematic limit is non-positive, non-finite, or a constraint
    /// array is malformed. Detected at the setter, never at compute.
    #[error("invalid constraint: {0}")]
    InvalidConstraint(String),

    /// Boundary states that the planner declares unsupported, e.g. a
    /// velocity change with zero net displacement.
    #[error("invalid boundary condition: {0}")]
    InvalidBoundaryCondition(String),

    /// No positive-duration profile exists for the request.
    #[error("infeasible trajectory: {detail}")]
    InfeasibleTrajectory {
        kind: InfeasibleKind,
        detail: String,
    },

    /// `compute` was called before all inputs were set.
    #[error("planner not initialized: {missing} not set")]
    NotInitialized { missing: &'static str },

    /// A query was made before `compute` produced a plan.
    #[error("trajectory not calculated yet")]
    NotCalculated,
}

impl MotionError {
    pub(crate) fn constraint(msg: impl Into<String>) -> Self {
        Self::InvalidConstraint(msg.into())
    }

    pub(crate) fn boundary(msg: impl Into<String>) -> Self {
        Self::InvalidBoundaryCondition(msg.into())
    }

    pub(crate) fn infeasible(kind: InfeasibleKind, detail: impl Into<String>) -> Self {
        Self::InfeasibleTrajectory {
            kind,
            detail: detail.into(),
        }
    }
}

/// Result type alias for planning operations.
pub type Result<T> = std::result::Result<T, MotionError>;

/// Non-fatal condition reported alongside a successfully computed plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advisory {
    /// The initial velocity already exceeds the velocity cap; the first
    /// phase decelerates toward the cap instead of accelerating.
    Overspeed { v0: f64, vmax: f64 },
}

/// Returned by `compute`: the total duration plus at most one advisory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Computed {
    /// Total duration of the plan in seconds (0.0 for a no-motion plan).
    pub duration: f64,
    /// Non-fatal diagnostic raised during planning, if any.
    pub advisory: Option<Advisory>,
}
