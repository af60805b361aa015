//! Shortest-arc angular interpolation on top of the trapezoidal planner.
//!
//! Both boundary angles are normalized to `(-π, π]` and the plan runs
//! over the signed shortest displacement on the unwrapped linear
//! domain. Position outputs can optionally be re-normalized; angular
//! velocity and acceleration are never wrapped.

use crate::error::{Computed, MotionError, Result};
use crate::phase::{MotionState, Plan};
use crate::trapezoid::{Regime, TrapezoidLimits, TrapezoidProfile};

/// Displacements below this magnitude after normalization collapse to
/// a no-motion plan (a full turn is not a rotation).
const FULL_TURN_EPS: f64 = 1e-9;

/// Normalize an angle to `(-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    angle.sin().atan2(angle.cos())
}

/// Two-angle planner: trapezoidal profile along the shortest arc.
#[derive(Debug, Default, Clone)]
pub struct AngularProfile {
    initial: Option<(f64, f64, f64)>,
    target: Option<(f64, f64)>,
    limits: Option<TrapezoidLimits>,
    inner: TrapezoidProfile,
}

impl AngularProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start state: time, angle (rad) and angular velocity.
    pub fn set_initial(&mut self, t0: f64, p0: f64, v0: f64) {
        self.initial = Some((t0, p0, v0));
    }

    /// Set the end state: target angle (rad) and angular velocity.
    pub fn set_target(&mut self, pe: f64, ve: f64) {
        self.target = Some((pe, ve));
    }

    /// Set angular limits. `dec_max` defaults to `acc_max`.
    pub fn set_constraints(
        &mut self,
        acc_max: f64,
        vmax: f64,
        dec_max: Option<f64>,
    ) -> Result<()> {
        self.limits = Some(TrapezoidLimits::new(acc_max, vmax, dec_max)?);
        Ok(())
    }

    /// One-call setup mirroring [`TrapezoidProfile::init`].
    pub fn init(
        &mut self,
        t0: f64,
        pos: (f64, f64),
        vel: (f64, f64),
        acc_max: f64,
        vmax: f64,
        dec_max: Option<f64>,
    ) -> Result<()> {
        self.set_initial(t0, pos.0, vel.0);
        self.set_target(pos.1, vel.1);
        self.set_constraints(acc_max, vmax, dec_max)
    }

    /// Normalize both angles, pick the shortest signed arc, and plan
    /// on the unwrapped domain.
    pub fn compute(&mut self) -> Result<Computed> {
        let (t0, p0, v0) = self.initial.ok_or(MotionError::NotInitialized {
            missing: "initial state",
        })?;
        let (pe, ve) = self.target.ok_or(MotionError::NotInitialized {
            missing: "target state",
        })?;
        let limits = self.limits.ok_or(MotionError::NotInitialized {
            missing: "constraints",
        })?;

        let p0n = normalize_angle(p0);
        // Signed shortest displacement, magnitude <= π. A displacement
        // that normalizes to (almost) zero is a full turn: no motion.
        let mut delta = normalize_angle(pe - p0);
        if delta.abs() < FULL_TURN_EPS {
            delta = 0.0;
        }

        self.inner.set_initial(t0, p0n, v0);
        self.inner.set_target(p0n + delta, ve);
        self.inner
            .set_constraints(limits.acc_max, limits.vmax, Some(limits.dec_max))?;
        self.inner.compute()
    }

    /// Angle, angular velocity and acceleration at time `t`.
    ///
    /// With `normalize_output` the returned angle is wrapped to
    /// `(-π, π]`; velocity and acceleration are left untouched since
    /// they are not periodic quantities.
    pub fn evaluate(&self, t: f64, normalize_output: bool) -> Result<MotionState> {
        let mut state = self.inner.evaluate(t)?;
        if normalize_output {
            state.pos = normalize_angle(state.pos);
        }
        Ok(state)
    }

    pub fn get_duration(&self) -> Result<f64> {
        self.inner.get_duration()
    }

    pub fn get_end_time(&self) -> Result<f64> {
        self.inner.get_end_time()
    }

    /// Plan on the unwrapped linear domain.
    pub fn get_plan(&self) -> Result<&Plan<Regime>> {
        self.inner.get_plan()
    }

    /// Normalized start angle of the computed plan.
    pub fn get_start_angle(&self) -> Result<f64> {
        Ok(self.inner.get_plan()?.start.pos)
    }

    /// Target angle on the unwrapped domain (may lie outside `(-π, π]`).
    pub fn get_target_angle(&self) -> Result<f64> {
        Ok(self.inner.get_plan()?.end.pos)
    }

    pub fn get_limits(&self) -> Option<TrapezoidLimits> {
        self.limits
    }
}
