//! Jerk-limited (S-curve) profile between two rest positions.
//!
//! Acceleration ramps under a constant-jerk bound instead of stepping,
//! producing 4 to 7 segments depending on which of the acceleration
//! and velocity caps are actually reached. The closed forms assume the
//! motion starts and ends at rest; nonzero boundary velocities are
//! rejected rather than silently producing an unvalidated profile.

use crate::error::{Computed, MotionError, Result};
use crate::phase::{MotionState, Phase, Plan};
use crate::trapezoid::check_limit;

/// Which limits the selected S-curve shape saturates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SCurveRegime {
    /// Start and target coincide; plan holds the state.
    NoMotion,
    /// Neither cap reached: symmetric 4-segment jerk profile.
    JerkOnly,
    /// Velocity cap reached before the acceleration cap.
    VelocityCapped,
    /// Acceleration cap reached, velocity cap not.
    AccelCapped,
    /// Both caps reached; 7 segments with a velocity cruise plateau.
    FullyCapped,
}

/// Validated limits for the jerk-limited planner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SCurveLimits {
    pub acc_max: f64,
    pub vmax: f64,
    pub jmax: f64,
}

impl SCurveLimits {
    pub fn new(acc_max: f64, vmax: f64, jmax: f64) -> Result<Self> {
        check_limit("acc_max", acc_max)?;
        check_limit("vmax", vmax)?;
        check_limit("jmax", jmax)?;
        Ok(Self {
            acc_max,
            vmax,
            jmax,
        })
    }
}

/// Two-point jerk-limited planner.
///
/// Same lifecycle as [`TrapezoidProfile`](crate::TrapezoidProfile):
/// setters accumulate inputs, `compute` solves the case ladder and
/// stores the plan atomically.
#[derive(Debug, Default, Clone)]
pub struct SCurveProfile {
    initial: Option<(f64, f64, f64)>,
    target: Option<(f64, f64)>,
    limits: Option<SCurveLimits>,
    plan: Option<Plan<SCurveRegime>>,
}

impl SCurveProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start state. The planner requires `v0 == 0`; a nonzero
    /// value is rejected at compute time.
    pub fn set_initial(&mut self, t0: f64, ps: f64, v0: f64) {
        self.initial = Some((t0, ps, v0));
    }

    /// Set the end state. The planner requires `ve == 0`.
    pub fn set_target(&mut self, pe: f64, ve: f64) {
        self.target = Some((pe, ve));
    }

    /// Set the acceleration, velocity and jerk limits.
    pub fn set_constraints(&mut self, acc_max: f64, vmax: f64, jmax: f64) -> Result<()> {
        self.limits = Some(SCurveLimits::new(acc_max, vmax, jmax)?);
        Ok(())
    }

    /// Array-style constraints for the older calling convention:
    /// `[vmax, acc_max, jmax]`.
    pub fn set_constraints_array(&mut self, max_array: &[f64]) -> Result<()> {
        match max_array {
            &[vmax, acc_max, jmax] => self.set_constraints(acc_max, vmax, jmax),
            _ => Err(MotionError::constraint(format!(
                "constraint array must be [vmax, acc_max, jmax], got {} entries",
                max_array.len()
            ))),
        }
    }

    /// One-call setup: start state, target and limits together.
    ///
    /// The boundary velocities are stored as given; `compute` rejects
    /// nonzero values.
    pub fn init(
        &mut self,
        t0: f64,
        pos: (f64, f64),
        vel: (f64, f64),
        acc_max: f64,
        vmax: f64,
        jmax: f64,
    ) -> Result<()> {
        self.set_initial(t0, pos.0, vel.0);
        self.set_target(pos.1, vel.1);
        self.set_constraints(acc_max, vmax, jmax)
    }

    /// Select the kinematic regime, solve the segment durations and
    /// store the plan, replacing any previous one.
    pub fn compute(&mut self) -> Result<Computed> {
        let (t0, ps, v0) = self.initial.ok_or(MotionError::NotInitialized {
            missing: "initial state",
        })?;
        let (pe, ve) = self.target.ok_or(MotionError::NotInitialized {
            missing: "target state",
        })?;
        let limits = self.limits.ok_or(MotionError::NotInitialized {
            missing: "constraints",
        })?;
        let plan = plan_scurve(t0, ps, v0, pe, ve, limits)?;
        let duration = plan.duration;
        self.plan = Some(plan);
        Ok(Computed {
            duration,
            advisory: None,
        })
    }

    /// Position, velocity, acceleration and jerk at time `t`.
    pub fn evaluate(&self, t: f64) -> Result<MotionState> {
        Ok(self.get_plan()?.sample(t))
    }

    pub fn get_duration(&self) -> Result<f64> {
        Ok(self.get_plan()?.duration)
    }

    pub fn get_end_time(&self) -> Result<f64> {
        Ok(self.get_plan()?.end_time())
    }

    /// Read-only snapshot of the computed plan.
    pub fn get_plan(&self) -> Result<&Plan<SCurveRegime>> {
        self.plan.as_ref().ok_or(MotionError::NotCalculated)
    }

    pub fn get_limits(&self) -> Option<SCurveLimits> {
        self.limits
    }
}

/// Case ladder and segment construction, all in closed form.
fn plan_scurve(
    t0: f64,
    ps: f64,
    v0: f64,
    pe: f64,
    ve: f64,
    lim: SCurveLimits,
) -> Result<Plan<SCurveRegime>> {
    let dp = pe - ps;

    if dp == 0.0 {
        if ve == v0 {
            return Ok(Plan::hold(SCurveRegime::NoMotion, t0, ps, v0));
        }
        return Err(MotionError::boundary(format!(
            "cannot change velocity at the same position (dp = 0, dv = {})",
            ve - v0
        )));
    }
    if v0 != 0.0 {
        return Err(MotionError::boundary(format!(
            "jerk-limited planning requires zero initial velocity, got {v0}"
        )));
    }
    if ve != 0.0 {
        return Err(MotionError::boundary(format!(
            "jerk-limited planning requires zero final velocity, got {ve}"
        )));
    }

    let ds = dp.abs();
    let dir = if dp > 0.0 { 1.0 } else { -1.0 };
    let a = lim.acc_max;
    let v = lim.vmax;
    let j = lim.jmax;

    // Seed: duration of one jerk ramp assuming neither cap is hit.
    let t1 = (ds / (2.0 * j)).cbrt();

    // (duration, jerk) per segment, in travel direction.
    let (regime, segments): (SCurveRegime, Vec<(f64, f64)>) = if t1 * j < a {
        if t1 * t1 * j < v {
            (
                SCurveRegime::JerkOnly,
                vec![(t1, j), (t1, -j), (t1, -j), (t1, j)],
            )
        } else {
            velocity_capped(ds, v, j)
        }
    } else {
        let t1 = a / j;
        if v <= a * t1 {
            // The velocity cap sits below the peak of a full jerk ramp
            // to acc_max, so an acceleration plateau can never form.
            velocity_capped(ds, v, j)
        } else {
            let t2 = -1.5 * t1 + (4.0 * ds / a + t1 * t1).sqrt() / 2.0;
            if (t1 + t2) * a < v {
                (
                    SCurveRegime::AccelCapped,
                    vec![
                        (t1, j),
                        (t2, 0.0),
                        (t1, -j),
                        (t1, -j),
                        (t2, 0.0),
                        (t1, j),
                    ],
                )
            } else {
                let t2 = v / a - t1;
                let t3 = ds / v - 2.0 * t1 - t2;
                (
                    SCurveRegime::FullyCapped,
                    vec![
                        (t1, j),
                        (t2, 0.0),
                        (t1, -j),
                        (t3, 0.0),
                        (t1, -j),
                        (t2, 0.0),
                        (t1, j),
                    ],
                )
            }
        }
    };

    // Propagate the entry state through the segments analytically so
    // position, velocity and acceleration are continuous across every
    // boundary and the last segment lands on the target exactly.
    let mut phases = Vec::with_capacity(segments.len());
    let mut state = MotionState::at(ps, 0.0);
    let mut duration = 0.0;
    for (dt, jerk) in segments {
        if dt <= 0.0 {
            // Degenerate plateau (exactly saturated case boundary).
            continue;
        }
        let phase = Phase::new(dt, state.pos, state.vel, state.acc, dir * jerk);
        state = phase.end_state();
        duration += dt;
        phases.push(phase);
    }

    Ok(Plan {
        regime,
        t0,
        start: MotionState::at(ps, 0.0),
        end: MotionState::at(pe, 0.0),
        phases,
        duration,
    })
}

/// Velocity cap reached before the acceleration cap: two jerk ramp
/// pairs around a cruise plateau.
fn velocity_capped(ds: f64, v: f64, j: f64) -> (SCurveRegime, Vec<(f64, f64)>) {
    let t1 = (v / j).sqrt();
    let t2 = ds / v - 2.0 * t1;
    (
        SCurveRegime::VelocityCapped,
        vec![(t1, j), (t1, -j), (t2, 0.0), (t1, -j), (t1, j)],
    )
}
