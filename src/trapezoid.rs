//! Trapezoidal/triangular velocity profile between two boundary states.
//!
//! Given a start state `(t0, p0, v0)`, a target `(pe, ve)` and limits
//! on acceleration, deceleration and velocity, the planner solves the
//! acceleration-phase duration in closed form and emits two phases
//! (triangular, velocity cap never reached) or three phases
//! (trapezoidal, with a cruise segment at the cap).
//!
//! Acceleration and deceleration limits may differ; the deceleration
//! limit defaults to the acceleration limit when unspecified.

use crate::error::{Advisory, Computed, InfeasibleKind, MotionError, Result};
use crate::phase::{MotionState, Phase, Plan};

/// Braking distances within this fraction of the available displacement
/// are reported with the dedicated near-exhaustion diagnostic.
const BRAKING_MARGIN: f64 = 0.98;

/// Profile shape selected by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Start and target coincide; plan holds the state with zero duration.
    NoMotion,
    /// Accelerate then decelerate; the velocity cap is never reached.
    Triangular,
    /// Accelerate (or brake) to the cap, cruise, then decelerate.
    Trapezoidal,
}

/// Validated kinematic limits for the trapezoidal planner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrapezoidLimits {
    pub acc_max: f64,
    pub dec_max: f64,
    pub vmax: f64,
}

impl TrapezoidLimits {
    /// Builds limits, with `dec_max` defaulting to `acc_max`.
    pub fn new(acc_max: f64, vmax: f64, dec_max: Option<f64>) -> Result<Self> {
        check_limit("acc_max", acc_max)?;
        check_limit("vmax", vmax)?;
        let dec_max = match dec_max {
            Some(d) => {
                check_limit("dec_max", d)?;
                d
            }
            None => acc_max,
        };
        Ok(Self {
            acc_max,
            dec_max,
            vmax,
        })
    }
}

pub(crate) fn check_limit(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(MotionError::constraint(format!(
            "{name} must be a positive finite value, got {value}"
        )));
    }
    Ok(())
}

/// Two-point planner with asymmetric acceleration/deceleration limits.
///
/// Inputs accumulate through the setters (in any order) or the
/// aggregate [`init`](Self::init); [`compute`](Self::compute) then
/// produces the plan. Computation is atomic: on failure any previously
/// computed plan is left untouched.
#[derive(Debug, Default, Clone)]
pub struct TrapezoidProfile {
    initial: Option<(f64, f64, f64)>,
    target: Option<(f64, f64)>,
    limits: Option<TrapezoidLimits>,
    plan: Option<Plan<Regime>>,
}

impl TrapezoidProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start state: time, position and velocity at `t0`.
    pub fn set_initial(&mut self, t0: f64, p0: f64, v0: f64) {
        self.initial = Some((t0, p0, v0));
    }

    /// Set the end state: target position and velocity.
    pub fn set_target(&mut self, pe: f64, ve: f64) {
        self.target = Some((pe, ve));
    }

    /// Set the kinematic limits. `dec_max` defaults to `acc_max`.
    pub fn set_constraints(
        &mut self,
        acc_max: f64,
        vmax: f64,
        dec_max: Option<f64>,
    ) -> Result<()> {
        self.limits = Some(TrapezoidLimits::new(acc_max, vmax, dec_max)?);
        Ok(())
    }

    /// Array-style constraints for the older calling convention:
    /// `[vmax, acc_max]` or `[vmax, acc_max, dec_max]`.
    ///
    /// Note the third slot: this planner has no jerk limit, so a
    /// three-entry array sets the deceleration limit. Only the
    /// jerk-limited planner reads the third slot as `jmax`.
    pub fn set_constraints_array(&mut self, max_array: &[f64]) -> Result<()> {
        match max_array {
            &[vmax, acc_max] => self.set_constraints(acc_max, vmax, None),
            &[vmax, acc_max, dec_max] => self.set_constraints(acc_max, vmax, Some(dec_max)),
            _ => Err(MotionError::constraint(format!(
                "constraint array must be [vmax, acc_max] or [vmax, acc_max, dec_max], \
                 got {} entries",
                max_array.len()
            ))),
        }
    }

    /// One-call setup: start state, target and limits together.
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

    /// Solve the profile and store the plan, replacing any previous one.
    pub fn compute(&mut self) -> Result<Computed> {
        let (t0, p0, v0) = self
            .initial
            .ok_or(MotionError::NotInitialized {
                missing: "initial state",
            })?;
        let (pe, ve) = self.target.ok_or(MotionError::NotInitialized {
            missing: "target state",
        })?;
        let limits = self.limits.ok_or(MotionError::NotInitialized {
            missing: "constraints",
        })?;
        let (plan, advisory) = plan_trapezoid(t0, p0, v0, pe, ve, limits)?;
        let duration = plan.duration;
        self.plan = Some(plan);
        Ok(Computed { duration, advisory })
    }

    /// Position, velocity and acceleration at time `t`.
    pub fn evaluate(&self, t: f64) -> Result<MotionState> {
        Ok(self.get_plan()?.sample(t))
    }

    /// Total duration of the computed plan.
    pub fn get_duration(&self) -> Result<f64> {
        Ok(self.get_plan()?.duration)
    }

    /// Absolute time at which the plan reaches the target state.
    pub fn get_end_time(&self) -> Result<f64> {
        Ok(self.get_plan()?.end_time())
    }

    /// Read-only snapshot of the computed plan.
    pub fn get_plan(&self) -> Result<&Plan<Regime>> {
        self.plan.as_ref().ok_or(MotionError::NotCalculated)
    }

    /// Limits as currently set, if any.
    pub fn get_limits(&self) -> Option<TrapezoidLimits> {
        self.limits
    }
}

/// Pure planning: fully validated request in, plan out.
fn plan_trapezoid(
    t0: f64,
    p0: f64,
    v0: f64,
    pe: f64,
    ve: f64,
    lim: TrapezoidLimits,
) -> Result<(Plan<Regime>, Option<Advisory>)> {
    let dp = pe - p0;

    if dp == 0.0 {
        if ve == v0 {
            return Ok((Plan::hold(Regime::NoMotion, t0, p0, v0), None));
        }
        return Err(MotionError::boundary(format!(
            "cannot change velocity at the same position (dp = 0, dv = {})",
            ve - v0
        )));
    }

    let sign = if dp > 0.0 { 1.0 } else { -1.0 };
    let acc = lim.acc_max * sign;
    let dec = lim.dec_max * sign;

    // Quadratic for the acceleration-phase duration t1:
    //   0.5·acc·(1+ratio)·t1² + v0·(1+ratio)·t1 − dp + (v0²−ve²)/(2·dec) = 0
    let ratio = acc / dec;
    let a_coeff = 0.5 * acc * (1.0 + ratio);
    let b_coeff = v0 * (1.0 + ratio);
    let c_coeff = -dp + (v0 * v0 - ve * ve) / (2.0 * dec);

    let discriminant = b_coeff * b_coeff - 4.0 * a_coeff * c_coeff;
    if discriminant <= 0.0 {
        return Err(infeasible_quadratic(
            InfeasibleKind::NoRealRoot,
            dp,
            v0,
            ve,
            &lim,
        ));
    }

    let sqrt_disc = discriminant.sqrt();
    let root_a = (-b_coeff + sqrt_disc) / (2.0 * a_coeff);
    let root_b = (-b_coeff - sqrt_disc) / (2.0 * a_coeff);
    let t1 = if root_a > 0.0 && root_b > 0.0 {
        // Both valid: the smaller root is the faster profile.
        root_a.min(root_b)
    } else if root_a > 0.0 {
        root_a
    } else if root_b > 0.0 {
        root_b
    } else {
        return Err(infeasible_quadratic(
            InfeasibleKind::NoPositiveRoot,
            dp,
            v0,
            ve,
            &lim,
        ));
    };

    let v1 = v0 + acc * t1;
    let start = MotionState::at(p0, v0);
    let end = MotionState::at(pe, ve);

    if v1.abs() < lim.vmax {
        // Cap never reached: accelerate for t1, then decelerate to ve.
        let p1 = p0 + v0 * t1 + 0.5 * acc * t1 * t1;
        let t2 = ((v1 - ve) / dec).abs();
        let phases = vec![
            Phase::new(t1, p0, v0, acc, 0.0),
            Phase::new(t2, p1, v1, -dec, 0.0),
        ];
        let plan = Plan {
            regime: Regime::Triangular,
            t0,
            start,
            end,
            duration: t1 + t2,
            phases,
        };
        return Ok((plan, None));
    }

    // Cap reached: accelerate (or brake) to the cruise velocity.
    let cruise = lim.vmax * sign;
    let overspeed = sign * v0 >= sign * cruise;
    let advisory = overspeed.then_some(Advisory::Overspeed {
        v0,
        vmax: lim.vmax,
    });
    // When already past the cap the first phase slows down toward it.
    let a1 = if overspeed { -acc } else { acc };
    let t01 = (cruise - v0) / a1;
    let p1 = p0 + v0 * t01 + 0.5 * a1 * t01 * t01;

    let t2e = ((cruise - ve) / dec).abs();
    let dp2e = cruise * t2e - 0.5 * dec * t2e * t2e;

    let t12 = (pe - p1 - dp2e) / cruise;
    if t12 < 0.0 {
        return Err(MotionError::infeasible(
            InfeasibleKind::NegativeCruise,
            format!(
                "cruise phase solved to {t12:.6} s; distance {:.6} is too short for \
                 vmax {:.6} with the given boundary velocities",
                dp.abs(),
                lim.vmax
            ),
        ));
    }
    let p2 = pe - dp2e;

    let phases = vec![
        Phase::new(t01, p0, v0, a1, 0.0),
        Phase::new(t12, p1, cruise, 0.0, 0.0),
        Phase::new(t2e, p2, cruise, -dec, 0.0),
    ];
    let plan = Plan {
        regime: Regime::Trapezoidal,
        t0,
        start,
        end,
        duration: t01 + t12 + t2e,
        phases,
    };
    Ok((plan, advisory))
}

/// Diagnose a quadratic failure. The dominant real-world cause is
/// replanning onto an axis that is already moving: braking from the
/// current velocity eats (nearly) the whole remaining displacement.
fn infeasible_quadratic(
    kind: InfeasibleKind,
    dp: f64,
    v0: f64,
    ve: f64,
    lim: &TrapezoidLimits,
) -> MotionError {
    let braking = (v0 * v0 - ve * ve).abs() / (2.0 * lim.dec_max);
    if braking >= BRAKING_MARGIN * dp.abs() {
        return MotionError::infeasible(
            InfeasibleKind::BrakingDistanceExhausted,
            format!(
                "braking from {v0} to {ve} needs {braking:.6} of the {:.6} available; \
                 allow more distance or raise the deceleration limit",
                dp.abs()
            ),
        );
    }
    MotionError::infeasible(
        kind,
        "constraints too restrictive for the given boundary states",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner(p0: f64, pe: f64, v0: f64, ve: f64, acc: f64, vmax: f64) -> TrapezoidProfile {
        let mut tp = TrapezoidProfile::new();
        tp.init(0.0, (p0, pe), (v0, ve), acc, vmax, None).unwrap();
        tp
    }

    #[test]
    fn rejects_non_positive_limits() {
        let mut tp = TrapezoidProfile::new();
        assert!(matches!(
            tp.set_constraints(0.0, 5.0, None),
            Err(MotionError::InvalidConstraint(_))
        ));
        assert!(matches!(
            tp.set_constraints(2.0, -1.0, None),
            Err(MotionError::InvalidConstraint(_))
        ));
        assert!(matches!(
            tp.set_constraints(2.0, 5.0, Some(f64::NAN)),
            Err(MotionError::InvalidConstraint(_))
        ));
        assert!(matches!(
            tp.set_constraints_array(&[5.0]),
            Err(MotionError::InvalidConstraint(_))
        ));
    }

    #[test]
    fn constraint_array_third_slot_is_the_deceleration_limit() {
        let mut tp = TrapezoidProfile::new();
        tp.set_constraints_array(&[8.0, 2.0, 4.0]).unwrap();
        let lim = tp.get_limits().unwrap();
        assert_eq!(lim.vmax, 8.0);
        assert_eq!(lim.acc_max, 2.0);
        assert_eq!(lim.dec_max, 4.0);
    }

    #[test]
    fn compute_requires_all_inputs() {
        let mut tp = TrapezoidProfile::new();
        assert!(matches!(
            tp.compute(),
            Err(MotionError::NotInitialized { .. })
        ));
        tp.set_initial(0.0, 0.0, 0.0);
        tp.set_target(10.0, 0.0);
        assert!(matches!(
            tp.compute(),
            Err(MotionError::NotInitialized {
                missing: "constraints"
            })
        ));
        assert!(matches!(tp.get_duration(), Err(MotionError::NotCalculated)));
        assert!(matches!(tp.evaluate(0.0), Err(MotionError::NotCalculated)));
    }

    #[test]
    fn no_motion_holds_state() {
        let mut tp = planner(10.0, 10.0, 2.0, 2.0, 2.0, 5.0);
        let out = tp.compute().unwrap();
        assert_eq!(out.duration, 0.0);
        assert_eq!(tp.get_plan().unwrap().regime, Regime::NoMotion);
        for t in [-5.0, 0.0, 7.0] {
            let s = tp.evaluate(t).unwrap();
            assert_eq!((s.pos, s.vel, s.acc), (10.0, 2.0, 0.0));
        }
    }

    #[test]
    fn velocity_change_in_place_is_rejected() {
        let mut tp = planner(10.0, 10.0, 0.0, 1.0, 2.0, 5.0);
        assert!(matches!(
            tp.compute(),
            Err(MotionError::InvalidBoundaryCondition(_))
        ));
    }

    #[test]
    fn triangular_profile_reaches_target() {
        let mut tp = planner(0.0, 10.0, 0.0, 0.0, 2.0, 5.0);
        let out = tp.compute().unwrap();
        assert!(out.duration > 0.0);
        assert!(out.advisory.is_none());
        assert_eq!(tp.get_plan().unwrap().regime, Regime::Triangular);
        let s = tp.evaluate(out.duration).unwrap();
        assert!((s.pos - 10.0).abs() < 1e-9);
        assert!(s.vel.abs() < 1e-9);
        assert_eq!(s.acc, 0.0);
    }

    #[test]
    fn trapezoidal_profile_with_asymmetric_limits() {
        let mut tp = TrapezoidProfile::new();
        tp.init(0.0, (0.0, 50.0), (0.0, 0.0), 2.0, 8.0, Some(4.0))
            .unwrap();
        let out = tp.compute().unwrap();
        let plan = tp.get_plan().unwrap();
        assert_eq!(plan.regime, Regime::Trapezoidal);
        assert!(out.duration >= 50.0 / 8.0);
        // t01 = 8/2, cruise, t2e = 8/4.
        assert_eq!(plan.phases.len(), 3);
        assert!((plan.phases[0].duration - 4.0).abs() < 1e-9);
        assert!((plan.phases[2].duration - 2.0).abs() < 1e-9);
        let s = tp.evaluate(out.duration).unwrap();
        assert!((s.pos - 50.0).abs() < 1e-9);
        assert!(s.vel.abs() < 1e-9);
    }

    #[test]
    fn negative_direction_mirrors() {
        let mut tp = planner(10.0, -10.0, 0.0, 0.0, 2.0, 3.0);
        let out = tp.compute().unwrap();
        let mid = tp.evaluate(out.duration / 2.0).unwrap();
        assert!(mid.vel < 0.0);
        let s = tp.evaluate(out.duration).unwrap();
        assert!((s.pos - -10.0).abs() < 1e-9);
    }

    #[test]
    fn overspeed_start_brakes_toward_cap() {
        let mut tp = planner(0.0, 100.0, 10.0, 0.0, 2.0, 5.0);
        let out = tp.compute().unwrap();
        assert!(matches!(
            out.advisory,
            Some(Advisory::Overspeed { v0, vmax }) if v0 == 10.0 && vmax == 5.0
        ));
        let plan = tp.get_plan().unwrap();
        assert_eq!(plan.regime, Regime::Trapezoidal);
        // First phase decelerates from 10 toward the 5 cap.
        assert!(plan.phases[0].acc < 0.0);
        let s = tp.evaluate(out.duration).unwrap();
        assert!((s.pos - 100.0).abs() < 1e-9);
        assert!(s.vel.abs() < 1e-9);
    }

    #[test]
    fn braking_distance_exhaustion_is_diagnosed() {
        let mut tp = planner(0.0, 1.0, 10.0, 0.0, 1.0, 20.0);
        match tp.compute() {
            Err(MotionError::InfeasibleTrajectory { kind, detail }) => {
                assert_eq!(kind, InfeasibleKind::BrakingDistanceExhausted);
                assert!(detail.contains("braking"));
            }
            other => panic!("expected infeasible trajectory, got {other:?}"),
        }
    }

    #[test]
    fn failed_compute_keeps_previous_plan() {
        let mut tp = planner(0.0, 10.0, 0.0, 0.0, 2.0, 5.0);
        let first = tp.compute().unwrap();
        tp.set_initial(0.0, 0.0, 10.0);
        tp.set_target(1.0, 0.0);
        tp.set_constraints(1.0, 20.0, None).unwrap();
        assert!(tp.compute().is_err());
        // Previous plan still queryable.
        assert_eq!(tp.get_duration().unwrap(), first.duration);
    }

    #[test]
    fn recompute_replaces_plan() {
        let mut tp = planner(0.0, 10.0, 0.0, 0.0, 2.0, 5.0);
        let first = tp.compute().unwrap();
        tp.set_target(20.0, 0.0);
        let second = tp.compute().unwrap();
        assert!(second.duration > first.duration);
        let s = tp.evaluate(second.duration).unwrap();
        assert!((s.pos - 20.0).abs() < 1e-9);
    }

    #[test]
    fn smaller_positive_root_is_selected() {
        // A start velocity pointing away from the target gives two
        // positive roots; the faster (smaller) one must win. Here
        // a_coeff = 1, b_coeff = -6, c_coeff = 3.5, so the roots are
        // (6 ± sqrt(22)) / 2.
        let mut tp = planner(0.0, 1.0, -3.0, 0.0, 1.0, 100.0);
        tp.compute().unwrap();
        let plan = tp.get_plan().unwrap();
        let smaller = (6.0 - 22.0f64.sqrt()) / 2.0;
        assert!((plan.phases[0].duration - smaller).abs() < 1e-9);
    }
}
