//! Per-segment phase records and the shared piecewise evaluator.
//!
//! Every planner in this crate produces an ordered list of [`Phase`]
//! values. A phase stores its duration, the kinematic state at its
//! entry, and the constant highest-order term (acceleration for
//! trapezoidal plans, jerk for S-curve plans). Evaluation at a query
//! time is purely analytic: locate the active phase, integrate its
//! polynomial from the recorded entry state.

/// Instantaneous kinematic state.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub pos: f64,
    pub vel: f64,
    pub acc: f64,
    pub jrk: f64,
}

impl MotionState {
    /// A resting boundary state: position and velocity only.
    pub fn at(pos: f64, vel: f64) -> Self {
        Self {
            pos,
            vel,
            acc: 0.0,
            jrk: 0.0,
        }
    }
}

/// A single motion segment: duration, entry state and constant jerk.
///
/// Trapezoidal plans use `jrk = 0.0` with `acc` as the constant term.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Phase {
    /// Length of this segment in seconds, never negative.
    pub duration: f64,
    /// Position at segment entry.
    pub pos: f64,
    /// Velocity at segment entry.
    pub vel: f64,
    /// Acceleration at segment entry.
    pub acc: f64,
    /// Constant jerk over the segment.
    pub jrk: f64,
}

impl Phase {
    pub fn new(duration: f64, pos: f64, vel: f64, acc: f64, jrk: f64) -> Self {
        Self {
            duration,
            pos,
            vel,
            acc,
            jrk,
        }
    }

    /// State at offset `tau` into this phase, `0 <= tau <= duration`.
    ///
    /// acc(τ) = a0 + j0·τ
    /// vel(τ) = v0 + a0·τ + j0·τ²/2
    /// pos(τ) = s0 + v0·τ + a0·τ²/2 + j0·τ³/6
    pub fn state_at(&self, tau: f64) -> MotionState {
        let acc = self.acc + self.jrk * tau;
        let vel = self.vel + self.acc * tau + 0.5 * self.jrk * tau * tau;
        let pos = self.pos
            + self.vel * tau
            + 0.5 * self.acc * tau * tau
            + self.jrk * tau * tau * tau / 6.0;
        MotionState {
            pos,
            vel,
            acc,
            jrk: self.jrk,
        }
    }

    /// State at the end of this phase; entry state of the next one.
    pub fn end_state(&self) -> MotionState {
        self.state_at(self.duration)
    }
}

/// A computed trajectory: ordered phases plus a regime tag.
///
/// Owned exclusively by the planner that produced it; evaluation
/// borrows it read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan<R> {
    /// Which kinematic regime was selected.
    pub regime: R,
    /// Start time of the plan.
    pub t0: f64,
    /// Boundary state at `t0` (acceleration and jerk zero).
    pub start: MotionState,
    /// Boundary state at `t0 + duration` (acceleration and jerk zero).
    pub end: MotionState,
    /// Ordered segments, empty for a no-motion plan.
    pub phases: Vec<Phase>,
    /// Sum of phase durations.
    pub duration: f64,
}

impl<R> Plan<R> {
    /// A zero-duration plan holding the start state for all time.
    pub fn hold(regime: R, t0: f64, pos: f64, vel: f64) -> Self {
        Self {
            regime,
            t0,
            start: MotionState::at(pos, vel),
            end: MotionState::at(pos, vel),
            phases: Vec::new(),
            duration: 0.0,
        }
    }

    /// Time at which the plan reaches its end boundary state.
    pub fn end_time(&self) -> f64 {
        self.t0 + self.duration
    }

    /// Evaluate the plan at absolute time `t`.
    ///
    /// Before `t0` the start boundary state is returned verbatim and
    /// after `t0 + duration` the end boundary state, both with zero
    /// acceleration and jerk; there is no extrapolation. At an exact
    /// phase boundary the earlier phase wins, which is observationally
    /// irrelevant because adjacent phases are continuous.
    pub fn sample(&self, t: f64) -> MotionState {
        let tau = t - self.t0;
        if self.phases.is_empty() {
            // No-motion plan: time-invariant boundary state.
            return self.start;
        }
        if tau < 0.0 {
            return self.start;
        }
        if tau >= self.duration {
            return self.end;
        }
        let mut elapsed = 0.0;
        for phase in &self.phases {
            if tau <= elapsed + phase.duration {
                return phase.state_at(tau - elapsed);
            }
            elapsed += phase.duration;
        }
        // Floating-point overshoot past the last cumulative boundary.
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_integration_matches_closed_form() {
        let ph = Phase::new(2.0, 1.0, 2.0, 3.0, 0.6);
        let s = ph.state_at(2.0);
        assert!((s.acc - (3.0 + 0.6 * 2.0)).abs() < 1e-12);
        assert!((s.vel - (2.0 + 3.0 * 2.0 + 0.5 * 0.6 * 4.0)).abs() < 1e-12);
        let pos = 1.0 + 2.0 * 2.0 + 0.5 * 3.0 * 4.0 + 0.6 * 8.0 / 6.0;
        assert!((s.pos - pos).abs() < 1e-12);
    }

    #[test]
    fn sample_clamps_outside_plan() {
        let phases = vec![Phase::new(1.0, 0.0, 0.0, 2.0, 0.0)];
        let plan = Plan {
            regime: (),
            t0: 5.0,
            start: MotionState::at(0.0, 0.0),
            end: MotionState::at(1.0, 2.0),
            phases,
            duration: 1.0,
        };
        assert_eq!(plan.sample(4.0), plan.start);
        assert_eq!(plan.sample(6.0), plan.end);
        assert_eq!(plan.sample(100.0), plan.end);
    }

    #[test]
    fn boundary_time_resolves_to_earlier_phase() {
        // Two phases, continuous at the boundary: accel then hold.
        let p1 = Phase::new(1.0, 0.0, 0.0, 2.0, 0.0);
        let entry = p1.end_state();
        let p2 = Phase::new(1.0, entry.pos, entry.vel, 0.0, 0.0);
        let plan = Plan {
            regime: (),
            t0: 0.0,
            start: MotionState::at(0.0, 0.0),
            end: p2.end_state(),
            phases: vec![p1, p2],
            duration: 2.0,
        };
        let s = plan.sample(1.0);
        // Earlier phase: still reports the acceleration of phase 1.
        assert!((s.acc - 2.0).abs() < 1e-12);
        assert!((s.pos - entry.pos).abs() < 1e-12);
        assert!((s.vel - entry.vel).abs() < 1e-12);
        // Value continuity with the later phase's start.
        let later = plan.phases[1].state_at(0.0);
        assert!((s.pos - later.pos).abs() < 1e-12);
        assert!((s.vel - later.vel).abs() < 1e-12);
    }

    #[test]
    fn hold_plan_is_time_invariant() {
        let plan: Plan<()> = Plan::hold((), 3.0, 10.0, 2.0);
        for t in [-100.0, 0.0, 3.0, 1e6] {
            let s = plan.sample(t);
            assert_eq!(s.pos, 10.0);
            assert_eq!(s.vel, 2.0);
            assert_eq!(s.acc, 0.0);
        }
    }
}
