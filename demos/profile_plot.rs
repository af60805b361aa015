use gnuplot::*;
use motion_profiles::{SCurveProfile, TrapezoidProfile};
use std::error::Error;

/// Plots a trapezoidal and a jerk-limited profile over the same move
/// so the two families can be compared side by side.
fn main() -> Result<(), Box<dyn Error>> {
    // -----------------------
    // 1. Set up parameters
    // -----------------------
    let pos_0 = 0.0; // Initial position
    let pos_1 = 50.0; // Target position

    // Motion limits
    let v_lim = 8.0; // Maximum velocity
    let a_lim = 2.0; // Maximum acceleration
    let d_lim = 4.0; // Maximum deceleration (trapezoidal only)
    let j_lim = 4.0; // Maximum jerk (S-curve only)

    // -------------------------
    // 2. Create and configure
    // -------------------------
    let mut trapezoid = TrapezoidProfile::new();
    trapezoid.init(0.0, (pos_0, pos_1), (0.0, 0.0), a_lim, v_lim, Some(d_lim))?;
    let trapezoid_time = trapezoid.compute()?.duration;

    let mut scurve = SCurveProfile::new();
    scurve.init(0.0, (pos_0, pos_1), (0.0, 0.0), a_lim, v_lim, j_lim)?;
    let scurve_time = scurve.compute()?.duration;

    let total_time = trapezoid_time.max(scurve_time);
    if total_time <= 0.0 {
        return Err("Calculated total motion time is non-positive. Check inputs.".into());
    }

    // -------------------------
    // 3. Sample both plans
    // -------------------------
    let sampling_rate = 1000.0; // points per second
    let num_points = (sampling_rate * total_time).ceil() as usize;

    let mut time_axis = Vec::with_capacity(num_points);
    let mut trap_pos = Vec::with_capacity(num_points);
    let mut trap_vel = Vec::with_capacity(num_points);
    let mut trap_acc = Vec::with_capacity(num_points);
    let mut sc_pos = Vec::with_capacity(num_points);
    let mut sc_vel = Vec::with_capacity(num_points);
    let mut sc_acc = Vec::with_capacity(num_points);

    for i in 0..num_points {
        let t = i as f64 / sampling_rate;
        time_axis.push(t);

        let ts = trapezoid.evaluate(t)?;
        trap_pos.push(ts.pos);
        trap_vel.push(ts.vel);
        trap_acc.push(ts.acc);

        let ss = scurve.evaluate(t)?;
        sc_pos.push(ss.pos);
        sc_vel.push(ss.vel);
        sc_acc.push(ss.acc);
    }

    // Quick final check (did we roughly reach target position?)
    let final_position = *trap_pos.last().unwrap_or(&0.0);
    if (final_position - pos_1).abs() > 0.01 {
        eprintln!("Warning: final position is off by more than 0.01 units.");
    }

    // --------------
    // 4. Plot data
    // --------------
    let mut fg = Figure::new();
    {
        let axes = fg.axes2d();
        axes.set_title("Trapezoidal vs. jerk-limited profile", &[]);
        axes.set_x_label("Time (s)", &[]);
        axes.set_y_label("Position derivatives", &[]);
        axes.lines(&time_axis, &trap_pos, &[Color("blue"), Caption("Trap position")]);
        axes.lines(&time_axis, &trap_vel, &[Color("red"), Caption("Trap velocity")]);
        axes.lines(
            &time_axis,
            &trap_acc,
            &[Color("green"), Caption("Trap acceleration")],
        );
        axes.lines(
            &time_axis,
            &sc_pos,
            &[Color("navy"), Caption("S-curve position")],
        );
        axes.lines(
            &time_axis,
            &sc_vel,
            &[Color("orange"), Caption("S-curve velocity")],
        );
        axes.lines(
            &time_axis,
            &sc_acc,
            &[Color("dark-green"), Caption("S-curve acceleration")],
        );
    }

    // Attempt to show in a pop-up window (requires gnuplot installed).
    fg.show().map_err(|e| format!("Failed to display plot: {e}"))?;

    println!(
        "Plot generated. Trapezoid: {:.3} s, S-curve: {:.3} s.",
        trapezoid_time, scurve_time
    );
    Ok(())
}
