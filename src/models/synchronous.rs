//! Synchronous motor V-curve.
//!
//! Cylindrical-rotor model per phase, `V = Ef e^{-j delta} + j Xs Ia`.
//! The torque angle comes from the power-angle relation
//! `Pin = 3 V Ef sin(delta) / Xs`, where the input power includes the
//! armature copper loss of the current it produces. That coupling is
//! resolved by fixed-point iteration on `delta`.

use num_complex::Complex64;

use crate::scenario::{nonzero, unit_clamp, Params, Sample, ScenarioState};

/// Iteration budget for the torque-angle solve.
pub const MAX_ANGLE_ITERATIONS: usize = 50;

/// Convergence threshold on the torque angle (rad).
pub const ANGLE_TOLERANCE: f64 = 1e-9;

/// Torque-angle solution.
#[derive(Debug, Clone, Copy)]
pub struct LoadAngle {
    /// Torque angle (rad)
    pub delta: f64,
    /// Armature current phasor, referenced to the terminal voltage
    pub ia: Complex64,
    /// Electrical input power, all phases (W)
    pub p_in: f64,
    /// False when the load exceeds the pull-out power
    pub stable: bool,
    pub iterations: usize,
}

/// Solve for the torque angle at shaft power `p_out`.
pub fn solve_load_angle(v: f64, ef: f64, xs: f64, ra: f64, p_out: f64) -> LoadAngle {
    let armature = |delta: f64| {
        (Complex64::new(v, 0.0) - Complex64::from_polar(ef, -delta)) / Complex64::new(0.0, xs)
    };

    let mut p_in = p_out;
    let mut delta = 0.0;
    let mut stable = true;
    let mut iterations = 0;

    for iter in 0..MAX_ANGLE_ITERATIONS {
        iterations = iter + 1;
        let arg = p_in * xs / (3.0 * nonzero(v * ef));
        stable = arg.abs() <= 1.0;
        let next = unit_clamp(arg).asin();

        let ia = armature(next);
        p_in = p_out + 3.0 * ia.norm_sqr() * ra;

        let settled = (next - delta).abs() < ANGLE_TOLERANCE;
        delta = next;
        if settled || !stable {
            break;
        }
    }

    LoadAngle {
        delta,
        ia: armature(delta),
        p_in,
        stable,
        iterations,
    }
}

/// One point of the V-curve: armature current against field current.
///
/// `P` is the electrical input power.
pub fn v_curve(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let v = params.positive("V", 230.0);
    let xs = params.positive("Xs", 10.0);
    let ra = params.clamped("Ra", 0.2, 0.0, f64::MAX);
    let p_out = params.clamped("P", 3000.0, 0.0, f64::MAX);
    let i_field = params.clamped("If", 2.0, 0.0, f64::MAX);
    let kf = params.positive("kf", 120.0);
    let ef = (kf * i_field).max(1e-6);

    let angle = solve_load_angle(v, ef, xs, ra, p_out);
    let current_angle = angle.ia.arg();
    let ia = angle.ia.norm();

    Sample::new(v, ia, angle.p_in)
        .with("If", i_field)
        .with("Ef", ef)
        .with("delta_deg", angle.delta.to_degrees())
        .with("pf", current_angle.cos().abs())
        .with("leading", current_angle > 0.0)
        .with("stable", angle.stable)
        .with("iterations", angle.iterations as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lossless_angle_matches_power_angle_equation() {
        let a = solve_load_angle(230.0, 250.0, 10.0, 0.0, 3000.0);
        let expected = (3000.0_f64 * 10.0 / (3.0 * 230.0 * 250.0)).asin();
        assert_relative_eq!(a.delta, expected, epsilon = 1e-12);
        assert!(a.stable);
    }

    #[test]
    fn test_copper_loss_raises_input_power() {
        let a = solve_load_angle(230.0, 250.0, 10.0, 0.5, 3000.0);
        assert!(a.p_in > 3000.0);
        assert_relative_eq!(a.p_in, 3000.0 + 3.0 * a.ia.norm_sqr() * 0.5, epsilon = 1e-6);
        let electrical = 3.0 * 230.0 * 250.0 * a.delta.sin() / 10.0;
        assert_relative_eq!(electrical, a.p_in, epsilon = 1e-6);
    }

    #[test]
    fn test_overload_pulls_out_of_step() {
        let a = solve_load_angle(230.0, 100.0, 10.0, 0.0, 1e6);
        assert!(!a.stable);
        assert_relative_eq!(a.delta, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_v_curve_shape() {
        let at = |i_f: f64| {
            v_curve(&Params::new().with("If", i_f), &mut ScenarioState::default(), 0.1)
        };
        let under = at(1.2);
        let over = at(4.0);
        assert_eq!(under.flag("leading"), Some(false));
        assert_eq!(over.flag("leading"), Some(true));

        // The minimum armature current sits between the two excitations.
        let min = (12..=40)
            .map(|k| at(k as f64 * 0.1))
            .min_by(|a, b| a.i.partial_cmp(&b.i).unwrap())
            .unwrap();
        assert!(min.i < under.i && min.i < over.i);
        assert!(min.number("pf").unwrap() > 0.95);
    }
}
