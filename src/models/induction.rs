//! Three-phase induction motor: no-load test, blocked-rotor test and the
//! torque-slip characteristic of the approximate equivalent circuit.
//!
//! Line quantities are assumed star-connected, so `Vph = V / sqrt(3)` and
//! phase current equals line current.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::scenario::{nonzero, unit_clamp, Params, Sample, ScenarioState};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Slip is kept inside `[MIN_SLIP, 1]` so `R2 / s` stays finite.
pub const MIN_SLIP: f64 = 1e-4;

/// Synchronous speed in rpm.
pub fn synchronous_speed(f: f64, poles: f64) -> f64 {
    120.0 * f / poles
}

fn poles(params: &Params) -> f64 {
    // At least one pole pair, rounded to an even count.
    (params.get_or("poles", 4.0).abs() / 2.0).round().max(1.0) * 2.0
}

/// No-load test: shunt branch per phase and running slip.
///
/// Current scales with `V / Vrated` and input power with its square.
pub fn no_load(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let v_rated = params.positive("Vrated", 400.0);
    let v = params.clamped("V", v_rated, 0.0, 10.0 * v_rated);
    let i0_rated = params.positive("I0", 2.5);
    let p0_rated = params.clamped("P0", 300.0, 0.0, f64::MAX);
    let f = params.positive("f", 50.0);
    let ns = synchronous_speed(f, poles(params));
    let rpm = params.clamped("rpm", 0.993 * ns, 0.0, ns);

    let ratio = v / v_rated;
    let i0 = i0_rated * ratio;
    let p0 = p0_rated * ratio * ratio;

    let pf0 = unit_clamp(p0_rated / (SQRT_3 * v_rated * i0_rated)).abs();
    let sin_phi = (1.0 - pf0 * pf0).sqrt();
    let v_ph = v_rated / SQRT_3;

    Sample::new(v, i0, p0)
        .with("pf0", pf0)
        .with("Rc", v_ph / nonzero(i0_rated * pf0))
        .with("Xm", v_ph / nonzero(i0_rated * sin_phi))
        .with("ns", ns)
        .with("slip", (ns - rpm) / ns)
}

/// Blocked-rotor test: series branch per phase.
///
/// `Vbr`, `Ibr` and `Pbr` are the readings; the applied voltage `V`
/// defaults to `Vbr` and current scales linearly with it.
pub fn blocked_rotor(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let v_br = params.positive("Vbr", 80.0);
    let i_br = params.positive("Ibr", 10.0);
    let p_br = params.clamped("Pbr", 600.0, 0.0, f64::MAX);
    let v = params.clamped("V", v_br, 0.0, 10.0 * v_br);

    let req = p_br / (3.0 * i_br * i_br);
    let zeq = v_br / SQRT_3 / i_br;
    let xeq = (zeq * zeq - req * req).max(0.0).sqrt();
    let i = i_br * v / v_br;

    Sample::new(v, i, 3.0 * i * i * req)
        .with("pf_br", unit_clamp(req / nonzero(zeq)).abs())
        .with("Req", req)
        .with("Zeq", zeq)
        .with("Xeq", xeq)
}

/// Torque at slip `s` from the approximate equivalent circuit.
pub fn torque(v_ph: f64, omega_s: f64, r1: f64, r2: f64, x: f64, s: f64) -> f64 {
    let r2s = r2 / s;
    3.0 * v_ph * v_ph * r2s / (omega_s * ((r1 + r2s).powi(2) + x * x))
}

/// Torque-slip operating point.
///
/// `P` is the electrical input power including magnetizing current.
pub fn torque_slip(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let v = params.get_or("V", 400.0).abs();
    let f = params.positive("f", 50.0);
    let r1 = params.positive("R1", 0.5);
    let x1 = params.clamped("X1", 1.2, 0.0, f64::MAX);
    let r2 = params.positive("R2", 0.6);
    let x2 = params.clamped("X2", 1.2, 0.0, f64::MAX);
    let xm = params.positive("Xm", 30.0);
    let s = params.clamped("slip", 0.04, MIN_SLIP, 1.0);

    let ns = synchronous_speed(f, poles(params));
    let omega_s = 2.0 * PI * ns / 60.0;
    let v_ph = v / SQRT_3;
    let x = x1 + x2;

    let z_rotor = Complex64::new(r1 + r2 / s, x);
    let i_rotor = Complex64::new(v_ph, 0.0) / z_rotor;
    let i_mag = Complex64::new(0.0, -v_ph / xm);
    let i_in = i_rotor + i_mag;

    let t = torque(v_ph, omega_s, r1, r2, x, s);
    let s_max = (r2 / (r1 * r1 + x * x).sqrt()).min(1.0);
    let t_max = 3.0 * v_ph * v_ph / (2.0 * omega_s * (r1 + (r1 * r1 + x * x).sqrt()));

    let p_in = 3.0 * (Complex64::new(v_ph, 0.0) * i_in.conj()).re;
    let p_out = (1.0 - s) * t * omega_s;
    let efficiency = if p_in > 0.0 { p_out / p_in * 100.0 } else { 0.0 };

    Sample::new(v, i_in.norm(), p_in)
        .with("slip", s)
        .with("ns", ns)
        .with("rpm", ns * (1.0 - s))
        .with("torque", t)
        .with("T_max", t_max)
        .with("s_max", s_max)
        .with("P_out", p_out)
        .with("efficiency", efficiency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_synchronous_speed() {
        assert_relative_eq!(synchronous_speed(50.0, 4.0), 1500.0);
        assert_relative_eq!(synchronous_speed(60.0, 2.0), 3600.0);
    }

    #[test]
    fn test_no_load_slip_and_branch() {
        let p = Params::new()
            .with("Vrated", 400.0)
            .with("I0", 2.0)
            .with("P0", 400.0 * SQRT_3 * 2.0 * 0.2)
            .with("rpm", 1485.0);
        let s = no_load(&p, &mut ScenarioState::default(), 0.1);
        assert_relative_eq!(s.number("pf0").unwrap(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(s.number("slip").unwrap(), 0.01, epsilon = 1e-12);
        let v_ph = 400.0 / SQRT_3;
        assert_relative_eq!(s.number("Rc").unwrap(), v_ph / 0.4, epsilon = 1e-9);
    }

    #[test]
    fn test_blocked_rotor_branch() {
        let p = Params::new()
            .with("Vbr", 100.0 * SQRT_3)
            .with("Ibr", 10.0)
            .with("Pbr", 1800.0);
        let s = blocked_rotor(&p, &mut ScenarioState::default(), 0.1);
        assert_relative_eq!(s.number("Req").unwrap(), 6.0, epsilon = 1e-12);
        assert_relative_eq!(s.number("Zeq").unwrap(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(s.number("Xeq").unwrap(), 8.0, epsilon = 1e-9);
        assert_relative_eq!(s.p, 1800.0, epsilon = 1e-9);
    }

    #[test]
    fn test_torque_peaks_at_s_max() {
        let params = Params::new();
        let at = |slip: f64| {
            torque_slip(&params.clone().with("slip", slip), &mut ScenarioState::default(), 0.1)
        };
        let base = at(0.04);
        let s_max = base.number("s_max").unwrap();
        let t_max = base.number("T_max").unwrap();

        let peak = at(s_max);
        assert_relative_eq!(peak.number("torque").unwrap(), t_max, epsilon = 1e-9);
        assert!(at(s_max * 0.8).number("torque").unwrap() < t_max);
        assert!(at((s_max * 1.2).min(1.0)).number("torque").unwrap() < t_max);
    }

    #[test]
    fn test_zero_slip_is_clamped() {
        let s = torque_slip(
            &Params::new().with("slip", 0.0),
            &mut ScenarioState::default(),
            0.1,
        );
        assert_eq!(s.number("slip"), Some(MIN_SLIP));
        assert!(s.number("torque").unwrap().is_finite());
    }

    #[test]
    fn test_standstill_has_no_mechanical_output() {
        let s = torque_slip(
            &Params::new().with("slip", 1.0),
            &mut ScenarioState::default(),
            0.1,
        );
        assert_relative_eq!(s.number("rpm").unwrap(), 0.0);
        assert_relative_eq!(s.number("P_out").unwrap(), 0.0);
        assert!(s.number("torque").unwrap() > 0.0);
    }
}
