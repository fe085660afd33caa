//! Series RLC circuit driven by a sinusoidal source.
//!
//! Uses the phasor form `Z = R + j(wL - 1/(wC))`. Only magnitudes are
//! reported; the instantaneous current is shown rectified.

use std::f64::consts::{PI, SQRT_2};

use num_complex::Complex64;

use crate::scenario::{nonzero, Params, Sample, ScenarioState};

/// Resonant frequency `1 / (2 pi sqrt(LC))`.
pub fn resonant_frequency(l: f64, c: f64) -> f64 {
    1.0 / (2.0 * PI * nonzero((l * c).sqrt()))
}

/// One step of the series RLC experiment.
pub fn resonance(params: &Params, state: &mut ScenarioState, dt: f64) -> Sample {
    state.advance_time(dt);

    let v = params.get_or("Vs", 10.0);
    let r = params.positive("R", 10.0);
    let l = params.positive("L", 0.1);
    let c = params.positive("C", 10e-6);
    let f = params.positive("f", 50.0);

    let omega = 2.0 * PI * f;
    let xl = omega * l;
    let xc = 1.0 / nonzero(omega * c);
    let z = Complex64::new(r, xl - xc);
    let z_mag = nonzero(z.norm());

    let i = v.abs() / z_mag;
    let phase = z.arg();
    let i_inst = SQRT_2 * i * (omega * state.time - phase).sin().abs();

    Sample::new(v, i, i * i * r)
        .with("f", f)
        .with("f0", resonant_frequency(l, c))
        .with("Xl", xl)
        .with("Xc", xc)
        .with("Z", z_mag)
        .with("VR", i * r)
        .with("VL", i * xl)
        .with("VC", i * xc)
        .with("phase_deg", phase.to_degrees())
        .with("pf", r / z_mag)
        .with("Q", (l / c).sqrt() / r)
        .with("i_inst", i_inst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{run_sweep, SweepRange};
    use approx::assert_relative_eq;

    fn base() -> Params {
        Params::new()
            .with("Vs", 10.0)
            .with("R", 10.0)
            .with("L", 0.1)
            .with("C", 10e-6)
    }

    #[test]
    fn test_at_resonance_current_is_v_over_r() {
        let f0 = resonant_frequency(0.1, 10e-6);
        let s = resonance(&base().with("f", f0), &mut ScenarioState::default(), 0.0);
        assert_relative_eq!(s.i, 1.0, epsilon = 1e-9);
        assert_relative_eq!(s.number("Xl").unwrap(), s.number("Xc").unwrap(), epsilon = 1e-6);
        assert_relative_eq!(s.number("pf").unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_below_resonance_is_capacitive() {
        let s = resonance(&base().with("f", 50.0), &mut ScenarioState::default(), 0.0);
        assert!(s.number("phase_deg").unwrap() < 0.0);
        assert!(s.i < 1.0);
    }

    #[test]
    fn test_sweep_peaks_at_f0() {
        let f0 = resonant_frequency(0.1, 10e-6);
        let range = SweepRange::new("f", 1.0, 10.0 * f0, 1000).unwrap();
        let curve = run_sweep(resonance, &base(), &mut ScenarioState::default(), &range);

        let peak = curve
            .iter()
            .max_by(|a, b| a.y.partial_cmp(&b.y).unwrap())
            .unwrap();
        assert!((peak.x - f0).abs() <= range.step_size());
    }

    #[test]
    fn test_instantaneous_current_is_rectified() {
        let mut state = ScenarioState::default();
        for _ in 0..50 {
            let s = resonance(&base(), &mut state, 0.0013);
            let inst = s.number("i_inst").unwrap();
            assert!(inst >= 0.0);
            assert!(inst <= SQRT_2 * s.i + 1e-12);
        }
    }
}
