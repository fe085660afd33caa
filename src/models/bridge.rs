//! Bridge circuits: Wheatstone, Maxwell and Wien.
//!
//! All three share the same layout. The supply drives two dividers, the
//! left one (arm 1 over arm 2) and the right one (arm 3 over arm 4), and a
//! detector sits between the two midpoints. The detector current is taken
//! from the Thevenin equivalent seen by the detector, so it is exactly
//! proportional to the deviation from the null condition. "Balanced" is a
//! threshold on that current.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::scenario::{nonzero, Params, Sample, ScenarioState};

/// Default detector-current threshold for "balanced" (A).
pub const DEFAULT_BALANCE_TOLERANCE: f64 = 1e-6;

/// Detector-side solution of a four-arm bridge.
#[derive(Debug, Clone, Copy)]
struct BridgeSolution {
    /// Open-circuit detector voltage (left midpoint minus right midpoint)
    v_open: Complex64,
    /// Detector current
    i_detector: Complex64,
    /// Current drawn from the supply
    i_supply: Complex64,
}

/// Solve a bridge with arms `z1` (top left), `z2` (bottom left),
/// `z3` (top right), `z4` (bottom right) and detector impedance `zd`.
fn solve_bridge(
    vs: Complex64,
    z1: Complex64,
    z2: Complex64,
    z3: Complex64,
    z4: Complex64,
    zd: Complex64,
) -> BridgeSolution {
    let left = guard(z1 + z2);
    let right = guard(z3 + z4);

    let va = vs * z2 / left;
    let vb = vs * z4 / right;
    let v_open = va - vb;

    let z_th = z1 * z2 / left + z3 * z4 / right;
    let i_detector = v_open / guard(z_th + zd);

    // Detector current loads the midpoints: it leaves node a and enters node b.
    let va_loaded = va - i_detector * z1 * z2 / left;
    let vb_loaded = vb + i_detector * z3 * z4 / right;
    let i_supply = (vs - va_loaded) / guard(z1) + (vs - vb_loaded) / guard(z3);

    BridgeSolution {
        v_open,
        i_detector,
        i_supply,
    }
}

fn guard(z: Complex64) -> Complex64 {
    if z.norm().is_finite() && z.norm() > 1e-12 {
        z
    } else {
        Complex64::new(1e-12, 0.0)
    }
}

fn tolerance(params: &Params) -> f64 {
    params.positive("tol", DEFAULT_BALANCE_TOLERANCE)
}

/// Wheatstone bridge with a galvanometer of resistance `Rg`.
///
/// Balanced when `R1 * Rx = R2 * R3`.
pub fn wheatstone(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let vs = params.get_or("Vs", 10.0);
    let r1 = params.positive("R1", 1000.0);
    let r2 = params.positive("R2", 1000.0);
    let r3 = params.positive("R3", 1000.0);
    let rx = params.positive("Rx", 1000.0);
    let rg = params.positive("Rg", 100.0);

    let real = |x: f64| Complex64::new(x, 0.0);
    let sol = solve_bridge(real(vs), real(r1), real(r2), real(r3), real(rx), real(rg));

    let ig = sol.i_detector.re;
    let i = sol.i_supply.re;

    Sample::from_vi(vs, i)
        .with("Ig", ig)
        .with("Vab", sol.v_open.re)
        .with("Rx_balance", r2 * r3 / r1)
        .with("balanced", ig.abs() < tolerance(params))
}

/// Maxwell inductance-capacitance bridge.
///
/// Arm 1 is `R1` in parallel with `C4`, arms 2 and 3 are `R2` and `R3`, the
/// unknown arm is `Rx + jwLx`. Balance gives `Lx = R2 R3 C4` and
/// `Rx = R2 R3 / R1`.
pub fn maxwell(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let vs = params.get_or("Vs", 10.0);
    let f = params.positive("f", 1000.0);
    let r1 = params.positive("R1", 2000.0);
    let r2 = params.positive("R2", 500.0);
    let r3 = params.positive("R3", 1000.0);
    let c4 = params.positive("C4", 0.2e-6);
    let rx = params.positive("Rx", 250.0);
    let lx = params.positive("Lx", 0.1);
    let rd = params.positive("Rd", 1000.0);

    let omega = 2.0 * PI * f;
    let vs_c = Complex64::new(vs, 0.0);
    let z1 = Complex64::new(1.0 / r1, omega * c4).inv();
    let z2 = Complex64::new(r2, 0.0);
    let z3 = Complex64::new(r3, 0.0);
    let zx = Complex64::new(rx, omega * lx);
    let zd = Complex64::new(rd, 0.0);

    // Divider order: arm 1 over arm 2 on the left, arm 3 over the unknown on the right.
    let sol = solve_bridge(vs_c, z1, z2, z3, zx, zd);
    let id = sol.i_detector.norm();
    let power = (vs_c * sol.i_supply.conj()).re;

    Sample::new(vs, sol.i_supply.norm(), power)
        .with("Id", id)
        .with("Lx_balance", r2 * r3 * c4)
        .with("Rx_balance", r2 * r3 / r1)
        .with("Q", omega * lx / rx)
        .with("balanced", id < tolerance(params))
}

/// Wien bridge.
///
/// Arm 1 is `R1` in series with `C1`, arm 2 is `R2` in parallel with `C2`,
/// arms 3 and 4 are plain resistors. Balanced at
/// `f0 = 1 / (2 pi sqrt(R1 R2 C1 C2))` when `R3 / R4 = R1 / R2 + C2 / C1`.
/// The drive frequency defaults to `f0`.
pub fn wien(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let vs = params.get_or("Vs", 10.0);
    let r1 = params.positive("R1", 10e3);
    let r2 = params.positive("R2", 10e3);
    let c1 = params.positive("C1", 10e-9);
    let c2 = params.positive("C2", 10e-9);
    let r3 = params.positive("R3", 2000.0);
    let r4 = params.positive("R4", 1000.0);
    let rd = params.positive("Rd", 1000.0);

    let f0 = 1.0 / (2.0 * PI * nonzero((r1 * r2 * c1 * c2).sqrt()));
    let f = params.get("f").map(|f| f.abs().max(1e-9)).unwrap_or(f0);
    let omega = 2.0 * PI * f;

    let vs_c = Complex64::new(vs, 0.0);
    let z1 = Complex64::new(r1, -1.0 / (omega * c1));
    let z2 = Complex64::new(1.0 / r2, omega * c2).inv();
    let z3 = Complex64::new(r3, 0.0);
    let z4 = Complex64::new(r4, 0.0);
    let zd = Complex64::new(rd, 0.0);

    let sol = solve_bridge(vs_c, z1, z2, z3, z4, zd);
    let id = sol.i_detector.norm();
    let power = (vs_c * sol.i_supply.conj()).re;

    Sample::new(vs, sol.i_supply.norm(), power)
        .with("f", f)
        .with("f0", f0)
        .with("Id", id)
        .with("ratio_required", r1 / r2 + c2 / c1)
        .with("balanced", id < tolerance(params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wheatstone_equal_arms_balanced() {
        let p = Params::new()
            .with("R1", 1000.0)
            .with("R2", 1000.0)
            .with("R3", 1000.0)
            .with("Rx", 1000.0);
        let s = wheatstone(&p, &mut ScenarioState::default(), 0.1);
        assert!(s.number("Ig").unwrap().abs() < 1e-9);
        assert_eq!(s.flag("balanced"), Some(true));
        // Two 2k dividers in parallel across 10 V.
        assert_relative_eq!(s.i, 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_wheatstone_ratio_balance() {
        // R1 * Rx = R2 * R3 with unequal arms.
        let p = Params::new()
            .with("R1", 100.0)
            .with("R2", 1000.0)
            .with("R3", 470.0)
            .with("Rx", 4700.0);
        let s = wheatstone(&p, &mut ScenarioState::default(), 0.1);
        assert!(s.number("Ig").unwrap().abs() < 1e-9);
        assert_relative_eq!(s.number("Rx_balance").unwrap(), 4700.0, epsilon = 1e-9);
    }

    #[test]
    fn test_wheatstone_deviation_grows_current() {
        let small = wheatstone(
            &Params::new().with("Rx", 1010.0),
            &mut ScenarioState::default(),
            0.1,
        );
        let large = wheatstone(
            &Params::new().with("Rx", 1500.0),
            &mut ScenarioState::default(),
            0.1,
        );
        let ig_small = small.number("Ig").unwrap().abs();
        let ig_large = large.number("Ig").unwrap().abs();
        assert!(ig_small > 1e-6);
        assert!(ig_large > ig_small);
        assert_eq!(large.flag("balanced"), Some(false));
    }

    #[test]
    fn test_wheatstone_thevenin_matches_nodal() {
        let (vs, r1, r2, r3, rx, rg) = (10.0, 1000.0, 2200.0, 1500.0, 4700.0, 50.0);
        let p = Params::new()
            .with("Vs", vs)
            .with("R1", r1)
            .with("R2", r2)
            .with("R3", r3)
            .with("Rx", rx)
            .with("Rg", rg);
        let s = wheatstone(&p, &mut ScenarioState::default(), 0.1);

        // Two-node nodal analysis.
        let g11 = 1.0 / r1 + 1.0 / r2 + 1.0 / rg;
        let g22 = 1.0 / r3 + 1.0 / rx + 1.0 / rg;
        let g = 1.0 / rg;
        let (b1, b2) = (vs / r1, vs / r3);
        let det = g11 * g22 - g * g;
        let va = (b1 * g22 + g * b2) / det;
        let vb = (g11 * b2 + g * b1) / det;
        let supply = (vs - va) / r1 + (vs - vb) / r3;

        assert_relative_eq!(s.number("Ig").unwrap(), (va - vb) / rg, epsilon = 1e-12);
        assert_relative_eq!(s.i, supply, epsilon = 1e-12);
    }

    #[test]
    fn test_maxwell_default_is_balanced() {
        let s = maxwell(&Params::new(), &mut ScenarioState::default(), 0.1);
        assert_relative_eq!(s.number("Lx_balance").unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(s.number("Rx_balance").unwrap(), 250.0, epsilon = 1e-9);
        assert!(s.number("Id").unwrap() < 1e-9);
        assert_eq!(s.flag("balanced"), Some(true));
    }

    #[test]
    fn test_maxwell_wrong_inductance_unbalanced() {
        let s = maxwell(
            &Params::new().with("Lx", 0.2),
            &mut ScenarioState::default(),
            0.1,
        );
        assert_eq!(s.flag("balanced"), Some(false));
    }

    #[test]
    fn test_wien_balanced_at_f0() {
        let s = wien(&Params::new(), &mut ScenarioState::default(), 0.1);
        let f0 = s.number("f0").unwrap();
        assert_relative_eq!(f0, 1591.549, epsilon = 1e-3);
        assert!(s.number("Id").unwrap() < 1e-9);
        assert_eq!(s.flag("balanced"), Some(true));
        assert_relative_eq!(s.number("ratio_required").unwrap(), 2.0);
    }

    #[test]
    fn test_wien_off_frequency_unbalanced() {
        let s = wien(
            &Params::new().with("f", 1000.0),
            &mut ScenarioState::default(),
            0.1,
        );
        assert_eq!(s.flag("balanced"), Some(false));
    }
}
