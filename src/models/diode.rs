//! Diode in series with a resistor across a DC supply.
//!
//! The operating point satisfies
//!
//! ```text
//! Vd + R * Is * (exp(Vd / (n Vt)) - 1) = Vs
//! ```
//!
//! which has no closed form, so it goes through the bisection solver.

use crate::scenario::{Params, Sample, ScenarioState};
use crate::solver::{shockley, solve_loop, thermal_voltage, Bisection};

/// Solved diode loop.
#[derive(Debug, Clone, Copy)]
pub struct DiodePoint {
    pub vd: f64,
    pub id: f64,
    pub vt: f64,
    pub residual: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Solve the diode loop for supply `vs` and series resistance `r`.
pub fn solve_diode(vs: f64, r: f64, is: f64, n: f64, t: f64) -> DiodePoint {
    let vt = thermal_voltage(t);
    let solution = solve_loop(&Bisection::new(), vs, r, |v| shockley(v, is, n, vt));
    if !solution.converged {
        tracing::debug!(vs, r, residual = solution.residual, "diode loop did not converge");
    }
    DiodePoint {
        vd: solution.value,
        id: shockley(solution.value, is, n, vt),
        vt,
        residual: solution.residual,
        iterations: solution.iterations,
        converged: solution.converged,
    }
}

/// DC operating point of the diode circuit.
pub fn operating_point(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let vs = params.clamped("Vs", 5.0, -1e4, 1e4);
    let r = params.positive("R", 1000.0);
    let is = params.clamped("Is", 1e-9, 1e-18, 1e-3);
    let n = params.clamped("n", 1.8, 0.5, 10.0);
    let t = params.clamped("T", 300.0, 1.0, 1000.0);

    let op = solve_diode(vs, r, is, n, t);

    Sample::from_vi(op.vd, op.id)
        .with("Vr", op.id * r)
        .with("Vt", op.vt)
        .with("converged", op.converged)
        .with("iterations", op.iterations as f64)
        .with("residual", op.residual)
}
