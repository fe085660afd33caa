//! DC shunt motor with first-order mechanical dynamics.
//!
//! Electrical side is quasi-static (armature inductance neglected):
//!
//! ```text
//! If = V / Rf        K = Kf * If
//! Ea = K * w         Ia = (V - Ea) / Ra
//! Te = K * Ia
//! dw/dt = (Te - Tload - B * w) / J
//! ```
//!
//! The speed equation is integrated with forward Euler in sub-steps short
//! enough to stay stable for the configured inertia.

use std::f64::consts::PI;

use crate::scenario::{sanitize_dt, Params, Sample, ScenarioState};

/// Longest Euler sub-step (s).
pub const MAX_EULER_STEP: f64 = 1e-3;

/// Upper bound on sub-steps per model call.
pub const MAX_SUBSTEPS: usize = 5000;

/// Longest elapsed time integrated in one call (s).
const MAX_DT: f64 = 1.0;

#[derive(Debug, Clone, Copy)]
struct Machine {
    v: f64,
    ra: f64,
    k: f64,
    i_field: f64,
    j: f64,
    b: f64,
    t_load: f64,
}

impl Machine {
    fn from_params(params: &Params) -> Self {
        let v = params.get_or("Vs", 220.0);
        let rf = params.positive("Rf", 220.0);
        let i_field = v / rf;
        Self {
            v,
            ra: params.positive("Ra", 0.5),
            k: (params.get_or("Kf", 1.0) * i_field).abs().max(1e-6),
            i_field,
            j: params.positive("J", 0.05),
            b: params.clamped("B", 0.002, 0.0, 1e6),
            t_load: params.get_or("Tload", 5.0),
        }
    }

    fn armature_current(&self, omega: f64) -> f64 {
        (self.v - self.k * omega) / self.ra
    }

    fn acceleration(&self, omega: f64) -> f64 {
        let te = self.k * self.armature_current(omega);
        (te - self.t_load - self.b * omega) / self.j
    }

    /// Decay rate of the linear speed equation (1/s).
    fn stiffness(&self) -> f64 {
        (self.k * self.k / self.ra + self.b) / self.j
    }

    /// Speed where electrical torque balances load and friction.
    fn steady_speed(&self) -> f64 {
        (self.k * self.v / self.ra - self.t_load) / (self.k * self.k / self.ra + self.b)
    }
}

/// Advance the motor speed by `dt` seconds.
fn integrate(machine: &Machine, omega: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        return omega;
    }

    let lambda = machine.stiffness();
    let h_max = MAX_EULER_STEP.min(1.0 / lambda);
    let steps = ((dt / h_max).ceil() as usize).clamp(1, MAX_SUBSTEPS);
    let h = dt / steps as f64;

    if h * lambda >= 1.0 {
        // Too stiff for the sub-step budget; the exact solution has already settled.
        return machine.steady_speed();
    }

    let mut w = omega;
    for _ in 0..steps {
        w += h * machine.acceleration(w);
    }
    w
}

/// One step of the DC shunt motor.
///
/// `P` is the electrical input power `V * (Ia + If)`.
pub fn shunt_motor(params: &Params, state: &mut ScenarioState, dt: f64) -> Sample {
    let machine = Machine::from_params(params);
    let dt = sanitize_dt(dt).min(MAX_DT);
    state.advance_time(dt);

    let omega = integrate(&machine, state.motor.omega, dt);
    state.motor.omega = if omega.is_finite() { omega } else { 0.0 };
    let omega = state.motor.omega;

    let ea = machine.k * omega;
    let ia = machine.armature_current(omega);
    let te = machine.k * ia;
    let i_line = ia + machine.i_field;
    let p_in = machine.v * i_line;
    let p_out = machine.t_load * omega;
    let efficiency = if p_in > 0.0 {
        (p_out / p_in * 100.0).clamp(-100.0, 100.0)
    } else {
        0.0
    };

    Sample::new(machine.v, i_line, p_in)
        .with("omega", omega)
        .with("rpm", omega * 60.0 / (2.0 * PI))
        .with("Ea", ea)
        .with("Ia", ia)
        .with("If", machine.i_field)
        .with("Te", te)
        .with("P_out", p_out)
        .with("efficiency", efficiency)
}
