//! Single-phase transformer tests.
//!
//! The open-circuit test gives the shunt branch (`Rc`, `Xm`), the
//! short-circuit test gives the series branch (`Req`, `Xeq`) and the load
//! test combines both loss figures into efficiency and regulation.

use crate::scenario::{nonzero, unit_clamp, Params, Sample, ScenarioState};

/// Open-circuit (no-load) test on the low-voltage side.
///
/// The applied voltage `V` may differ from the rating `Vrated`: no-load
/// current scales linearly with it and core loss with its square, so the
/// derived `Rc` and `Xm` stay constant across a voltage sweep.
pub fn open_circuit(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let v_rated = params.positive("Vrated", 230.0);
    let v = params.clamped("V", v_rated, 0.0, 10.0 * v_rated);
    let i0_rated = params.positive("I0", 0.5);
    let w0_rated = params.clamped("W0", 50.0, 0.0, f64::MAX);

    let ratio = v / v_rated;
    let i0 = i0_rated * ratio;
    let w0 = w0_rated * ratio * ratio;

    let pf0 = unit_clamp(w0_rated / (v_rated * i0_rated)).abs();
    let sin_phi = (1.0 - pf0 * pf0).sqrt();
    let iw = i0 * pf0;
    let im = i0 * sin_phi;

    Sample::new(v, i0, w0)
        .with("pf0", pf0)
        .with("Iw", iw)
        .with("Im", im)
        .with("Rc", v_rated / nonzero(i0_rated * pf0))
        .with("Xm", v_rated / nonzero(i0_rated * sin_phi))
}

/// Short-circuit test on the high-voltage side.
///
/// `Vsc`, `Isc` and `Wsc` are the readings at rated current; the applied
/// current `I` defaults to `Isc`.
pub fn short_circuit(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let isc = params.positive("Isc", 8.7);
    let vsc = params.positive("Vsc", 12.0);
    let wsc = params.clamped("Wsc", 60.0, 0.0, f64::MAX);
    let i = params.clamped("I", isc, 0.0, 10.0 * isc);

    let req = wsc / (isc * isc);
    let zeq = vsc / isc;
    let xeq = (zeq * zeq - req * req).max(0.0).sqrt();
    let pf_sc = unit_clamp(req / nonzero(zeq)).abs();

    Sample::new(zeq * i, i, req * i * i)
        .with("pf_sc", pf_sc)
        .with("Req", req)
        .with("Zeq", zeq)
        .with("Xeq", xeq)
}

/// Load test: efficiency and regulation at a fraction `load` of rating.
///
/// `P` is the output power. Losses are `Pi + load^2 * Pcu`.
pub fn load_test(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let rating = params.positive("S", 1000.0);
    let x = params.clamped("load", 1.0, 0.0, 1.25);
    let pf = params.fraction("pf", 0.8);
    let lagging = params.get_or("leading", 0.0) < 0.5;
    let p_core = params.clamped("Pi", 20.0, 0.0, f64::MAX);
    let p_cu = params.clamped("Pcu", 40.0, 0.0, f64::MAX);
    let v2 = params.positive("V2", 230.0);
    let req2 = params.clamped("Req2", 1.2, 0.0, f64::MAX);
    let xeq2 = params.clamped("Xeq2", 2.0, 0.0, f64::MAX);

    let output = x * rating * pf;
    let losses = p_core + x * x * p_cu;
    let efficiency = if output + losses > 0.0 {
        output / (output + losses) * 100.0
    } else {
        0.0
    };

    let i2 = x * rating / v2;
    let sin_phi = (1.0 - pf * pf).sqrt();
    let sin_phi = if lagging { sin_phi } else { -sin_phi };
    let drop = i2 * (req2 * pf + xeq2 * sin_phi);
    let regulation = drop / v2 * 100.0;
    let v_terminal = v2 - drop;

    Sample::new(v_terminal, i2, output)
        .with("load", x)
        .with("output", output)
        .with("losses", losses)
        .with("efficiency", efficiency)
        .with("regulation_pct", regulation)
        .with("x_max_eff", (p_core / nonzero(p_cu)).sqrt())
}
