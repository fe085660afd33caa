//! Generic source-and-load model used for unknown scenario ids.

use crate::scenario::{Params, Sample, ScenarioState};

/// Largest magnitude accepted for V or I, so `V * I` stays finite.
const MAX_MAGNITUDE: f64 = 1e150;

/// `V = Vs`, `I = load`, `P = V * I`.
pub fn generic(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let v = params.clamped("Vs", 10.0, -MAX_MAGNITUDE, MAX_MAGNITUDE);
    let i = params.clamped("load", 1.0, -MAX_MAGNITUDE, MAX_MAGNITUDE);
    Sample::from_vi(v, i)
}
