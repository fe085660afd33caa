//! Resistive networks: Ohm's law and series/parallel combinations.

use crate::scenario::{Params, Sample, ScenarioState};

/// Single resistor across a DC source.
pub fn ohms_law(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let v = params.get_or("Vs", 10.0);
    let r = params.positive("R", 100.0);
    let i = v / r;
    Sample::from_vi(v, i).with("R", r)
}

/// Three resistors, either in series (`topology = 0`) or in parallel
/// (`topology = 1`).
///
/// Series chains report the divider voltage across each resistor;
/// parallel banks report each branch current.
pub fn series_parallel(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let v = params.get_or("Vs", 12.0);
    let r = [
        params.positive("R1", 100.0),
        params.positive("R2", 220.0),
        params.positive("R3", 330.0),
    ];
    let parallel = params.get_or("topology", 0.0) >= 0.5;

    let req = if parallel {
        1.0 / r.iter().map(|x| 1.0 / x).sum::<f64>()
    } else {
        r.iter().sum()
    };
    let i = v / req;

    let (drops, branches) = if parallel {
        ([v; 3], [v / r[0], v / r[1], v / r[2]])
    } else {
        ([i * r[0], i * r[1], i * r[2]], [i; 3])
    };

    Sample::from_vi(v, i)
        .with("Req", req)
        .with("topology", if parallel { "parallel" } else { "series" })
        .with("V1", drops[0])
        .with("V2", drops[1])
        .with("V3", drops[2])
        .with("I1", branches[0])
        .with("I2", branches[1])
        .with("I3", branches[2])
}
