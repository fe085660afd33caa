//! Scenario model registry.
//!
//! Maps scenario identifiers to pure step functions. Unknown identifiers
//! resolve to the generic fallback model so the host always has something
//! to plot.

use std::collections::HashMap;

use crate::models;

use super::{Params, Sample, ScenarioState};

/// A scenario step function: `(params, state, elapsed_seconds) -> Sample`.
pub type ModelFn = fn(&Params, &mut ScenarioState, f64) -> Sample;

/// Identifier used when a lookup misses.
pub const FALLBACK_ID: &str = "generic";

/// Registration record for one scenario.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioEntry {
    /// Scenario identifier
    pub id: &'static str,
    /// Human readable experiment name
    pub title: &'static str,
    /// Step function
    pub model: ModelFn,
    /// `extra` keys exported as CSV columns, in order
    pub columns: &'static [&'static str],
    /// Parameter a sweep scans when the host does not name one
    pub sweep_param: &'static str,
    /// Whether the physics depends on elapsed time (sweeps keep advancing it)
    pub time_dependent: bool,
}

impl ScenarioEntry {
    /// Create an entry.
    pub const fn new(
        id: &'static str,
        title: &'static str,
        model: ModelFn,
        columns: &'static [&'static str],
        sweep_param: &'static str,
        time_dependent: bool,
    ) -> Self {
        Self {
            id,
            title,
            model,
            columns,
            sweep_param,
            time_dependent,
        }
    }
}

const FALLBACK: ScenarioEntry = ScenarioEntry::new(
    FALLBACK_ID,
    "Generic source and load",
    models::fallback::generic,
    &[],
    "Vs",
    false,
);

const BUILTIN: &[ScenarioEntry] = &[
    ScenarioEntry::new(
        "ohms_law",
        "Ohm's law",
        models::resistive::ohms_law,
        &["R"],
        "Vs",
        false,
    ),
    ScenarioEntry::new(
        "series_parallel",
        "Series and parallel resistors",
        models::resistive::series_parallel,
        &["Req", "topology", "V1", "V2", "V3", "I1", "I2", "I3"],
        "Vs",
        false,
    ),
    ScenarioEntry::new(
        "rlc_resonance",
        "Series RLC resonance",
        models::rlc::resonance,
        &["f", "f0", "Xl", "Xc", "Z", "VR", "VL", "VC", "phase_deg", "pf", "Q", "i_inst"],
        "f",
        true,
    ),
    ScenarioEntry::new(
        "wheatstone",
        "Wheatstone bridge",
        models::bridge::wheatstone,
        &["Ig", "Vab", "Rx_balance", "balanced"],
        "Rx",
        false,
    ),
    ScenarioEntry::new(
        "maxwell_bridge",
        "Maxwell inductance bridge",
        models::bridge::maxwell,
        &["Id", "Lx_balance", "Rx_balance", "Q", "balanced"],
        "Lx",
        false,
    ),
    ScenarioEntry::new(
        "wien_bridge",
        "Wien bridge",
        models::bridge::wien,
        &["f", "f0", "Id", "ratio_required", "balanced"],
        "f",
        false,
    ),
    ScenarioEntry::new(
        "transformer_oc",
        "Transformer open-circuit test",
        models::transformer::open_circuit,
        &["pf0", "Iw", "Im", "Rc", "Xm"],
        "V",
        false,
    ),
    ScenarioEntry::new(
        "transformer_sc",
        "Transformer short-circuit test",
        models::transformer::short_circuit,
        &["pf_sc", "Req", "Zeq", "Xeq"],
        "I",
        false,
    ),
    ScenarioEntry::new(
        "transformer_load",
        "Transformer load test",
        models::transformer::load_test,
        &["load", "output", "losses", "efficiency", "regulation_pct", "x_max_eff"],
        "load",
        false,
    ),
    ScenarioEntry::new(
        "dc_motor",
        "DC shunt motor",
        models::dc_motor::shunt_motor,
        &["omega", "rpm", "Ea", "Ia", "If", "Te", "P_out", "efficiency"],
        "Tload",
        true,
    ),
    ScenarioEntry::new(
        "induction_no_load",
        "Induction motor no-load test",
        models::induction::no_load,
        &["pf0", "Rc", "Xm", "ns", "slip"],
        "V",
        false,
    ),
    ScenarioEntry::new(
        "induction_blocked_rotor",
        "Induction motor blocked-rotor test",
        models::induction::blocked_rotor,
        &["pf_br", "Req", "Zeq", "Xeq"],
        "V",
        false,
    ),
    ScenarioEntry::new(
        "induction_motor",
        "Induction motor torque-slip",
        models::induction::torque_slip,
        &["slip", "ns", "rpm", "torque", "T_max", "s_max", "P_out", "efficiency"],
        "slip",
        false,
    ),
    ScenarioEntry::new(
        "synchronous_vcurve",
        "Synchronous motor V-curve",
        models::synchronous::v_curve,
        &["If", "Ef", "delta_deg", "pf", "leading", "stable"],
        "If",
        false,
    ),
    ScenarioEntry::new(
        "alternator_sync",
        "Alternator synchronization",
        models::alternator::synchronize,
        &["delta_f", "phase_deg", "dV", "lamp", "voltage_matched", "synchronized"],
        "f_alt",
        true,
    ),
    ScenarioEntry::new(
        "waveform",
        "Waveform generator",
        models::waveform::generate,
        &["t", "shape"],
        "f",
        true,
    ),
    ScenarioEntry::new(
        "oscilloscope",
        "Oscilloscope",
        models::waveform::generate,
        &["t", "shape"],
        "f",
        true,
    ),
    ScenarioEntry::new(
        "footprint",
        "Carbon footprint calculator",
        models::footprint::footprint,
        &[
            "lighting",
            "fan",
            "air_conditioner",
            "computer",
            "refrigerator",
            "car",
            "bus",
            "lpg",
            "energy_kwh_day",
            "total_kg_year",
        ],
        "car_km",
        false,
    ),
    ScenarioEntry::new(
        "diode_iv",
        "Diode characteristics",
        models::diode::operating_point,
        &["Vr", "Vt", "converged", "iterations", "residual"],
        "Vs",
        false,
    ),
    ScenarioEntry::new(
        "transistor",
        "Transistor characteristics",
        models::transistor::operating_point,
        &["Ib", "Vce", "region", "converged", "iterations"],
        "Vcc",
        false,
    ),
];

/// Lookup table from scenario id to [`ScenarioEntry`].
#[derive(Debug, Clone)]
pub struct Registry {
    entries: HashMap<&'static str, ScenarioEntry>,
    fallback: ScenarioEntry,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// Registry with no scenarios; every lookup falls back.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            fallback: FALLBACK,
        }
    }

    /// Registry with every built-in scenario.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for entry in BUILTIN {
            registry.register(*entry);
        }
        registry
    }

    /// Add or replace a scenario.
    pub fn register(&mut self, entry: ScenarioEntry) {
        self.entries.insert(entry.id, entry);
    }

    /// Look up a scenario, without falling back.
    pub fn get(&self, id: &str) -> Option<&ScenarioEntry> {
        self.entries.get(id)
    }

    /// Look up a scenario, falling back to the generic model.
    pub fn resolve(&self, id: &str) -> &ScenarioEntry {
        self.entries.get(id).unwrap_or(&self.fallback)
    }

    /// Whether `id` names a registered scenario.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// All registered entries, sorted by id.
    pub fn entries(&self) -> Vec<&ScenarioEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by_key(|e| e.id);
        entries
    }
}

/// Resolve a scenario id against the built-in table.
pub fn resolve_model(id: &str) -> ModelFn {
    BUILTIN
        .iter()
        .find(|e| e.id == id)
        .map(|e| e.model)
        .unwrap_or(FALLBACK.model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ids_are_unique() {
        let registry = Registry::builtin();
        assert_eq!(registry.entries().len(), BUILTIN.len());
    }

    #[test]
    fn test_unknown_id_falls_back() {
        let registry = Registry::builtin();
        assert_eq!(registry.resolve("nonexistent-id").id, FALLBACK_ID);
        assert!(!registry.contains("nonexistent-id"));
    }

    #[test]
    fn test_fallback_model_stays_finite() {
        let model = resolve_model("nonexistent-id");
        let mut state = ScenarioState::default();
        let inputs = [0.0, -1.0, 1e-300, 1e300, -1e308, f64::MAX, f64::MIN, 42.5];

        for &vs in &inputs {
            for &load in &inputs {
                let params = Params::new().with("Vs", vs).with("load", load);
                let s = model(&params, &mut state, 0.1);
                assert!(s.v.is_finite() && s.i.is_finite() && s.p.is_finite());
            }
        }
    }

    #[test]
    fn test_every_builtin_produces_finite_defaults() {
        let registry = Registry::builtin();
        for entry in registry.entries() {
            let mut state = ScenarioState::default();
            let s = (entry.model)(&Params::new(), &mut state, 0.1);
            assert!(
                s.v.is_finite() && s.i.is_finite() && s.p.is_finite(),
                "{} produced a non-finite sample",
                entry.id
            );
        }
    }

    #[test]
    fn test_every_builtin_survives_zeroed_params() {
        let registry = Registry::builtin();
        let keys = [
            "Vs", "V", "I", "R", "R1", "R2", "R3", "R4", "Rx", "L", "C", "C1", "C2", "C4", "Lx",
            "f", "Ra", "Rf", "J", "Xs", "Ef", "kf", "If", "slip", "Is", "n", "T", "Rc", "Rb",
            "beta", "Vcc", "poles", "I0", "W0", "Isc", "Vsc", "Wsc",
        ];
        let params: Params = keys.iter().map(|k| (*k, 0.0)).collect();

        for entry in registry.entries() {
            let mut state = ScenarioState::default();
            let s = (entry.model)(&params, &mut state, 0.1);
            assert!(
                s.v.is_finite() && s.i.is_finite() && s.p.is_finite(),
                "{} produced a non-finite sample with zeroed params",
                entry.id
            );
        }
    }
}
