//! WASM bindings for LabSim Core.
//!
//! This module provides JavaScript-friendly bindings for driving a lab
//! experiment from a browser animation loop.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmLab } from 'labsim_core';
//!
//! await init();
//!
//! const lab = new WasmLab("dc_motor");
//! lab.set_param("Tload", 8);
//!
//! function frame(nowMs) {
//!   if (lab.tick(nowMs)) {
//!     const sample = JSON.parse(lab.latest_json());
//!     gauge.update(sample.extra.rpm);
//!   }
//!   requestAnimationFrame(frame);
//! }
//! requestAnimationFrame(frame);
//! ```

use wasm_bindgen::prelude::*;

use crate::engine::{Simulator, SimulatorConfig, SweepRange};
use crate::error::LabSimError;
use crate::scenario::Registry;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: LabSimError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| {
        to_js(LabSimError::WasmError {
            message: e.to_string(),
        })
    })
}

/// WASM-compatible lab simulator.
///
/// Wraps the native [`Simulator`]. Results cross the boundary as JSON
/// strings so the host can hand them straight to its charting code.
#[wasm_bindgen]
pub struct WasmLab {
    simulator: Simulator,
}

#[wasm_bindgen]
impl WasmLab {
    /// Create a lab running the given scenario.
    ///
    /// Unknown ids run the generic source/load model.
    #[wasm_bindgen(constructor)]
    pub fn new(scenario_id: &str) -> WasmLab {
        WasmLab {
            simulator: Simulator::new(scenario_id),
        }
    }

    /// Create a lab with custom clock and history settings.
    ///
    /// # Arguments
    /// * `scenario_id` - Scenario to run
    /// * `min_interval_ms` - Minimum time between steps (default: 80)
    /// * `history_capacity` - Samples kept for charts (default: 720)
    /// * `noise_seed` - Seed for waveform noise
    #[wasm_bindgen]
    pub fn with_config(
        scenario_id: &str,
        min_interval_ms: f64,
        history_capacity: usize,
        noise_seed: u32,
    ) -> Result<WasmLab, JsValue> {
        let config = SimulatorConfig::new()
            .with_min_interval(min_interval_ms / 1000.0)
            .with_history_capacity(history_capacity)
            .with_noise_seed(u64::from(noise_seed));
        config.validate().map_err(to_js)?;
        Ok(WasmLab {
            simulator: Simulator::with_config(scenario_id, config),
        })
    }

    /// Offer an animation-frame timestamp in milliseconds.
    ///
    /// Returns `true` if a new sample was produced.
    #[wasm_bindgen]
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.simulator.tick(now_ms / 1000.0).is_some()
    }

    /// Step by an explicit duration in seconds, bypassing the clock.
    #[wasm_bindgen]
    pub fn step(&mut self, dt: f64) -> bool {
        self.simulator.step(dt).is_some()
    }

    #[wasm_bindgen]
    pub fn set_param(&mut self, key: &str, value: f64) {
        self.simulator.set_param(key, value);
    }

    /// Replace the parameters from a JSON object of numbers.
    #[wasm_bindgen]
    pub fn set_params_json(&mut self, params_json: &str) -> Result<(), JsValue> {
        let params = serde_json::from_str(params_json)
            .map_err(|e| to_js(LabSimError::JsonError(e)))?;
        self.simulator.replace_params(params);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn switch_scenario(&mut self, scenario_id: &str) {
        self.simulator.switch_scenario(scenario_id);
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.simulator.reset();
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) {
        self.simulator.pause();
    }

    #[wasm_bindgen]
    pub fn resume(&mut self) {
        self.simulator.resume();
    }

    #[wasm_bindgen(getter)]
    pub fn paused(&self) -> bool {
        self.simulator.is_paused()
    }

    /// Start a sweep. An empty `param` sweeps the scenario's default.
    #[wasm_bindgen]
    pub fn start_sweep(&mut self, param: &str, from: f64, to: f64, steps: usize) -> Result<(), JsValue> {
        let range = if param.is_empty() {
            self.simulator.default_sweep(from, to, steps)
        } else {
            SweepRange::new(param, from, to, steps)
        }
        .map_err(to_js)?;
        self.simulator.start_sweep(range);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn stop_sweep(&mut self) {
        self.simulator.stop_sweep();
    }

    #[wasm_bindgen(getter)]
    pub fn sweeping(&self) -> bool {
        self.simulator.is_sweeping()
    }

    #[wasm_bindgen(getter)]
    pub fn sweep_complete(&self) -> bool {
        self.simulator.sweep_complete()
    }

    /// Install a custom waveform expression.
    #[wasm_bindgen]
    pub fn set_expression(&mut self, expression: &str) -> Result<(), JsValue> {
        self.simulator.set_expression(expression).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn clear_expression(&mut self) {
        self.simulator.clear_expression();
    }

    /// Latest sample as JSON, or `null`.
    #[wasm_bindgen]
    pub fn latest_json(&self) -> Result<String, JsValue> {
        json(&self.simulator.latest())
    }

    /// Rolling history as a JSON array, oldest first.
    #[wasm_bindgen]
    pub fn history_json(&self) -> Result<String, JsValue> {
        json(&self.simulator.history().snapshot())
    }

    /// Sweep points as a JSON array of `{x, y, p}`.
    #[wasm_bindgen]
    pub fn sweep_curve_json(&self) -> Result<String, JsValue> {
        json(self.simulator.sweep_curve())
    }

    /// History rendered as CSV.
    #[wasm_bindgen]
    pub fn csv(&self) -> String {
        self.simulator.history_csv()
    }

    #[wasm_bindgen(getter)]
    pub fn scenario_id(&self) -> String {
        self.simulator.scenario_id().to_string()
    }
}

/// Ids and titles of the built-in scenarios as a JSON array.
#[wasm_bindgen]
pub fn scenarios_json() -> Result<String, JsValue> {
    let list: Vec<(&str, &str)> = Registry::builtin()
        .entries()
        .iter()
        .map(|e| (e.id, e.title))
        .collect();
    json(&list)
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
