//! # LabSim Core
//!
//! The time-stepped physics engine behind an electrical engineering lab
//! simulator.
//!
//! This library provides:
//! - Per-experiment physics models (resistive networks, RLC resonance,
//!   AC bridges, transformer tests, DC/induction/synchronous machines,
//!   alternator synchronizing, a function generator and a footprint calculator)
//! - A bisection operating-point solver for diode and transistor circuits
//! - A throttled step clock, a rolling sample history and parameter sweeps
//! - A small expression language for custom waveforms
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`scenario`] - Sample/parameter/state types and the model registry
//! - [`models`] - The physics of each experiment
//! - [`solver`] - Bisection solver and device current models
//! - [`engine`] - Clock, history, sweeps and the [`Simulator`] itself
//! - [`expr`] - Parser and evaluator for custom waveform expressions
//! - [`output`] - CSV writer for the command line (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! labsim rlc_resonance --sweep f --from 10 --to 500 --steps 200 > curve.csv
//! labsim dc_motor --ticks 100 --dt 0.1 -p Tload=8
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmLab } from 'labsim_core';
//!
//! const lab = new WasmLab("rlc_resonance");
//! lab.set_param("f", 159.0);
//! function frame(ms) {
//!   if (lab.tick(ms)) draw(JSON.parse(lab.latest_json()));
//!   requestAnimationFrame(frame);
//! }
//! ```
//!
//! ### Library
//!
//! ```
//! use labsim_core::Simulator;
//!
//! let mut sim = Simulator::new("ohms_law");
//! sim.set_param("Vs", 12.0);
//! sim.set_param("R", 4.0);
//! let sample = sim.step(0.1).unwrap();
//! assert_eq!(sample.i, 3.0);
//! ```
//!
//! ## Failure Model
//!
//! Stepping never fails. Out-of-range parameters are clamped inside each
//! model, the solver returns its best bounded estimate with a `converged`
//! flag, unknown scenario ids run a generic source/load model and
//! non-finite samples are dropped before they reach the history.

pub mod engine;
pub mod error;
pub mod expr;
pub mod models;
pub mod scenario;
pub mod solver;

#[cfg(feature = "cli")]
pub mod output;

// Re-export main types for convenience
pub use engine::{Simulator, SimulatorConfig};
pub use error::{LabSimError, Result};
pub use scenario::{Params, Registry, Sample};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmLab;

/// Default rolling history length in samples
pub const DEFAULT_HISTORY_CAPACITY: usize = 720;

/// Boltzmann constant (J/K)
pub const BOLTZMANN: f64 = 1.380_649e-23;

/// Elementary charge (C)
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;
