//! Scenario data model and registry.
//!
//! A scenario is one named physical experiment. This module holds the
//! types every scenario model speaks ([`Sample`], [`Params`],
//! [`ScenarioState`]) and the [`Registry`] that maps scenario ids to their
//! step functions.

mod params;
mod registry;
mod state;
mod types;
mod validate;

pub use params::{nonzero, unit_clamp, Params, MIN_DENOMINATOR};
pub use registry::{resolve_model, ModelFn, Registry, ScenarioEntry, FALLBACK_ID};
pub use state::{sanitize_dt, MotorState, ScenarioState, SyncState, WaveformState, DEFAULT_NOISE_SEED};
pub use types::{ExtraValue, Sample};
pub use validate::validate_sample;
