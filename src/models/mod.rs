//! Per-scenario physics models.
//!
//! Every model has the same shape,
//!
//! ```text
//! fn(&Params, &mut ScenarioState, dt) -> Sample
//! ```
//!
//! and is registered under a scenario id in [`crate::scenario::Registry`].
//! Models are total: they coerce missing or non-finite parameters to
//! defaults and keep denominators away from zero, so they always return a
//! sample. Whatever still comes out non-finite is dropped by the
//! simulator.
//!
//! | Module | Scenarios |
//! |--------|-----------|
//! | [`resistive`] | Ohm's law, series/parallel |
//! | [`rlc`] | series RLC resonance |
//! | [`bridge`] | Wheatstone, Maxwell, Wien |
//! | [`transformer`] | open-circuit, short-circuit, load tests |
//! | [`dc_motor`] | DC shunt motor run-up |
//! | [`induction`] | no-load, blocked-rotor, torque-slip |
//! | [`synchronous`] | synchronous motor V-curve |
//! | [`alternator`] | alternator synchronizing |
//! | [`waveform`] | function generator / oscilloscope |
//! | [`footprint`] | carbon footprint |
//! | [`diode`], [`transistor`] | nonlinear operating points |
//! | [`fallback`] | anything unrecognized |

pub mod alternator;
pub mod bridge;
pub mod dc_motor;
pub mod diode;
pub mod fallback;
pub mod footprint;
pub mod induction;
pub mod resistive;
pub mod rlc;
pub mod synchronous;
pub mod transformer;
pub mod transistor;
pub mod waveform;
