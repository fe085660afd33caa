//! Scheduling, history and sweep machinery around the scenario models.
//!
//! ## Step cycle
//!
//! ```text
//! host timestamp -> Clock -> Simulator -> ScenarioEntry::model
//!                                      -> validate_sample
//!                                      -> HistoryBuffer (continuous)
//!                                         or Sweep curve (sweep mode)
//! ```
//!
//! Everything here is single-threaded and synchronous. Each [`Simulator`]
//! owns its own state, so several instances can run side by side.

mod clock;
mod history;
pub mod projection;
mod simulator;
mod sweep;

pub use clock::Clock;
pub use history::HistoryBuffer;
pub use simulator::{Simulator, SimulatorConfig};
pub use sweep::{run_sweep, Sweep, SweepCurve, SweepPoint, SweepRange};

/// Default minimum time between clock firings (s).
pub const DEFAULT_MIN_INTERVAL: f64 = 0.08;
