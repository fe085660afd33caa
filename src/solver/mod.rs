//! Operating-point solver for nonlinear two-terminal loops.
//!
//! Diode and transistor scenarios reduce to a single series loop,
//!
//! ```text
//! f(v) = v + R * device(v) - Vsupply = 0
//! ```
//!
//! where `device(v)` is the current the device draws at terminal voltage
//! `v`. The loop is monotonic for every device model here, so plain
//! bisection always lands on the operating point once a sign change is
//! bracketed, and its fixed iteration budget bounds the work per tick.

mod bisection;
mod device;

pub use bisection::{solve_loop, Bisection, Bracket, Solution};
pub use device::{shockley, thermal_voltage, two_region_current, TransistorLimits};

/// Default convergence tolerance on `|f(v)|`.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Default bisection iteration budget.
pub const DEFAULT_MAX_ITERATIONS: usize = 60;

/// Exponent clamp for the Shockley relation, keeps `exp` finite.
pub const MAX_EXPONENT: f64 = 60.0;
