//! Device current models used inside solver loops.
//!
//! Diode uses the Shockley diode equation:
//!   I = Is * (exp(V / (n * Vt)) - 1)
//!
//! with the exponent clamped so the loop function stays finite for any
//! trial voltage the bisection may probe.

use super::MAX_EXPONENT;
use crate::{BOLTZMANN, ELEMENTARY_CHARGE};

/// Thermal voltage `kT/q` at absolute temperature `t` (K).
pub fn thermal_voltage(t: f64) -> f64 {
    BOLTZMANN * t / ELEMENTARY_CHARGE
}

/// Shockley diode current at forward voltage `v`.
pub fn shockley(v: f64, is: f64, n: f64, vt: f64) -> f64 {
    let exponent = (v / (n * vt)).clamp(-MAX_EXPONENT, MAX_EXPONENT);
    is * (exponent.exp() - 1.0)
}

/// Output characteristic of a simplified common-emitter stage.
#[derive(Debug, Clone, Copy)]
pub struct TransistorLimits {
    /// Current gain
    pub beta: f64,
    /// Collector-emitter saturation voltage
    pub vce_sat: f64,
    /// Early voltage, 0 = infinite
    pub va: f64,
}

impl TransistorLimits {
    fn early_factor(&self, vce: f64) -> f64 {
        if self.va > 0.0 {
            1.0 + vce / self.va
        } else {
            1.0
        }
    }
}

/// Collector current at `vce` for base current `ib`.
///
/// Above `vce_sat` the stage is in its gain region, `Ic = beta Ib (1 +
/// Vce/VA)`. Below it the current ramps linearly to zero so the curve stays
/// continuous and monotonic in `vce`.
pub fn two_region_current(vce: f64, ib: f64, limits: &TransistorLimits) -> f64 {
    if ib <= 0.0 {
        return 0.0;
    }
    let sat = limits.vce_sat.max(1e-6);
    if vce >= sat {
        limits.beta * ib * limits.early_factor(vce)
    } else {
        limits.beta * ib * limits.early_factor(sat) * vce / sat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_thermal_voltage_room_temperature() {
        assert_relative_eq!(thermal_voltage(300.0), 0.025852, epsilon = 1e-5);
    }

    #[test]
    fn test_shockley_stays_finite() {
        let vt = thermal_voltage(300.0);
        assert!(shockley(1e6, 1e-9, 1.0, vt).is_finite());
        assert_relative_eq!(shockley(-1e6, 1e-9, 1.0, vt), -1e-9, epsilon = 1e-20);
        assert_eq!(shockley(0.0, 1e-9, 1.0, vt), 0.0);
    }

    #[test]
    fn test_two_region_is_continuous() {
        let limits = TransistorLimits {
            beta: 100.0,
            vce_sat: 0.2,
            va: 100.0,
        };
        let below = two_region_current(0.2 - 1e-12, 1e-5, &limits);
        let above = two_region_current(0.2, 1e-5, &limits);
        assert_relative_eq!(below, above, epsilon = 1e-12);
        assert_eq!(two_region_current(5.0, 0.0, &limits), 0.0);
    }
}
