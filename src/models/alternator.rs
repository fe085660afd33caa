//! Synchronizing an alternator to an infinite bus.
//!
//! The phase difference between machine and bus drifts at the slip
//! frequency, `d(theta)/dt = (f_alt - f_bus) * 360` deg/s. The breaker may
//! be closed once frequency and phase both match.

use num_complex::Complex64;

use crate::scenario::{sanitize_dt, Params, Sample, ScenarioState};

/// Largest frequency mismatch accepted for synchronizing (Hz).
pub const MAX_FREQUENCY_ERROR: f64 = 0.05;

/// Largest phase mismatch accepted for synchronizing (degrees).
pub const MAX_PHASE_ERROR: f64 = 5.0;

/// Wrap an angle in degrees into `(-180, 180]`.
pub fn wrap_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Whether frequency and phase are both inside the synchronizing window.
pub fn is_synchronized(delta_f: f64, phase_deg: f64) -> bool {
    delta_f.abs() < MAX_FREQUENCY_ERROR && phase_deg.abs() < MAX_PHASE_ERROR
}

/// One step of the synchroscope.
///
/// `I` is the current that would circulate through `Xs` if the breaker
/// were closed now; `lamp` is the dark-lamp brightness in `[0, 1]`.
pub fn synchronize(params: &Params, state: &mut ScenarioState, dt: f64) -> Sample {
    let f_alt = params.clamped("f_alt", 50.2, 0.0, 1e4);
    let f_bus = params.clamped("f_bus", 50.0, 0.0, 1e4);
    let v_alt = params.clamped("V_alt", 230.0, 0.0, 1e7);
    let v_bus = params.clamped("V_bus", 230.0, 0.0, 1e7);
    let xs = params.positive("Xs", 2.0);
    let v_tol = params.clamped("v_tol", 0.02, 0.0, 1.0);

    if !state.sync.initialized {
        state.sync.phase_drift = wrap_degrees(params.get_or("phase0", 120.0));
        state.sync.initialized = true;
    }

    let dt = sanitize_dt(dt);
    state.advance_time(dt);

    let delta_f = f_alt - f_bus;
    state.sync.phase_drift = wrap_degrees(state.sync.phase_drift + delta_f * 360.0 * dt);
    let phase = state.sync.phase_drift;

    let dv = (Complex64::from_polar(v_alt, phase.to_radians()) - Complex64::new(v_bus, 0.0)).norm();
    let lamp = if v_alt + v_bus > 0.0 {
        dv / (v_alt + v_bus)
    } else {
        0.0
    };
    let i = dv / xs;
    let voltage_matched = (v_alt - v_bus).abs() <= v_tol * v_bus.max(1e-9);

    Sample::from_vi(v_alt, i)
        .with("delta_f", delta_f)
        .with("phase_deg", phase)
        .with("dV", dv)
        .with("lamp", lamp)
        .with("voltage_matched", voltage_matched)
        .with("synchronized", is_synchronized(delta_f, phase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wrap_degrees() {
        assert_relative_eq!(wrap_degrees(190.0), -170.0);
        assert_relative_eq!(wrap_degrees(-190.0), 170.0);
        assert_relative_eq!(wrap_degrees(180.0), 180.0);
        assert_relative_eq!(wrap_degrees(-180.0), 180.0);
        assert_relative_eq!(wrap_degrees(725.0), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sync_window_needs_both_conditions() {
        assert!(is_synchronized(0.01, 2.0));
        assert!(!is_synchronized(0.1, 2.0));
        assert!(!is_synchronized(0.01, 6.0));
    }

    #[test]
    fn test_phase_drifts_at_slip_frequency() {
        let params = Params::new()
            .with("f_alt", 50.5)
            .with("f_bus", 50.0)
            .with("phase0", 0.0);
        let mut state = ScenarioState::default();
        let s = synchronize(&params, &mut state, 0.1);
        // 0.5 Hz * 360 deg * 0.1 s
        assert_relative_eq!(s.number("phase_deg").unwrap(), 18.0, epsilon = 1e-9);
        let s = synchronize(&params, &mut state, 0.1);
        assert_relative_eq!(s.number("phase_deg").unwrap(), 36.0, epsilon = 1e-9);
    }

    #[test]
    fn test_synchronized_when_matched() {
        let params = Params::new()
            .with("f_alt", 50.02)
            .with("f_bus", 50.0)
            .with("phase0", 0.0);
        let mut state = ScenarioState::default();
        let s = synchronize(&params, &mut state, 0.1);
        assert_eq!(s.flag("synchronized"), Some(true));
        assert_eq!(s.flag("voltage_matched"), Some(true));
        assert!(s.number("lamp").unwrap() < 0.01);
    }

    #[test]
    fn test_opposite_phase_lights_lamps_fully() {
        let params = Params::new()
            .with("f_alt", 50.0)
            .with("f_bus", 50.0)
            .with("phase0", 180.0);
        let s = synchronize(&params, &mut ScenarioState::default(), 0.1);
        assert_relative_eq!(s.number("lamp").unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(s.i, 460.0 / 2.0, epsilon = 1e-9);
        assert_eq!(s.flag("synchronized"), Some(false));
    }
}
