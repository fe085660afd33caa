//! Function generator / oscilloscope source.
//!
//! Produces one value per tick at the current model time. A resistor `R`
//! across the output gives the current trace.

use std::f64::consts::{E, PI};

use rand::Rng;

use crate::scenario::{Params, Sample, ScenarioState};

/// Waveform shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaveShape {
    /// Sine wave
    #[default]
    Sine,
    /// Square wave, +A for the first half period
    Square,
    /// Triangle wave, starts at 0 rising
    Triangle,
    /// Pulse train, +A for `duty` of the period and 0 otherwise
    Pulse,
    /// Rising ramp from -A to +A
    Sawtooth,
    /// User expression
    Custom,
}

impl WaveShape {
    /// Parse the numeric `shape` parameter.
    pub fn from_code(code: f64) -> Self {
        if !code.is_finite() {
            return Self::Sine;
        }
        match code.round() as i64 {
            1 => Self::Square,
            2 => Self::Triangle,
            3 => Self::Pulse,
            4 => Self::Sawtooth,
            5 => Self::Custom,
            _ => Self::Sine,
        }
    }

    /// Parse shape from string.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sine" | "sin" => Some(Self::Sine),
            "square" | "sq" => Some(Self::Square),
            "triangle" | "tri" => Some(Self::Triangle),
            "pulse" => Some(Self::Pulse),
            "sawtooth" | "saw" => Some(Self::Sawtooth),
            "custom" | "expr" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn code(&self) -> f64 {
        match self {
            Self::Sine => 0.0,
            Self::Square => 1.0,
            Self::Triangle => 2.0,
            Self::Pulse => 3.0,
            Self::Sawtooth => 4.0,
            Self::Custom => 5.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sine => "sine",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Pulse => "pulse",
            Self::Sawtooth => "sawtooth",
            Self::Custom => "custom",
        }
    }

    /// Unit-amplitude value at cycle position `phase` in `[0, 1)`.
    pub fn unit_value(&self, phase: f64, duty: f64) -> f64 {
        match self {
            Self::Sine | Self::Custom => (2.0 * PI * phase).sin(),
            Self::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Self::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
            Self::Pulse => {
                if phase < duty {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Sawtooth => 2.0 * phase - 1.0,
        }
    }
}

/// Generate one waveform sample.
///
/// `phase` is an offset in degrees. Noise is uniform in `[-noise, noise]`
/// and drawn from the state's seeded generator.
pub fn generate(params: &Params, state: &mut ScenarioState, dt: f64) -> Sample {
    let shape = WaveShape::from_code(params.get_or("shape", 0.0));
    let amplitude = params.clamped("A", 5.0, -1e6, 1e6);
    let f = params.clamped("f", 1.0, 0.0, 1e6);
    let offset = params.clamped("offset", 0.0, -1e6, 1e6);
    let duty = params.fraction("duty", 0.5);
    let noise = params.clamped("noise", 0.0, 0.0, 1e6);
    let r = params.positive("R", 1000.0);
    let phase_deg = params.clamped("phase", 0.0, -1e6, 1e6);

    state.advance_time(dt);
    let t = state.time;
    let cycle = (f * t + phase_deg / 360.0).rem_euclid(1.0);

    let value = match (&shape, &state.waveform.expression) {
        (WaveShape::Custom, Some(expr)) => {
            let w = 2.0 * PI * f;
            expr.eval(&|name| match name {
                "t" => Some(t),
                "f" => Some(f),
                "A" => Some(amplitude),
                "w" => Some(w),
                "pi" => Some(PI),
                "e" => Some(E),
                other => params.get(other),
            })
        }
        _ => amplitude * shape.unit_value(cycle, duty),
    };

    let jitter = if noise > 0.0 {
        state.rng.gen_range(-noise..=noise)
    } else {
        0.0
    };

    let v = offset + value + jitter;
    Sample::from_vi(v, v / r)
        .with("t", t)
        .with("shape", shape.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr;
    use approx::assert_relative_eq;

    fn at_quarter_periods(params: &Params) -> Vec<f64> {
        let mut state = ScenarioState::default();
        (0..4).map(|_| generate(params, &mut state, 0.25).v).collect()
    }

    #[test]
    fn test_sine() {
        // f = 1 Hz, sampled at t = 0.25, 0.5, 0.75, 1.0
        let v = at_quarter_periods(&Params::new().with("A", 2.0));
        assert_relative_eq!(v[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(v[1], 0.0, epsilon = 1e-9);
        assert_relative_eq!(v[2], -2.0, epsilon = 1e-9);
        assert_relative_eq!(v[3], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_triangle() {
        let v = at_quarter_periods(&Params::new().with("shape", 2.0).with("A", 1.0));
        assert_relative_eq!(v[0], 1.0, epsilon = 1e-9);
        assert_relative_eq!(v[1], 0.0, epsilon = 1e-9);
        assert_relative_eq!(v[2], -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pulse_duty() {
        let params = Params::new().with("shape", 3.0).with("duty", 0.3).with("A", 1.0);
        let mut state = ScenarioState::default();
        let highs = (0..100)
            .filter(|_| generate(&params, &mut state, 0.01).v > 0.5)
            .count();
        assert!((29..=31).contains(&highs));
    }

    #[test]
    fn test_custom_expression() {
        let mut state = ScenarioState::default();
        state.waveform.expression = Some(expr::parse("A * t + gain").unwrap());
        let params = Params::new().with("shape", 5.0).with("gain", 1.0);
        let s = generate(&params, &mut state, 0.5);
        assert_relative_eq!(s.v, 5.0 * 0.5 + 1.0);
        assert_eq!(s.text("shape"), Some("custom"));
    }

    #[test]
    fn test_custom_without_expression_is_sine() {
        let params = Params::new().with("shape", 5.0).with("A", 1.0);
        let s = generate(&params, &mut ScenarioState::default(), 0.25);
        assert_relative_eq!(s.v, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_noise_is_bounded_and_seeded() {
        let params = Params::new().with("A", 0.0).with("noise", 0.5);
        let mut a = ScenarioState::new(42);
        let mut b = ScenarioState::new(42);
        for _ in 0..50 {
            let va = generate(&params, &mut a, 0.1).v;
            let vb = generate(&params, &mut b, 0.1).v;
            assert!(va.abs() <= 0.5);
            assert_eq!(va, vb);
        }
    }

    #[test]
    fn test_current_through_load() {
        let params = Params::new().with("A", 0.0).with("offset", 3.0).with("R", 1500.0);
        let s = generate(&params, &mut ScenarioState::default(), 0.1);
        assert_relative_eq!(s.i, 0.002);
    }
}
