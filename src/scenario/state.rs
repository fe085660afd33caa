//! Mutable per-instance scenario state.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::expr::Expr;

/// Default seed for the noise generator.
pub const DEFAULT_NOISE_SEED: u64 = 0x1AB5_EED5;

/// Mechanical state of the DC shunt motor.
#[derive(Debug, Clone, Default)]
pub struct MotorState {
    /// Angular speed (rad/s)
    pub omega: f64,
}

/// Phase tracking for alternator synchronization.
#[derive(Debug, Clone, Default)]
pub struct SyncState {
    /// Accumulated phase difference between alternator and bus (degrees)
    pub phase_drift: f64,
    /// Whether the starting phase offset has been applied
    pub initialized: bool,
}

/// Waveform generator state.
#[derive(Debug, Clone, Default)]
pub struct WaveformState {
    /// Compiled custom expression, if the host supplied one
    pub expression: Option<Expr>,
}

/// Everything a scenario remembers between steps.
///
/// Owned by exactly one simulator; replaced wholesale on reset or
/// scenario switch.
#[derive(Debug, Clone)]
pub struct ScenarioState {
    /// Model time accumulated from elapsed step durations (s)
    pub time: f64,
    pub motor: MotorState,
    pub sync: SyncState,
    pub waveform: WaveformState,
    /// Noise source, seeded so runs are reproducible
    pub rng: StdRng,
    seed: u64,
}

impl Default for ScenarioState {
    fn default() -> Self {
        Self::new(DEFAULT_NOISE_SEED)
    }
}

impl ScenarioState {
    /// Create a fresh state with the given noise seed.
    pub fn new(seed: u64) -> Self {
        Self {
            time: 0.0,
            motor: MotorState::default(),
            sync: SyncState::default(),
            waveform: WaveformState::default(),
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this state was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// A fresh state with the same seed, keeping the custom expression.
    ///
    /// The expression is host configuration rather than physical memory.
    pub fn fresh(&self) -> Self {
        let mut state = Self::new(self.seed);
        state.waveform.expression = self.waveform.expression.clone();
        state
    }

    /// Advance model time by `dt` seconds. Negative or non-finite
    /// durations are ignored.
    pub fn advance_time(&mut self, dt: f64) -> f64 {
        let dt = sanitize_dt(dt);
        self.time += dt;
        dt
    }
}

/// Clamp an elapsed duration to a finite, non-negative value.
pub fn sanitize_dt(dt: f64) -> f64 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        0.0
    }
}
