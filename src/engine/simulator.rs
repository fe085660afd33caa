//! Main simulator interface.
//!
//! A [`Simulator`] owns one running scenario instance: its parameters, its
//! mutable physics state, the rolling history, an optional in-flight sweep
//! and the step clock. Hosts drive it with [`Simulator::tick`] (wall-clock
//! timestamps) or [`Simulator::step`] (explicit durations) and read results
//! back through the accessors.

use serde::Deserialize;

use crate::error::{LabSimError, Result};
use crate::expr;
use crate::scenario::{
    sanitize_dt, validate_sample, Params, Registry, Sample, ScenarioEntry, ScenarioState,
    DEFAULT_NOISE_SEED,
};
use crate::DEFAULT_HISTORY_CAPACITY;

use super::clock::Clock;
use super::history::HistoryBuffer;
use super::projection;
use super::sweep::{Sweep, SweepCurve, SweepPoint, SweepRange};
use super::DEFAULT_MIN_INTERVAL;

/// Configuration for the simulator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Minimum wall-clock time between steps (s).
    pub min_interval: f64,
    /// Samples kept in the rolling history.
    pub history_capacity: usize,
    /// Seed for the per-scenario noise generator.
    pub noise_seed: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_MIN_INTERVAL,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            noise_seed: DEFAULT_NOISE_SEED,
        }
    }
}

impl SimulatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum interval between steps (in seconds).
    pub fn with_min_interval(mut self, min_interval: f64) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// Set the history capacity.
    pub fn with_history_capacity(mut self, history_capacity: usize) -> Self {
        self.history_capacity = history_capacity;
        self
    }

    /// Set the noise seed.
    pub fn with_noise_seed(mut self, noise_seed: u64) -> Self {
        self.noise_seed = noise_seed;
        self
    }

    /// Check the configuration for values the clock cannot use.
    pub fn validate(&self) -> Result<()> {
        if !self.min_interval.is_finite() || self.min_interval < 0.0 {
            return Err(LabSimError::invalid_param(format!(
                "min_interval must be a non-negative number of seconds, got {}",
                self.min_interval
            )));
        }
        if self.history_capacity == 0 {
            return Err(LabSimError::invalid_param("history_capacity must be at least 1"));
        }
        Ok(())
    }
}

/// One running scenario instance.
#[derive(Debug, Clone)]
pub struct Simulator {
    registry: Registry,
    config: SimulatorConfig,
    /// Id the host asked for, which may be unknown to the registry
    scenario_id: String,
    entry: ScenarioEntry,
    params: Params,
    state: ScenarioState,
    history: HistoryBuffer,
    sweep: Option<Sweep>,
    clock: Clock,
    next_index: u64,
    latest: Option<Sample>,
}

impl Simulator {
    /// Create a simulator for a built-in scenario with default configuration.
    pub fn new(scenario_id: &str) -> Self {
        Self::with_config(scenario_id, SimulatorConfig::default())
    }

    /// Create a simulator for a built-in scenario with custom configuration.
    pub fn with_config(scenario_id: &str, config: SimulatorConfig) -> Self {
        Self::with_registry(scenario_id, Registry::builtin(), config)
    }

    /// Create a simulator over a caller-supplied registry.
    pub fn with_registry(scenario_id: &str, registry: Registry, config: SimulatorConfig) -> Self {
        let entry = *registry.resolve(scenario_id);
        if entry.id != scenario_id {
            tracing::warn!(scenario = scenario_id, "unknown scenario, using fallback model");
        }
        Self {
            entry,
            scenario_id: scenario_id.to_string(),
            params: Params::new(),
            state: ScenarioState::new(config.noise_seed),
            history: HistoryBuffer::new(config.history_capacity),
            sweep: None,
            clock: Clock::new(config.min_interval),
            next_index: 0,
            latest: None,
            registry,
            config,
        }
    }

    /// Id of the active scenario as requested by the host.
    pub fn scenario_id(&self) -> &str {
        &self.scenario_id
    }

    /// Registry entry the active scenario resolved to.
    pub fn entry(&self) -> &ScenarioEntry {
        &self.entry
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Set one parameter. Takes effect on the next step.
    pub fn set_param(&mut self, key: &str, value: f64) {
        self.params.set(key, value);
    }

    /// Merge a parameter set over the current one.
    pub fn set_params(&mut self, params: &Params) {
        self.params.extend(params);
    }

    /// Replace the parameter set.
    pub fn replace_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Switch to another scenario with an empty parameter set.
    pub fn switch_scenario(&mut self, scenario_id: &str) {
        self.switch_scenario_with(scenario_id, Params::new());
    }

    /// Switch to another scenario.
    ///
    /// State, history, sweep, sample index and clock reference are all
    /// replaced together, so nothing from the previous scenario leaks into
    /// the new one. The custom waveform expression is kept.
    pub fn switch_scenario_with(&mut self, scenario_id: &str, params: Params) {
        let entry = *self.registry.resolve(scenario_id);
        tracing::info!(
            from = %self.scenario_id,
            to = scenario_id,
            model = entry.id,
            "switching scenario"
        );

        let state = self.state.fresh();
        let history = HistoryBuffer::new(self.config.history_capacity);

        self.scenario_id = scenario_id.to_string();
        self.entry = entry;
        self.params = params;
        self.state = state;
        self.history = history;
        self.sweep = None;
        self.next_index = 0;
        self.latest = None;
        self.clock.reset();
    }

    /// Restart the active scenario from rest, keeping its parameters.
    pub fn reset(&mut self) {
        tracing::debug!(scenario = %self.scenario_id, "reset");
        self.state = self.state.fresh();
        self.history = HistoryBuffer::new(self.config.history_capacity);
        self.sweep = None;
        self.next_index = 0;
        self.latest = None;
        self.clock.reset();
    }

    /// Stop ticks from stepping. State and history are kept.
    pub fn pause(&mut self) {
        self.clock.pause();
    }

    /// Resume ticking; the first tick afterwards only rebases the clock.
    pub fn resume(&mut self) {
        self.clock.resume();
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Build a sweep range over the scenario's default sweep parameter.
    pub fn default_sweep(&self, from: f64, to: f64, steps: usize) -> Result<SweepRange> {
        SweepRange::new(self.entry.sweep_param, from, to, steps)
    }

    /// Start a sweep, replacing any sweep in progress.
    pub fn start_sweep(&mut self, range: SweepRange) {
        tracing::info!(
            scenario = %self.scenario_id,
            param = range.param(),
            from = range.from(),
            to = range.to(),
            steps = range.steps(),
            "starting sweep"
        );
        self.sweep = Some(Sweep::new(range));
    }

    /// Stop the sweep and return the points it recorded.
    pub fn stop_sweep(&mut self) -> Option<SweepCurve> {
        self.sweep.take().map(Sweep::into_curve)
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweep.is_some()
    }

    /// Whether a sweep is active and has evaluated all its points.
    pub fn sweep_complete(&self) -> bool {
        self.sweep.as_ref().map_or(false, Sweep::is_complete)
    }

    /// Points of the active sweep, empty when not sweeping.
    pub fn sweep_curve(&self) -> &[SweepPoint] {
        self.sweep.as_ref().map_or(&[], Sweep::curve)
    }

    /// Compile and install a custom waveform expression.
    ///
    /// On error the previous expression stays in place.
    pub fn set_expression(&mut self, input: &str) -> Result<()> {
        let parsed = expr::parse(input)?;
        tracing::debug!(expression = input, "custom expression installed");
        self.state.waveform.expression = Some(parsed);
        Ok(())
    }

    /// Remove the custom expression; the custom shape falls back to a sine.
    pub fn clear_expression(&mut self) {
        self.state.waveform.expression = None;
    }

    /// Offer a wall-clock timestamp (s). Steps if the clock fires.
    ///
    /// Returns the new sample, if one was produced.
    pub fn tick(&mut self, now: f64) -> Option<&Sample> {
        let dt = self.clock.advance(now)?;
        self.step(dt)
    }

    /// Advance by an explicit duration, bypassing the clock.
    ///
    /// In continuous mode the sample goes into the history; in sweep mode
    /// the sweep records it instead. Non-finite samples are dropped.
    pub fn step(&mut self, dt: f64) -> Option<&Sample> {
        let dt = sanitize_dt(dt);
        let model = self.entry.model;

        let produced = match self.sweep.as_mut() {
            Some(sweep) => {
                let was_complete = sweep.is_complete();
                let model_dt = if self.entry.time_dependent { dt } else { 0.0 };
                let sample = sweep.step(model, &self.params, &mut self.state, model_dt);
                if !was_complete && sweep.is_complete() {
                    tracing::info!(
                        scenario = %self.scenario_id,
                        points = sweep.curve().len(),
                        "sweep complete"
                    );
                }
                sample
            }
            None => {
                let mut sample = model(&self.params, &mut self.state, dt);
                validate_sample(&mut sample).then_some(sample)
            }
        };

        let Some(mut sample) = produced else {
            tracing::debug!(scenario = %self.scenario_id, "dropped non-finite sample");
            return None;
        };

        sample.index = self.next_index;
        self.next_index += 1;
        if self.sweep.is_none() {
            self.history.push(sample.clone());
        }
        self.latest = Some(sample);
        self.latest.as_ref()
    }

    /// Most recent accepted sample.
    pub fn latest(&self) -> Option<&Sample> {
        self.latest.as_ref()
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Model time of the active scenario (s).
    pub fn time(&self) -> f64 {
        self.state.time
    }

    /// CSV column names for the active scenario.
    pub fn csv_header(&self) -> Vec<String> {
        projection::csv_header(&self.entry)
    }

    /// CSV rendering of the history.
    pub fn history_csv(&self) -> String {
        projection::to_csv(&self.entry, self.history.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_continuous_steps_fill_history() {
        let mut sim = Simulator::new("ohms_law");
        sim.set_param("Vs", 12.0);
        sim.set_param("R", 6.0);
        for _ in 0..5 {
            sim.step(0.1);
        }
        assert_eq!(sim.history().len(), 5);
        let latest = sim.latest().unwrap();
        assert_eq!(latest.index, 4);
        assert_relative_eq!(latest.i, 2.0);
    }

    #[test]
    fn test_tick_uses_clock() {
        let mut sim = Simulator::new("waveform");
        assert!(sim.tick(0.0).is_none());
        assert!(sim.tick(0.05).is_none());
        assert!(sim.tick(0.1).is_some());
        assert_relative_eq!(sim.time(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_slow_ticks_keep_model_time_in_step_with_wall_time() {
        let mut sim = Simulator::new("waveform");
        sim.tick(0.0);
        for second in 1..=10 {
            assert!(sim.tick(second as f64).is_some());
        }
        assert_relative_eq!(sim.time(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pause_keeps_history() {
        let mut sim = Simulator::new("dc_motor");
        sim.tick(0.0);
        sim.tick(0.1);
        sim.tick(0.2);
        assert_eq!(sim.history().len(), 2);

        sim.pause();
        assert!(sim.tick(3.0).is_none());
        assert_eq!(sim.history().len(), 2);

        sim.resume();
        assert!(sim.tick(10.0).is_none());
        let t_before = sim.time();
        sim.tick(10.1);
        assert_relative_eq!(sim.time() - t_before, 0.1, epsilon = 1e-9);
        assert_eq!(sim.latest().unwrap().index, 2);
    }

    #[test]
    fn test_switch_replaces_everything() {
        let mut sim = Simulator::new("dc_motor");
        sim.set_param("Vs", 110.0);
        for _ in 0..10 {
            sim.step(0.1);
        }
        sim.start_sweep(sim.default_sweep(0.0, 10.0, 5).unwrap());

        sim.switch_scenario("ohms_law");
        assert_eq!(sim.entry().id, "ohms_law");
        assert!(sim.history().is_empty());
        assert!(sim.latest().is_none());
        assert!(!sim.is_sweeping());
        assert!(!sim.params().contains("Vs"));
        assert_eq!(sim.time(), 0.0);

        let s = sim.step(0.1).unwrap();
        assert_eq!(s.index, 0);
        assert!(s.extra.contains_key("R"));
    }

    #[test]
    fn test_unknown_scenario_falls_back() {
        let mut sim = Simulator::new("does-not-exist");
        assert_eq!(sim.scenario_id(), "does-not-exist");
        sim.set_param("Vs", 3.0);
        sim.set_param("load", 2.0);
        let s = sim.step(0.1).unwrap();
        assert_relative_eq!(s.p, 6.0);
    }

    #[test]
    fn test_sweep_mode_skips_history() {
        let mut sim = Simulator::new("ohms_law");
        sim.set_param("R", 10.0);
        sim.start_sweep(SweepRange::new("Vs", 0.0, 10.0, 3).unwrap());
        for _ in 0..5 {
            sim.step(0.1);
        }
        assert!(sim.history().is_empty());
        assert!(sim.sweep_complete());
        let xs: Vec<f64> = sim.sweep_curve().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 10.0]);
        assert_relative_eq!(sim.latest().unwrap().i, 1.0);

        let curve = sim.stop_sweep().unwrap();
        assert_eq!(curve.len(), 3);
        assert!(sim.sweep_curve().is_empty());
    }

    #[test]
    fn test_non_time_dependent_sweep_gets_zero_dt() {
        let mut sim = Simulator::new("ohms_law");
        sim.start_sweep(sim.default_sweep(1.0, 2.0, 2).unwrap());
        sim.step(0.3);
        assert_eq!(sim.time(), 0.0);

        let mut sim = Simulator::new("waveform");
        sim.start_sweep(sim.default_sweep(1.0, 2.0, 2).unwrap());
        sim.step(0.3);
        assert_relative_eq!(sim.time(), 0.3);
    }

    #[test]
    fn test_non_finite_samples_are_dropped() {
        let mut sim = Simulator::new("waveform");
        sim.set_param("shape", 5.0);
        sim.set_expression("unknown_var * 2").unwrap();
        assert!(sim.step(0.1).is_none());
        assert!(sim.history().is_empty());

        sim.set_expression("A").unwrap();
        assert_relative_eq!(sim.step(0.1).unwrap().v, 5.0);
        assert_eq!(sim.latest().unwrap().index, 0);
    }

    #[test]
    fn test_bad_expression_keeps_previous() {
        let mut sim = Simulator::new("waveform");
        sim.set_param("shape", 5.0);
        sim.set_expression("2 * A").unwrap();
        assert!(sim.set_expression("2 * (A").is_err());
        assert_relative_eq!(sim.step(0.1).unwrap().v, 10.0);
    }

    #[test]
    fn test_cleared_expression_falls_back_to_sine() {
        let mut custom = Simulator::new("waveform");
        custom.set_param("shape", 5.0);
        custom.set_expression("7").unwrap();
        assert_relative_eq!(custom.step(0.1).unwrap().v, 7.0);
        custom.clear_expression();

        let mut sine = Simulator::new("waveform");
        sine.step(0.1);
        let expected = sine.step(0.1).unwrap().v;
        assert_relative_eq!(custom.step(0.1).unwrap().v, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_reset_keeps_params_and_expression() {
        let mut sim = Simulator::new("waveform");
        sim.set_param("shape", 5.0);
        sim.set_expression("A + 1").unwrap();
        sim.step(0.2);
        sim.reset();
        assert!(sim.history().is_empty());
        assert_eq!(sim.time(), 0.0);
        assert_relative_eq!(sim.step(0.1).unwrap().v, 6.0);
    }

    #[test]
    fn test_history_capacity_from_config() {
        let config = SimulatorConfig::new().with_history_capacity(4);
        let mut sim = Simulator::with_config("ohms_law", config);
        for _ in 0..10 {
            sim.step(0.1);
        }
        assert_eq!(sim.history().len(), 4);
        assert_eq!(sim.history().latest().unwrap().index, 9);
    }

    #[test]
    fn test_config_from_json() {
        let config: SimulatorConfig =
            serde_json::from_str(r#"{ "history_capacity": 10, "noise_seed": 3 }"#).unwrap();
        assert_eq!(config.history_capacity, 10);
        assert_eq!(config.noise_seed, 3);
        assert_eq!(config.min_interval, DEFAULT_MIN_INTERVAL);
        assert!(config.validate().is_ok());
        assert!(SimulatorConfig::new().with_min_interval(-1.0).validate().is_err());
    }
}
