//! Parameter sweeps.
//!
//! A sweep steps one parameter across an evenly spaced inclusive range and
//! records the model's current and power at each point, producing an I-V,
//! I-f or similar characteristic curve.

use serde::{Deserialize, Serialize};

use crate::error::{LabSimError, Result};
use crate::scenario::{validate_sample, ModelFn, Params, Sample, ScenarioState};

/// One point of a sweep curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Swept parameter value
    pub x: f64,
    /// Current at that value
    pub y: f64,
    /// Power at that value
    pub p: f64,
}

/// Points in sweep order.
pub type SweepCurve = Vec<SweepPoint>;

/// An inclusive, evenly spaced parameter range.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRange {
    param: String,
    from: f64,
    to: f64,
    steps: usize,
}

impl SweepRange {
    /// Create a range of `steps` points from `from` to `to` inclusive.
    ///
    /// `to` may be below `from` for a descending sweep. A single step
    /// evaluates `from` only.
    pub fn new(param: impl Into<String>, from: f64, to: f64, steps: usize) -> Result<Self> {
        let param = param.into();
        if param.trim().is_empty() {
            return Err(LabSimError::invalid_sweep(param, "parameter name is empty"));
        }
        if !from.is_finite() || !to.is_finite() {
            return Err(LabSimError::invalid_sweep(param, "bounds must be finite"));
        }
        if steps == 0 {
            return Err(LabSimError::invalid_sweep(param, "at least one step is required"));
        }
        if steps > 1 && from == to {
            return Err(LabSimError::invalid_sweep(
                param,
                "bounds must differ when sweeping more than one step",
            ));
        }
        Ok(Self {
            param,
            from,
            to,
            steps,
        })
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn from(&self) -> f64 {
        self.from
    }

    pub fn to(&self) -> f64 {
        self.to
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Signed distance between neighbouring points.
    pub fn step_size(&self) -> f64 {
        if self.steps > 1 {
            (self.to - self.from) / (self.steps - 1) as f64
        } else {
            0.0
        }
    }

    /// Parameter value at point `k`. The last point is exactly `to`.
    pub fn x_at(&self, k: usize) -> f64 {
        if k + 1 >= self.steps && self.steps > 1 {
            self.to
        } else {
            self.from + self.step_size() * k as f64
        }
    }
}

/// Evaluate a whole sweep at once.
///
/// Models are called with zero elapsed time. Points whose sample is not
/// finite are left out.
pub fn run_sweep(
    model: ModelFn,
    params: &Params,
    state: &mut ScenarioState,
    range: &SweepRange,
) -> SweepCurve {
    let mut params = params.clone();
    (0..range.steps())
        .filter_map(|k| {
            let x = range.x_at(k);
            params.set(range.param(), x);
            let mut sample = model(&params, state, 0.0);
            validate_sample(&mut sample).then_some(SweepPoint {
                x,
                y: sample.i,
                p: sample.p,
            })
        })
        .collect()
}

/// A sweep that advances one point per call.
///
/// Once every point has been evaluated, further calls keep re-evaluating
/// the final point so the live readout stays current, but the curve no
/// longer grows.
#[derive(Debug, Clone)]
pub struct Sweep {
    range: SweepRange,
    next: usize,
    curve: SweepCurve,
}

impl Sweep {
    pub fn new(range: SweepRange) -> Self {
        let capacity = range.steps();
        Self {
            range,
            next: 0,
            curve: Vec::with_capacity(capacity),
        }
    }

    pub fn range(&self) -> &SweepRange {
        &self.range
    }

    /// Points recorded so far.
    pub fn curve(&self) -> &[SweepPoint] {
        &self.curve
    }

    /// Take the recorded points, leaving the sweep empty.
    pub fn into_curve(self) -> SweepCurve {
        self.curve
    }

    pub fn is_complete(&self) -> bool {
        self.next >= self.range.steps()
    }

    /// Fraction of points evaluated, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.next as f64 / self.range.steps() as f64
    }

    /// Evaluate the next point (or the last one again once complete).
    ///
    /// Returns the sample if it was finite.
    pub fn step(
        &mut self,
        model: ModelFn,
        params: &Params,
        state: &mut ScenarioState,
        dt: f64,
    ) -> Option<Sample> {
        let complete = self.is_complete();
        let k = if complete {
            self.range.steps() - 1
        } else {
            self.next
        };
        let x = self.range.x_at(k);

        let mut swept = params.clone();
        swept.set(self.range.param(), x);
        let mut sample = model(&swept, state, dt);
        let valid = validate_sample(&mut sample);

        if !complete {
            self.next += 1;
            if valid {
                self.curve.push(SweepPoint {
                    x,
                    y: sample.i,
                    p: sample.p,
                });
            }
        }

        if valid {
            sample.set("sweep_x", x);
            Some(sample)
        } else {
            None
        }
    }
}
