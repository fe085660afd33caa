//! Common-emitter NPN stage with fixed base bias.
//!
//! The base loop is taken as linear, `Ib = (Vbb - Vbe)/Rb`. The collector
//! loop `Vce + Rc Ic(Vce) = Vcc` is solved by bisection over the
//! two-region output characteristic.

use crate::scenario::{Params, Sample, ScenarioState};
use crate::solver::{solve_loop, two_region_current, Bisection, TransistorLimits};

/// Operating region of the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Cutoff,
    Active,
    Saturation,
}

impl Region {
    /// Classify an operating point.
    pub fn classify(ib: f64, vce: f64, vce_sat: f64) -> Self {
        if ib <= 0.0 {
            Region::Cutoff
        } else if vce < vce_sat {
            Region::Saturation
        } else {
            Region::Active
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Region::Cutoff => "cutoff",
            Region::Active => "active",
            Region::Saturation => "saturation",
        }
    }
}

/// DC operating point of the stage.
pub fn operating_point(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let vcc = params.clamped("Vcc", 12.0, 0.0, 1e4);
    let rc = params.positive("Rc", 1000.0);
    let vbb = params.clamped("Vbb", 5.0, -1e4, 1e4);
    let rb = params.positive("Rb", 100e3);
    let limits = TransistorLimits {
        beta: params.clamped("beta", 100.0, 0.0, 1e5),
        vce_sat: params.clamped("Vcesat", 0.2, 0.0, 5.0),
        va: params.clamped("VA", 100.0, 0.0, 1e6),
    };
    let vbe = params.clamped("Vbe", 0.7, 0.0, 5.0);

    let ib = ((vbb - vbe) / rb).max(0.0);
    let solution = solve_loop(&Bisection::new(), vcc, rc, |v| {
        two_region_current(v, ib, &limits)
    });
    if !solution.converged {
        tracing::debug!(vcc, ib, residual = solution.residual, "collector loop did not converge");
    }

    let vce = solution.value;
    let ic = two_region_current(vce, ib, &limits);
    let region = Region::classify(ib, vce, limits.vce_sat);

    Sample::from_vi(vce, ic)
        .with("Ib", ib)
        .with("Vce", vce)
        .with("region", region.name())
        .with("converged", solution.converged)
        .with("iterations", solution.iterations as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run(params: &Params) -> Sample {
        operating_point(params, &mut ScenarioState::default(), 0.0)
    }

    #[test]
    fn test_active_region() {
        let s = run(&Params::new());
        assert_eq!(s.text("region"), Some("active"));
        assert_eq!(s.flag("converged"), Some(true));
        let ib = s.number("Ib").unwrap();
        assert_relative_eq!(ib, 4.3e-5, epsilon = 1e-12);
        // Ic = beta Ib (1 + Vce/VA)
        assert_relative_eq!(s.i, 100.0 * ib * (1.0 + s.v / 100.0), epsilon = 1e-9);
        // Loop closes
        assert_relative_eq!(s.v + 1000.0 * s.i, 12.0, epsilon = 1e-6);
    }

    #[test]
    fn test_saturation() {
        let s = run(&Params::new().with("Rb", 10e3));
        assert_eq!(s.text("region"), Some("saturation"));
        assert!(s.v < 0.2);
        assert!(s.i < 12.0 / 1000.0);
    }

    #[test]
    fn test_cutoff() {
        let s = run(&Params::new().with("Vbb", 0.5));
        assert_eq!(s.text("region"), Some("cutoff"));
        assert_eq!(s.i, 0.0);
        assert_relative_eq!(s.v, 12.0, epsilon = 1e-6);
    }
}
