//! Bracketed bisection.

use super::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

/// A closed search interval `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lo: f64,
    pub hi: f64,
}

impl Bracket {
    /// Create a bracket, ordering the endpoints.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }
}

/// Result of a solve.
///
/// A solve never fails: when the budget runs out or no sign change can be
/// bracketed, the best available point comes back with `converged` unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Root estimate
    pub value: f64,
    /// `|f(value)|`
    pub residual: f64,
    /// Function bisections performed
    pub iterations: usize,
    /// Whether `residual` fell below the tolerance
    pub converged: bool,
}

/// Bisection solver for scalar equations.
#[derive(Debug, Clone, Copy)]
pub struct Bisection {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Convergence tolerance on `|f|`
    pub tolerance: f64,
}

impl Default for Bisection {
    fn default() -> Self {
        Self::new()
    }
}

impl Bisection {
    /// Create a solver with the default budget and tolerance.
    pub fn new() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the tolerance on `|f|`.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Find a root of `f` inside `initial`, falling back to `widened` once
    /// if `initial` does not straddle a sign change.
    pub fn solve<F>(&self, f: F, initial: Bracket, widened: Bracket) -> Solution
    where
        F: Fn(f64) -> f64,
    {
        let mut fa = f(initial.lo);
        let mut fb = f(initial.hi);
        let (mut a, mut b) = (initial.lo, initial.hi);

        if !straddles(fa, fb) {
            let (wa, wb) = (f(widened.lo), f(widened.hi));
            if !straddles(wa, wb) {
                tracing::debug!(
                    lo = widened.lo,
                    hi = widened.hi,
                    "no sign change in widened bracket"
                );
                return best_endpoint(widened, wa, wb, self.tolerance);
            }
            a = widened.lo;
            b = widened.hi;
            fa = wa;
            fb = wb;
        }

        if fa.abs() < self.tolerance {
            return solution(a, fa, 0, self.tolerance);
        }
        if fb.abs() < self.tolerance {
            return solution(b, fb, 0, self.tolerance);
        }

        let mut mid = 0.5 * (a + b);
        let mut fm = f(mid);

        for iter in 1..=self.max_iterations {
            mid = 0.5 * (a + b);
            fm = f(mid);

            if fm.abs() < self.tolerance {
                return solution(mid, fm, iter, self.tolerance);
            }

            if straddles(fa, fm) {
                b = mid;
            } else {
                a = mid;
                fa = fm;
            }
        }

        tracing::debug!(
            value = mid,
            residual = fm.abs(),
            iterations = self.max_iterations,
            "bisection budget exhausted"
        );
        solution(mid, fm, self.max_iterations, self.tolerance)
    }
}

fn straddles(fa: f64, fb: f64) -> bool {
    fa.is_finite() && fb.is_finite() && (fa <= 0.0) != (fb < 0.0) || fa == 0.0 || fb == 0.0
}

fn solution(value: f64, fv: f64, iterations: usize, tolerance: f64) -> Solution {
    let residual = fv.abs();
    Solution {
        value,
        residual,
        iterations,
        converged: residual < tolerance,
    }
}

fn best_endpoint(bracket: Bracket, fa: f64, fb: f64, tolerance: f64) -> Solution {
    // NaN residuals lose to any finite one
    let ra = if fa.is_nan() { f64::INFINITY } else { fa.abs() };
    let rb = if fb.is_nan() { f64::INFINITY } else { fb.abs() };
    let (value, residual) = if ra <= rb {
        (bracket.lo, ra)
    } else {
        (bracket.hi, rb)
    };
    Solution {
        value,
        residual,
        iterations: 0,
        converged: residual < tolerance,
    }
}

/// Solve the series loop `v + r * device(v) = supply` for `v`.
///
/// The first bracket spans zero to the supply; the fallback bracket reaches
/// a few volts past either side of it.
pub fn solve_loop<D>(solver: &Bisection, supply: f64, r: f64, device: D) -> Solution
where
    D: Fn(f64) -> f64,
{
    let initial = Bracket::new(supply.min(0.0), supply.max(0.0));
    let widened = Bracket::new((supply - 2.0).min(-5.0), (supply + 2.0).max(5.0));
    solver.solve(|v| v + r * device(v) - supply, initial, widened)
}
