//! Secant root-finder
//!
//! # Mathematical Background
//!
//! The secant method replaces the derivative of Newton's method with the slope through
//! the last two iterates:
//!
//! ```text
//! x_{k+1} = x_k - F(x_k) · (x_k - x_{k-1}) / (F(x_k) - F(x_{k-1}))
//! ```
//!
//! The second starting point is a small perturbation of the initial guess:
//! `x_1 = x_0 - (|x_0| · 1e-4 + 1e-6)`.
//!
//! With a model bracket the secant point is only taken when it lands inside the
//! bracket and shortens the step; otherwise the sample bisects.
//!
//! # Characteristics
//!
//! - **Order**: superlinear (≈ 1.618)
//! - **Cost**: one residual evaluation per iteration, no derivative
//! - **Use**: models without an analytic derivative, cross-checking Newton

use log::debug;
use nalgebra::DVector;

use crate::error::{PvError, PvResult};
use crate::physics::ResidualModel;
use crate::solver::{
    check_converged, ensure_finite, tolerances, Bracket, RootReport, RootSolver,
    SolverConfiguration,
};

/// Relative perturbation of the second seed
const SEED_RELATIVE_STEP: f64 = 1e-4;

/// Absolute perturbation of the second seed
const SEED_ABSOLUTE_STEP: f64 = 1e-6;

/// Vectorised secant solver
#[derive(Debug, Clone, Copy, Default)]
pub struct SecantSolver;

impl SecantSolver {
    /// Create a new secant solver
    pub fn new() -> Self {
        Self
    }
}

impl RootSolver for SecantSolver {
    fn solve(
        &self,
        model: &dyn ResidualModel,
        config: &SolverConfiguration,
    ) -> PvResult<RootReport> {
        config.validate()?;

        let n = model.points();
        let mut x_prev = model.initial_guess();
        if x_prev.len() != n {
            return Err(PvError::InvalidConfiguration(format!(
                "{} returned an initial guess of {} samples for {} points",
                model.name(),
                x_prev.len(),
                n
            )));
        }
        ensure_finite(&x_prev, "initial guess")?;

        let mut f_prev = model.residual(&x_prev)?;
        ensure_finite(&f_prev, "residual")?;
        let seed_tolerance = tolerances(model, &x_prev, config.tolerance)?;

        // Samples already at a root keep their seed
        let mut x = DVector::from_fn(n, |i, _| {
            if f_prev[i].abs() <= seed_tolerance[i] {
                x_prev[i]
            } else {
                x_prev[i] - (x_prev[i].abs() * SEED_RELATIVE_STEP + SEED_ABSOLUTE_STEP)
            }
        });
        let mut f = model.residual(&x)?;
        ensure_finite(&f, "residual")?;
        let mut tolerance = tolerances(model, &x, config.tolerance)?;

        let mut bracket = Bracket::from_model(model)?;
        if let Some(bracket) = bracket.as_mut() {
            for i in 0..n {
                bracket.update(i, x_prev[i], f_prev[i]);
                bracket.update(i, x[i], f[i]);
            }
        }

        let mut iterations = vec![0usize; n];
        let mut active = vec![true; n];

        for _ in 0..config.max_iterations {
            let mut remaining = 0;
            for i in 0..n {
                if active[i] && f[i].abs() <= tolerance[i] {
                    active[i] = false;
                }
                if active[i] {
                    remaining += 1;
                }
            }
            if remaining == 0 {
                break;
            }

            for i in 0..n {
                if !active[i] {
                    continue;
                }
                let denominator = f[i] - f_prev[i];
                let proposed = x[i] - f[i] * (x[i] - x_prev[i]) / denominator;
                let next = match bracket.as_mut() {
                    Some(bracket) => bracket.next(i, x[i], proposed),
                    None => {
                        // Stalled secant: both iterates share a residual
                        if denominator == 0.0 || !proposed.is_finite() {
                            active[i] = false;
                            continue;
                        }
                        proposed
                    }
                };
                x_prev[i] = x[i];
                f_prev[i] = f[i];
                x[i] = next;
                iterations[i] += 1;
            }

            ensure_finite(&x, "secant update")?;
            f = model.residual(&x)?;
            ensure_finite(&f, "residual")?;
            tolerance = tolerances(model, &x, config.tolerance)?;

            if let Some(bracket) = bracket.as_mut() {
                for i in 0..n {
                    if active[i] {
                        bracket.update(i, x[i], f[i]);
                    }
                }
            }
        }

        check_converged(self.name(), &f, &tolerance, &iterations)?;

        let report = RootReport {
            roots: x,
            residuals: f,
            iterations,
            solver: self.name(),
        };

        debug!(
            "{} solved {} on {} samples: max {} iterations, max residual {:e}",
            self.name(),
            model.name(),
            n,
            report.max_iterations(),
            report.max_residual()
        );

        Ok(report)
    }

    fn name(&self) -> &'static str {
        "Secant"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
