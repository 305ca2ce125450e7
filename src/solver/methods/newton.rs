//! Newton-Raphson root-finder
//!
//! # Mathematical Background
//!
//! For each sample the iteration is
//!
//! ```text
//! x_{k+1} = x_k - F(x_k) / F'(x_k)
//! ```
//!
//! All samples are advanced together as one vector; a sample stops moving as soon as
//! its residual meets the tolerance, the others keep iterating.
//!
//! # Characteristics
//!
//! - **Order**: quadratic near the root
//! - **Cost**: one residual and one derivative evaluation per iteration
//! - **Needs**: the analytic derivative from the model
//!
//! For the single-diode equation F is strictly decreasing and concave in I, so Newton
//! converges monotonically once it has stepped past the root. Past the root the diode
//! exponential is steep and each step only removes about one thermal voltage, so the
//! model's bracket is used to bisect whenever a step stalls or leaves it.

use log::{debug, trace};
use nalgebra::DVector;

use crate::error::{PvError, PvResult};
use crate::physics::ResidualModel;
use crate::solver::{
    check_converged, ensure_finite, tolerances, Bracket, RootReport, RootSolver,
    SolverConfiguration,
};

/// Vectorised Newton-Raphson solver
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonSolver;

impl NewtonSolver {
    /// Create a new Newton-Raphson solver
    ///
    /// # Example
    ///
    /// ```rust
    /// use pv_rs::solver::{NewtonSolver, RootSolver};
    ///
    /// let solver = NewtonSolver::new();
    /// assert_eq!(solver.name(), "Newton-Raphson");
    /// ```
    pub fn new() -> Self {
        Self
    }
}

impl RootSolver for NewtonSolver {
    fn solve(
        &self,
        model: &dyn ResidualModel,
        config: &SolverConfiguration,
    ) -> PvResult<RootReport> {
        // ====== Setup ======

        config.validate()?;

        let n = model.points();
        let mut x = model.initial_guess();
        if x.len() != n {
            return Err(PvError::InvalidConfiguration(format!(
                "{} returned an initial guess of {} samples for {} points",
                model.name(),
                x.len(),
                n
            )));
        }
        ensure_finite(&x, "initial guess")?;

        let mut iterations = vec![0usize; n];
        let mut active = vec![true; n];
        let mut residual = model.residual(&x)?;
        ensure_finite(&residual, "residual")?;
        let mut tolerance = tolerances(model, &x, config.tolerance)?;

        let mut bracket = Bracket::from_model(model)?;
        if let Some(bracket) = bracket.as_mut() {
            for i in 0..n {
                bracket.update(i, x[i], residual[i]);
            }
        }

        // ====== Iteration ======

        for _ in 0..config.max_iterations {
            let mut remaining = 0;
            for i in 0..n {
                if active[i] && residual[i].abs() <= tolerance[i] {
                    active[i] = false;
                }
                if active[i] {
                    remaining += 1;
                }
            }
            if remaining == 0 {
                break;
            }

            let slope = model.derivative(&x)?;

            for i in 0..n {
                if !active[i] {
                    continue;
                }
                let proposed = x[i] - residual[i] / slope[i];
                match bracket.as_mut() {
                    Some(bracket) => x[i] = bracket.next(i, x[i], proposed),
                    None => {
                        // A flat or non-finite slope gives no usable step: leave the
                        // sample where it is and let the final check report it.
                        if !proposed.is_finite() {
                            active[i] = false;
                            continue;
                        }
                        x[i] = proposed;
                    }
                }
                iterations[i] += 1;
            }

            ensure_finite(&x, "Newton update")?;
            residual = model.residual(&x)?;
            ensure_finite(&residual, "residual")?;
            tolerance = tolerances(model, &x, config.tolerance)?;

            if let Some(bracket) = bracket.as_mut() {
                for i in 0..n {
                    if active[i] {
                        bracket.update(i, x[i], residual[i]);
                    }
                }
            }
        }

        // ====== Convergence Check ======

        check_converged(self.name(), &residual, &tolerance, &iterations)?;

        let report = RootReport {
            roots: x,
            residuals: residual,
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
        trace!("{} total iterations: {}", self.name(), report.total_iterations());

        Ok(report)
    }

    fn name(&self) -> &'static str {
        "Newton-Raphson"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// x² - c = 0 per sample, roots √c
    struct SquareRoot {
        targets: DVector<f64>,
        start: f64,
    }

    impl ResidualModel for SquareRoot {
        fn points(&self) -> usize {
            self.targets.len()
        }

        fn initial_guess(&self) -> DVector<f64> {
            DVector::from_element(self.targets.len(), self.start)
        }

        fn residual(&self, x: &DVector<f64>) -> PvResult<DVector<f64>> {
            Ok(x.component_mul(x) - &self.targets)
        }

        fn derivative(&self, x: &DVector<f64>) -> PvResult<DVector<f64>> {
            Ok(x * 2.0)
        }

        fn name(&self) -> &str {
            "Square root"
        }
    }

    /// x² + 1 = 0 has no real root
    struct NoRoot;

    impl ResidualModel for NoRoot {
        fn points(&self) -> usize {
            3
        }

        fn initial_guess(&self) -> DVector<f64> {
            DVector::zeros(3)
        }

        fn residual(&self, x: &DVector<f64>) -> PvResult<DVector<f64>> {
            Ok(x.map(|v| v * v + 1.0))
        }

        fn derivative(&self, x: &DVector<f64>) -> PvResult<DVector<f64>> {
            Ok(x * 2.0)
        }

        fn name(&self) -> &str {
            "No root"
        }
    }

    /// 1 - exp(x) = 0 started far on the steep side, root 0
    struct SteepExponential {
        guarded: bool,
    }

    impl ResidualModel for SteepExponential {
        fn points(&self) -> usize {
            1
        }

        fn initial_guess(&self) -> DVector<f64> {
            DVector::from_element(1, 200.0)
        }

        fn residual(&self, x: &DVector<f64>) -> PvResult<DVector<f64>> {
            Ok(x.map(|v| 1.0 - v.exp()))
        }

        fn derivative(&self, x: &DVector<f64>) -> PvResult<DVector<f64>> {
            Ok(x.map(|v| -v.exp()))
        }

        fn bracket(&self) -> Option<(DVector<f64>, DVector<f64>)> {
            self.guarded.then(|| {
                (
                    DVector::from_element(1, -1.0),
                    DVector::from_element(1, 200.0),
                )
            })
        }

        fn name(&self) -> &str {
            "Steep exponential"
        }
    }

    #[test]
    fn test_newton_crawls_down_steep_exponential_without_bracket() {
        // Each step lowers x by about one: 200 steps would be needed
        let result = NewtonSolver::new().solve(
            &SteepExponential { guarded: false },
            &SolverConfiguration::default(),
        );
        assert!(matches!(result, Err(PvError::SolverDidNotConverge { .. })));
    }

    #[test]
    fn test_newton_bisects_inside_bracket() {
        let report = NewtonSolver::new()
            .solve(
                &SteepExponential { guarded: true },
                &SolverConfiguration::default(),
            )
            .unwrap();

        assert!(report.roots[0].abs() < 1e-9, "root {}", report.roots[0]);
        assert!(report.iterations[0] < 40, "took {}", report.iterations[0]);
    }

    #[test]
    fn test_newton_solver_creation() {
        let solver = NewtonSolver::new();
        assert_eq!(solver.name(), "Newton-Raphson");
        assert_eq!(NewtonSolver.name(), "Newton-Raphson");
    }

    #[test]
    fn test_newton_square_roots() {
        let model = SquareRoot {
            targets: DVector::from_vec(vec![4.0, 9.0, 2.0, 100.0]),
            start: 1.0,
        };
        let report = NewtonSolver::new()
            .solve(&model, &SolverConfiguration::new(1e-12, 50))
            .unwrap();

        let expected = [2.0, 3.0, 2f64.sqrt(), 10.0];
        for (root, exact) in report.roots.iter().zip(expected) {
            assert!((root - exact).abs() < 1e-10, "{} vs {}", root, exact);
        }
        assert!(report.max_residual() <= 1e-12);
        assert_eq!(report.solver, "Newton-Raphson");
    }

    #[test]
    fn test_newton_converged_samples_do_not_move() {
        // 1² - 1 = 0 already at the start
        let model = SquareRoot {
            targets: DVector::from_vec(vec![1.0, 16.0]),
            start: 1.0,
        };
        let report = NewtonSolver::new()
            .solve(&model, &SolverConfiguration::default())
            .unwrap();

        assert_eq!(report.iterations[0], 0);
        assert_eq!(report.roots[0], 1.0);
        assert!(report.iterations[1] > 0);
    }

    #[test]
    fn test_newton_quadratic_convergence_is_fast() {
        let model = SquareRoot {
            targets: DVector::from_vec(vec![2.0]),
            start: 1.0,
        };
        let report = NewtonSolver::new()
            .solve(&model, &SolverConfiguration::new(1e-14, 100))
            .unwrap();
        assert!(report.iterations[0] <= 6, "took {}", report.iterations[0]);
    }

    #[test]
    fn test_newton_reports_non_convergence() {
        let result = NewtonSolver::new().solve(&NoRoot, &SolverConfiguration::new(1e-9, 20));

        match result {
            Err(PvError::SolverDidNotConverge {
                solver, sample, ..
            }) => {
                assert_eq!(solver, "Newton-Raphson");
                assert_eq!(sample, 0);
            }
            other => panic!("expected SolverDidNotConverge, got {other:?}"),
        }
    }

    #[test]
    fn test_newton_rejects_invalid_configuration() {
        let model = SquareRoot {
            targets: DVector::from_vec(vec![4.0]),
            start: 1.0,
        };
        let result = NewtonSolver::new().solve(&model, &SolverConfiguration::new(1e-9, 0));
        assert!(matches!(result, Err(PvError::InvalidConfiguration(_))));
    }
}
