//! Root-finder traits and types
//!
//! # Design
//!
//! - `RootSolver` trait: the numerical method, independent of the physics
//! - `SolverConfiguration`: tolerance, iteration budget, method selection
//! - `RootReport`: converged roots plus per-sample diagnostics
//!
//! A solver never assumes success: every sample is checked against its residual
//! tolerance and a miss is reported as `SolverDidNotConverge`.

use std::fmt;
use std::str::FromStr;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{PvError, PvResult};
use crate::physics::ResidualModel;
use crate::solver::methods::{NewtonSolver, SecantSolver};
use crate::solver::DEFAULT_PARALLEL_THRESHOLD;

// =================================================================================================
// Solver Method Selection
// =================================================================================================

/// Iterative method used for the per-sample solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverMethod {
    /// Newton-Raphson with the analytic derivative (quadratic convergence)
    #[default]
    Newton,

    /// Secant method, derivative-free (superlinear convergence)
    Secant,
}

impl SolverMethod {
    /// Instantiate the solver for this method
    pub fn solver(&self) -> Box<dyn RootSolver> {
        match self {
            SolverMethod::Newton => Box::new(NewtonSolver::new()),
            SolverMethod::Secant => Box::new(SecantSolver::new()),
        }
    }
}

impl fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverMethod::Newton => write!(f, "newton"),
            SolverMethod::Secant => write!(f, "secant"),
        }
    }
}

impl FromStr for SolverMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newton" => Ok(SolverMethod::Newton),
            "secant" => Ok(SolverMethod::Secant),
            other => Err(format!(
                "unknown solver method '{}', expected 'newton' or 'secant'",
                other
            )),
        }
    }
}

// =================================================================================================
// Solver Configuration
// =================================================================================================

/// Configuration of the iterative root-finder
///
/// # Examples
///
/// ```rust
/// use pv_rs::solver::{SolverConfiguration, SolverMethod};
///
/// let config = SolverConfiguration::new(1e-10, 50).with_method(SolverMethod::Secant);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfiguration {
    /// Method used for every sample
    pub method: SolverMethod,

    /// Absolute residual tolerance \[A\]
    pub tolerance: f64,

    /// Iteration budget per sample
    pub max_iterations: usize,

    /// Sample count above which evaluation runs on rayon (feature `parallel`)
    pub parallel_threshold: usize,
}

impl Default for SolverConfiguration {
    fn default() -> Self {
        Self {
            method: SolverMethod::Newton,
            tolerance: 1e-9,
            max_iterations: 100,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl SolverConfiguration {
    /// Create a configuration with the default method
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }

    /// Builder: select the method
    pub fn with_method(mut self, method: SolverMethod) -> Self {
        self.method = method;
        self
    }

    /// Builder: set the parallel threshold
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> PvResult<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(PvError::InvalidConfiguration(format!(
                "Tolerance must be a finite positive number, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(PvError::InvalidConfiguration(
                "Maximum iterations must be positive".to_string(),
            ));
        }
        if self.parallel_threshold == 0 {
            return Err(PvError::InvalidConfiguration(
                "Parallel threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// =================================================================================================
// Root Report
// =================================================================================================

/// Converged roots with convergence diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct RootReport {
    /// Root of each sample
    pub roots: DVector<f64>,

    /// Residual F(root) of each sample
    pub residuals: DVector<f64>,

    /// Iterations spent on each sample
    pub iterations: Vec<usize>,

    /// Name of the solver that produced the report
    pub solver: &'static str,
}

impl RootReport {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Largest absolute residual over all samples
    pub fn max_residual(&self) -> f64 {
        self.residuals.iter().fold(0.0_f64, |acc, r| acc.max(r.abs()))
    }

    /// Sum of the iterations of all samples
    pub fn total_iterations(&self) -> usize {
        self.iterations.iter().sum()
    }

    /// Iterations of the slowest sample
    pub fn max_iterations(&self) -> usize {
        self.iterations.iter().copied().max().unwrap_or(0)
    }
}

// =================================================================================================
// Root Solver Trait
// =================================================================================================

/// Trait for iterative root-finders
///
/// # Contract
///
/// On success every sample satisfies `|F(root)| <= max(config.tolerance, RESIDUAL_FLOOR · scale)`,
/// where `scale` is the model's [`residual_scale`](ResidualModel::residual_scale) at the
/// root; for models without a scale the tolerance is `config.tolerance`.
/// A sample that misses the tolerance within `config.max_iterations` is reported as
/// `SolverDidNotConverge`; overflow during evaluation propagates as `NumericOverflow`.
pub trait RootSolver: Send + Sync {
    /// Solve F(x) = 0 for every sample of the model
    fn solve(
        &self,
        model: &dyn ResidualModel,
        config: &SolverConfiguration,
    ) -> PvResult<RootReport>;

    /// Name of the method (used in diagnostics and logging)
    fn name(&self) -> &'static str;
}

// =================================================================================================
// Tests
// =================================================================================================
