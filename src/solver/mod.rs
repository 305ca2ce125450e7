//! Numerical root-finding
//!
//! This module provides the numerical side of the crate: the [`RootSolver`] trait, its
//! Newton and secant implementations, and the voltage sweep that sets the resolution
//! of the I–V curve.
//!
//! # The Architecture (WHAT vs HOW)
//!
//! 1. **Residual model** ([`ResidualModel`](crate::physics::ResidualModel)) - WHAT to solve
//!    - One implicit equation per voltage sample
//!    - Residual and derivative evaluation
//!
//! 2. **Configuration** ([`SolverConfiguration`]) - HOW to solve
//!    - Method (Newton or secant)
//!    - Tolerance and iteration budget
//!
//! 3. **Solver** ([`RootSolver`]) - The numerical method
//!    - Iterates all samples at once, each with its own convergence state
//!    - Returns roots with diagnostics ([`RootReport`])
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────────┐
//! │ Residual model  │     │ Solver configuration │
//! │ F(I; V) = 0     │     │ tolerance, budget    │
//! └────────┬────────┘     └──────────┬───────────┘
//!          └──────────┬──────────────┘
//!            ┌────────▼────────┐
//!            │   RootSolver    │  Newton / secant
//!            └────────┬────────┘
//!            ┌────────▼────────┐
//!            │   RootReport    │  roots + residuals + iterations
//!            └─────────────────┘
//! ```
//!
//! # Error Handling
//!
//! Common errors:
//! - Invalid configuration (non-positive tolerance, zero iterations)
//! - Numerical overflow (exponential out of range)
//! - Convergence failure (iteration budget exhausted)
//!
//! # Safeguarding
//!
//! When the model supplies a [`bracket`](crate::physics::ResidualModel::bracket), both
//! methods keep every iterate inside it and bisect whenever the proposed step would
//! leave the interval or fails to halve compared to the step before last. Far from the
//! root, where a steep exponential makes Newton and secant crawl, the bracket still
//! shrinks by half at least every second iteration.

mod sweep;
mod traits;

pub mod methods;

pub use methods::{NewtonSolver, SecantSolver};
pub use sweep::{VoltageSweep, DEFAULT_SWEEP_SAMPLES};
pub use traits::{RootReport, RootSolver, SolverConfiguration, SolverMethod};

use nalgebra::DVector;

use crate::error::{PvError, PvResult};
use crate::physics::ResidualModel;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================

/// Default number of samples above which evaluation is handed to rayon.
///
/// Below that point the overhead of the thread-pool dispatch outweighs the per-sample
/// work (one `exp` and a handful of multiplications).
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 999;

/// Evaluate `f` for every sample index and collect into a vector
///
/// Runs on rayon when the crate is built with the `parallel` feature and `len`
/// exceeds `threshold`, sequentially otherwise. The first error wins.
pub(crate) fn evaluate_samples<F>(len: usize, threshold: usize, f: F) -> PvResult<DVector<f64>>
where
    F: Fn(usize) -> PvResult<f64> + Sync + Send,
{
    let values: Vec<f64> = if len > threshold {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            (0..len).into_par_iter().map(&f).collect::<PvResult<Vec<f64>>>()?
        }
        #[cfg(not(feature = "parallel"))]
        {
            (0..len).map(&f).collect::<PvResult<Vec<f64>>>()?
        }
    } else {
        (0..len).map(&f).collect::<PvResult<Vec<f64>>>()?
    };

    Ok(DVector::from_vec(values))
}

// =================================================================================================
// Helper Functions
// =================================================================================================

/// Rounding error of one residual evaluation, relative to its largest term
pub const RESIDUAL_FLOOR: f64 = 64.0 * f64::EPSILON;

/// Reject NaN and infinite entries
///
/// # Arguments
///
/// * `values` - Vector to check
/// * `stage` - Computation stage, reported in the error
///
/// # Returns
///
/// `NumericOverflow` naming the first offending index.
pub(crate) fn ensure_finite(values: &DVector<f64>, stage: &'static str) -> PvResult<()> {
    match values.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(PvError::overflow(
            stage,
            format!("non-finite value {} at sample {}", values[index], index),
        )),
        None => Ok(()),
    }
}

/// Per-sample residual tolerance at `x`
///
/// The configured absolute tolerance, raised to the rounding floor of the model's
/// largest term where that term is large.
pub(crate) fn tolerances(
    model: &dyn ResidualModel,
    x: &DVector<f64>,
    tolerance: f64,
) -> PvResult<DVector<f64>> {
    let scale = model.residual_scale(x)?;
    if scale.len() != x.len() {
        return Err(PvError::InvalidConfiguration(format!(
            "{} returned a residual scale of {} samples for {} points",
            model.name(),
            scale.len(),
            x.len()
        )));
    }
    Ok(scale.map(|s| tolerance.max(RESIDUAL_FLOOR * s.abs())))
}

/// First sample whose residual is above its tolerance, as a convergence error
pub(crate) fn check_converged(
    solver: &'static str,
    residuals: &DVector<f64>,
    tolerances: &DVector<f64>,
    iterations: &[usize],
) -> PvResult<()> {
    match residuals
        .iter()
        .zip(tolerances.iter())
        .position(|(r, tol)| r.abs() > *tol)
    {
        Some(sample) => Err(PvError::SolverDidNotConverge {
            solver,
            sample,
            iterations: iterations[sample],
            residual: residuals[sample],
        }),
        None => Ok(()),
    }
}

// =================================================================================================
// Root Bracket
// =================================================================================================

/// Per-sample interval holding a sign change of F
///
/// `rising[i]` is an end with F ≥ 0, `falling[i]` one with F ≤ 0. Evaluated iterates
/// that fall inside the interval replace the end of the same sign, so the interval only
/// ever shrinks.
#[derive(Debug, Clone)]
pub(crate) struct Bracket {
    rising: DVector<f64>,
    falling: DVector<f64>,
    /// Last two step lengths per sample, most recent first
    steps: Vec<(f64, f64)>,
}

impl Bracket {
    /// Bracket supplied by the model, if any
    pub(crate) fn from_model(model: &dyn ResidualModel) -> PvResult<Option<Self>> {
        let Some((rising, falling)) = model.bracket() else {
            return Ok(None);
        };
        let n = model.points();
        if rising.len() != n || falling.len() != n {
            return Err(PvError::InvalidConfiguration(format!(
                "{} returned a bracket of {}/{} samples for {} points",
                model.name(),
                rising.len(),
                falling.len(),
                n
            )));
        }
        ensure_finite(&rising, "root bracket")?;
        ensure_finite(&falling, "root bracket")?;

        let steps = (0..n)
            .map(|i| {
                let width = (falling[i] - rising[i]).abs();
                (width, width)
            })
            .collect();
        Ok(Some(Self {
            rising,
            falling,
            steps,
        }))
    }

    fn bounds(&self, i: usize) -> (f64, f64) {
        let (a, b) = (self.rising[i], self.falling[i]);
        (a.min(b), a.max(b))
    }

    /// Record an evaluated point
    pub(crate) fn update(&mut self, i: usize, x: f64, residual: f64) {
        let (lo, hi) = self.bounds(i);
        if x < lo || x > hi {
            return;
        }
        if residual > 0.0 {
            self.rising[i] = x;
        } else if residual < 0.0 {
            self.falling[i] = x;
        }
    }

    /// Next iterate for sample `i`: `proposed` if it is a usable step, else the midpoint
    ///
    /// A step is usable when it is finite, lands strictly inside the interval and is at
    /// most half as long as the step before last.
    pub(crate) fn next(&mut self, i: usize, x: f64, proposed: f64) -> f64 {
        let (lo, hi) = self.bounds(i);
        let (last, before_last) = self.steps[i];

        let step = proposed - x;
        let next = if proposed.is_finite()
            && proposed > lo
            && proposed < hi
            && 2.0 * step.abs() <= before_last
        {
            proposed
        } else {
            self.rising[i] + 0.5 * (self.falling[i] - self.rising[i])
        };

        self.steps[i] = ((next - x).abs(), last);
        next
    }
}

// =================================================================================================
// Tests
// =================================================================================================
