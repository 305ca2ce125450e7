//! Residual model trait
//!
//! A residual model states an implicit system F(x) = 0 of independent scalar
//! equations, one per sample. It knows the physics but not how to solve it:
//! root-finders in [`crate::solver`] drive it.

use nalgebra::DVector;

use crate::error::PvResult;

/// Trait for implicit per-sample equations
///
/// # Responsibility
///
/// Evaluates F(x) and dF/dx for a vector of unknowns. Samples are independent, so the
/// Jacobian is diagonal and [`derivative`](ResidualModel::derivative) returns only its
/// diagonal.
///
/// # Optional hooks
///
/// A model that knows where its roots lie returns them from
/// [`bracket`](ResidualModel::bracket); the solvers then never step outside that
/// interval and fall back to bisection when an iterate would. A model whose terms can
/// grow large reports their magnitude through
/// [`residual_scale`](ResidualModel::residual_scale), so the convergence test never
/// asks for a residual below the rounding error of those terms.
///
/// # Errors
///
/// Implementations return `NumericOverflow` rather than NaN or infinity.
pub trait ResidualModel: Send + Sync {
    /// Number of independent samples
    fn points(&self) -> usize;

    /// Starting point of the iteration
    fn initial_guess(&self) -> DVector<f64>;

    /// F(x), one residual per sample
    fn residual(&self, x: &DVector<f64>) -> PvResult<DVector<f64>>;

    /// Diagonal of the Jacobian dF/dx
    fn derivative(&self, x: &DVector<f64>) -> PvResult<DVector<f64>>;

    /// Per-sample interval `(rising, falling)` with F(rising) ≥ 0 ≥ F(falling)
    ///
    /// The two ends may come in either order. `None` leaves the iteration unguarded.
    fn bracket(&self) -> Option<(DVector<f64>, DVector<f64>)> {
        None
    }

    /// Magnitude of the largest term of F at `x`, per sample
    ///
    /// Zero by default, which keeps the residual tolerance absolute.
    fn residual_scale(&self, x: &DVector<f64>) -> PvResult<DVector<f64>> {
        Ok(DVector::zeros(x.len()))
    }

    /// Name of the model (used in diagnostics and logging)
    fn name(&self) -> &str;
}
