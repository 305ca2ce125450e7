//! Mock residual models for testing
//!
//! These models have known roots, making them ideal for validating root-finder
//! accuracy independently of the PV physics.

use nalgebra::DVector;
use pv_rs::physics::ResidualModel;
use pv_rs::PvResult;

// =================================================================================================
// Cube Root: x³ - c = 0
// =================================================================================================

/// Cube root per sample
///
/// Analytical solution: x = ∛c
pub struct CubeRoot {
    pub targets: Vec<f64>,
    pub start: f64,
}

impl CubeRoot {
    pub fn new(targets: Vec<f64>, start: f64) -> Self {
        Self { targets, start }
    }

    pub fn analytical_solution(&self) -> Vec<f64> {
        self.targets.iter().map(|c| c.cbrt()).collect()
    }
}

impl ResidualModel for CubeRoot {
    fn points(&self) -> usize {
        self.targets.len()
    }

    fn initial_guess(&self) -> DVector<f64> {
        DVector::from_element(self.targets.len(), self.start)
    }

    fn residual(&self, x: &DVector<f64>) -> PvResult<DVector<f64>> {
        Ok(DVector::from_fn(x.len(), |i, _| x[i].powi(3) - self.targets[i]))
    }

    fn derivative(&self, x: &DVector<f64>) -> PvResult<DVector<f64>> {
        Ok(x.map(|v| 3.0 * v * v))
    }

    fn name(&self) -> &str {
        "Cube Root"
    }
}

// =================================================================================================
// Diode-like: c - x - exp(x) = 0
// =================================================================================================

/// Strictly decreasing, concave residual shaped like the diode equation
///
/// Built from the wanted roots r: c = r + exp(r), so the analytical solution is r.
pub struct DiodeLike {
    pub roots: Vec<f64>,
    pub start: f64,
}

impl DiodeLike {
    pub fn new(roots: Vec<f64>, start: f64) -> Self {
        Self { roots, start }
    }

    fn constant(&self, i: usize) -> f64 {
        self.roots[i] + self.roots[i].exp()
    }
}

impl ResidualModel for DiodeLike {
    fn points(&self) -> usize {
        self.roots.len()
    }

    fn initial_guess(&self) -> DVector<f64> {
        DVector::from_element(self.roots.len(), self.start)
    }

    fn residual(&self, x: &DVector<f64>) -> PvResult<DVector<f64>> {
        Ok(DVector::from_fn(x.len(), |i, _| self.constant(i) - x[i] - x[i].exp()))
    }

    fn derivative(&self, x: &DVector<f64>) -> PvResult<DVector<f64>> {
        Ok(x.map(|v| -1.0 - v.exp()))
    }

    fn name(&self) -> &str {
        "Diode-like"
    }
}

// =================================================================================================
// Offset Parabola: x² + 1 = 0
// =================================================================================================

/// No real root: every solver must report non-convergence
pub struct OffsetParabola {
    pub points: usize,
}

impl ResidualModel for OffsetParabola {
    fn points(&self) -> usize {
        self.points
    }

    fn initial_guess(&self) -> DVector<f64> {
        DVector::from_element(self.points, 0.5)
    }

    fn residual(&self, x: &DVector<f64>) -> PvResult<DVector<f64>> {
        Ok(x.map(|v| v * v + 1.0))
    }

    fn derivative(&self, x: &DVector<f64>) -> PvResult<DVector<f64>> {
        Ok(x * 2.0)
    }

    fn name(&self) -> &str {
        "Offset Parabola"
    }
}
