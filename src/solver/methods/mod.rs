//! Iterative root-finding methods
//!
//! Concrete implementations of the [`RootSolver`](crate::solver::RootSolver) trait.
//!
//! - **[`NewtonSolver`]**: Newton-Raphson
//!   - Order: quadratic
//!   - Cost: residual + derivative per iteration
//!   - Use: default, the single-diode derivative is cheap and exact
//!
//! - **[`SecantSolver`]**: secant method
//!   - Order: superlinear
//!   - Cost: residual only
//!   - Use: derivative-free cross-check
//!
//! Each solver is stateless and can be shared between threads.

mod newton;
mod secant;

pub use newton::NewtonSolver;
pub use secant::SecantSolver;
