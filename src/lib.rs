//! pv-rs: Single-Diode Photovoltaic Simulation
//!
//! Computes the current–voltage–power characteristic of a PV module or a
//! series/parallel array with the single-diode equivalent circuit, and reduces it to
//! the maximum-power point (MPP).
//!
//! # Architecture
//!
//! pv-rs is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - Physical models state the implicit diode equation (what to solve)
//!    - Root-finders provide the iteration (how to solve)
//!
//! 2. **Typed failures**
//!    - Invalid inputs, overflow and non-convergence are distinct [`PvError`] variants
//!    - NaN and infinity never leave the crate
//!
//! # Quick Start
//!
//! ```rust
//! use pv_rs::PvSolver;
//!
//! # fn main() -> Result<(), pv_rs::PvError> {
//! // Two panels in series, three strings in parallel
//! let solver = PvSolver::new(2, 3)?;
//!
//! let mpp = solver.solve(800.0, 40.0)?;
//! println!("{}", mpp);
//!
//! // Inputs are checked before any computation
//! assert!(solver.solve(-100.0, 25.0).is_err());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: Constants, panel parameters, operating conditions
//! - [`models`]: The single-diode equation
//! - [`solver`]: Newton and secant root-finders, voltage sweep
//! - [`curve`]: I–V samples and MPP reduction
//! - [`config`]: JSON configuration
//! - [`output`]: CSV export and plots (feature `plot`)

// Core modules
pub mod error;
pub mod physics;

pub mod models;
pub mod solver;

pub mod curve;
pub mod pv_solver;

// Surfaces
pub mod config;
pub mod output;

pub use curve::{IvCurve, IvCurveSample, MppResult};
pub use error::{PvError, PvResult};
pub use pv_solver::PvSolver;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use pv_rs::prelude::*;
    //!
    //! let mpp = PvSolver::default().with_method(SolverMethod::Secant).solve(1000.0, 25.0);
    //! assert!(mpp.is_ok());
    //! ```
    pub use crate::config::SimulationConfig;
    pub use crate::curve::{IvCurve, IvCurveSample, MppResult};
    pub use crate::error::{PvError, PvResult};
    pub use crate::physics::{ArrayLayout, ModuleParameters, OperatingCondition, PanelSpec};
    pub use crate::pv_solver::PvSolver;
    pub use crate::solver::{SolverConfiguration, SolverMethod, VoltageSweep};
}
