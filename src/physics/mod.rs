//! Physical description of the PV hardware and its environment
//!
//! - **constants**: physical constants and overflow-checked `exp`
//! - **parameters**: panel datasheet values, array layout, derived module parameters
//! - **conditions**: irradiance and temperature of one evaluation
//! - **traits**: [`ResidualModel`], the seam between physics and root-finding
//!
//! The physics states the equations; the [`solver`](crate::solver) module solves them.

pub mod conditions;
pub mod constants;
pub mod parameters;
pub mod traits;

pub use conditions::OperatingCondition;
pub use parameters::{ArrayLayout, ModuleParameters, PanelSpec};
pub use traits::ResidualModel;
