//! Physical models of the PV module
//!
//! All models implement the [`ResidualModel`](crate::physics::ResidualModel) trait.
//! A model states the implicit current equation for every voltage sample; the
//! [`solver`](crate::solver) module finds its roots.
//!
//! # Available Models
//!
//! ## [`SingleDiodeModel`]
//!
//! Five-parameter single-diode equivalent circuit (I_ph, I_o, n, R_s, R_sh) with
//! temperature-adjusted photocurrent and saturation current.

pub mod single_diode;

pub use single_diode::SingleDiodeModel;
