//! Visualization of I–V and P–V curves using the `plotters` library
//!
//! # Organization
//!
//! - **config**: Shared plot configuration (`PlotConfig`)
//! - **curves**: I–V, P–V and multi-condition plots
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pv_rs::output::visualization::{plot_iv_curve, plot_pv_curve, PlotConfig};
//!
//! let curve = solver.iv_curve(1000.0, 25.0)?;
//!
//! plot_iv_curve(&curve, "iv.png", None)?;
//! plot_pv_curve(&curve, "pv.svg", Some(&PlotConfig::pv_curve("STC")))?;
//! ```

pub mod config;
pub mod curves;

pub use config::{PlotConfig, NO_TITLE};
pub use curves::{plot_iv_curve, plot_iv_family, plot_pv_curve};
