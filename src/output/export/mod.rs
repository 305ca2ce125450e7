//! Export of simulation results
//!
//! The [`Exporter`] trait abstracts the file format; each format lives in its own
//! sub-module. CSV is the only format so far.
//!
//! # Usage example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use pv_rs::output::export::{CsvExporter, Exporter};
//! use pv_rs::PvSolver;
//!
//! let curve = PvSolver::default().iv_curve(1000.0, 25.0).unwrap();
//! let exporter = CsvExporter::default();
//!
//! // Full sweep
//! exporter.export_curve(&curve, None, Path::new("iv.csv")).unwrap();
//!
//! // Downsampled to 100 points
//! exporter.export_curve(&curve, Some(100), Path::new("iv_light.csv")).unwrap();
//! ```

pub mod csv;

pub use csv::{CsvConfig, CsvError, CsvExporter, CsvMetadata};

use std::path::Path;

use crate::curve::{IvCurve, MppResult};
use crate::physics::OperatingCondition;

/// Abstraction trait for all export formats.
///
/// # Parameter `n_points`
///
/// - `None`: exports every sample of the sweep
/// - `Some(n)`: uniform downsampling to `n` points, always keeping the first
///   (short circuit) and last (open circuit) samples
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Voltage, current and power of every sample
    fn export_curve(
        &self,
        curve: &IvCurve,
        n_points: Option<usize>,
        path: &Path,
    ) -> Result<(), Self::Error>;

    /// One MPP per operating condition
    fn export_mpp_table(
        &self,
        rows: &[(OperatingCondition, MppResult)],
        path: &Path,
    ) -> Result<(), Self::Error>;
}
