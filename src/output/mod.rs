//! Output of simulation results
//!
//! - **Export**: CSV files for external analysis
//! - **Visualization**: PNG/SVG plots using plotters (feature `plot`)
//!
//! ```text
//! output/
//! ├── export/             ← Data export
//! │   ├── mod.rs          ← Exporter trait
//! │   └── csv.rs
//! └── visualization/      ← Plots (feature "plot")
//!     ├── config.rs
//!     └── curves.rs
//! ```

pub mod export;
#[cfg(feature = "plot")]
pub mod visualization;

pub use export::{CsvConfig, CsvExporter, CsvMetadata, Exporter};

#[cfg(feature = "plot")]
pub use visualization::{plot_iv_curve, plot_iv_family, plot_pv_curve, PlotConfig};
