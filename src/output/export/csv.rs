//! CSV export of I–V curves and MPP tables
//!
//! Plain text output readable by spreadsheets, pandas or gnuplot.
//!
//! # Features
//!
//! - **Metadata header**: optional `#` comment lines with panel and solver information
//! - **Customizable**: delimiter, decimal separator, precision, column headers
//! - **Downsampling**: `n_points` keeps the first and last sample of the sweep
//! - **Validation**: empty curves and non-finite values are rejected before the file is created
//!
//! # Output
//!
//! ```csv
//! # PV Single-Diode Simulation
//! # Generated: 2026-02-11T15:30:00+00:00
//! # Model: Single diode
//! # Solver: Newton-Raphson
//! # Irradiance: 1000 W/m²
//! # Temperature: 25 °C
//! #
//! Voltage (V),Current (A),Power (W)
//! 0.000000,9.348870,0.000000
//! ...
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::curve::{IvCurve, IvCurveSample, MppResult};
use crate::output::export::Exporter;
use crate::physics::OperatingCondition;

// =============================================================================
// Errors
// =============================================================================

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("Empty data: {0}")]
    EmptyData(&'static str),

    #[error("Invalid data: non-finite {column} at row {row}")]
    NonFinite { column: &'static str, row: usize },

    #[error("Invalid configuration: delimiter and decimal separator are both '{0}'")]
    AmbiguousSeparator(char),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use pv_rs::output::export::CsvConfig;
///
/// let config = CsvConfig::european().precision(3);
/// assert_eq!(config.delimiter, ';');
/// assert_eq!(config.decimal_separator, ',');
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places (default: 6)
    pub precision: usize,

    /// Metadata written as header comments, if any
    pub metadata: Option<CsvMetadata>,

    pub voltage_header: String,
    pub current_header: String,
    pub power_header: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            metadata: None,
            voltage_header: "Voltage (V)".to_string(),
            current_header: "Current (A)".to_string(),
            power_header: "Power (W)".to_string(),
        }
    }
}

impl CsvConfig {
    /// Semicolon delimiter, comma decimal separator
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    fn validate(&self) -> Result<(), CsvError> {
        if self.delimiter == self.decimal_separator {
            return Err(CsvError::AmbiguousSeparator(self.delimiter));
        }
        Ok(())
    }

    fn format_number(&self, value: f64) -> String {
        let formatted = format!("{:.prec$}", value, prec = self.precision);
        if self.decimal_separator != '.' {
            formatted.replace('.', &self.decimal_separator.to_string())
        } else {
            formatted
        }
    }
}

/// Metadata for CSV header comments
///
/// Only the fields that are set are written.
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    /// Model name (e.g. "Single diode")
    pub model_name: Option<String>,

    /// Solver name (e.g. "Newton-Raphson")
    pub solver_name: Option<String>,

    /// Irradiance G (W/m²)
    pub irradiance: Option<f64>,

    /// Temperature T (°C)
    pub temperature: Option<f64>,

    /// Panels in series × strings in parallel
    pub layout: Option<(u32, u32)>,

    /// Maximum-power point of the exported curve
    pub mpp: Option<MppResult>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    pub fn from_condition(model: &str, solver: &str, condition: &OperatingCondition) -> Self {
        Self {
            model_name: Some(model.to_string()),
            solver_name: Some(solver.to_string()),
            irradiance: Some(condition.irradiance()),
            temperature: Some(condition.temperature()),
            ..Default::default()
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom.push((key.into(), value.into()));
    }

    fn write_header<W: Write>(&self, out: &mut W) -> Result<(), CsvError> {
        writeln!(out, "# PV Single-Diode Simulation")?;
        writeln!(out, "# Generated: {}", chrono::Utc::now().to_rfc3339())?;

        if let Some(model) = &self.model_name {
            writeln!(out, "# Model: {}", model)?;
        }
        if let Some(solver) = &self.solver_name {
            writeln!(out, "# Solver: {}", solver)?;
        }
        if let Some(g) = self.irradiance {
            writeln!(out, "# Irradiance: {} W/m²", g)?;
        }
        if let Some(t) = self.temperature {
            writeln!(out, "# Temperature: {} °C", t)?;
        }
        if let Some((series, parallel)) = self.layout {
            writeln!(out, "# Layout: {} series x {} parallel", series, parallel)?;
        }
        if let Some(mpp) = &self.mpp {
            writeln!(out, "# MPP: {}", mpp)?;
        }
        for (key, value) in &self.custom {
            writeln!(out, "# {}: {}", key, value)?;
        }

        writeln!(out, "#")?;
        Ok(())
    }
}

// =============================================================================
// Exporter
// =============================================================================

/// CSV implementation of [`Exporter`]
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    fn write_row<W: Write>(&self, out: &mut W, values: &[f64]) -> Result<(), CsvError> {
        let d = self.config.delimiter.to_string();
        let row: Vec<String> = values.iter().map(|&v| self.config.format_number(v)).collect();
        writeln!(out, "{}", row.join(&d))?;
        Ok(())
    }
}

fn check_finite(samples: &[IvCurveSample]) -> Result<(), CsvError> {
    for (row, s) in samples.iter().enumerate() {
        for (column, value) in [("voltage", s.voltage), ("current", s.current), ("power", s.power)] {
            if !value.is_finite() {
                return Err(CsvError::NonFinite { column, row });
            }
        }
    }
    Ok(())
}

impl Exporter for CsvExporter {
    type Error = CsvError;

    fn export_curve(
        &self,
        curve: &IvCurve,
        n_points: Option<usize>,
        path: &Path,
    ) -> Result<(), CsvError> {
        // ====== Validation ======

        self.config.validate()?;
        if curve.is_empty() {
            return Err(CsvError::EmptyData("the I–V curve has no samples"));
        }
        let samples = match n_points {
            Some(n) => curve.downsample(n),
            None => curve.samples().to_vec(),
        };
        check_finite(&samples)?;

        // ====== Write ======

        let mut out = BufWriter::new(File::create(path)?);
        if let Some(metadata) = &self.config.metadata {
            metadata.write_header(&mut out)?;
        }

        let d = self.config.delimiter;
        writeln!(
            out,
            "{}{}{}{}{}",
            self.config.voltage_header, d, self.config.current_header, d, self.config.power_header
        )?;
        for s in &samples {
            self.write_row(&mut out, &[s.voltage, s.current, s.power])?;
        }

        out.flush()?;
        Ok(())
    }

    fn export_mpp_table(
        &self,
        rows: &[(OperatingCondition, MppResult)],
        path: &Path,
    ) -> Result<(), CsvError> {
        self.config.validate()?;
        if rows.is_empty() {
            return Err(CsvError::EmptyData("no operating conditions"));
        }
        for (row, (_, mpp)) in rows.iter().enumerate() {
            check_finite(&[mpp.sample()]).map_err(|e| match e {
                CsvError::NonFinite { column, .. } => CsvError::NonFinite { column, row },
                other => other,
            })?;
        }

        let mut out = BufWriter::new(File::create(path)?);
        if let Some(metadata) = &self.config.metadata {
            metadata.write_header(&mut out)?;
        }

        let d = self.config.delimiter;
        writeln!(
            out,
            "Irradiance (W/m2){d}Temperature (C){d}Vmp (V){d}Imp (A){d}Pmax (W)"
        )?;
        for (condition, mpp) in rows {
            self.write_row(
                &mut out,
                &[
                    condition.irradiance(),
                    condition.temperature(),
                    mpp.voltage,
                    mpp.current,
                    mpp.power,
                ],
            )?;
        }

        out.flush()?;
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================
