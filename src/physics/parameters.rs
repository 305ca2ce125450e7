//! Panel and array electrical parameters
//!
//! Three value types describe the hardware:
//!
//! - [`PanelSpec`]: datasheet constants of ONE panel (deserializable from config)
//! - [`ArrayLayout`]: how many identical panels are wired in series and in parallel
//! - [`ModuleParameters`]: the array-level constants the model actually uses
//!
//! # Array Scaling
//!
//! For `s` panels in series and `p` strings in parallel:
//!
//! ```text
//! I_sc  → p · I_sc        V_oc → s · V_oc        N_s  → s · N_s
//! k_i   → p · k_i         R_s  → R_s · s / p     R_sh → R_sh · s / p
//! ```
//!
//! Scaling the resistances and the current coefficient together with the source terms
//! keeps the array an exact scaled copy of one panel: the I–V curve stretches by `s`
//! along V and by `p` along I.

use serde::{Deserialize, Serialize};

use crate::error::{PvError, PvResult};
use crate::physics::constants::{K_BOLTZMANN, Q_ELECTRON};

// =================================================================================================
// Panel Specification
// =================================================================================================

/// Electrical constants of a single PV panel
///
/// The default values describe a 72-cell crystalline silicon panel
/// (I_sc = 9.35 A, V_oc = 47.4 V), the reference panel of the regression baseline.
///
/// Field names in JSON follow the usual equivalent-circuit symbols.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSpec {
    /// Shunt resistance R_sh \[Ω\]
    #[serde(rename = "R_sh")]
    pub shunt_resistance: f64,

    /// Series resistance R_s \[Ω\]
    #[serde(rename = "R_s")]
    pub series_resistance: f64,

    /// Short-circuit current temperature coefficient k_i \[A/K\]
    #[serde(rename = "k_i")]
    pub isc_temperature_coefficient: f64,

    /// Reference temperature T_n \[K\]
    #[serde(rename = "T_n")]
    pub reference_temperature: f64,

    /// Elementary charge q \[C\]
    #[serde(rename = "q")]
    pub elementary_charge: f64,

    /// Diode ideality factor n
    #[serde(rename = "n")]
    pub ideality_factor: f64,

    /// Boltzmann constant K \[J/K\]
    #[serde(rename = "K")]
    pub boltzmann_constant: f64,

    /// Bandgap energy E_g0 \[eV\]
    #[serde(rename = "E_g0")]
    pub bandgap_energy: f64,

    /// Short-circuit current I_sc \[A\]
    #[serde(rename = "I_sc")]
    pub short_circuit_current: f64,

    /// Open-circuit voltage V_oc \[V\]
    #[serde(rename = "V_oc")]
    pub open_circuit_voltage: f64,

    /// Cells connected in series N_s
    #[serde(rename = "N_s")]
    pub cells_in_series: u32,
}

impl Default for PanelSpec {
    fn default() -> Self {
        Self {
            shunt_resistance: 545.82,
            series_resistance: 0.39,
            isc_temperature_coefficient: 0.037,
            reference_temperature: 298.0,
            elementary_charge: Q_ELECTRON,
            ideality_factor: 1.0,
            boltzmann_constant: K_BOLTZMANN,
            bandgap_energy: 1.1,
            short_circuit_current: 9.35,
            open_circuit_voltage: 47.4,
            cells_in_series: 72,
        }
    }
}

impl PanelSpec {
    /// Check that every constant is physically meaningful
    pub fn validate(&self) -> PvResult<()> {
        let strictly_positive = [
            ("R_sh", self.shunt_resistance),
            ("R_s", self.series_resistance),
            ("T_n", self.reference_temperature),
            ("q", self.elementary_charge),
            ("K", self.boltzmann_constant),
            ("I_sc", self.short_circuit_current),
            ("V_oc", self.open_circuit_voltage),
        ];

        for (name, value) in strictly_positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PvError::InvalidConfiguration(format!(
                    "{} must be a finite positive number, got {}",
                    name, value
                )));
            }
        }

        if !self.ideality_factor.is_finite() || self.ideality_factor < 1.0 {
            return Err(PvError::InvalidConfiguration(format!(
                "ideality factor n must be finite and >= 1, got {}",
                self.ideality_factor
            )));
        }
        if !self.bandgap_energy.is_finite() || self.bandgap_energy < 0.0 {
            return Err(PvError::InvalidConfiguration(format!(
                "E_g0 must be finite and non-negative, got {}",
                self.bandgap_energy
            )));
        }
        if !self.isc_temperature_coefficient.is_finite() {
            return Err(PvError::InvalidConfiguration(format!(
                "k_i must be finite, got {}",
                self.isc_temperature_coefficient
            )));
        }
        if self.cells_in_series == 0 {
            return Err(PvError::InvalidConfiguration(
                "N_s must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

// =================================================================================================
// Array Layout
// =================================================================================================

/// Series / parallel arrangement of identical panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayLayout {
    /// Panels per string
    pub series: u32,
    /// Strings in parallel
    pub parallel: u32,
}

impl Default for ArrayLayout {
    fn default() -> Self {
        Self {
            series: 1,
            parallel: 1,
        }
    }
}

impl ArrayLayout {
    /// Create a layout, rejecting zero counts
    pub fn new(series: u32, parallel: u32) -> PvResult<Self> {
        let layout = Self { series, parallel };
        layout.validate()?;
        Ok(layout)
    }

    /// Both counts must be positive
    pub fn validate(&self) -> PvResult<()> {
        if self.series == 0 {
            return Err(PvError::InvalidConfiguration(
                "number of panels in series must be a positive integer".to_string(),
            ));
        }
        if self.parallel == 0 {
            return Err(PvError::InvalidConfiguration(
                "number of panels in parallel must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }

    /// Total number of panels
    pub fn panel_count(&self) -> u64 {
        u64::from(self.series) * u64::from(self.parallel)
    }
}

// =================================================================================================
// Module Parameters
// =================================================================================================

/// Array-level constants of the single-diode model
///
/// Built once from a [`PanelSpec`] and an [`ArrayLayout`], never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleParameters {
    layout: ArrayLayout,
    shunt_resistance: f64,
    series_resistance: f64,
    isc_temperature_coefficient: f64,
    reference_temperature: f64,
    elementary_charge: f64,
    ideality_factor: f64,
    boltzmann_constant: f64,
    bandgap_energy: f64,
    short_circuit_current: f64,
    open_circuit_voltage: f64,
    cells_in_series: f64,
}

impl ModuleParameters {
    /// Scale a panel to an array
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the panel constants or the layout are invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pv_rs::physics::{ArrayLayout, ModuleParameters, PanelSpec};
    ///
    /// let layout = ArrayLayout::new(2, 3).unwrap();
    /// let params = ModuleParameters::new(&PanelSpec::default(), layout).unwrap();
    ///
    /// assert!((params.open_circuit_voltage() - 94.8).abs() < 1e-9);
    /// assert!((params.short_circuit_current() - 28.05).abs() < 1e-9);
    /// assert_eq!(params.cells_in_series(), 144.0);
    /// ```
    pub fn new(panel: &PanelSpec, layout: ArrayLayout) -> PvResult<Self> {
        panel.validate()?;
        layout.validate()?;
        Ok(Self::scaled(panel, layout))
    }

    /// Scaling without validation, for inputs already known to be valid
    pub(crate) fn scaled(panel: &PanelSpec, layout: ArrayLayout) -> Self {
        let series = f64::from(layout.series);
        let parallel = f64::from(layout.parallel);
        let resistance_scale = series / parallel;

        Self {
            layout,
            shunt_resistance: panel.shunt_resistance * resistance_scale,
            series_resistance: panel.series_resistance * resistance_scale,
            isc_temperature_coefficient: panel.isc_temperature_coefficient * parallel,
            reference_temperature: panel.reference_temperature,
            elementary_charge: panel.elementary_charge,
            ideality_factor: panel.ideality_factor,
            boltzmann_constant: panel.boltzmann_constant,
            bandgap_energy: panel.bandgap_energy,
            short_circuit_current: panel.short_circuit_current * parallel,
            open_circuit_voltage: panel.open_circuit_voltage * series,
            cells_in_series: f64::from(panel.cells_in_series) * series,
        }
    }

    /// Reference panel scaled to the given layout
    pub fn reference(layout: ArrayLayout) -> PvResult<Self> {
        Self::new(&PanelSpec::default(), layout)
    }

    pub fn layout(&self) -> ArrayLayout {
        self.layout
    }

    /// Shunt resistance R_sh \[Ω\]
    pub fn shunt_resistance(&self) -> f64 {
        self.shunt_resistance
    }

    /// Series resistance R_s \[Ω\]
    pub fn series_resistance(&self) -> f64 {
        self.series_resistance
    }

    /// Short-circuit temperature coefficient k_i \[A/K\]
    pub fn isc_temperature_coefficient(&self) -> f64 {
        self.isc_temperature_coefficient
    }

    /// Reference temperature T_n \[K\]
    pub fn reference_temperature(&self) -> f64 {
        self.reference_temperature
    }

    /// Elementary charge q \[C\]
    pub fn elementary_charge(&self) -> f64 {
        self.elementary_charge
    }

    /// Ideality factor n
    pub fn ideality_factor(&self) -> f64 {
        self.ideality_factor
    }

    /// Boltzmann constant K \[J/K\]
    pub fn boltzmann_constant(&self) -> f64 {
        self.boltzmann_constant
    }

    /// Bandgap energy E_g0 \[eV\]
    pub fn bandgap_energy(&self) -> f64 {
        self.bandgap_energy
    }

    /// Short-circuit current I_sc \[A\]
    pub fn short_circuit_current(&self) -> f64 {
        self.short_circuit_current
    }

    /// Open-circuit voltage V_oc \[V\]
    pub fn open_circuit_voltage(&self) -> f64 {
        self.open_circuit_voltage
    }

    /// Cells in series N_s (array total)
    pub fn cells_in_series(&self) -> f64 {
        self.cells_in_series
    }
}

// =================================================================================================
// Tests
// =================================================================================================
