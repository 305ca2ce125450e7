//! Single-diode equivalent circuit of a PV module
//!
//! The module is a current source I_ph in parallel with a diode and a shunt resistance
//! R_sh, all behind a series resistance R_s. At terminal voltage V the current I solves
//!
//! ```text
//! F(I) = I_ph - I_o · (exp((V + I·R_s) / a) - 1) - (V + I·R_s) / R_sh - I = 0
//! ```
//!
//! with the modified thermal voltage `a = n · N_s · K · T_k / q`.
//!
//! # Temperature dependence
//!
//! ```text
//! I_rs = I_sc / (exp(V_oc / a) - 1)
//! I_o  = I_rs · (T_k / T_n)³ · exp(q · E_g0 · (1/T_n - 1/T_k) / (n · K))
//! I_ph = (I_sc + k_i · (T_k - T_n)) · G / 1000
//! ```
//!
//! # Example
//!
//! ```rust
//! use pv_rs::models::SingleDiodeModel;
//! use pv_rs::physics::{ArrayLayout, ModuleParameters, OperatingCondition};
//! use pv_rs::solver::{SolverConfiguration, VoltageSweep};
//!
//! let params = ModuleParameters::reference(ArrayLayout::default()).unwrap();
//! let voltages = VoltageSweep::new(100).unwrap().voltages(params.open_circuit_voltage());
//! let model = SingleDiodeModel::new(
//!     &params,
//!     &OperatingCondition::stc(),
//!     voltages,
//!     SolverConfiguration::default().parallel_threshold,
//! )
//! .unwrap();
//!
//! assert!((model.photocurrent() - 9.35555).abs() < 1e-9);
//! ```

use nalgebra::DVector;

use crate::error::{PvError, PvResult};
use crate::physics::constants::{checked_exp, STC_IRRADIANCE};
use crate::physics::{ModuleParameters, OperatingCondition, ResidualModel};
use crate::solver::evaluate_samples;

/// Implicit diode equation at one operating condition, over a set of voltages
#[derive(Clone, Debug)]
pub struct SingleDiodeModel {
    // ==================== Circuit ====================
    /// Series resistance R_s \[Ω\]
    series_resistance: f64,
    /// Shunt resistance R_sh \[Ω\]
    shunt_resistance: f64,
    /// Short-circuit current I_sc \[A\], starting guess of every sample
    short_circuit_current: f64,

    // ==================== Temperature-adjusted ====================
    /// Modified thermal voltage a \[V\]
    thermal_voltage: f64,
    /// Reverse saturation current I_rs \[A\]
    reference_saturation_current: f64,
    /// Diode saturation current I_o \[A\]
    saturation_current: f64,
    /// Photocurrent I_ph \[A\]
    photocurrent: f64,

    // ==================== Sweep ====================
    voltages: DVector<f64>,
    parallel_threshold: usize,
}

impl SingleDiodeModel {
    /// Build the equation for one operating condition
    ///
    /// # Arguments
    ///
    /// * `params` - Array-level constants
    /// * `condition` - Irradiance and temperature
    /// * `voltages` - Terminal voltages to solve for \[V\]
    /// * `parallel_threshold` - Sample count above which evaluation runs on rayon
    ///
    /// # Errors
    ///
    /// `NumericOverflow` when I_rs, I_o or I_ph cannot be represented, e.g. at a few
    /// Kelvin where `V_oc / a` exceeds the range of `exp`.
    pub fn new(
        params: &ModuleParameters,
        condition: &OperatingCondition,
        voltages: DVector<f64>,
        parallel_threshold: usize,
    ) -> PvResult<Self> {
        let t_k = condition.kelvin();
        let t_n = params.reference_temperature();
        let q = params.elementary_charge();
        let n = params.ideality_factor();
        let k = params.boltzmann_constant();

        let thermal_voltage = n * params.cells_in_series() * k * t_k / q;
        if !thermal_voltage.is_finite() || thermal_voltage <= 0.0 {
            return Err(PvError::overflow(
                "thermal voltage",
                format!("a = {} at T = {} K", thermal_voltage, t_k),
            ));
        }

        // ====== Reverse saturation current ======

        let exponent = params.open_circuit_voltage() / thermal_voltage;
        checked_exp(exponent).ok_or_else(|| {
            PvError::overflow("reverse saturation current", format!("exp({})", exponent))
        })?;
        let reference_saturation_current = params.short_circuit_current() / exponent.exp_m1();
        finite("reverse saturation current", reference_saturation_current)?;

        // ====== Diode saturation current ======

        let exponent = q * params.bandgap_energy() * (1.0 / t_n - 1.0 / t_k) / (n * k);
        let bandgap_factor = checked_exp(exponent).ok_or_else(|| {
            PvError::overflow("saturation current", format!("exp({})", exponent))
        })?;
        let saturation_current =
            reference_saturation_current * (t_k / t_n).powi(3) * bandgap_factor;
        finite("saturation current", saturation_current)?;

        // ====== Photocurrent ======

        let photocurrent = (params.short_circuit_current()
            + params.isc_temperature_coefficient() * (t_k - t_n))
            * (condition.irradiance() / STC_IRRADIANCE);
        finite("photocurrent", photocurrent)?;

        Ok(Self {
            series_resistance: params.series_resistance(),
            shunt_resistance: params.shunt_resistance(),
            short_circuit_current: params.short_circuit_current(),
            thermal_voltage,
            reference_saturation_current,
            saturation_current,
            photocurrent,
            voltages,
            parallel_threshold,
        })
    }

    /// Photocurrent I_ph \[A\]
    pub fn photocurrent(&self) -> f64 {
        self.photocurrent
    }

    /// Diode saturation current I_o \[A\]
    pub fn saturation_current(&self) -> f64 {
        self.saturation_current
    }

    /// Reverse saturation current I_rs \[A\]
    pub fn reference_saturation_current(&self) -> f64 {
        self.reference_saturation_current
    }

    /// Modified thermal voltage a = n·N_s·K·T_k/q \[V\]
    pub fn thermal_voltage(&self) -> f64 {
        self.thermal_voltage
    }

    pub fn voltages(&self) -> &DVector<f64> {
        &self.voltages
    }

    /// Diode term exp((V + I·R_s)/a) - 1, or overflow
    ///
    /// Computed with `exp_m1` so the term keeps its precision near V + I·R_s = 0, where
    /// a large I_o would otherwise amplify the cancellation.
    #[inline]
    fn diode_exp_m1(&self, voltage: f64, current: f64) -> PvResult<f64> {
        let exponent = (voltage + current * self.series_resistance) / self.thermal_voltage;
        checked_exp(exponent).ok_or_else(|| {
            PvError::overflow(
                "diode current",
                format!("exp({}) at V = {} V, I = {} A", exponent, voltage, current),
            )
        })?;
        Ok(exponent.exp_m1())
    }

    fn check_len(&self, currents: &DVector<f64>) -> PvResult<()> {
        if currents.len() != self.voltages.len() {
            return Err(PvError::InvalidConfiguration(format!(
                "current vector has {} samples, voltage sweep has {}",
                currents.len(),
                self.voltages.len()
            )));
        }
        Ok(())
    }
}

fn finite(stage: &'static str, value: f64) -> PvResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PvError::overflow(stage, format!("non-finite value {}", value)))
    }
}

impl ResidualModel for SingleDiodeModel {
    fn points(&self) -> usize {
        self.voltages.len()
    }

    fn initial_guess(&self) -> DVector<f64> {
        DVector::from_element(self.voltages.len(), self.short_circuit_current)
    }

    fn residual(&self, currents: &DVector<f64>) -> PvResult<DVector<f64>> {
        self.check_len(currents)?;

        evaluate_samples(self.voltages.len(), self.parallel_threshold, |i| {
            let v = self.voltages[i];
            let current = currents[i];
            let diode = self.diode_exp_m1(v, current)?;
            let drop = v + current * self.series_resistance;

            Ok(self.photocurrent
                - self.saturation_current * diode
                - drop / self.shunt_resistance
                - current)
        })
    }

    fn derivative(&self, currents: &DVector<f64>) -> PvResult<DVector<f64>> {
        self.check_len(currents)?;

        let rs = self.series_resistance;
        evaluate_samples(self.voltages.len(), self.parallel_threshold, |i| {
            let e = self.diode_exp_m1(self.voltages[i], currents[i])? + 1.0;
            Ok(-self.saturation_current * e * rs / self.thermal_voltage
                - rs / self.shunt_resistance
                - 1.0)
        })
    }

    /// At I = -V/R_s the diode and shunt carry nothing and F = I_ph + V/R_s; at
    /// I = I_ph they carry a non-negative current. Ordered with I_ph, these two currents
    /// therefore enclose the root of every sample whatever the sign of V.
    fn bracket(&self) -> Option<(DVector<f64>, DVector<f64>)> {
        let rising = self
            .voltages
            .map(|v| (-v / self.series_resistance).min(self.photocurrent));
        let falling = self
            .voltages
            .map(|v| (-v / self.series_resistance).max(self.photocurrent));
        Some((rising, falling))
    }

    /// Largest of I_ph, I, the shunt current and the diode current, the latter widened
    /// by the relative error its exponent inherits from V + I·R_s
    fn residual_scale(&self, currents: &DVector<f64>) -> PvResult<DVector<f64>> {
        self.check_len(currents)?;

        let rs = self.series_resistance;
        evaluate_samples(self.voltages.len(), self.parallel_threshold, |i| {
            let v = self.voltages[i];
            let current = currents[i];
            let e = self.diode_exp_m1(v, current)? + 1.0;
            let diode = self.saturation_current
                * e
                * (1.0 + (v.abs() + (current * rs).abs()) / self.thermal_voltage);

            Ok(self
                .photocurrent
                .abs()
                .max(current.abs())
                .max((v + current * rs).abs() / self.shunt_resistance)
                .max(diode))
        })
    }

    fn name(&self) -> &str {
        "Single diode"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
