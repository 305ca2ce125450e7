//! Ambient operating conditions

use crate::error::{PvError, PvResult};
use crate::physics::constants::{celsius_to_kelvin, STC_IRRADIANCE, STC_TEMPERATURE};

/// Irradiance and temperature for one evaluation
///
/// Temperature is given in °C, as it arrives from the caller, and converted to Kelvin
/// on demand. Negative Celsius values are valid; only temperatures at or below
/// absolute zero are rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingCondition {
    irradiance: f64,
    temperature: f64,
}

impl OperatingCondition {
    /// Validate and build a condition
    ///
    /// # Arguments
    ///
    /// * `irradiance` - G \[W/m²\], finite and strictly positive
    /// * `temperature` - T \[°C\], finite and above absolute zero
    ///
    /// # Errors
    ///
    /// `InvalidInput` describing the first rejected value.
    pub fn new(irradiance: f64, temperature: f64) -> PvResult<Self> {
        if !irradiance.is_finite() || irradiance <= 0.0 {
            return Err(PvError::InvalidInput(format!(
                "irradiance (G) must be a finite positive number, got {}",
                irradiance
            )));
        }
        if !temperature.is_finite() {
            return Err(PvError::InvalidInput(format!(
                "temperature (T) must be a finite number, got {}",
                temperature
            )));
        }
        if celsius_to_kelvin(temperature) <= 0.0 {
            return Err(PvError::InvalidInput(format!(
                "temperature (T) must be above absolute zero, got {} °C",
                temperature
            )));
        }

        Ok(Self {
            irradiance,
            temperature,
        })
    }

    /// Standard test conditions: 1000 W/m², 25 °C
    pub fn stc() -> Self {
        Self {
            irradiance: STC_IRRADIANCE,
            temperature: STC_TEMPERATURE,
        }
    }

    /// Irradiance G \[W/m²\]
    pub fn irradiance(&self) -> f64 {
        self.irradiance
    }

    /// Temperature \[°C\]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Temperature \[K\]
    pub fn kelvin(&self) -> f64 {
        celsius_to_kelvin(self.temperature)
    }

    /// G relative to the STC irradiance
    pub fn irradiance_ratio(&self) -> f64 {
        self.irradiance / STC_IRRADIANCE
    }
}
