//! Physical constants and reference values
//!
//! The elementary charge and Boltzmann constant keep the CODATA 1998 values the
//! reference panel constants were characterised with, so the regression baseline
//! stays reproducible.

/// Elementary charge (C)
pub const Q_ELECTRON: f64 = 1.60217646e-19;

/// Boltzmann constant (J/K)
pub const K_BOLTZMANN: f64 = 1.3806503e-23;

/// Offset between the Celsius and Kelvin scales
pub const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Irradiance at standard test conditions (W/m²)
pub const STC_IRRADIANCE: f64 = 1000.0;

/// Cell temperature at standard test conditions (°C)
pub const STC_TEMPERATURE: f64 = 25.0;

/// Largest argument accepted by `exp`, kept just below `ln(f64::MAX)` ≈ 709.78
pub const MAX_EXP_ARGUMENT: f64 = 709.0;

/// `exp(x)` that reports overflow instead of returning infinity
///
/// # Returns
///
/// `None` when `x` is NaN or larger than [`MAX_EXP_ARGUMENT`].
#[inline]
pub fn checked_exp(x: f64) -> Option<f64> {
    if x.is_nan() || x > MAX_EXP_ARGUMENT {
        return None;
    }
    Some(x.exp())
}

/// Convert a Celsius temperature to Kelvin
#[inline]
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + CELSIUS_TO_KELVIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_exp_in_range() {
        assert_eq!(checked_exp(0.0), Some(1.0));
        assert!(checked_exp(700.0).unwrap().is_finite());
        assert_eq!(checked_exp(-1e6), Some(0.0));
    }

    #[test]
    fn test_checked_exp_overflow() {
        assert_eq!(checked_exp(710.0), None);
        assert_eq!(checked_exp(f64::INFINITY), None);
        assert_eq!(checked_exp(f64::NAN), None);
    }

    #[test]
    fn test_max_argument_below_f64_limit() {
        assert!(MAX_EXP_ARGUMENT.exp().is_finite());
        assert!(MAX_EXP_ARGUMENT < f64::MAX.ln());
    }

    #[test]
    fn test_celsius_to_kelvin() {
        assert!((celsius_to_kelvin(25.0) - 298.15).abs() < 1e-12);
        assert_eq!(celsius_to_kelvin(-273.15), 0.0);
    }
}
