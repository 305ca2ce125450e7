//! Voltage sweep definition
//!
//! The sweep resolution trades MPP voltage resolution against compute cost:
//! with `m` samples over [0, V_oc] the MPP voltage is located to within
//! `V_oc / (m - 1)`.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{PvError, PvResult};

/// Default number of voltage samples
pub const DEFAULT_SWEEP_SAMPLES: usize = 1000;

/// Evenly spaced voltage samples over [0, V_max]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoltageSweep {
    /// Number of samples, both end points included
    pub samples: usize,
}

impl Default for VoltageSweep {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SWEEP_SAMPLES,
        }
    }
}

impl VoltageSweep {
    /// Create a sweep, requiring at least the two end points
    pub fn new(samples: usize) -> PvResult<Self> {
        let sweep = Self { samples };
        sweep.validate()?;
        Ok(sweep)
    }

    pub fn validate(&self) -> PvResult<()> {
        if self.samples < 2 {
            return Err(PvError::InvalidConfiguration(format!(
                "Voltage sweep needs at least 2 samples, got {}",
                self.samples
            )));
        }
        Ok(())
    }

    /// Sample voltages from 0 to `v_max`
    ///
    /// Each voltage is computed from its index rather than by accumulating a step,
    /// so the last sample is exactly `v_max`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pv_rs::solver::VoltageSweep;
    ///
    /// let v = VoltageSweep::new(5).unwrap().voltages(2.0);
    /// assert_eq!(v.as_slice(), &[0.0, 0.5, 1.0, 1.5, 2.0]);
    /// ```
    pub fn voltages(&self, v_max: f64) -> DVector<f64> {
        let last = self.samples.saturating_sub(1);
        DVector::from_fn(self.samples, |i, _| {
            if i == last {
                v_max
            } else {
                v_max * (i as f64) / (last as f64)
            }
        })
    }

    /// Spacing between two consecutive samples, zero without two samples
    pub fn step(&self, v_max: f64) -> f64 {
        match self.samples {
            0 | 1 => 0.0,
            m => v_max / (m - 1) as f64,
        }
    }
}
