//! I–V curve samples and maximum-power-point reduction

use std::fmt;

use nalgebra::DVector;
use serde::Serialize;

use crate::error::{PvError, PvResult};

/// One operating point on the I–V curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IvCurveSample {
    /// Terminal voltage \[V\]
    pub voltage: f64,
    /// Terminal current \[A\]
    pub current: f64,
    /// Output power V·I \[W\]
    pub power: f64,
}

impl IvCurveSample {
    pub fn new(voltage: f64, current: f64) -> Self {
        Self {
            voltage,
            current,
            power: voltage * current,
        }
    }
}

/// Maximum-power point of a curve
///
/// # Example
///
/// ```rust
/// use pv_rs::curve::IvCurve;
/// use nalgebra::DVector;
///
/// let v = DVector::from_vec(vec![0.0, 1.0, 2.0, 3.0]);
/// let i = DVector::from_vec(vec![3.0, 2.9, 2.0, 0.0]);
/// let mpp = IvCurve::from_solution(&v, &i).unwrap().maximum_power_point().unwrap();
///
/// assert_eq!(mpp.index, 2);
/// assert_eq!(mpp.power, 4.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MppResult {
    /// Vmp \[V\]
    pub voltage: f64,
    /// Imp \[A\]
    pub current: f64,
    /// Pmax \[W\]
    pub power: f64,
    /// Index of the sample in the sweep
    pub index: usize,
}

impl MppResult {
    /// (Vmp, Imp, Pmax)
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.voltage, self.current, self.power)
    }

    pub fn sample(&self) -> IvCurveSample {
        IvCurveSample {
            voltage: self.voltage,
            current: self.current,
            power: self.power,
        }
    }
}

impl fmt::Display for MppResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vmp = {:.2} V, Imp = {:.2} A, Pmax = {:.2} W",
            self.voltage, self.current, self.power
        )
    }
}

/// Ordered samples of a voltage sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IvCurve {
    samples: Vec<IvCurveSample>,
}

impl IvCurve {
    /// Pair solved currents with their voltages
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` if the vectors differ in length
    /// - `NumericOverflow` if a current or a power is not finite
    pub fn from_solution(voltages: &DVector<f64>, currents: &DVector<f64>) -> PvResult<Self> {
        if voltages.len() != currents.len() {
            return Err(PvError::InvalidConfiguration(format!(
                "{} voltages for {} currents",
                voltages.len(),
                currents.len()
            )));
        }

        let samples = voltages
            .iter()
            .zip(currents.iter())
            .enumerate()
            .map(|(i, (&v, &c))| {
                let sample = IvCurveSample::new(v, c);
                if sample.current.is_finite() && sample.power.is_finite() {
                    Ok(sample)
                } else {
                    Err(PvError::overflow(
                        "power",
                        format!("V = {}, I = {}, P = {} at sample {}", v, c, sample.power, i),
                    ))
                }
            })
            .collect::<PvResult<Vec<_>>>()?;

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[IvCurveSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn voltages(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.voltage).collect()
    }

    pub fn currents(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.current).collect()
    }

    pub fn powers(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.power).collect()
    }

    /// Sample with the largest power; the first one wins on ties
    ///
    /// `None` only for an empty curve.
    pub fn maximum_power_point(&self) -> Option<MppResult> {
        let mut best: Option<(usize, &IvCurveSample)> = None;
        for (index, sample) in self.samples.iter().enumerate() {
            match best {
                Some((_, current)) if sample.power <= current.power => {}
                _ => best = Some((index, sample)),
            }
        }

        best.map(|(index, sample)| MppResult {
            voltage: sample.voltage,
            current: sample.current,
            power: sample.power,
            index,
        })
    }

    /// Keep about `n_points` evenly spaced samples, always including the first and the last
    pub fn downsample(&self, n_points: usize) -> Vec<IvCurveSample> {
        let len = self.samples.len();
        if n_points >= len || len <= 2 {
            return self.samples.clone();
        }
        if n_points <= 1 {
            return self.samples.first().copied().into_iter().collect();
        }

        let last = len - 1;
        let mut indices: Vec<usize> = (0..n_points)
            .map(|k| (k * last + (n_points - 1) / 2) / (n_points - 1))
            .collect();
        indices.dedup();

        indices.into_iter().map(|i| self.samples[i]).collect()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
