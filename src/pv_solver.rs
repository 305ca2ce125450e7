//! Maximum-power-point solver for a PV module or array
//!
//! [`PvSolver`] ties the pieces together:
//!
//! ```text
//! (G, T) ──► OperatingCondition ──► SingleDiodeModel ──► RootSolver ──► IvCurve ──► MppResult
//!                                     ▲                     ▲
//!                    ModuleParameters + VoltageSweep   SolverConfiguration
//! ```
//!
//! A `PvSolver` holds no mutable state: it can be shared between threads and called
//! concurrently, every call owns its own sample buffers.

use log::{debug, trace, warn};
use nalgebra::DVector;

use crate::config::SimulationConfig;
use crate::curve::{IvCurve, MppResult};
use crate::error::{PvError, PvResult};
use crate::models::SingleDiodeModel;
use crate::physics::{ArrayLayout, ModuleParameters, OperatingCondition, PanelSpec, ResidualModel};
use crate::solver::{RootReport, SolverConfiguration, SolverMethod, VoltageSweep};

/// Single-diode MPP solver with fixed module constants
///
/// # Example
///
/// ```rust
/// use pv_rs::PvSolver;
///
/// let solver = PvSolver::new(1, 1).unwrap();
/// let mpp = solver.solve(1000.0, 25.0).unwrap();
///
/// assert!(mpp.power > 300.0 && mpp.power < 400.0);
/// assert!((mpp.power - mpp.voltage * mpp.current).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PvSolver {
    params: ModuleParameters,
    sweep: VoltageSweep,
    config: SolverConfiguration,
}

impl Default for PvSolver {
    /// One reference panel, default sweep and Newton solver
    fn default() -> Self {
        Self {
            params: ModuleParameters::scaled(&PanelSpec::default(), ArrayLayout::default()),
            sweep: VoltageSweep::default(),
            config: SolverConfiguration::default(),
        }
    }
}

impl PvSolver {
    /// Reference panel wired `series` × `parallel`
    ///
    /// Besides I_sc, V_oc and N_s, the array also scales k_i with `parallel` and R_s, R_sh
    /// with `series / parallel`, so an s × p array is exactly s × p identical panels:
    /// Vmp scales with `series`, Imp with `parallel`. Models that keep the panel's
    /// resistances for the whole array report less power for parallel strings than
    /// this one does.
    ///
    /// ```rust
    /// use pv_rs::PvSolver;
    ///
    /// let panel = PvSolver::new(1, 1).unwrap().solve(1000.0, 25.0).unwrap();
    /// let pair = PvSolver::new(1, 2).unwrap().solve(1000.0, 25.0).unwrap();
    ///
    /// assert_eq!(pair.index, panel.index);
    /// assert!((pair.power - 2.0 * panel.power).abs() < 1e-6);
    /// ```
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when either count is zero.
    pub fn new(series: u32, parallel: u32) -> PvResult<Self> {
        Self::with_panel(&PanelSpec::default(), ArrayLayout::new(series, parallel)?)
    }

    /// Custom panel constants wired according to `layout`
    pub fn with_panel(panel: &PanelSpec, layout: ArrayLayout) -> PvResult<Self> {
        Ok(Self {
            params: ModuleParameters::new(panel, layout)?,
            ..Default::default()
        })
    }

    /// Everything from a configuration file
    pub fn from_config(config: &SimulationConfig) -> PvResult<Self> {
        config.validate()?;
        Ok(Self {
            params: ModuleParameters::new(&config.panel, config.layout)?,
            sweep: config.sweep,
            config: config.solver,
        })
    }

    /// Builder: replace the root-finder configuration
    pub fn with_solver_config(mut self, config: SolverConfiguration) -> PvResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Builder: select the root-finding method
    pub fn with_method(mut self, method: SolverMethod) -> Self {
        self.config.method = method;
        self
    }

    /// Builder: set the number of voltage samples
    pub fn with_samples(mut self, samples: usize) -> PvResult<Self> {
        self.sweep = VoltageSweep::new(samples)?;
        Ok(self)
    }

    pub fn parameters(&self) -> &ModuleParameters {
        &self.params
    }

    pub fn layout(&self) -> ArrayLayout {
        self.params.layout()
    }

    pub fn sweep(&self) -> VoltageSweep {
        self.sweep
    }

    pub fn solver_config(&self) -> &SolverConfiguration {
        &self.config
    }

    /// Check the inputs of one evaluation
    ///
    /// # Errors
    ///
    /// `InvalidInput` when G is not finite and positive, when T is not finite or not
    /// above absolute zero, or when the stored panel counts are invalid. Negative
    /// Celsius temperatures are accepted.
    pub fn validate(&self, irradiance: f64, temperature: f64) -> PvResult<OperatingCondition> {
        self.params
            .layout()
            .validate()
            .map_err(|e| match e {
                PvError::InvalidConfiguration(msg) => PvError::InvalidInput(msg),
                other => other,
            })?;
        OperatingCondition::new(irradiance, temperature)
    }

    /// Maximum-power point at irradiance G \[W/m²\] and temperature T \[°C\]
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: rejected G or T
    /// - `NumericOverflow`: an exponential or a result left the f64 range
    /// - `SolverDidNotConverge`: a voltage sample missed the residual tolerance
    pub fn solve(&self, irradiance: f64, temperature: f64) -> PvResult<MppResult> {
        let condition = self.validate(irradiance, temperature)?;
        self.solve_condition(&condition)
    }

    /// Same as [`solve`](Self::solve) for an already validated condition
    pub fn solve_condition(&self, condition: &OperatingCondition) -> PvResult<MppResult> {
        let curve = self.curve_for(condition)?;
        self.reduce(condition, &curve)
    }

    /// Maximum-power point together with the curve it was taken from, in one sweep
    pub fn solve_with_curve(
        &self,
        irradiance: f64,
        temperature: f64,
    ) -> PvResult<(MppResult, IvCurve)> {
        let condition = self.validate(irradiance, temperature)?;
        let curve = self.curve_for(&condition)?;
        let mpp = self.reduce(&condition, &curve)?;
        Ok((mpp, curve))
    }

    fn reduce(&self, condition: &OperatingCondition, curve: &IvCurve) -> PvResult<MppResult> {
        let mpp = curve.maximum_power_point().ok_or_else(|| {
            PvError::InvalidConfiguration("voltage sweep produced no samples".to_string())
        })?;

        if mpp.power <= 0.0 {
            warn!(
                "No positive power at G = {} W/m², T = {} °C (Pmax = {} W)",
                condition.irradiance(),
                condition.temperature(),
                mpp.power
            );
        } else if mpp.index == 0 || mpp.index + 1 == curve.len() {
            warn!(
                "MPP at the edge of the voltage sweep (sample {} of {}), \
                 the true maximum may lie outside [0, V_oc]",
                mpp.index,
                curve.len()
            );
        }

        debug!(
            "G = {} W/m², T = {} °C: {}",
            condition.irradiance(),
            condition.temperature(),
            mpp
        );

        Ok(mpp)
    }

    /// Full I–V curve over the voltage sweep
    pub fn iv_curve(&self, irradiance: f64, temperature: f64) -> PvResult<IvCurve> {
        let condition = self.validate(irradiance, temperature)?;
        self.curve_for(&condition)
    }

    /// Terminal current at a single voltage \[A\]
    pub fn current_at(&self, irradiance: f64, temperature: f64, voltage: f64) -> PvResult<f64> {
        let condition = self.validate(irradiance, temperature)?;
        if !voltage.is_finite() {
            return Err(PvError::InvalidInput(format!(
                "voltage must be finite, got {}",
                voltage
            )));
        }

        let model = self.model(&condition, DVector::from_element(1, voltage))?;
        let report = self.root_solve(&model)?;
        let current = report.roots[0];
        if !current.is_finite() {
            return Err(PvError::overflow("current", format!("I = {}", current)));
        }
        Ok(current)
    }

    /// Diode equation at this condition over the configured sweep
    pub fn model_for(&self, condition: &OperatingCondition) -> PvResult<SingleDiodeModel> {
        let voltages = self.sweep.voltages(self.params.open_circuit_voltage());
        self.model(condition, voltages)
    }

    fn model(
        &self,
        condition: &OperatingCondition,
        voltages: DVector<f64>,
    ) -> PvResult<SingleDiodeModel> {
        let model =
            SingleDiodeModel::new(&self.params, condition, voltages, self.config.parallel_threshold)?;

        trace!(
            "I_ph = {:e} A, I_o = {:e} A, I_rs = {:e} A, a = {} V",
            model.photocurrent(),
            model.saturation_current(),
            model.reference_saturation_current(),
            model.thermal_voltage()
        );

        Ok(model)
    }

    fn root_solve(&self, model: &dyn ResidualModel) -> PvResult<RootReport> {
        self.config.method.solver().solve(model, &self.config)
    }

    fn curve_for(&self, condition: &OperatingCondition) -> PvResult<IvCurve> {
        let model = self.model_for(condition)?;
        let report = self.root_solve(&model)?;
        IvCurve::from_solution(model.voltages(), &report.roots)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
