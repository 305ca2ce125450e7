//! JSON simulation configuration
//!
//! Every section has defaults, so `{}` describes one reference panel solved with
//! Newton over 1000 voltage samples:
//!
//! ```json
//! {
//!   "panel":  { "I_sc": 9.35, "V_oc": 47.4, "N_s": 72, "R_s": 0.39, "R_sh": 545.82 },
//!   "layout": { "series": 2, "parallel": 3 },
//!   "sweep":  { "samples": 1000 },
//!   "solver": { "method": "newton", "tolerance": 1e-9, "max_iterations": 100 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PvResult;
use crate::physics::{ArrayLayout, PanelSpec};
use crate::solver::{SolverConfiguration, VoltageSweep};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Constants of one panel
    pub panel: PanelSpec,
    /// Series / parallel wiring
    pub layout: ArrayLayout,
    /// Voltage sweep resolution
    pub sweep: VoltageSweep,
    /// Root-finder settings
    pub solver: SolverConfiguration,
}

impl SimulationConfig {
    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> PvResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> PvResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> PvResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every section, first failure wins
    pub fn validate(&self) -> PvResult<()> {
        self.panel.validate()?;
        self.layout.validate()?;
        self.sweep.validate()?;
        self.solver.validate()?;
        Ok(())
    }
}
