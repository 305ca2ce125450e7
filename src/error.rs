//! Error types
//!
//! Every fallible operation in the crate returns [`PvResult`]. The variants map one to
//! one onto the failure classes a caller can react to:
//!
//! | Variant                  | Raised when                                              |
//! |--------------------------|----------------------------------------------------------|
//! | `InvalidInput`           | irradiance / temperature rejected before any computation |
//! | `InvalidConfiguration`   | panel counts, panel constants or solver settings invalid |
//! | `NumericOverflow`        | an exponential or a result left the f64 range            |
//! | `SolverDidNotConverge`   | a sample missed the residual tolerance                   |
//! | `Io` / `Json`            | configuration files and exports                          |

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PvError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Numeric overflow in {stage}: {detail}")]
    NumericOverflow { stage: &'static str, detail: String },

    #[error(
        "{solver} did not converge at sample {sample} after {iterations} iterations \
         (residual {residual:e})"
    )]
    SolverDidNotConverge {
        solver: &'static str,
        sample: usize,
        iterations: usize,
        residual: f64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PvResult<T> = Result<T, PvError>;

impl PvError {
    /// Shorthand for an overflow raised at a named computation stage
    pub(crate) fn overflow(stage: &'static str, detail: impl Into<String>) -> Self {
        PvError::NumericOverflow {
            stage,
            detail: detail.into(),
        }
    }

    /// True for the two variants a caller can fix by changing its arguments
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PvError::InvalidInput(_) | PvError::InvalidConfiguration(_)
        )
    }
}
