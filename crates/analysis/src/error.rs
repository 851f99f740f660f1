//! Errors for the spectral pipeline

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Window too short for even one Welch segment. Callers treat this as
    /// "skip the tick", never as fatal.
    #[error("insufficient data: window has {got} samples, need at least {need}")]
    InsufficientData { got: usize, need: usize },
    /// Estimator built with unusable parameters
    #[error("invalid estimator configuration: {0}")]
    Configuration(String),
}
