//! Spectral analysis for the focus pipeline
//!
//! Everything between a raw sample window and a focus decision lives here:
//! Welch PSD estimation, band power extraction, and the binary classifier.
//! All of it is pure; the session loop owns every side effect.

pub mod bands;
pub mod classifier;
pub mod error;
pub mod welch;

// Re-export commonly used items
pub use bands::{band_power, band_powers};
pub use classifier::classify;
pub use error::AnalysisError;
pub use welch::WelchEstimator;
