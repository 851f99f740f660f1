//! Shared types for the focus classification system
//!
//! This crate contains the core data types used throughout the pipeline:
//! spectral data, per-band power sums, the rolling history consumed by live
//! displays, and the session configuration surface.

pub mod config;
pub mod data;
pub mod history;

// Re-export commonly used types
pub use config::*;
pub use data::*;
pub use history::*;
