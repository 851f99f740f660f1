//! Binary focus classification
//!
//! Decisions are memoryless: the same band powers and policy always give
//! the same answer, so any logged row can be re-derived offline.

use focus_types::{BandPowers, FocusPolicy};

/// Apply `policy` to one tick's band powers.
pub fn classify(powers: &BandPowers, policy: &FocusPolicy) -> bool {
    match policy {
        FocusPolicy::RatioThreshold { total_threshold } => {
            powers.total > *total_threshold && powers.beta > powers.alpha
        }
        FocusPolicy::DualRange { alpha, beta } => {
            alpha.contains(powers.alpha) && beta.contains(powers.beta)
        }
    }
}
