//! Core data types for the spectral pipeline
//!
//! All quantities are expressed in microvolts: raw windows carry µV
//! amplitude samples, spectra carry µV²/Hz power densities, and band powers
//! are sums of power bins.

use serde::{Deserialize, Serialize};

/// One-sided power spectrum produced by the Welch estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Frequency of each bin in Hz, ascending from 0 to Nyquist
    pub frequencies: Vec<f32>,
    /// Power spectral density of each bin (µV²/Hz)
    pub power: Vec<f32>,
}

impl Spectrum {
    /// Create a new spectrum. Frequencies and power must be bin-aligned.
    pub fn new(frequencies: Vec<f32>, power: Vec<f32>) -> Self {
        debug_assert_eq!(frequencies.len(), power.len());
        Self { frequencies, power }
    }

    /// Number of frequency bins
    pub fn bin_count(&self) -> usize {
        self.frequencies.len()
    }

    /// Spacing between adjacent bins in Hz
    pub fn resolution(&self) -> f32 {
        if self.frequencies.len() < 2 {
            0.0
        } else {
            self.frequencies[1] - self.frequencies[0]
        }
    }

    /// Iterate over `(frequency, power)` pairs
    pub fn bins(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.power.iter().copied())
    }
}

/// Summed spectral power for the bands the classifier consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPowers {
    /// Alpha band power
    pub alpha: f32,
    /// Beta band power
    pub beta: f32,
    /// Power summed over the entire spectrum
    pub total: f32,
}

/// One aligned sample of the derived focus signal, as consumed by live
/// displays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    /// Seconds since the session started
    pub elapsed_secs: f32,
    /// Alpha band power at this tick
    pub alpha: f32,
    /// Beta band power at this tick
    pub beta: f32,
    /// `Some(beta)` when the tick classified as focused, `None` otherwise.
    /// Displays draw the marker on top of the beta trace.
    pub decision_marker: Option<f32>,
}

impl HistoryPoint {
    pub fn new(elapsed_secs: f32, alpha: f32, beta: f32, focused: bool) -> Self {
        Self {
            elapsed_secs,
            alpha,
            beta,
            decision_marker: focused.then_some(beta),
        }
    }

    /// Whether this point was classified as focused
    pub fn focused(&self) -> bool {
        self.decision_marker.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectrum_resolution() {
        let spectrum = Spectrum::new(vec![0.0, 2.0, 4.0], vec![1.0, 2.0, 3.0]);
        assert_eq!(spectrum.bin_count(), 3);
        assert_eq!(spectrum.resolution(), 2.0);

        let single = Spectrum::new(vec![0.0], vec![1.0]);
        assert_eq!(single.resolution(), 0.0);
    }

    #[test]
    fn test_spectrum_bins_are_paired() {
        let spectrum = Spectrum::new(vec![0.0, 1.0], vec![5.0, 7.0]);
        let pairs: Vec<(f32, f32)> = spectrum.bins().collect();
        assert_eq!(pairs, vec![(0.0, 5.0), (1.0, 7.0)]);
    }

    #[test]
    fn test_history_point_marker() {
        let focused = HistoryPoint::new(1.0, 10.0, 20.0, true);
        assert!(focused.focused());
        assert_eq!(focused.decision_marker, Some(20.0));

        let idle = HistoryPoint::new(1.2, 10.0, 20.0, false);
        assert!(!idle.focused());
        assert_eq!(idle.decision_marker, None);
    }
}
