//! Welch power spectral density estimation
//!
//! The estimator splits a window into half-overlapping segments, removes
//! each segment's mean, applies a Hann window, and averages the one-sided
//! scaled periodograms. Output is µV²/Hz for µV input.

use std::sync::Arc;

use apodize::hanning_iter;
use rustfft::{num_complex::Complex, Fft, FftPlanner};

use focus_types::Spectrum;

use crate::error::AnalysisError;

pub struct WelchEstimator {
    sample_rate_hz: f32,
    segment_len: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    /// One-sided density scale, 2 / (fs * sum(w^2))
    scale: f32,
}

impl WelchEstimator {
    /// Plan an estimator for a fixed sample rate and segment length. The
    /// FFT plan is reused across every call to `estimate`.
    pub fn new(sample_rate_hz: f32, segment_len: usize) -> Result<Self, AnalysisError> {
        if !(sample_rate_hz > 0.0) {
            return Err(AnalysisError::Configuration(
                "sample rate must be positive".into(),
            ));
        }
        if segment_len < 2 {
            return Err(AnalysisError::Configuration(
                "segment length must be at least 2".into(),
            ));
        }
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(segment_len);
        let window: Vec<f32> = hanning_iter(segment_len).map(|v| v as f32).collect();
        let s2: f32 = window.iter().map(|&w| w * w).sum();
        let scale = 2.0 / (sample_rate_hz * s2);
        Ok(Self {
            sample_rate_hz,
            segment_len,
            fft,
            window,
            scale,
        })
    }

    pub fn segment_len(&self) -> usize {
        self.segment_len
    }

    /// Frequency spacing of the output bins in Hz.
    pub fn resolution(&self) -> f32 {
        self.sample_rate_hz / self.segment_len as f32
    }

    /// Estimate the one-sided PSD of `samples`.
    ///
    /// Segments overlap by 50%; a trailing partial segment is dropped.
    /// Fails with `InsufficientData` when the window cannot fill a single
    /// segment, leaving the caller to decide whether that is fatal.
    pub fn estimate(&self, samples: &[f32]) -> Result<Spectrum, AnalysisError> {
        let n = self.segment_len;
        if samples.len() < n {
            return Err(AnalysisError::InsufficientData {
                got: samples.len(),
                need: n,
            });
        }

        let bins = n / 2 + 1;
        let step = n / 2;
        let mut averaged = vec![0.0f32; bins];
        let mut buffer: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); n];
        let mut segments = 0usize;

        let mut start = 0;
        while start + n <= samples.len() {
            let segment = &samples[start..start + n];
            let mean = segment.iter().sum::<f32>() / n as f32;
            for ((slot, &sample), &w) in buffer
                .iter_mut()
                .zip(segment.iter())
                .zip(self.window.iter())
            {
                *slot = Complex::new((sample - mean) * w, 0.0);
            }
            self.fft.process(&mut buffer);

            for (k, value) in averaged.iter_mut().enumerate() {
                let mut bin = buffer[k].norm_sqr() * self.scale;
                // DC and Nyquist have no mirrored half to fold in
                if k == 0 || (n % 2 == 0 && k == bins - 1) {
                    bin /= 2.0;
                }
                *value += bin;
            }
            segments += 1;
            start += step;
        }

        let norm = segments as f32;
        for value in averaged.iter_mut() {
            *value /= norm;
        }

        let frequencies = (0..bins)
            .map(|k| k as f32 * self.sample_rate_hz / n as f32)
            .collect();
        Ok(Spectrum::new(frequencies, averaged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine(amplitude: f32, hz: f32, sample_rate_hz: f32, samples: usize) -> Vec<f32> {
        (0..samples)
            .map(|i| amplitude * (2.0 * PI * hz * i as f32 / sample_rate_hz).sin())
            .collect()
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(WelchEstimator::new(0.0, 128).is_err());
        assert!(WelchEstimator::new(250.0, 1).is_err());
        assert!(WelchEstimator::new(250.0, 128).is_ok());
    }

    #[test]
    fn test_short_window_is_insufficient() {
        let estimator = WelchEstimator::new(250.0, 128).unwrap();
        let result = estimator.estimate(&vec![0.0; 64]);
        assert_eq!(
            result,
            Err(AnalysisError::InsufficientData { got: 64, need: 128 })
        );
    }

    #[test]
    fn test_exact_segment_length_is_enough() {
        let estimator = WelchEstimator::new(250.0, 128).unwrap();
        let spectrum = estimator.estimate(&sine(10.0, 10.0, 250.0, 128)).unwrap();
        assert_eq!(spectrum.bin_count(), 65);
    }

    #[test]
    fn test_bins_run_from_dc_to_nyquist() {
        let estimator = WelchEstimator::new(250.0, 128).unwrap();
        let spectrum = estimator.estimate(&sine(10.0, 10.0, 250.0, 256)).unwrap();
        assert_eq!(spectrum.frequencies.first().copied(), Some(0.0));
        assert_eq!(spectrum.frequencies.last().copied(), Some(125.0));
        assert!((spectrum.resolution() - estimator.resolution()).abs() < 1e-6);
        for window in spectrum.frequencies.windows(2) {
            assert!(window[0] < window[1]);
        }
    }

    #[test]
    fn test_sine_power_concentrates_at_its_bin() {
        let estimator = WelchEstimator::new(250.0, 128).unwrap();
        // Exactly bin 5: 5 * 250 / 128 Hz, an integer number of cycles
        // per segment
        let hz = 5.0 * 250.0 / 128.0;
        let amplitude = 20.0;
        let spectrum = estimator
            .estimate(&sine(amplitude, hz, 250.0, 256))
            .unwrap();

        let peak = spectrum
            .power
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| k)
            .unwrap();
        assert_eq!(peak, 5);

        // Integrating the density recovers the sine's power, A^2 / 2
        let integral: f32 = spectrum.power.iter().sum::<f32>() * spectrum.resolution();
        let expected = amplitude * amplitude / 2.0;
        assert!(
            (integral - expected).abs() < expected * 0.05,
            "integral {} differs from {}",
            integral,
            expected
        );
    }

    #[test]
    fn test_constant_signal_is_removed_by_detrend() {
        let estimator = WelchEstimator::new(250.0, 128).unwrap();
        let spectrum = estimator.estimate(&vec![42.0; 256]).unwrap();
        assert!(spectrum.power.iter().all(|&p| p.abs() < 1e-6));
    }

    #[test]
    fn test_offset_does_not_leak_into_bands() {
        // Same sine with and without a large DC offset
        let estimator = WelchEstimator::new(250.0, 128).unwrap();
        let hz = 5.0 * 250.0 / 128.0;
        let clean = estimator.estimate(&sine(10.0, hz, 250.0, 256)).unwrap();
        let offset: Vec<f32> = sine(10.0, hz, 250.0, 256)
            .into_iter()
            .map(|v| v + 500.0)
            .collect();
        let shifted = estimator.estimate(&offset).unwrap();

        for (a, b) in clean.power.iter().zip(shifted.power.iter()) {
            assert!((a - b).abs() < 0.5, "{} vs {}", a, b);
        }
    }
}
