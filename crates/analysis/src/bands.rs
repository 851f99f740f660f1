//! Band power extraction
//!
//! Band power is the plain sum of PSD bins whose frequency falls inside an
//! inclusive range. No interpolation at the band edges; a bin is either in
//! or out.

use focus_types::{BandPowers, BandRanges, FrequencyBand, Spectrum};

/// Sum of spectral power across an inclusive frequency band. A band that
/// captures no bin yields exactly zero.
pub fn band_power(spectrum: &Spectrum, band: &FrequencyBand) -> f32 {
    spectrum
        .bins()
        .filter(|(hz, _)| band.contains(*hz))
        .map(|(_, power)| power)
        .sum()
}

/// Alpha, beta, and whole-spectrum power for one spectrum.
pub fn band_powers(spectrum: &Spectrum, bands: &BandRanges) -> BandPowers {
    BandPowers {
        alpha: band_power(spectrum, &bands.alpha),
        beta: band_power(spectrum, &bands.beta),
        total: spectrum.power.iter().sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2 Hz bins: 0, 2, 4, ... 18, each holding its bin index as power
    fn staircase() -> Spectrum {
        let frequencies: Vec<f32> = (0..10).map(|k| k as f32 * 2.0).collect();
        let power: Vec<f32> = (0..10).map(|k| k as f32).collect();
        Spectrum::new(frequencies, power)
    }

    #[test]
    fn test_band_bounds_are_inclusive() {
        let spectrum = staircase();
        // Bins at 4, 6, 8 -> powers 2 + 3 + 4
        let band = FrequencyBand::new(4.0, 8.0);
        assert_eq!(band_power(&spectrum, &band), 9.0);
    }

    #[test]
    fn test_empty_band_is_zero() {
        let spectrum = staircase();
        let band = FrequencyBand::new(4.5, 5.5);
        assert_eq!(band_power(&spectrum, &band), 0.0);
    }

    #[test]
    fn test_band_past_nyquist_is_zero() {
        let spectrum = staircase();
        let band = FrequencyBand::new(100.0, 200.0);
        assert_eq!(band_power(&spectrum, &band), 0.0);
    }

    #[test]
    fn test_total_covers_whole_spectrum() {
        let spectrum = staircase();
        let powers = band_powers(&spectrum, &BandRanges::default());
        assert_eq!(powers.total, 45.0);
        assert!(powers.alpha <= powers.total);
        assert!(powers.beta <= powers.total);
    }

    #[test]
    fn test_partition_sums_to_total() {
        let spectrum = staircase();
        let low = band_power(&spectrum, &FrequencyBand::new(0.0, 8.0));
        let high = band_power(&spectrum, &FrequencyBand::new(10.0, 18.0));
        let powers = band_powers(&spectrum, &BandRanges::default());
        assert!((low + high - powers.total).abs() < 1e-6);
    }
}
