//! Signal-chain tests: synthetic source through spectral estimation to the
//! classifier, without a running session loop.

use eeg_acquisition::MockSource;
use focus_analysis::{band_powers, classify, WelchEstimator};
use focus_types::{BandRanges, FocusPolicy, MockProfile};

#[test]
fn test_relaxed_profile_classifies_not_focused() {
    let mut source = MockSource::new(250.0, 250, MockProfile::Relaxed).unwrap();
    let window = source.synthesize_window(250);

    let estimator = WelchEstimator::new(250.0, 128).unwrap();
    let spectrum = estimator.estimate(&window).unwrap();
    let powers = band_powers(&spectrum, &BandRanges::default());

    assert!(
        powers.alpha > powers.beta,
        "alpha must dominate: {:?}",
        powers
    );
    assert!(!classify(&powers, &FocusPolicy::default()));
}

#[test]
fn test_engaged_profile_classifies_focused() {
    let mut source = MockSource::new(250.0, 250, MockProfile::Engaged).unwrap();
    let window = source.synthesize_window(250);

    let estimator = WelchEstimator::new(250.0, 128).unwrap();
    let spectrum = estimator.estimate(&window).unwrap();
    let powers = band_powers(&spectrum, &BandRanges::default());

    assert!(
        powers.total > 100.0,
        "total must clear the threshold: {:?}",
        powers
    );
    assert!(
        powers.beta > powers.alpha,
        "beta must dominate: {:?}",
        powers
    );
    assert!(classify(&powers, &FocusPolicy::default()));
}

#[test]
fn test_band_powers_track_the_dominant_rhythm() {
    let mut relaxed = MockSource::new(250.0, 250, MockProfile::Relaxed).unwrap();
    let mut engaged = MockSource::new(250.0, 250, MockProfile::Engaged).unwrap();
    let estimator = WelchEstimator::new(250.0, 128).unwrap();

    let relaxed_powers = band_powers(
        &estimator.estimate(&relaxed.synthesize_window(500)).unwrap(),
        &BandRanges::default(),
    );
    let engaged_powers = band_powers(
        &estimator.estimate(&engaged.synthesize_window(500)).unwrap(),
        &BandRanges::default(),
    );

    // Switching profiles swaps which band carries the bulk of the power.
    assert!(relaxed_powers.alpha > 4.0 * relaxed_powers.beta);
    assert!(engaged_powers.beta > 4.0 * engaged_powers.alpha);
}
