//! Synthetic EEG source
//!
//! Generates a plausible single-channel scalp signal from a bank of
//! band-limited oscillators plus line noise and broadband noise, scaled in
//! microvolts. Two profiles are provided so both classifier outcomes are
//! reachable without hardware.

use std::collections::VecDeque;
use std::f32::consts::PI;
use std::time::Instant;

use log::{debug, info};
use rand::Rng;

use focus_types::MockProfile;

use crate::types::{EegSource, SourceError, SourceStatus};

const THETA_HZ: f32 = 6.0;
const ALPHA_HZ: f32 = 10.0;
const BETA_HZ: f32 = 20.0;
const LINE_HZ: f32 = 50.0;

/// Phase-accumulator oscillator bank for one channel.
///
/// Amplitudes are chosen so the Welch band sums land clearly on one side
/// of the default ratio policy for each profile.
struct OscillatorBank {
    sample_rate_hz: f32,
    theta_phase: f32,
    alpha_phase: f32,
    beta_phase: f32,
    line_phase: f32,
    // Amplitudes in µV
    theta_amp: f32,
    alpha_amp: f32,
    beta_amp: f32,
    line_amp: f32,
    noise_amp: f32,
}

impl OscillatorBank {
    fn new(sample_rate_hz: f32, profile: MockProfile) -> Self {
        let mut rng = rand::thread_rng();
        let (theta_amp, alpha_amp, beta_amp) = match profile {
            MockProfile::Relaxed => (6.0, 22.0, 4.0),
            MockProfile::Engaged => (4.0, 5.0, 24.0),
        };
        Self {
            sample_rate_hz,
            theta_phase: rng.gen::<f32>() * 2.0 * PI,
            alpha_phase: rng.gen::<f32>() * 2.0 * PI,
            beta_phase: rng.gen::<f32>() * 2.0 * PI,
            line_phase: rng.gen::<f32>() * 2.0 * PI,
            theta_amp,
            alpha_amp,
            beta_amp,
            // Electrodes pick up varying amounts of mains hum
            line_amp: rng.gen_range(0.5..1.5),
            noise_amp: 1.0,
        }
    }

    fn next_sample(&mut self) -> f32 {
        let mut rng = rand::thread_rng();

        self.theta_phase = wrap(self.theta_phase + 2.0 * PI * THETA_HZ / self.sample_rate_hz);
        self.alpha_phase = wrap(self.alpha_phase + 2.0 * PI * ALPHA_HZ / self.sample_rate_hz);
        self.beta_phase = wrap(self.beta_phase + 2.0 * PI * BETA_HZ / self.sample_rate_hz);
        self.line_phase = wrap(self.line_phase + 2.0 * PI * LINE_HZ / self.sample_rate_hz);

        self.theta_phase.sin() * self.theta_amp
            + self.alpha_phase.sin() * self.alpha_amp
            + self.beta_phase.sin() * self.beta_amp
            + self.line_phase.sin() * self.line_amp
            + (rng.gen::<f32>() - 0.5) * self.noise_amp
    }
}

// Keeps the accumulators from losing float precision on long runs
fn wrap(phase: f32) -> f32 {
    if phase > 2.0 * PI {
        phase - 2.0 * PI
    } else {
        phase
    }
}

/// Synthetic source that paces itself against the wall clock, like a board
/// filling its ring buffer in the background.
pub struct MockSource {
    sample_rate_hz: f32,
    window_samples: usize,
    bank: OscillatorBank,
    ring: VecDeque<f32>,
    status: SourceStatus,
    started_at: Option<Instant>,
    generated: u64,
}

impl MockSource {
    pub fn new(
        sample_rate_hz: f32,
        window_samples: usize,
        profile: MockProfile,
    ) -> Result<Self, SourceError> {
        if !(sample_rate_hz > 0.0) {
            return Err(SourceError::Configuration(
                "sample rate must be positive".into(),
            ));
        }
        if window_samples == 0 {
            return Err(SourceError::Configuration(
                "window must hold at least one sample".into(),
            ));
        }
        Ok(Self {
            sample_rate_hz,
            window_samples,
            bank: OscillatorBank::new(sample_rate_hz, profile),
            ring: VecDeque::with_capacity(window_samples),
            status: SourceStatus::Idle,
            started_at: None,
            generated: 0,
        })
    }

    /// Generate a window directly, bypassing the wall-clock pacing. Demo
    /// and test hook; does not touch the streaming buffer.
    pub fn synthesize_window(&mut self, samples: usize) -> Vec<f32> {
        (0..samples).map(|_| self.bank.next_sample()).collect()
    }

    /// Catch the ring buffer up to the current wall-clock position.
    fn fill_to_now(&mut self) {
        let Some(started_at) = self.started_at else {
            return;
        };
        let target = (started_at.elapsed().as_secs_f64() * self.sample_rate_hz as f64) as u64;
        while self.generated < target {
            let sample = self.bank.next_sample();
            self.absorb(sample);
            self.generated += 1;
        }
    }

    fn absorb(&mut self, sample: f32) {
        if self.ring.len() == self.window_samples {
            self.ring.pop_front();
        }
        self.ring.push_back(sample);
    }
}

impl EegSource for MockSource {
    fn open(&mut self) -> Result<(), SourceError> {
        if self.status != SourceStatus::Idle {
            return Err(SourceError::NotReady(format!(
                "open called in state {:?}",
                self.status
            )));
        }
        self.status = SourceStatus::Ready;
        info!("mock source ready at {} Hz", self.sample_rate_hz);
        Ok(())
    }

    fn start(&mut self) -> Result<(), SourceError> {
        match self.status {
            SourceStatus::Ready | SourceStatus::Stopped => {}
            _ => {
                return Err(SourceError::NotReady(format!(
                    "start called in state {:?}",
                    self.status
                )))
            }
        }
        self.ring.clear();
        self.generated = 0;
        self.started_at = Some(Instant::now());
        self.status = SourceStatus::Streaming;
        debug!("mock source streaming");
        Ok(())
    }

    fn current_window(&mut self, channel: usize) -> Result<Vec<f32>, SourceError> {
        if self.status != SourceStatus::Streaming {
            return Err(SourceError::NotReady(format!(
                "current_window called in state {:?}",
                self.status
            )));
        }
        if channel != 0 {
            return Err(SourceError::ChannelOutOfRange {
                requested: channel,
                available: 1,
            });
        }
        self.fill_to_now();
        Ok(self.ring.iter().copied().collect())
    }

    fn stop(&mut self) -> Result<(), SourceError> {
        if self.status == SourceStatus::Streaming {
            self.started_at = None;
            self.status = SourceStatus::Stopped;
            debug!("mock source stopped");
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), SourceError> {
        if self.status != SourceStatus::Released {
            self.ring.clear();
            self.started_at = None;
            self.status = SourceStatus::Released;
            info!("mock source released");
        }
        Ok(())
    }

    fn status(&self) -> SourceStatus {
        self.status.clone()
    }

    fn sample_rate_hz(&self) -> f32 {
        self.sample_rate_hz
    }
}
