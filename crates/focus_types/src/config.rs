//! Configuration surface for a focus session
//!
//! Everything the pipeline treats as tunable lives here: acquisition
//! geometry, band definitions, the classification policy, the actuator
//! transport, and the labeled-task schedule. Defaults describe a standard
//! 250 Hz single-channel setup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when validating a session configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Inclusive frequency band in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBand {
    pub low_hz: f32,
    pub high_hz: f32,
}

impl FrequencyBand {
    pub fn new(low_hz: f32, high_hz: f32) -> Self {
        Self { low_hz, high_hz }
    }

    /// Whether `hz` falls inside this band, bounds included.
    pub fn contains(&self, hz: f32) -> bool {
        hz >= self.low_hz && hz <= self.high_hz
    }
}

/// Band definitions used by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandRanges {
    #[serde(default = "default_alpha_band")]
    pub alpha: FrequencyBand,
    #[serde(default = "default_beta_band")]
    pub beta: FrequencyBand,
}

fn default_alpha_band() -> FrequencyBand {
    FrequencyBand::new(8.0, 13.0)
}

fn default_beta_band() -> FrequencyBand {
    FrequencyBand::new(13.0, 30.0)
}

impl Default for BandRanges {
    fn default() -> Self {
        Self {
            alpha: default_alpha_band(),
            beta: default_beta_band(),
        }
    }
}

/// Inclusive window of summed band power (µV²/Hz bins) for the dual-range
/// policy. These are per-subject calibration values, not frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerWindow {
    pub low: f32,
    pub high: f32,
}

impl PowerWindow {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Whether `power` falls inside this window, bounds included.
    pub fn contains(&self, power: f32) -> bool {
        power >= self.low && power <= self.high
    }
}

/// Classification policy applied to each tick's band powers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FocusPolicy {
    /// Focused when total power clears a threshold and beta exceeds alpha.
    RatioThreshold {
        #[serde(default = "default_total_threshold")]
        total_threshold: f32,
    },
    /// Focused when alpha and beta power each sit inside a calibrated
    /// window.
    DualRange {
        #[serde(default = "default_alpha_window")]
        alpha: PowerWindow,
        #[serde(default = "default_beta_window")]
        beta: PowerWindow,
    },
}

fn default_total_threshold() -> f32 {
    100.0
}

fn default_alpha_window() -> PowerWindow {
    PowerWindow::new(0.0, 15.0)
}

fn default_beta_window() -> PowerWindow {
    PowerWindow::new(0.1, 10.0)
}

impl Default for FocusPolicy {
    fn default() -> Self {
        FocusPolicy::RatioThreshold {
            total_threshold: default_total_threshold(),
        }
    }
}

/// Synthetic source profiles. Each drives the default policy to a different
/// decision, so both outcomes are reachable without hardware.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MockProfile {
    /// Alpha-dominant signal, classifies as not focused
    Relaxed,
    /// Beta-dominant signal, classifies as focused
    Engaged,
}

impl Default for MockProfile {
    fn default() -> Self {
        MockProfile::Relaxed
    }
}

/// Which acquisition source backs the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SourceKind {
    /// Synthetic oscillator bank, no hardware required
    MockEeg {
        #[serde(default)]
        profile: MockProfile,
    },
    /// Replay of a previously recorded single-channel CSV
    Playback { path: PathBuf },
}

impl Default for SourceKind {
    fn default() -> Self {
        SourceKind::MockEeg {
            profile: MockProfile::default(),
        }
    }
}

/// Serial transport to the actuator microcontroller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Port name, e.g. `/dev/ttyACM0` or `COM15`
    pub port: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Seconds to wait after opening before the first write. Consumer
    /// boards reset when the port opens and drop bytes sent while booting.
    #[serde(default = "default_settle_secs")]
    pub settle_secs: f32,
    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,
}

fn default_baud_rate() -> u32 {
    9600
}

fn default_settle_secs() -> f32 {
    2.0
}

fn default_write_timeout_ms() -> u64 {
    1000
}

/// One labeled phase of a recording schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPhase {
    /// Label written to the `Task` column for every tick in this phase
    pub label: String,
    pub duration_secs: f32,
}

/// Full configuration for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Acquisition sample rate in Hz
    #[serde(default = "default_sample_rate_hz")]
    pub sample_rate_hz: f32,
    /// Channel index read from the source
    #[serde(default)]
    pub channel: usize,
    /// Samples requested from the source each tick
    #[serde(default = "default_window_samples")]
    pub window_samples: usize,
    /// Welch segment length in samples
    #[serde(default = "default_segment_samples")]
    pub segment_samples: usize,
    /// Seconds between decision ticks
    #[serde(default = "default_tick_secs")]
    pub tick_secs: f32,
    #[serde(default)]
    pub bands: BandRanges,
    #[serde(default)]
    pub policy: FocusPolicy,
    /// Points retained for live displays
    #[serde(default = "default_history_points")]
    pub history_points: usize,
    #[serde(default)]
    pub source: SourceKind,
    /// Actuator transport; decisions are discarded when absent
    #[serde(default)]
    pub serial: Option<SerialConfig>,
    /// Labeled recording schedule; empty means live monitoring
    #[serde(default)]
    pub tasks: Vec<TaskPhase>,
    /// Directory that receives timestamped session logs
    #[serde(default = "default_recordings_directory")]
    pub recordings_directory: String,
    /// Explicit log path. Overrides the timestamped name, and enables
    /// logging in monitoring mode.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

fn default_sample_rate_hz() -> f32 {
    250.0
}

fn default_window_samples() -> usize {
    250
}

fn default_segment_samples() -> usize {
    128
}

fn default_tick_secs() -> f32 {
    0.2
}

fn default_history_points() -> usize {
    50
}

fn default_recordings_directory() -> String {
    "recordings".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: default_sample_rate_hz(),
            channel: 0,
            window_samples: default_window_samples(),
            segment_samples: default_segment_samples(),
            tick_secs: default_tick_secs(),
            bands: BandRanges::default(),
            policy: FocusPolicy::default(),
            history_points: default_history_points(),
            source: SourceKind::default(),
            serial: None,
            tasks: Vec::new(),
            recordings_directory: default_recordings_directory(),
            log_path: None,
        }
    }
}

impl SessionConfig {
    /// Validate the invariants the pipeline depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate_hz > 0.0) {
            return Err(ConfigError::Invalid(
                "sample_rate_hz must be positive".into(),
            ));
        }
        if self.window_samples == 0 {
            return Err(ConfigError::Invalid(
                "window_samples must be at least 1".into(),
            ));
        }
        if self.segment_samples < 2 {
            return Err(ConfigError::Invalid(
                "segment_samples must be at least 2".into(),
            ));
        }
        if !(self.tick_secs > 0.0) {
            return Err(ConfigError::Invalid("tick_secs must be positive".into()));
        }
        if self.history_points == 0 {
            return Err(ConfigError::Invalid(
                "history_points must be at least 1".into(),
            ));
        }
        for (name, band) in [("alpha", &self.bands.alpha), ("beta", &self.bands.beta)] {
            if band.low_hz > band.high_hz {
                return Err(ConfigError::Invalid(format!(
                    "{} band range is inverted: {} > {}",
                    name, band.low_hz, band.high_hz
                )));
            }
        }
        if let FocusPolicy::DualRange { alpha, beta } = &self.policy {
            for (name, window) in [("alpha", alpha), ("beta", beta)] {
                if window.low > window.high {
                    return Err(ConfigError::Invalid(format!(
                        "{} power window is inverted: {} > {}",
                        name, window.low, window.high
                    )));
                }
            }
        }
        for phase in &self.tasks {
            if !(phase.duration_secs > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "task {:?} must have a positive duration",
                    phase.label
                )));
            }
        }
        Ok(())
    }

    /// Number of decision ticks a labeled phase occupies.
    pub fn ticks_for(&self, phase: &TaskPhase) -> u64 {
        (phase.duration_secs / self.tick_secs).round() as u64
    }

    /// True when the schedule makes this a labeled recording session.
    pub fn is_labeled(&self) -> bool {
        !self.tasks.is_empty()
    }
}
