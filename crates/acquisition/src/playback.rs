//! CSV playback source
//!
//! Replays a single-channel recording in real time so a session can be
//! re-run against captured data. The file holds one µV sample per row,
//! with an optional header row.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::info;

use crate::types::{EegSource, SourceError, SourceStatus};

pub struct PlaybackSource {
    path: PathBuf,
    sample_rate_hz: f32,
    window_samples: usize,
    samples: Vec<f32>,
    status: SourceStatus,
    started_at: Option<Instant>,
}

impl PlaybackSource {
    /// Create a source for `path`. The file is not read until `open`.
    pub fn new(
        path: PathBuf,
        sample_rate_hz: f32,
        window_samples: usize,
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
            path,
            sample_rate_hz,
            window_samples,
            samples: Vec::new(),
            status: SourceStatus::Idle,
            started_at: None,
        })
    }

    fn load(path: &Path) -> Result<Vec<f32>, SourceError> {
        let file = File::open(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(file);
        let mut samples = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record =
                record.map_err(|e| SourceError::Malformed(format!("row {}: {}", idx + 1, e)))?;
            let field = record
                .get(0)
                .ok_or_else(|| SourceError::Malformed(format!("row {}: empty record", idx + 1)))?;
            let value = match field.trim().parse::<f32>() {
                Ok(value) => value,
                // Tolerate a header row
                Err(_) if idx == 0 => continue,
                Err(_) => {
                    return Err(SourceError::Malformed(format!(
                        "row {}: {:?} is not a number",
                        idx + 1,
                        field
                    )))
                }
            };
            samples.push(value);
        }
        if samples.is_empty() {
            return Err(SourceError::Malformed("file contains no samples".into()));
        }
        Ok(samples)
    }

    /// Window ending at `cursor`, oldest first. Mirrors a live ring buffer:
    /// short while filling, an error once the recording is exhausted.
    fn window_at(&self, cursor: usize) -> Result<Vec<f32>, SourceError> {
        if cursor > self.samples.len() {
            return Err(SourceError::EndOfStream {
                samples: self.samples.len(),
            });
        }
        let start = cursor.saturating_sub(self.window_samples);
        Ok(self.samples[start..cursor].to_vec())
    }

    /// Seconds of signal held in the file.
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate_hz
    }
}

impl EegSource for PlaybackSource {
    fn open(&mut self) -> Result<(), SourceError> {
        if self.status != SourceStatus::Idle {
            return Err(SourceError::NotReady(format!(
                "open called in state {:?}",
                self.status
            )));
        }
        self.samples = Self::load(&self.path)?;
        self.status = SourceStatus::Ready;
        info!(
            "playback source loaded {} samples ({:.1}s) from {}",
            self.samples.len(),
            self.duration_secs(),
            self.path.display()
        );
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
        self.started_at = Some(Instant::now());
        self.status = SourceStatus::Streaming;
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
        let started_at = self
            .started_at
            .ok_or_else(|| SourceError::NotReady("stream has no start time".into()))?;
        let cursor = (started_at.elapsed().as_secs_f64() * self.sample_rate_hz as f64) as usize;
        self.window_at(cursor)
    }

    fn stop(&mut self) -> Result<(), SourceError> {
        if self.status == SourceStatus::Streaming {
            self.started_at = None;
            self.status = SourceStatus::Stopped;
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), SourceError> {
        if self.status != SourceStatus::Released {
            self.samples.clear();
            self.started_at = None;
            self.status = SourceStatus::Released;
            info!("playback source released");
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
