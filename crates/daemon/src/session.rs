//! Session orchestration
//!
//! The runner owns the acquisition source, the analysis chain, the actuator
//! link, and the session log, and drives them from a fixed-cadence tick loop
//! until the task schedule completes or the caller cancels. Shutdown runs
//! exactly once on every exit path: stop the source, release it, close the
//! actuator transport, flush the log.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use eeg_acquisition::{EegSource, SourceError};
use focus_analysis::{band_powers, classify, AnalysisError, WelchEstimator};
use focus_types::{ConfigError, FocusHistory, HistoryPoint, SessionConfig};
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::actuator::ActuatorLink;
use crate::recorder::{LogRow, LogTarget, SessionLog};

/// Errors that end a session early.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("acquisition source failed: {0}")]
    Source(#[from] SourceError),
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("actuator transport failed: {0}")]
    Actuator(#[from] std::io::Error),
    #[error("session log failed: {0}")]
    Log(#[from] csv::Error),
}

/// Why the tick loop exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The labeled schedule ran to completion
    Completed,
    /// The caller cancelled the session
    Cancelled,
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub reason: EndReason,
    /// Decision ticks that produced a classification
    pub ticks: u64,
    /// Where the session log was written, when one was kept
    pub log_path: Option<PathBuf>,
}

/// Walks the labeled task schedule one successful tick at a time.
///
/// `current_label` peeks without consuming, so a tick skipped for lack of
/// data delays the phase instead of shortening it; `consume` commits one
/// tick after it succeeds. An empty schedule means open-ended monitoring:
/// the label is blank and the cursor never finishes.
struct ScheduleCursor {
    phases: Vec<(String, u64)>,
    index: usize,
    remaining: u64,
    labeled: bool,
}

impl ScheduleCursor {
    fn new(config: &SessionConfig) -> Self {
        let phases: Vec<(String, u64)> = config
            .tasks
            .iter()
            .map(|phase| (phase.label.clone(), config.ticks_for(phase)))
            .collect();
        let remaining = phases.first().map(|(_, ticks)| *ticks).unwrap_or(0);
        Self {
            labeled: !phases.is_empty(),
            phases,
            index: 0,
            remaining,
        }
    }

    /// Label for the next tick, or `None` once the schedule is complete.
    fn current_label(&mut self) -> Option<&str> {
        if !self.labeled {
            return Some("");
        }
        while self.remaining == 0 {
            match self.phases.get(self.index + 1) {
                Some((_, ticks)) => {
                    self.index += 1;
                    self.remaining = *ticks;
                }
                None => return None,
            }
        }
        self.phases.get(self.index).map(|(label, _)| label.as_str())
    }

    /// Commit one successful tick against the current phase.
    fn consume(&mut self) {
        if self.labeled && self.remaining > 0 {
            self.remaining -= 1;
        }
    }
}

/// Owns one end-to-end focus session.
pub struct SessionRunner {
    config: SessionConfig,
    source: Box<dyn EegSource>,
    actuator: Option<ActuatorLink>,
    estimator: WelchEstimator,
    history: FocusHistory,
    log: Option<SessionLog>,
    feed: watch::Sender<Vec<HistoryPoint>>,
    shutdown_complete: bool,
}

impl SessionRunner {
    /// Build a runner without starting it. Returns the runner plus a watch
    /// receiver that tracks the rolling history for live displays.
    pub fn new(
        config: SessionConfig,
        source: Box<dyn EegSource>,
        actuator: ActuatorLink,
    ) -> Result<(Self, watch::Receiver<Vec<HistoryPoint>>), SessionError> {
        config.validate()?;
        let estimator = WelchEstimator::new(config.sample_rate_hz, config.segment_samples)?;

        // Labeled sessions keep every point so the log is complete; live
        // monitoring keeps a rolling window sized for displays.
        let history = if config.is_labeled() {
            FocusHistory::unbounded()
        } else {
            FocusHistory::bounded(config.history_points)
        };

        let log = match (&config.log_path, config.is_labeled()) {
            (Some(path), _) => Some(SessionLog::new(LogTarget::Path(path.clone()))),
            (None, true) => Some(SessionLog::new(LogTarget::Directory(
                config.recordings_directory.clone().into(),
            ))),
            (None, false) => None,
        };

        let (feed, feed_rx) = watch::channel(Vec::new());
        Ok((
            Self {
                config,
                source,
                actuator: Some(actuator),
                estimator,
                history,
                log,
                feed,
                shutdown_complete: false,
            },
            feed_rx,
        ))
    }

    /// Drive the session until the schedule completes or `cancel` fires,
    /// then run the shutdown sequence.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<SessionOutcome, SessionError> {
        let driven = self.drive(&cancel).await;
        let flushed = self.shutdown();
        match (driven, flushed) {
            (Ok((reason, ticks)), Ok(log_path)) => Ok(SessionOutcome {
                reason,
                ticks,
                log_path,
            }),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), flushed) => {
                if let Err(flush_err) = flushed {
                    error!("Shutdown after session failure also failed: {}", flush_err);
                }
                Err(e)
            }
        }
    }

    async fn drive(&mut self, cancel: &CancellationToken) -> Result<(EndReason, u64), SessionError> {
        self.source.open()?;
        self.source.start()?;
        info!(
            "Session started: {} mode, {} Hz, tick every {} ms",
            if self.config.is_labeled() {
                "labeled"
            } else {
                "monitoring"
            },
            self.config.sample_rate_hz,
            (self.config.tick_secs * 1000.0) as u64,
        );

        let mut cursor = ScheduleCursor::new(&self.config);
        let mut interval = tokio::time::interval(Duration::from_secs_f32(self.config.tick_secs));
        // A late tick shifts the schedule rather than bursting to catch up.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let started = Instant::now();
        let mut ticks: u64 = 0;
        let mut last_label: Option<String> = None;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Session cancelled after {} ticks", ticks);
                    return Ok((EndReason::Cancelled, ticks));
                }
                _ = interval.tick() => {
                    let label = match cursor.current_label() {
                        Some(label) => label.to_string(),
                        None => {
                            info!("Task schedule complete after {} ticks", ticks);
                            return Ok((EndReason::Completed, ticks));
                        }
                    };
                    if cursor.labeled && last_label.as_deref() != Some(label.as_str()) {
                        info!("Task phase started: {}", label);
                        last_label = Some(label.clone());
                    }
                    if self.tick(started.elapsed().as_secs_f32(), &label)? {
                        cursor.consume();
                        ticks += 1;
                        if cursor.current_label().is_none() {
                            info!("Task schedule complete after {} ticks", ticks);
                            return Ok((EndReason::Completed, ticks));
                        }
                    }
                }
            }
        }
    }

    /// Run one decision tick. Returns `Ok(true)` when a decision was made,
    /// `Ok(false)` when the buffered window is still too short to analyze.
    fn tick(&mut self, elapsed_secs: f32, label: &str) -> Result<bool, SessionError> {
        let window = self.source.current_window(self.config.channel)?;
        let spectrum = match self.estimator.estimate(&window) {
            Ok(spectrum) => spectrum,
            Err(AnalysisError::InsufficientData { got, need }) => {
                debug!("Skipping tick: window has {} samples, need {}", got, need);
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };
        let powers = band_powers(&spectrum, &self.config.bands);
        let focused = classify(&powers, &self.config.policy);

        self.history.push(HistoryPoint::new(
            elapsed_secs,
            powers.alpha,
            powers.beta,
            focused,
        ));
        self.feed.send_replace(self.history.snapshot());

        if let Some(actuator) = &mut self.actuator {
            actuator.send(focused)?;
        }
        if let Some(log) = &mut self.log {
            log.push(LogRow {
                elapsed_secs,
                alpha: powers.alpha,
                beta: powers.beta,
                total: powers.total,
                focus: focused as u8,
                task: label.to_string(),
            });
        }

        if label.is_empty() {
            info!(
                "focus {} | alpha {:.2} beta {:.2} total {:.2}",
                focused as u8, powers.alpha, powers.beta, powers.total
            );
        } else {
            info!(
                "{} | focus {} | alpha {:.2} beta {:.2} total {:.2}",
                label, focused as u8, powers.alpha, powers.beta, powers.total
            );
        }
        Ok(true)
    }

    /// Stop the source, release it, close the actuator, and flush the log.
    ///
    /// Every step runs even when an earlier one fails; only a failed log
    /// flush is reported as an error, since it loses session data.
    fn shutdown(&mut self) -> Result<Option<PathBuf>, SessionError> {
        self.shutdown_complete = true;
        if let Err(e) = self.source.stop() {
            warn!("Could not stop acquisition source: {}", e);
        }
        if let Err(e) = self.source.release() {
            warn!("Could not release acquisition source: {}", e);
        }
        if let Some(actuator) = self.actuator.take() {
            if let Err(e) = actuator.close() {
                warn!("Could not close actuator transport: {}", e);
            }
        }
        let log_path = match self.log.take() {
            Some(log) => Some(log.flush()?),
            None => None,
        };
        info!("Session shutdown complete");
        Ok(log_path)
    }
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        if !self.shutdown_complete {
            warn!("SessionRunner dropped without shutting down; source and log were not finalized");
        }
    }
}
