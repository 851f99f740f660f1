//! Session log
//!
//! Band powers and decisions accumulate in memory for the whole session and
//! are written to disk exactly once, during shutdown. Writing at the end
//! keeps the tick loop free of disk latency; the runs are short enough that
//! streaming writes would buy nothing.

use std::fs::File;
use std::path::PathBuf;

use chrono::Local;
use serde::Serialize;
use tracing::info;

/// One CSV row: a decision tick with its band powers and task label.
#[derive(Debug, Clone, Serialize)]
pub struct LogRow {
    #[serde(rename = "Time")]
    pub elapsed_secs: f32,
    #[serde(rename = "Alpha")]
    pub alpha: f32,
    #[serde(rename = "Beta")]
    pub beta: f32,
    #[serde(rename = "Total")]
    pub total: f32,
    #[serde(rename = "Focus")]
    pub focus: u8,
    #[serde(rename = "Task")]
    pub task: String,
}

/// Where the flushed CSV ends up.
#[derive(Debug, Clone)]
pub enum LogTarget {
    /// Exact file path, parent directories created as needed
    Path(PathBuf),
    /// Directory that receives a timestamped `focus_*.csv`
    Directory(PathBuf),
}

const HEADER: [&str; 6] = ["Time", "Alpha", "Beta", "Total", "Focus", "Task"];

/// In-memory session log, flushed once at shutdown.
pub struct SessionLog {
    rows: Vec<LogRow>,
    target: LogTarget,
}

impl SessionLog {
    pub fn new(target: LogTarget) -> Self {
        Self {
            rows: Vec::new(),
            target,
        }
    }

    pub fn push(&mut self, row: LogRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write every buffered row to the target and return the path written.
    ///
    /// The header goes out even when no ticks completed, so an aborted
    /// session still leaves a well-formed file behind.
    pub fn flush(self) -> csv::Result<PathBuf> {
        let path = match self.target {
            LogTarget::Path(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                path
            }
            LogTarget::Directory(dir) => {
                std::fs::create_dir_all(&dir)?;
                dir.join(format!(
                    "focus_{}.csv",
                    Local::now().format("%Y-%m-%d_%H-%M-%S")
                ))
            }
        };

        let file = File::create(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(HEADER)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        info!("Wrote {} log rows to {}", self.rows.len(), path.display());
        Ok(path)
    }
}
