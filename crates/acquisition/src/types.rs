//! Common types and traits for signal sources

use thiserror::Error;

/// Lifecycle state of a signal source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceStatus {
    /// Source created but no session opened yet
    Idle,
    /// Session prepared, stream not started
    Ready,
    /// Actively buffering samples
    Streaming,
    /// Stream stopped, session still held
    Stopped,
    /// Session released, all resources freed
    Released,
}

/// Errors surfaced by signal sources.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Operation called in a state that does not allow it
    #[error("source not ready: {0}")]
    NotReady(String),
    /// Invalid source parameters
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Requested channel does not exist on this source
    #[error("channel {requested} out of range, source has {available}")]
    ChannelOutOfRange { requested: usize, available: usize },
    /// Playback ran past the end of its recording
    #[error("playback exhausted after {samples} samples")]
    EndOfStream { samples: usize },
    /// Sample file could not be parsed
    #[error("malformed sample file: {0}")]
    Malformed(String),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait all signal sources implement.
///
/// The lifecycle mirrors a board session: `open` prepares the session,
/// `start` begins streaming into the source's internal buffer, `stop`
/// halts the stream, and `release` frees everything. Callers pull data
/// with `current_window` between `start` and `stop`.
pub trait EegSource: Send + 'static {
    /// Prepare the underlying session. Must be called before `start`.
    fn open(&mut self) -> Result<(), SourceError>;

    /// Begin streaming samples into the internal buffer.
    fn start(&mut self) -> Result<(), SourceError>;

    /// Most recent buffered samples for `channel`, oldest first. Returns
    /// fewer than a full window while the buffer is still filling.
    fn current_window(&mut self, channel: usize) -> Result<Vec<f32>, SourceError>;

    /// Stop streaming. The session stays open and `start` may be called
    /// again.
    fn stop(&mut self) -> Result<(), SourceError>;

    /// Release the session and free all resources.
    fn release(&mut self) -> Result<(), SourceError>;

    /// Current lifecycle state.
    fn status(&self) -> SourceStatus;

    /// Sample rate this source delivers, in Hz.
    fn sample_rate_hz(&self) -> f32;
}
