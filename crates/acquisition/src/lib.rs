//! EEG signal sources for the focus pipeline
//!
//! Sources buffer a continuous single-channel stream and hand out the most
//! recent window of samples on demand. The trait mirrors a board session
//! lifecycle (open, start, stop, release) so a hardware-backed session, the
//! synthetic generator, and CSV playback are interchangeable.

pub mod mock;
pub mod playback;
pub mod types;

// Re-export the main types that users need
pub use mock::MockSource;
pub use playback::PlaybackSource;
pub use types::{EegSource, SourceError, SourceStatus};
