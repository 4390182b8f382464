//! Error types for playback sequencing

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// The caller's output block does not match the configured size
    #[error("Output block must be {expected} samples, got {actual}")]
    BlockSizeMismatch {
        /// Configured block size
        expected: usize,
        /// Length the caller supplied
        actual: usize,
    },

    /// Equalizer failure (not configured, bad block)
    #[error(transparent)]
    Dsp(#[from] contour_dsp::DspError),

    /// Core validation failure (bad band layout)
    #[error(transparent)]
    Core(#[from] contour_core::CoreError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
