//! DSP-specific errors

use thiserror::Error;

/// Result type alias using `DspError`
pub type Result<T> = std::result::Result<T, DspError>;

/// DSP error types
#[derive(Debug, Error)]
pub enum DspError {
    /// Block processing attempted before `configure`
    #[error("Equalizer is not configured")]
    NotConfigured,

    /// Input and output blocks must have the same length
    #[error("Block length mismatch: input {input} samples, output {output}")]
    BlockLengthMismatch {
        /// Input block length
        input: usize,
        /// Output block length
        output: usize,
    },

    /// Song and target profiles must cover the same band table
    #[error("Profile shape mismatch: song has {song} bands, target has {target}")]
    ProfileShapeMismatch {
        /// Song profile length
        song: usize,
        /// Target profile length
        target: usize,
    },

    /// Invalid band layout or other core validation failure
    #[error(transparent)]
    Core(#[from] contour_core::CoreError),
}
