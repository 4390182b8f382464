//! Error types for core domain validation

use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum CoreError {
    /// Band centers are not a valid layout
    #[error("Invalid band layout: {0}")]
    InvalidBandLayout(String),

    /// A target profile table had no entries to look up
    #[error("Profile table is empty")]
    EmptyProfileTable,
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
