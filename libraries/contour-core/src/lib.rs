//! Contour Core
//!
//! Shared domain types and configuration for the Contour EQ engine.
//!
//! This crate provides:
//! - **Band layout**: the fixed table of octave-wide band centers
//! - **Profiles**: `SpectralProfile` (per-band track energy) and
//!   `TargetProfile` (reference response curve)
//! - **GainVector**: the per-band dB gains applied by the equalizer
//! - **AudioBuffer**: a decoded mono track at a fixed sample rate
//! - **EqConfig**: engine configuration with sensible defaults
//!
//! # Example
//!
//! ```rust
//! use contour_core::{Band, EqConfig, GainVector};
//!
//! let config = EqConfig::default();
//! let bands = config.bands().unwrap();
//! assert_eq!(bands.len(), 10);
//!
//! let gains = GainVector::flat(bands.len());
//! assert_eq!(gains.db(0), Some(0.0));
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod types;

pub use config::EqConfig;
pub use error::{CoreError, Result};
pub use types::{
    AudioBuffer, Band, GainVector, SpectralProfile, TargetProfile, DEFAULT_BAND_CENTERS,
};
