//! Contour DSP
//!
//! Real-time filter-bank equalization and off-line spectral analysis.
//!
//! This crate provides:
//! - **Filter bank design**: one Butterworth bandpass per band, realized
//!   as cascaded second-order sections for numerical stability
//! - **StreamingEqualizer**: block-wise equalization with persistent
//!   per-band filter state and atomically swappable gains
//! - **SpectralAnalyzer**: STFT-based per-band energy profiling
//! - **Auto-EQ**: compensation curve generation against a target response
//!
//! # Example
//!
//! ```rust
//! use contour_core::{Band, GainVector, DEFAULT_BAND_CENTERS};
//! use contour_dsp::StreamingEqualizer;
//!
//! let bands = Band::layout(&DEFAULT_BAND_CENTERS).unwrap();
//!
//! let mut eq = StreamingEqualizer::new();
//! eq.configure(&bands, 44100).unwrap();
//! eq.set_gains(GainVector::new(vec![3.0, 2.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0]));
//!
//! let input = vec![0.0f32; 1024];
//! let mut output = vec![0.0f32; 1024];
//! eq.process_block(&input, &mut output).unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod analysis;
pub mod autoeq;
pub mod equalizer;
pub mod error;
pub mod filter;
pub mod gain;

pub use analysis::{SpectralAnalyzer, DEFAULT_FFT_SIZE};
pub use autoeq::generate_curve;
pub use equalizer::{EqualizerState, StreamingEqualizer};
pub use error::{DspError, Result};
pub use filter::{design_filter_bank, BandFilter, SosSection};
pub use gain::{db_to_linear, GainControl};
