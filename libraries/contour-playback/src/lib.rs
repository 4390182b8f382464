//! Contour Playback
//!
//! Drives the streaming equalizer block by block over a loaded track.
//!
//! The sequencer owns the position and the `Stopped -> Playing <-> Paused`
//! state machine; the external audio sink calls [`PlaybackSequencer::process_next`]
//! once per output period and receives a status rather than an error at
//! end of stream. Platform concerns (decoding, device output) live
//! outside this crate.
//!
//! # Example
//!
//! ```rust
//! use contour_core::{AudioBuffer, EqConfig};
//! use contour_playback::{PlaybackSequencer, Tick};
//!
//! let config = EqConfig::default();
//! let mut sequencer = PlaybackSequencer::from_config(&config).unwrap();
//!
//! sequencer.load(AudioBuffer::silence(4096, config.sample_rate)).unwrap();
//! sequencer.play().unwrap();
//!
//! let mut block = vec![0.0f32; config.block_size];
//! while sequencer.process_next(&mut block).unwrap() == Tick::Emitted {
//!     // hand the block to the audio sink
//! }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod sequencer;

pub use error::{PlaybackError, Result};
pub use sequencer::{PlaybackSequencer, PlaybackState, Tick};
