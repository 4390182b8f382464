//! Playback sequencer - block-wise drive of the equalizer
//!
//! Slices fixed-size blocks from the loaded track, runs them through the
//! streaming equalizer, and tracks position and playback state. The stop
//! flag is honored at block boundaries only, never mid-block, so
//! stopping takes effect within one block's duration.

use crate::error::{PlaybackError, Result};
use contour_core::{AudioBuffer, EqConfig};
use contour_dsp::{GainControl, StreamingEqualizer};
use tracing::{debug, warn};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Not playing; position is at the start
    Stopped,

    /// Emitting blocks
    Playing,

    /// Emission suspended; position and filter state preserved
    Paused,
}

/// Outcome of one scheduling tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A full block of audio was written
    Emitted,

    /// Paused; silence was written and position did not advance
    Suspended,

    /// The final (possibly zero-padded) block was written and playback
    /// stopped. Normal termination, not an error.
    EndOfStream,
}

/// Drives a [`StreamingEqualizer`] over an [`AudioBuffer`] in fixed-size
/// blocks.
pub struct PlaybackSequencer {
    equalizer: StreamingEqualizer,
    track: Option<AudioBuffer>,
    block_size: usize,
    position: usize,
    state: PlaybackState,
    input_block: Vec<f32>,
    underruns: u64,
}

impl PlaybackSequencer {
    /// Wrap an already-configured equalizer
    pub fn new(equalizer: StreamingEqualizer, block_size: usize) -> Self {
        Self {
            equalizer,
            track: None,
            block_size: block_size.max(1),
            position: 0,
            state: PlaybackState::Stopped,
            input_block: vec![0.0; block_size.max(1)],
            underruns: 0,
        }
    }

    /// Build and configure a sequencer from an [`EqConfig`]
    pub fn from_config(config: &EqConfig) -> Result<Self> {
        let bands = config.bands()?;
        let mut equalizer = StreamingEqualizer::new();
        equalizer.configure(&bands, config.sample_rate)?;
        Ok(Self::new(equalizer, config.block_size))
    }

    /// Load a track, replacing any previous one.
    ///
    /// Stops playback first. If the track's sample rate differs from the
    /// equalizer's, the filter bank is redesigned for the new rate.
    pub fn load(&mut self, track: AudioBuffer) -> Result<()> {
        self.stop();

        if track.sample_rate() != self.equalizer.sample_rate() {
            let bands = self.equalizer.bands().to_vec();
            self.equalizer.configure(&bands, track.sample_rate())?;
        }

        debug!(
            samples = track.len(),
            sample_rate = track.sample_rate(),
            "track loaded"
        );
        self.track = Some(track);
        Ok(())
    }

    /// Start playback from the beginning (or resume if paused)
    pub fn play(&mut self) -> Result<()> {
        if self.track.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        if self.state == PlaybackState::Stopped {
            self.position = 0;
            self.equalizer.reset_state();
        }
        self.state = PlaybackState::Playing;
        Ok(())
    }

    /// Suspend emission without touching position or filter state
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Continue from the paused position with filter continuity intact
    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Playing;
        }
    }

    /// Stop playback, rewind, and clear filter state so the next `play`
    /// starts clean
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.position = 0;
        self.equalizer.reset_state();
    }

    /// Produce the next output block.
    ///
    /// While playing, slices the next block from the current position,
    /// zero-padding a short tail, and equalizes it. Emitting the final
    /// block transitions to `Stopped` and reports [`Tick::EndOfStream`].
    /// While paused or stopped the output is silence.
    pub fn process_next(&mut self, output: &mut [f32]) -> Result<Tick> {
        if output.len() != self.block_size {
            return Err(PlaybackError::BlockSizeMismatch {
                expected: self.block_size,
                actual: output.len(),
            });
        }

        match self.state {
            PlaybackState::Stopped => {
                output.fill(0.0);
                Ok(Tick::EndOfStream)
            }
            PlaybackState::Paused => {
                output.fill(0.0);
                Ok(Tick::Suspended)
            }
            PlaybackState::Playing => {
                let track = self.track.as_ref().ok_or(PlaybackError::NoTrackLoaded)?;
                let samples = track.samples();
                let remaining = samples.len().saturating_sub(self.position);

                // A zero-length (or exhausted) buffer is an immediate,
                // normal end of stream
                if remaining == 0 {
                    output.fill(0.0);
                    self.state = PlaybackState::Stopped;
                    return Ok(Tick::EndOfStream);
                }

                let take = remaining.min(self.block_size);
                self.input_block[..take]
                    .copy_from_slice(&samples[self.position..self.position + take]);
                self.input_block[take..].fill(0.0);

                self.equalizer.process_block(&self.input_block, output)?;
                self.position += take;

                if take < self.block_size {
                    self.state = PlaybackState::Stopped;
                    Ok(Tick::EndOfStream)
                } else {
                    Ok(Tick::Emitted)
                }
            }
        }
    }

    /// Record a sink-reported underrun. Advisory only; playback
    /// continues.
    pub fn note_underrun(&mut self) {
        self.underruns += 1;
        warn!(total = self.underruns, "audio sink reported an underrun");
    }

    /// Number of underruns reported by the sink so far
    pub fn underruns(&self) -> u64 {
        self.underruns
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current position in samples from the start of the track
    pub fn position(&self) -> usize {
        self.position
    }

    /// Configured block size in samples
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Gain handle for the control context
    pub fn gain_control(&self) -> GainControl {
        self.equalizer.gain_control()
    }

    /// The equalizer being driven
    pub fn equalizer(&self) -> &StreamingEqualizer {
        &self.equalizer
    }
}
