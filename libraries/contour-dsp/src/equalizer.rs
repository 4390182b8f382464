//! Streaming multi-band equalizer
//!
//! Owns one designed bandpass filter per band plus its persistent state,
//! and applies the current gain snapshot block by block. Coefficient
//! design happens only in `configure`; gain changes never touch the
//! filters, so `set_gains` is safe to call from a control thread while
//! the audio thread is streaming.

use crate::error::{DspError, Result};
use crate::filter::{design_filter_bank, BandFilter};
use crate::gain::{db_to_linear, GainControl};
use contour_core::{Band, GainVector};
use tracing::debug;

/// Lifecycle of the equalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualizerState {
    /// No filters designed yet
    Idle,

    /// Filters designed, state vectors zeroed
    Ready,

    /// At least one block processed since the last reset
    Streaming,
}

/// Block-wise multi-band equalizer with persistent filter state.
///
/// Per block, each band's filter runs over the input carrying its state
/// forward from the previous block, the filtered signal is scaled by the
/// band's linear gain, and the bands are summed. The sum is deliberately
/// not normalized across bands; keeping headroom when many bands carry
/// high positive gain is the caller's responsibility. Adjacent octave
/// bands overlap at their edges, and that coloration is part of the
/// contract rather than something this component corrects.
pub struct StreamingEqualizer {
    filters: Vec<BandFilter>,
    bands: Vec<Band>,
    gains: GainControl,
    scratch: Vec<f32>,
    sample_rate: u32,
    state: EqualizerState,
}

impl StreamingEqualizer {
    /// Create an unconfigured equalizer with its own gain handle
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            bands: Vec::new(),
            gains: GainControl::default(),
            scratch: Vec::new(),
            sample_rate: 0,
            state: EqualizerState::Idle,
        }
    }

    /// Create an unconfigured equalizer sharing an existing gain handle
    pub fn with_gain_control(gains: GainControl) -> Self {
        Self {
            gains,
            ..Self::new()
        }
    }

    /// (Re)design the filter bank for a band table and sample rate.
    ///
    /// Zeroes all filter state and transitions to `Ready`. Required
    /// before any block processing and again after a sample-rate change;
    /// not required when only gains change.
    pub fn configure(&mut self, bands: &[Band], sample_rate: u32) -> Result<()> {
        // Revalidate the layout so a hand-built band slice cannot bypass it
        let centers: Vec<f32> = bands.iter().map(|b| b.center_hz).collect();
        let bands = Band::layout(&centers)?;

        self.filters = design_filter_bank(&bands, sample_rate);
        self.sample_rate = sample_rate;

        // Keep existing gains when the band count is unchanged so a
        // reconfigure (e.g. sample-rate change) does not drop the curve
        if self.gains.snapshot().len() != bands.len() {
            self.gains.set(GainVector::flat(bands.len()));
        }

        self.bands = bands;
        self.state = EqualizerState::Ready;

        debug!(
            bands = self.bands.len(),
            sample_rate, "equalizer configured"
        );
        Ok(())
    }

    /// Atomically replace the gains used by subsequent blocks.
    ///
    /// Does not touch filter coefficients or state; may be called
    /// concurrently with streaming through a cloned [`GainControl`].
    pub fn set_gains(&self, gains: GainVector) {
        self.gains.set(gains);
    }

    /// A cloneable handle for the control context
    pub fn gain_control(&self) -> GainControl {
        self.gains.clone()
    }

    /// Equalize one block.
    ///
    /// Each band filters the full input with state carried forward from
    /// the previous call, so block-wise processing is equivalent to
    /// filtering the whole signal as one continuous stream. The output
    /// block is zeroed first and must match the input length.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) -> Result<()> {
        if self.state == EqualizerState::Idle {
            return Err(DspError::NotConfigured);
        }
        if input.len() != output.len() {
            return Err(DspError::BlockLengthMismatch {
                input: input.len(),
                output: output.len(),
            });
        }

        // Grows once to the largest block seen, then stays allocation-free
        if self.scratch.len() < input.len() {
            self.scratch.resize(input.len(), 0.0);
        }

        let gains = self.gains.snapshot();
        output.fill(0.0);

        for (index, filter) in self.filters.iter_mut().enumerate() {
            let scratch = &mut self.scratch[..input.len()];
            scratch.copy_from_slice(input);
            filter.process_in_place(scratch);

            let linear = db_to_linear(gains.db(index).unwrap_or(0.0));
            for (out, &filtered) in output.iter_mut().zip(scratch.iter()) {
                *out += filtered * linear;
            }
        }

        self.state = EqualizerState::Streaming;
        Ok(())
    }

    /// Zero all filter state vectors without redesigning coefficients.
    ///
    /// Used when starting playback from a new position so stale
    /// transients from a previous session are not carried over.
    pub fn reset_state(&mut self) {
        for filter in &mut self.filters {
            filter.reset();
        }
        if self.state == EqualizerState::Streaming {
            self.state = EqualizerState::Ready;
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> EqualizerState {
        self.state
    }

    /// The configured band table (empty while `Idle`)
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// The configured sample rate (0 while `Idle`)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Indices of bands whose filters were degraded by edge clamping
    pub fn clamped_bands(&self) -> Vec<usize> {
        self.filters
            .iter()
            .filter(|f| f.clamped())
            .map(|f| f.band().index)
            .collect()
    }
}

impl Default for StreamingEqualizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour_core::DEFAULT_BAND_CENTERS;

    fn configured() -> StreamingEqualizer {
        let bands = Band::layout(&DEFAULT_BAND_CENTERS).unwrap();
        let mut eq = StreamingEqualizer::new();
        eq.configure(&bands, 44100).unwrap();
        eq
    }

    #[test]
    fn process_before_configure_fails() {
        let mut eq = StreamingEqualizer::new();
        assert_eq!(eq.state(), EqualizerState::Idle);

        let input = vec![0.0f32; 64];
        let mut output = vec![0.0f32; 64];
        assert!(matches!(
            eq.process_block(&input, &mut output),
            Err(DspError::NotConfigured)
        ));
    }

    #[test]
    fn state_transitions() {
        let mut eq = configured();
        assert_eq!(eq.state(), EqualizerState::Ready);

        let input = vec![0.1f32; 64];
        let mut output = vec![0.0f32; 64];
        eq.process_block(&input, &mut output).unwrap();
        assert_eq!(eq.state(), EqualizerState::Streaming);

        eq.reset_state();
        assert_eq!(eq.state(), EqualizerState::Ready);
    }

    #[test]
    fn mismatched_block_lengths_rejected() {
        let mut eq = configured();
        let input = vec![0.0f32; 64];
        let mut output = vec![0.0f32; 32];
        assert!(matches!(
            eq.process_block(&input, &mut output),
            Err(DspError::BlockLengthMismatch { input: 64, output: 32 })
        ));
    }

    #[test]
    fn silence_in_silence_out() {
        let mut eq = configured();
        let input = vec![0.0f32; 1024];
        let mut output = vec![1.0f32; 1024];

        eq.process_block(&input, &mut output).unwrap();
        assert!(output.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn negative_infinity_free_with_extreme_gains() {
        let mut eq = configured();
        eq.set_gains(GainVector::new(vec![-120.0; 10]));

        let input = vec![0.5f32; 1024];
        let mut output = vec![0.0f32; 1024];
        eq.process_block(&input, &mut output).unwrap();

        assert!(output.iter().all(|s| s.is_finite()));
        assert!(output.iter().all(|s| s.abs() < 1e-3));
    }

    #[test]
    fn gain_change_does_not_reset_streaming_state() {
        let mut eq = configured();

        let input = vec![0.1f32; 256];
        let mut output = vec![0.0f32; 256];
        eq.process_block(&input, &mut output).unwrap();

        eq.set_gains(GainVector::new(vec![3.0; 10]));
        assert_eq!(eq.state(), EqualizerState::Streaming);
    }

    #[test]
    fn reconfigure_keeps_gains_for_same_band_count() {
        let mut eq = configured();
        eq.set_gains(GainVector::new(vec![2.0; 10]));

        let bands = Band::layout(&DEFAULT_BAND_CENTERS).unwrap();
        eq.configure(&bands, 48000).unwrap();

        assert_eq!(eq.sample_rate(), 48000);
        assert_eq!(eq.gain_control().snapshot().as_slice(), &[2.0; 10]);
    }

    #[test]
    fn clamped_band_reporting() {
        let mut eq = StreamingEqualizer::new();
        let bands = Band::layout(&DEFAULT_BAND_CENTERS).unwrap();
        eq.configure(&bands, 44100).unwrap();

        // Only the 16 kHz band exceeds Nyquist at 44.1 kHz
        assert_eq!(eq.clamped_bands(), vec![9]);
    }

    #[test]
    fn invalid_band_slice_rejected() {
        let mut eq = StreamingEqualizer::new();
        let bands = vec![
            Band {
                index: 0,
                center_hz: 1000.0,
            },
            Band {
                index: 1,
                center_hz: 100.0,
            },
        ];
        assert!(eq.configure(&bands, 44100).is_err());
        assert_eq!(eq.state(), EqualizerState::Idle);
    }
}
