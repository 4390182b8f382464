//! Off-line spectral analysis
//!
//! Computes a short-time power spectrum over a whole track and folds it
//! into one energy value (dB) per band. Runs off the real-time path,
//! typically once per loaded track; allocation here is fine.

use contour_core::{Band, SpectralProfile};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f32::consts::PI;
use std::f32::consts::SQRT_2;
use std::sync::Arc;
use tracing::debug;

/// Default transform size
pub const DEFAULT_FFT_SIZE: usize = 2048;

/// Floor added to band power before the dB conversion so silence maps
/// to a finite value instead of -inf
const POWER_EPSILON: f64 = 1e-10;

/// STFT-based per-band energy analyzer
pub struct SpectralAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    hop: usize,
    window: Vec<f32>,
}

impl SpectralAnalyzer {
    /// Analyzer with the default 2048-point transform
    pub fn new() -> Self {
        Self::with_fft_size(DEFAULT_FFT_SIZE)
    }

    /// Analyzer with an explicit transform size (75% frame overlap)
    pub fn with_fft_size(fft_size: usize) -> Self {
        let fft_size = fft_size.max(2);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        // Hann window
        let window = (0..fft_size)
            .map(|i| {
                let phase = 2.0 * PI * i as f32 / fft_size as f32;
                0.5 * (1.0 - phase.cos())
            })
            .collect();

        Self {
            fft,
            fft_size,
            hop: (fft_size / 4).max(1),
            window,
        }
    }

    /// Compute per-band energy (dB) for a full signal.
    ///
    /// Squared magnitudes are averaged over all frames to give one power
    /// value per bin, then each band averages the bins falling inside
    /// `[center / sqrt(2), center * sqrt(2)]`. A band that captures no
    /// bins (possible near Nyquist with coarse bin spacing) reports the
    /// epsilon floor rather than failing.
    pub fn analyze(&self, samples: &[f32], sample_rate: u32, bands: &[Band]) -> SpectralProfile {
        let bins = self.fft_size / 2 + 1;
        let mut bin_power = vec![0.0f64; bins];
        let mut frames = 0usize;

        let mut frame = vec![Complex::new(0.0f32, 0.0f32); self.fft_size];
        let mut start = 0usize;
        while start < samples.len() {
            // Tail frames are zero-padded
            for (i, slot) in frame.iter_mut().enumerate() {
                let sample = samples.get(start + i).copied().unwrap_or(0.0);
                *slot = Complex::new(sample * self.window[i], 0.0);
            }

            self.fft.process(&mut frame);

            for (power, value) in bin_power.iter_mut().zip(frame.iter().take(bins)) {
                *power += f64::from(value.norm_sqr());
            }
            frames += 1;
            start += self.hop;
        }

        if frames > 0 {
            for power in &mut bin_power {
                *power /= frames as f64;
            }
        }

        let bin_spacing = f64::from(sample_rate) / self.fft_size as f64;
        let energies_db = bands
            .iter()
            .map(|band| {
                let low = f64::from(band.center_hz / SQRT_2);
                let high = f64::from(band.center_hz * SQRT_2);

                let mut sum = 0.0f64;
                let mut count = 0usize;
                for (k, &power) in bin_power.iter().enumerate() {
                    let freq = k as f64 * bin_spacing;
                    if (low..=high).contains(&freq) {
                        sum += power;
                        count += 1;
                    }
                }

                let mean_power = if count > 0 { sum / count as f64 } else { 0.0 };
                (10.0 * (mean_power + POWER_EPSILON).log10()) as f32
            })
            .collect();

        debug!(
            frames,
            bands = bands.len(),
            fft_size = self.fft_size,
            "spectral profile computed"
        );

        SpectralProfile::new(energies_db)
    }
}

impl Default for SpectralAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
