//! Bandpass filter bank design and block-wise application
//!
//! Each band gets a 2nd-order Butterworth bandpass over the octave
//! `[center / sqrt(2), center * sqrt(2)]`, realized as two cascaded
//! second-order sections. Cascading keeps the low bands (normalized
//! center frequencies down around 7e-4) numerically stable where a
//! single 4th-order transfer function would not be.
//!
//! Design runs in f64 and happens only on `configure`; per-block
//! processing is f32 with a two-value state vector per section that is
//! carried across block boundaries.

use contour_core::Band;
use rustfft::num_complex::Complex64;
use std::f64::consts::PI;
use tracing::warn;

/// Sections per band filter (4 poles as two biquads)
pub const SECTIONS_PER_FILTER: usize = 2;

/// Fraction of Nyquist the upper band edge is clamped to
const MAX_EDGE_FRACTION: f64 = 0.995;

/// Denormal flush threshold, matching the per-sample state update
const DENORMAL_THRESHOLD: f32 = 1e-15;

/// One second-order IIR section in transposed direct form II.
///
/// Coefficients are normalized so `a0 == 1`. The two-value state vector
/// is the filter's memory and must persist across blocks; zeroing it
/// mid-stream produces audible discontinuities.
#[derive(Debug, Clone)]
pub struct SosSection {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    // State carried across process calls
    z1: f32,
    z2: f32,
}

impl SosSection {
    fn new(b0: f64, b1: f64, b2: f64, a1: f64, a2: f64) -> Self {
        Self {
            b0: b0 as f32,
            b1: b1 as f32,
            b2: b2 as f32,
            a1: a1 as f32,
            a2: a2 as f32,
            z1: 0.0,
            z2: 0.0,
        }
    }

    #[inline]
    fn process_sample(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;

        // Flush denormal state to zero to prevent CPU performance issues
        if self.z1.abs() < DENORMAL_THRESHOLD {
            self.z1 = 0.0;
        }
        if self.z2.abs() < DENORMAL_THRESHOLD {
            self.z2 = 0.0;
        }

        y
    }

    /// Filter a block in place, carrying state forward from previous calls
    pub fn process_in_place(&mut self, block: &mut [f32]) {
        for sample in block.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Zero the state vector (coefficients are preserved)
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

/// A designed bandpass filter for one band
#[derive(Debug, Clone)]
pub struct BandFilter {
    band: Band,
    sections: [SosSection; SECTIONS_PER_FILTER],
    clamped: bool,
}

impl BandFilter {
    /// The band this filter covers
    pub fn band(&self) -> Band {
        self.band
    }

    /// Whether an edge had to be clamped during design (the band
    /// degrades toward a high-pass approximation near Nyquist)
    pub fn clamped(&self) -> bool {
        self.clamped
    }

    /// Filter a block in place through both cascaded sections
    pub fn process_in_place(&mut self, block: &mut [f32]) {
        for section in &mut self.sections {
            section.process_in_place(block);
        }
    }

    /// Zero all section state vectors
    pub fn reset(&mut self) {
        for section in &mut self.sections {
            section.reset();
        }
    }
}

/// Design one bandpass filter per band for the given sample rate.
///
/// Band edges that fall outside `(0, Nyquist)` are clamped rather than
/// failing the whole bank; clamped bands are logged and flagged. Must be
/// re-run on sample-rate change, never on gain change.
pub fn design_filter_bank(bands: &[Band], sample_rate: u32) -> Vec<BandFilter> {
    let nyquist = f64::from(sample_rate) / 2.0;

    bands
        .iter()
        .map(|&band| {
            let mut low = f64::from(band.low_edge_hz());
            let mut high = f64::from(band.high_edge_hz());
            let mut clamped = false;

            if high >= nyquist {
                high = nyquist * MAX_EDGE_FRACTION;
                clamped = true;
            }
            if low <= 0.0 {
                low = nyquist * 1e-5;
                clamped = true;
            }
            if low >= high {
                // Center at or above Nyquist: keep a narrow band just below it
                low = high * 0.5;
                clamped = true;
            }

            if clamped {
                warn!(
                    band = band.index,
                    center_hz = band.center_hz,
                    low_hz = low,
                    high_hz = high,
                    "band edge clamped to the representable range"
                );
            }

            let sections = butter_bandpass_sections(low, high, f64::from(sample_rate));

            BandFilter {
                band,
                sections,
                clamped,
            }
        })
        .collect()
}

/// Design a 2nd-order Butterworth bandpass as two second-order sections.
///
/// The order-2 analog lowpass prototype is transformed to a bandpass
/// (splitting each prototype pole in two) and mapped to the z-plane with
/// a prewarped bilinear transform. Zeros land at z = 1 and z = -1, one
/// of each per section. The cascade is normalized to unity gain at the
/// geometric center of the passband.
fn butter_bandpass_sections(
    low_hz: f64,
    high_hz: f64,
    sample_rate: f64,
) -> [SosSection; SECTIONS_PER_FILTER] {
    // Prewarped analog edge frequencies
    let w1 = (PI * low_hz / sample_rate).tan();
    let w2 = (PI * high_hz / sample_rate).tan();
    let bandwidth = w2 - w1;
    let w0_sq = w1 * w2;

    // Order-2 Butterworth prototype pole in the upper half-plane; its
    // conjugate is accounted for when the sections are formed below.
    let prototype = Complex64::from_polar(1.0, 3.0 * PI / 4.0);

    // Lowpass-to-bandpass transform: s^2 - p*bw*s + w0^2 = 0
    let half = prototype * (bandwidth / 2.0);
    let disc = (half * half - Complex64::new(w0_sq, 0.0)).sqrt();
    let analog_poles = [half + disc, half - disc];

    // Bilinear transform into the z-plane
    let one = Complex64::new(1.0, 0.0);
    let digital_poles = analog_poles.map(|s| (one + s) / (one - s));

    // Each digital pole pairs with its conjugate to give real
    // denominator coefficients; numerator (1 - z^-2) holds one zero at
    // z = 1 and one at z = -1.
    let mut sections = digital_poles.map(|pole| {
        SosSection::new(1.0, 0.0, -1.0, -2.0 * pole.re, pole.norm_sqr())
    });

    // Normalize to unity gain at the geometric center frequency,
    // splitting the correction evenly between the sections
    let center_hz = (low_hz * high_hz).sqrt();
    let z = Complex64::from_polar(1.0, 2.0 * PI * center_hz / sample_rate);
    let z1 = one / z;
    let z2 = z1 * z1;

    let mut cascade_gain = 1.0;
    for section in &sections {
        let numerator = one - z2;
        let denominator = one + z1 * f64::from(section.a1) + z2 * f64::from(section.a2);
        cascade_gain *= numerator.norm() / denominator.norm();
    }

    let scale = ((1.0 / cascade_gain).sqrt()) as f32;
    for section in &mut sections {
        section.b0 *= scale;
        section.b2 *= scale;
    }

    sections
}
