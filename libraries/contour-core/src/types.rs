//! Core domain types
//!
//! Bands, profiles, gain vectors, and audio buffers shared between the
//! DSP engine and the playback sequencer.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::f32::consts::SQRT_2;

/// Default 10-band center frequencies (Hz), doubling from 31.25 to 16000
pub const DEFAULT_BAND_CENTERS: [f32; 10] = [
    31.25, 62.5, 125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0, 16000.0,
];

/// One equalizer band: an octave-wide range centered on a control frequency
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Position in the band table (index-aligned with gain vectors and profiles)
    pub index: usize,

    /// Center frequency in Hz
    pub center_hz: f32,
}

impl Band {
    /// Build a band table from a list of center frequencies.
    ///
    /// Centers must be finite, positive, and strictly increasing.
    pub fn layout(centers: &[f32]) -> Result<Vec<Band>> {
        if centers.is_empty() {
            return Err(CoreError::InvalidBandLayout("no band centers".to_string()));
        }
        for window in centers.windows(2) {
            if window[0] >= window[1] {
                return Err(CoreError::InvalidBandLayout(format!(
                    "centers must be strictly increasing: {} >= {}",
                    window[0], window[1]
                )));
            }
        }
        for &center in centers {
            if !center.is_finite() || center <= 0.0 {
                return Err(CoreError::InvalidBandLayout(format!(
                    "center frequency must be finite and positive: {center}"
                )));
            }
        }

        Ok(centers
            .iter()
            .enumerate()
            .map(|(index, &center_hz)| Band { index, center_hz })
            .collect())
    }

    /// Lower passband edge (half an octave below center)
    pub fn low_edge_hz(&self) -> f32 {
        self.center_hz / SQRT_2
    }

    /// Upper passband edge (half an octave above center)
    pub fn high_edge_hz(&self) -> f32 {
        self.center_hz * SQRT_2
    }
}

/// Per-band gains in dB, index-aligned with the band table.
///
/// Immutable once built; the equalizer swaps whole vectors atomically
/// rather than mutating bands in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GainVector {
    gains_db: Vec<f32>,
}

impl GainVector {
    /// Create a gain vector from per-band dB values
    pub fn new(gains_db: Vec<f32>) -> Self {
        Self { gains_db }
    }

    /// All bands at 0 dB
    pub fn flat(bands: usize) -> Self {
        Self {
            gains_db: vec![0.0; bands],
        }
    }

    /// Number of bands
    pub fn len(&self) -> usize {
        self.gains_db.len()
    }

    /// Whether the vector has no bands
    pub fn is_empty(&self) -> bool {
        self.gains_db.is_empty()
    }

    /// Gain for one band in dB
    pub fn db(&self, band: usize) -> Option<f32> {
        self.gains_db.get(band).copied()
    }

    /// All gains in band order
    pub fn as_slice(&self) -> &[f32] {
        &self.gains_db
    }

    /// Iterate gains in band order
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.gains_db.iter().copied()
    }
}

/// Per-band energy summary (dB) describing a track's tonal balance.
///
/// Produced once per loaded track by the spectral analyzer; immutable
/// after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralProfile {
    energies_db: Vec<f32>,
}

impl SpectralProfile {
    /// Create a profile from per-band energies in dB
    pub fn new(energies_db: Vec<f32>) -> Self {
        Self { energies_db }
    }

    /// Number of bands
    pub fn len(&self) -> usize {
        self.energies_db.len()
    }

    /// Whether the profile has no bands
    pub fn is_empty(&self) -> bool {
        self.energies_db.is_empty()
    }

    /// Energy for one band in dB
    pub fn db(&self, band: usize) -> Option<f32> {
        self.energies_db.get(band).copied()
    }

    /// All energies in band order
    pub fn as_slice(&self) -> &[f32] {
        &self.energies_db
    }

    /// Mean energy across all bands in dB
    pub fn mean_db(&self) -> f32 {
        if self.energies_db.is_empty() {
            return 0.0;
        }
        self.energies_db.iter().sum::<f32>() / self.energies_db.len() as f32
    }
}

/// A reference tonal-balance curve (e.g., a speaker's known response),
/// one dB value per band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetProfile {
    gains_db: Vec<f32>,
}

impl TargetProfile {
    /// Create a target profile from per-band dB values
    pub fn new(gains_db: Vec<f32>) -> Self {
        Self { gains_db }
    }

    /// A neutral (all zero) target
    pub fn flat(bands: usize) -> Self {
        Self {
            gains_db: vec![0.0; bands],
        }
    }

    /// Build a target profile from an ordered `(frequency_hz, gain_db)` table.
    ///
    /// Each band takes the table entry with the nearest frequency by
    /// absolute difference; on a tie the first entry wins.
    pub fn from_table(table: &[(f32, f32)], bands: &[Band]) -> Result<Self> {
        if table.is_empty() {
            return Err(CoreError::EmptyProfileTable);
        }

        let gains_db = bands
            .iter()
            .map(|band| {
                let mut nearest = table[0].1;
                let mut nearest_dist = (table[0].0 - band.center_hz).abs();
                for &(freq, gain) in &table[1..] {
                    let dist = (freq - band.center_hz).abs();
                    if dist < nearest_dist {
                        nearest_dist = dist;
                        nearest = gain;
                    }
                }
                nearest
            })
            .collect();

        Ok(Self { gains_db })
    }

    /// Number of bands
    pub fn len(&self) -> usize {
        self.gains_db.len()
    }

    /// Whether the profile has no bands
    pub fn is_empty(&self) -> bool {
        self.gains_db.is_empty()
    }

    /// Target gain for one band in dB
    pub fn db(&self, band: usize) -> Option<f32> {
        self.gains_db.get(band).copied()
    }

    /// All target gains in band order
    pub fn as_slice(&self) -> &[f32] {
        &self.gains_db
    }
}

/// A decoded mono track at a fixed sample rate.
///
/// Owned by the playback session and read-only once loaded; replaced
/// wholesale when a new track is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer from decoded mono samples
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// A silent buffer of the given length
    pub fn silence(num_samples: usize, sample_rate: u32) -> Self {
        Self {
            samples: vec![0.0; num_samples],
            sample_rate,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The decoded samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Track duration in seconds
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_centers_are_valid_layout() {
        let bands = Band::layout(&DEFAULT_BAND_CENTERS).unwrap();
        assert_eq!(bands.len(), 10);
        assert_eq!(bands[0].center_hz, 31.25);
        assert_eq!(bands[9].center_hz, 16000.0);
        for (i, band) in bands.iter().enumerate() {
            assert_eq!(band.index, i);
        }
    }

    #[test]
    fn band_edges_span_one_octave() {
        let bands = Band::layout(&[1000.0]).unwrap();
        let band = bands[0];

        // Edges at f/sqrt(2) and f*sqrt(2), geometric mean equal to center
        assert!((band.low_edge_hz() - 707.1).abs() < 0.1);
        assert!((band.high_edge_hz() - 1414.2).abs() < 0.1);
        let geometric_mean = (band.low_edge_hz() * band.high_edge_hz()).sqrt();
        assert!((geometric_mean - band.center_hz).abs() < 0.1);
    }

    #[test]
    fn non_increasing_centers_rejected() {
        assert!(Band::layout(&[100.0, 100.0]).is_err());
        assert!(Band::layout(&[1000.0, 100.0]).is_err());
        assert!(Band::layout(&[]).is_err());
    }

    #[test]
    fn non_positive_centers_rejected() {
        assert!(Band::layout(&[-10.0, 100.0]).is_err());
        assert!(Band::layout(&[0.0, 100.0]).is_err());
    }

    #[test]
    fn gain_vector_access() {
        let gains = GainVector::new(vec![-2.0, 6.0, 1.5]);
        assert_eq!(gains.len(), 3);
        assert_eq!(gains.db(1), Some(6.0));
        assert_eq!(gains.db(3), None);
        assert_eq!(gains.as_slice(), &[-2.0, 6.0, 1.5]);

        let flat = GainVector::flat(10);
        assert!(flat.iter().all(|g| g == 0.0));
    }

    #[test]
    fn spectral_profile_mean() {
        let profile = SpectralProfile::new(vec![-10.0, 0.0, 10.0]);
        assert_eq!(profile.mean_db(), 0.0);
        assert_eq!(SpectralProfile::new(vec![]).mean_db(), 0.0);
    }

    #[test]
    fn target_profile_nearest_lookup() {
        let bands = Band::layout(&[100.0, 1000.0, 10000.0]).unwrap();
        let table = [(90.0, 1.0), (1100.0, 2.0), (9000.0, 3.0), (20000.0, 4.0)];

        let profile = TargetProfile::from_table(&table, &bands).unwrap();
        assert_eq!(profile.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn target_profile_tie_takes_first_entry() {
        let bands = Band::layout(&[100.0]).unwrap();
        // 90 and 110 are equidistant from 100; the first row wins
        let table = [(90.0, 1.0), (110.0, 2.0)];

        let profile = TargetProfile::from_table(&table, &bands).unwrap();
        assert_eq!(profile.as_slice(), &[1.0]);
    }

    #[test]
    fn target_profile_empty_table_rejected() {
        let bands = Band::layout(&[100.0]).unwrap();
        assert!(matches!(
            TargetProfile::from_table(&[], &bands),
            Err(CoreError::EmptyProfileTable)
        ));
    }

    #[test]
    fn audio_buffer_duration() {
        let buffer = AudioBuffer::silence(44100, 44100);
        assert!((buffer.duration_secs() - 1.0).abs() < 1e-6);
        assert_eq!(buffer.len(), 44100);
        assert!(!buffer.is_empty());

        let empty = AudioBuffer::new(vec![], 44100);
        assert!(empty.is_empty());
        assert_eq!(empty.duration_secs(), 0.0);
    }
}
