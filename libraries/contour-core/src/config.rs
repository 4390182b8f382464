//! Engine configuration

use crate::error::Result;
use crate::types::{Band, DEFAULT_BAND_CENTERS};
use serde::{Deserialize, Serialize};

/// Configuration for the Contour EQ engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqConfig {
    /// Sample rate in Hz (default: 44100)
    pub sample_rate: u32,

    /// Samples per processing block (default: 1024)
    pub block_size: usize,

    /// Band center frequencies in Hz (default: 10-band set, 31.25-16000 doubling)
    pub band_centers: Vec<f32>,

    /// Clip limit for auto-generated gains in dB (default: 6.0)
    pub max_auto_gain_db: f32,
}

impl Default for EqConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            block_size: 1024,
            band_centers: DEFAULT_BAND_CENTERS.to_vec(),
            max_auto_gain_db: 6.0,
        }
    }
}

impl EqConfig {
    /// Build the validated band table for this configuration
    pub fn bands(&self) -> Result<Vec<Band>> {
        Band::layout(&self.band_centers)
    }

    /// Duration of one processing block in seconds
    pub fn block_duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.block_size as f32 / self.sample_rate as f32
    }
}
