//! Gain conversion and the shared gain snapshot
//!
//! The control surface and the audio path share one `GainControl`. The
//! control side publishes whole `GainVector`s; the audio side loads a
//! fully-formed snapshot at each block, so it never observes a partially
//! updated set of bands.

use arc_swap::ArcSwap;
use contour_core::GainVector;
use std::sync::Arc;

/// Convert a dB gain to a linear multiplier.
///
/// `db_to_linear(0.0)` is exactly 1.0 and the mapping is strictly
/// increasing in `gain_db`.
#[inline]
pub fn db_to_linear(gain_db: f32) -> f32 {
    10.0_f32.powf(gain_db / 20.0)
}

/// Cloneable handle to the atomically swappable gain vector.
///
/// `set` never blocks the audio thread and `snapshot` never blocks the
/// control thread; torn reads across bands cannot occur.
#[derive(Debug, Clone)]
pub struct GainControl {
    shared: Arc<ArcSwap<GainVector>>,
}

impl GainControl {
    /// Create a new handle holding the given initial gains
    pub fn new(initial: GainVector) -> Self {
        Self {
            shared: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    /// Atomically replace the current gain vector
    pub fn set(&self, gains: GainVector) {
        self.shared.store(Arc::new(gains));
    }

    /// Load the current gain vector as an immutable snapshot
    pub fn snapshot(&self) -> Arc<GainVector> {
        self.shared.load_full()
    }
}

impl Default for GainControl {
    fn default() -> Self {
        Self::new(GainVector::flat(0))
    }
}
