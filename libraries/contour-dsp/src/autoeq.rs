//! Auto-EQ compensation curve generation
//!
//! Combines a track's spectral profile with a target (speaker) response
//! into a clipped per-band gain curve. Pure and deterministic; runs off
//! the real-time path.

use crate::error::{DspError, Result};
use contour_core::{GainVector, SpectralProfile, TargetProfile};

/// Generate a compensation gain curve.
///
/// For each band: `mean(song) - (target[band] + song[band])`, clipped to
/// `[-max_gain_db, +max_gain_db]`. Bands the track is light in (relative
/// to its own average) are boosted, heavy bands and bands the target
/// already emphasizes are cut.
///
/// Profiles must cover the same band table; a length mismatch fails with
/// [`DspError::ProfileShapeMismatch`].
pub fn generate_curve(
    song: &SpectralProfile,
    target: &TargetProfile,
    max_gain_db: f32,
) -> Result<GainVector> {
    if song.len() != target.len() {
        return Err(DspError::ProfileShapeMismatch {
            song: song.len(),
            target: target.len(),
        });
    }

    let limit = max_gain_db.max(0.0);
    let mean_song = song.mean_db();

    let gains = song
        .as_slice()
        .iter()
        .zip(target.as_slice())
        .map(|(&song_db, &target_db)| (mean_song - (target_db + song_db)).clamp(-limit, limit))
        .collect();

    Ok(GainVector::new(gains))
}
