//! Sequencer behavior over real audio content

use contour_core::{AudioBuffer, EqConfig, GainVector};
use contour_playback::{PlaybackSequencer, PlaybackState, Tick};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BLOCK: usize = 512;

fn test_config() -> EqConfig {
    EqConfig {
        block_size: BLOCK,
        ..EqConfig::default()
    }
}

fn noise_track(num_samples: usize, seed: u64) -> AudioBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let samples = (0..num_samples).map(|_| rng.gen_range(-0.5..0.5)).collect();
    AudioBuffer::new(samples, 44100)
}

fn run_to_end(sequencer: &mut PlaybackSequencer) -> Vec<Vec<f32>> {
    let mut blocks = Vec::new();
    let mut out = vec![0.0f32; BLOCK];
    loop {
        let tick = sequencer.process_next(&mut out).unwrap();
        match tick {
            Tick::Emitted => blocks.push(out.clone()),
            Tick::EndOfStream => {
                if out.iter().any(|&s| s != 0.0) {
                    blocks.push(out.clone());
                }
                break;
            }
            Tick::Suspended => unreachable!("no pauses in this run"),
        }
    }
    blocks
}

#[test]
fn pause_and_resume_preserve_filter_continuity() {
    let track = noise_track(BLOCK * 4, 11);

    // Straight run
    let mut straight = PlaybackSequencer::from_config(&test_config()).unwrap();
    straight.load(track.clone()).unwrap();
    straight.play().unwrap();
    let reference = run_to_end(&mut straight);

    // Same track with a pause in the middle
    let mut paused = PlaybackSequencer::from_config(&test_config()).unwrap();
    paused.load(track).unwrap();
    paused.play().unwrap();

    let mut out = vec![0.0f32; BLOCK];
    let mut blocks = Vec::new();

    assert_eq!(paused.process_next(&mut out).unwrap(), Tick::Emitted);
    blocks.push(out.clone());

    paused.pause();
    assert_eq!(paused.process_next(&mut out).unwrap(), Tick::Suspended);
    paused.resume();

    loop {
        match paused.process_next(&mut out).unwrap() {
            Tick::Emitted => blocks.push(out.clone()),
            Tick::EndOfStream => break,
            Tick::Suspended => unreachable!(),
        }
    }

    assert_eq!(blocks.len(), reference.len());
    for (i, (a, b)) in blocks.iter().zip(reference.iter()).enumerate() {
        assert_eq!(a, b, "block {i} diverged across the pause");
    }
}

#[test]
fn replay_after_stop_starts_clean() {
    let track = noise_track(BLOCK * 3, 23);

    let mut seq = PlaybackSequencer::from_config(&test_config()).unwrap();
    seq.load(track).unwrap();

    seq.play().unwrap();
    let first_run = run_to_end(&mut seq);

    // The sequencer stopped itself at end of stream; a fresh play must
    // not carry filter transients from the previous session
    seq.play().unwrap();
    let second_run = run_to_end(&mut seq);

    assert_eq!(first_run, second_run);
}

#[test]
fn stop_mid_track_rewinds() {
    let track = noise_track(BLOCK * 4, 31);

    let mut seq = PlaybackSequencer::from_config(&test_config()).unwrap();
    seq.load(track).unwrap();
    seq.play().unwrap();

    let mut out = vec![0.0f32; BLOCK];
    seq.process_next(&mut out).unwrap();
    seq.process_next(&mut out).unwrap();
    assert_eq!(seq.position(), BLOCK * 2);

    seq.stop();
    assert_eq!(seq.position(), 0);
    assert_eq!(seq.state(), PlaybackState::Stopped);
}

#[test]
fn tail_block_count_matches_track_length() {
    // 2.5 blocks emit exactly three blocks, the last one padded
    let track = noise_track(BLOCK * 2 + BLOCK / 2, 5);

    let mut seq = PlaybackSequencer::from_config(&test_config()).unwrap();
    seq.load(track).unwrap();
    seq.play().unwrap();

    let mut out = vec![0.0f32; BLOCK];
    assert_eq!(seq.process_next(&mut out).unwrap(), Tick::Emitted);
    assert_eq!(seq.process_next(&mut out).unwrap(), Tick::Emitted);
    assert_eq!(seq.process_next(&mut out).unwrap(), Tick::EndOfStream);
    assert_eq!(seq.state(), PlaybackState::Stopped);
}

#[test]
fn live_gain_changes_affect_subsequent_blocks() {
    let track = noise_track(BLOCK * 8, 17);

    let mut seq = PlaybackSequencer::from_config(&test_config()).unwrap();
    let control = seq.gain_control();
    seq.load(track).unwrap();
    seq.play().unwrap();

    let mut out = vec![0.0f32; BLOCK];
    let mut loud_energy = 0.0f32;
    for _ in 0..4 {
        seq.process_next(&mut out).unwrap();
        loud_energy += out.iter().map(|s| s * s).sum::<f32>();
    }

    // Control surface cuts everything while playback keeps running
    control.set(GainVector::new(vec![-60.0; 10]));

    let mut quiet_energy = 0.0f32;
    for _ in 0..4 {
        seq.process_next(&mut out).unwrap();
        quiet_energy += out.iter().map(|s| s * s).sum::<f32>();
    }

    assert!(quiet_energy < loud_energy * 0.01);
}
