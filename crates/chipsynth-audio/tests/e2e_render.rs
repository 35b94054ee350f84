//! End-to-end rendering tests.
//!
//! Renders complete melodies through the public API and checks the written
//! files with an independent decoder.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p chipsynth-audio --test e2e_render
//! ```

use chipsynth_audio::wav::compute_pcm_hash;
use chipsynth_audio::{
    render_to_file, AmplitudeRange, MelodyConfig, PitchPolicy, Seed, SynthParams, WaveformKind,
    WeightedEntry,
};

fn single_tone_params() -> SynthParams {
    SynthParams {
        sample_rate: 22050,
        duration_seconds: 1.0,
        melody: MelodyConfig {
            pitches: vec![WeightedEntry::new(440.0, 1.0)],
            waveforms: vec![WeightedEntry::new(WaveformKind::Square, 1.0)],
            durations: vec![0.5],
            amplitude: AmplitudeRange::fixed(0.5),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Closed-form square wave: each note restarts at phase zero.
fn expected_square(frames_per_note: usize, notes: usize) -> Vec<i16> {
    (0..notes)
        .flat_map(|_| {
            (0..frames_per_note).map(|i| {
                let cycles = (i as f64 / 22050.0) * 440.0;
                if cycles.rem_euclid(1.0) < 0.5 {
                    16383
                } else {
                    -16383
                }
            })
        })
        .collect()
}

// ============================================================================
// Closed-form render
// ============================================================================

#[test]
fn test_two_note_square_melody() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("square.wav");
    let result = render_to_file(&single_tone_params(), Some(Seed::from(42)), None, &path).unwrap();

    assert_eq!(result.notes.len(), 2);
    for event in &result.notes {
        assert_eq!(event.frames, 11025);
        assert_eq!(event.note.frequency, 440.0);
        assert_eq!(event.note.waveform, WaveformKind::Square);
        assert_eq!(event.note.amplitude, 0.5);
    }
    assert_eq!(result.notes[1].start_seconds, 0.5);
    assert_eq!(result.wav.num_frames, 22050);

    let mut reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.duration(), 22050);

    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert!(samples == expected_square(11025, 2), "samples differ from closed form");
}

#[test]
fn test_8bit_stereo_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stereo8.wav");
    let params = SynthParams {
        channels: 2,
        bytes_per_sample: 1,
        ..single_tone_params()
    };
    render_to_file(&params, Some(Seed::from(42)), None, &path).unwrap();

    let mut reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.bits_per_sample, 8);
    assert_eq!(reader.duration(), 22050);

    let samples: Vec<i8> = reader.samples::<i8>().map(|s| s.unwrap()).collect();
    assert_eq!(samples.len(), 44100);
    for frame in samples.chunks_exact(2) {
        assert_eq!(frame[0], frame[1]);
        // 0.5 * 127 truncated
        assert_eq!(frame[0].abs(), 63);
    }
}

#[test]
fn test_file_hash_matches_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hash.wav");
    let result = render_to_file(&single_tone_params(), Some(Seed::from(7)), None, &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(compute_pcm_hash(&bytes), Some(result.wav.pcm_hash));
}

// ============================================================================
// Default melody
// ============================================================================

#[test]
fn test_default_melody_uses_configured_tables() {
    let params = SynthParams {
        sample_rate: 8000,
        duration_seconds: 20.0,
        ..Default::default()
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("default.wav");
    let result = render_to_file(&params, Some(Seed::from(2024)), None, &path).unwrap();

    let melody = MelodyConfig::default();
    let pitches: Vec<f64> = melody.pitches.iter().map(|e| e.value).collect();
    let waveforms: Vec<WaveformKind> = melody.waveforms.iter().map(|e| e.value).collect();
    for event in &result.notes {
        assert!(pitches.contains(&event.note.frequency));
        assert!(waveforms.contains(&event.note.waveform));
        assert!(melody.durations.contains(&event.note.duration));
        assert!((0.4..=0.7).contains(&event.note.amplitude));
    }

    let music: f64 = result.notes.iter().map(|e| e.note.duration).sum();
    assert!(music >= 20.0);
    assert!(music < 20.0 + 0.5 + 1e-9);
}

#[test]
fn test_repeat_avoiding_melody() {
    let params = SynthParams {
        sample_rate: 8000,
        duration_seconds: 30.0,
        melody: MelodyConfig {
            pitch_policy: PitchPolicy::avoid_repeats(),
            ..Default::default()
        },
        ..Default::default()
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("walk.wav");
    let result = render_to_file(&params, Some(Seed::from(9)), None, &path).unwrap();

    let freqs: Vec<f64> = result.notes.iter().map(|e| e.note.frequency).collect();
    assert!(freqs.len() > 10);
    for window in freqs.windows(3) {
        assert_ne!(window[2], window[1]);
        assert_ne!(window[2], window[0]);
    }
}
