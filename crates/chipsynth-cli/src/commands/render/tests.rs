//! Tests for the render command.

use std::path::Path;
use std::process::ExitCode;

use chipsynth_audio::{Note, NoteEvent, WaveformKind};

use super::human::note_line;
use super::json::execution_failure;
use super::{run, RenderArgs, RenderPlan};
use crate::config::RenderOverrides;

fn args(output: &Path, seed: &str) -> RenderArgs {
    RenderArgs {
        output: Some(output.to_str().unwrap().to_string()),
        overrides: RenderOverrides {
            seed: Some(seed.to_string()),
            duration: Some(2.0),
            sample_rate: Some(8000),
            ..Default::default()
        },
        quiet: true,
        ..Default::default()
    }
}

#[test]
fn render_writes_reproducible_file() {
    let tmp = tempfile::tempdir().unwrap();
    let first = tmp.path().join("first.wav");
    let second = tmp.path().join("second.wav");

    assert_eq!(run(&args(&first, "42"), false).unwrap(), ExitCode::SUCCESS);
    assert_eq!(run(&args(&second, "42"), true).unwrap(), ExitCode::SUCCESS);

    let a = std::fs::read(&first).unwrap();
    let b = std::fs::read(&second).unwrap();
    assert_eq!(&a[0..4], b"RIFF");
    assert!(a == b, "same seed should give the same file in both output modes");
}

#[test]
fn render_rejects_missing_config() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("song.wav");
    let mut render_args = args(&output, "1");
    render_args.config = Some(tmp.path().join("nope.json").to_str().unwrap().to_string());

    assert_eq!(run(&render_args, false).unwrap(), ExitCode::from(1));
    assert_eq!(run(&render_args, true).unwrap(), ExitCode::from(1));
    assert!(!output.exists());
}

#[test]
fn render_rejects_bad_seed_and_params() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("song.wav");

    assert_eq!(run(&args(&output, "12ab"), false).unwrap(), ExitCode::from(1));

    let mut render_args = args(&output, "1");
    render_args.overrides.channels = Some(0);
    assert_eq!(run(&render_args, true).unwrap(), ExitCode::from(1));
    assert!(!output.exists());
}

#[test]
fn render_reports_write_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let output = tmp.path().join("missing_dir").join("song.wav");

    assert_eq!(run(&args(&output, "1"), false).unwrap(), ExitCode::from(2));
    assert_eq!(run(&args(&output, "1"), true).unwrap(), ExitCode::from(2));
}

#[test]
fn write_failure_document_keeps_clock_seed() {
    let tmp = tempfile::tempdir().unwrap();
    let render_args = RenderArgs {
        output: Some(
            tmp.path()
                .join("missing_dir")
                .join("song.wav")
                .to_str()
                .unwrap()
                .to_string(),
        ),
        overrides: RenderOverrides {
            duration: Some(0.5),
            sample_rate: Some(8000),
            ..Default::default()
        },
        quiet: true,
        ..Default::default()
    };

    let mut plan = RenderPlan::resolve(&render_args).unwrap();
    let err = plan.execute().unwrap_err();
    assert!(err.is_io());

    let output = execution_failure(&plan, &err);
    assert!(!output.success);
    assert_eq!(output.errors[0].code, "SYNTH_010");
    assert_eq!(output.seed.as_deref(), Some(plan.rng.seed().as_str()));
    assert_eq!(output.seed_provenance.as_deref(), Some("clock"));
}

#[test]
fn render_uses_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config = tmp.path().join("synth.json");
    std::fs::write(
        &config,
        r#"{
            "bytes_per_sample": 1,
            "melody": {
                "pitches": [{"value": 440.0, "weight": 1}],
                "waveforms": [{"value": "triangle", "weight": 1}],
                "durations": [0.5]
            }
        }"#,
    )
    .unwrap();
    let output = tmp.path().join("song.wav");
    let mut render_args = args(&output, "7");
    render_args.config = Some(config.to_str().unwrap().to_string());

    let mut plan = RenderPlan::resolve(&render_args).unwrap();
    assert_eq!(plan.params.bytes_per_sample, 1);
    assert_eq!(plan.params.sample_rate, 8000);
    assert!(plan.entropy.is_none());

    let result = plan.execute().unwrap();
    assert_eq!(result.notes.len(), 4);
    assert!(result
        .notes
        .iter()
        .all(|e| e.note.waveform == WaveformKind::Triangle));
    assert_eq!(std::fs::read(&output).unwrap().len(), 44 + 4 * 4000);
}

#[test]
fn render_reseeds_from_entropy_files() {
    let tmp = tempfile::tempdir().unwrap();
    let entropy = tmp.path().join("entropy.bin");
    std::fs::write(&entropy, b"some bytes that are not very random").unwrap();
    let output = tmp.path().join("song.wav");

    let mut render_args = args(&output, "3");
    render_args.overrides.reseed_every = Some(2);
    render_args.entropy_files = vec![entropy.to_str().unwrap().to_string()];

    let mut plan = RenderPlan::resolve(&render_args).unwrap();
    assert_eq!(plan.entropy.as_ref().unwrap().paths(), &[entropy]);
    let result = plan.execute().unwrap();
    assert!(!result.is_reproducible());
    assert!(result.reseeds.iter().all(|r| r.note_index % 2 == 0));
    assert!(output.exists());
}

#[test]
fn note_line_format() {
    let event = NoteEvent {
        index: 0,
        start_seconds: 0.0,
        note: Note::new(261.63, 0.5, WaveformKind::Square, 0.3),
        frames: 13230,
        reseeded: false,
    };
    assert_eq!(note_line(&event), "Frequency: 261.63 Hz square 0.30s");
}
