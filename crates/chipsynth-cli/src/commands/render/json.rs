//! JSON output mode for the render command.

use anyhow::Result;
use std::process::ExitCode;
use std::time::Instant;

use chipsynth_audio::SynthError;

use super::{failure_code, RenderArgs, RenderPlan};
use crate::commands::json_output::{print_json, JsonError, RenderOutput, RenderResult};

/// Run render with machine-readable JSON output.
pub fn run_json(args: &RenderArgs) -> Result<ExitCode> {
    let start = Instant::now();

    let mut plan = match RenderPlan::resolve(args) {
        Ok(plan) => plan,
        Err(e) => {
            let mut error = JsonError::new(e.code(), e.to_string());
            if let Some(file) = e.file() {
                error = error.with_file(file);
            }
            print_json(&RenderOutput::failure(vec![error]))?;
            return Ok(ExitCode::from(1));
        }
    };

    let result = match plan.execute() {
        Ok(result) => result,
        Err(e) => {
            print_json(&execution_failure(&plan, &e))?;
            return Ok(failure_code(&e));
        }
    };

    let music_seconds: f64 = result.notes.iter().map(|e| e.note.duration).sum();
    let record = RenderResult {
        output_path: plan.output.display().to_string(),
        seed: result.seed.to_string(),
        seed_provenance: result.provenance.as_str().to_string(),
        reproducible: result.is_reproducible(),
        sample_rate: result.wav.format.sample_rate,
        channels: result.wav.format.channels,
        bits_per_sample: result.wav.format.bits_per_sample(),
        rounding: result.wav.rounding.as_str().to_string(),
        pitch_policy: plan.params.melody.pitch_policy.name().to_string(),
        frames: result.wav.num_frames,
        duration_seconds: result.wav.duration_seconds(),
        music_seconds,
        pcm_hash: result.wav.pcm_hash.clone(),
        notes: result.notes,
        reseeds: result.reseeds,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    print_json(&RenderOutput::success(record))?;
    Ok(ExitCode::SUCCESS)
}

/// Failure document for a run whose seed was already chosen.
pub(super) fn execution_failure(plan: &RenderPlan, err: &SynthError) -> RenderOutput {
    RenderOutput::failure(vec![JsonError::from(err)])
        .with_seed(plan.rng.seed(), plan.rng.provenance())
}
