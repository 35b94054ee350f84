//! Human-readable (colored) output mode for the render command.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;
use std::time::Instant;

use chipsynth_audio::{GenerateResult, NoteEvent};

use super::{failure_code, RenderArgs, RenderPlan};

/// Run render with human-readable (colored) output.
pub fn run_human(args: &RenderArgs) -> Result<ExitCode> {
    let start = Instant::now();

    let mut plan = match RenderPlan::resolve(args) {
        Ok(plan) => plan,
        Err(e) => {
            println!("\n{}", "Configuration Error:".red().bold());
            let file_info = e.file().map(|f| format!(" in {}", f)).unwrap_or_default();
            println!("  {} [{}]{}: {}", "x".red(), e.code().red(), file_info.dimmed(), e);
            return Ok(ExitCode::from(1));
        }
    };

    let seed = plan.rng.seed().clone();
    let provenance = plan.rng.provenance();
    println!("{} {} ({})", "Seed:".cyan().bold(), seed, provenance.as_str());
    println!("{} {}", "Output:".cyan().bold(), plan.output.display());
    println!(
        "{} {} Hz, {} ch, {}-bit, {}",
        "Format:".dimmed(),
        plan.params.sample_rate,
        plan.params.channels,
        plan.params.bytes_per_sample * 8,
        plan.params.rounding.as_str()
    );
    println!(
        "{} {} ({} pitches), target {:.2}s",
        "Melody:".dimmed(),
        plan.params.melody.pitch_policy.name(),
        plan.params.melody.pitches.len(),
        plan.params.duration_seconds
    );
    if let Some(every) = plan.params.melody.reseed_every {
        println!("{} every {} notes", "Reseed:".yellow().bold(), every);
    }

    match plan.execute() {
        Ok(result) => {
            print_notes(&result, args.quiet);
            print_summary(&result, start.elapsed().as_millis() as u64);
            println!("{} {}", "Wrote:".dimmed(), plan.output.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("\n{} [{}] {}", "RENDER FAILED".red().bold(), e.code(), e);
            Ok(failure_code(&e))
        }
    }
}

/// Formats the per-note diagnostic line.
pub(super) fn note_line(event: &NoteEvent) -> String {
    format!(
        "Frequency: {:.2} Hz {} {:.2}s",
        event.note.frequency, event.note.waveform, event.note.duration
    )
}

fn print_notes(result: &GenerateResult, quiet: bool) {
    let mut reseeds = result.reseeds.iter().peekable();
    for event in &result.notes {
        if let Some(reseed) = reseeds.next_if(|r| r.note_index == event.index) {
            println!(
                "  {} reseeded before note {} (stream key {:016x})",
                "~".yellow(),
                reseed.note_index,
                reseed.stream_key
            );
        }
        if !quiet {
            println!("{}", note_line(event));
        }
    }
}

fn print_summary(result: &GenerateResult, duration_ms: u64) {
    let music: f64 = result.notes.iter().map(|e| e.note.duration).sum();
    println!(
        "\n{} Rendered {} note(s), {} frames ({:.2}s audio, {:.2}s music) in {}ms",
        "SUCCESS".green().bold(),
        result.notes.len(),
        result.wav.num_frames,
        result.wav.duration_seconds(),
        music,
        duration_ms
    );
    println!("{} {}", "PCM hash:".dimmed(), result.wav.pcm_hash);
    if !result.is_reproducible() {
        println!(
            "  {} {} reseed(s) from external entropy; the seed alone will not reproduce this file",
            "!".yellow(),
            result.reseeds.len()
        );
    }
}
