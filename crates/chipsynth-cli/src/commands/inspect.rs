//! Inspect command implementation
//!
//! Reads a rendered WAV file back and reports its header fields and PCM hash.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::process::ExitCode;

use chipsynth_audio::wav::{compute_pcm_hash, WavInfo};

use super::json_output::{error_codes, print_json, InspectOutput, InspectResult, JsonError};

/// Run the inspect command
///
/// # Arguments
/// * `file` - Path to the WAV file
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 success, 1 unreadable or malformed file
pub fn run(file: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(file)
    } else {
        run_human(file)
    }
}

fn parse(data: &[u8]) -> Option<(WavInfo, String)> {
    let info = WavInfo::parse(data)?;
    let hash = compute_pcm_hash(data)?;
    Some((info, hash))
}

fn run_human(file: &str) -> Result<ExitCode> {
    println!("{} {}", "Inspecting:".cyan().bold(), file);

    let data = fs::read(file).with_context(|| format!("Failed to read file: {}", file))?;

    let Some((info, hash)) = parse(&data) else {
        println!(
            "  {} [{}] not a PCM WAV file",
            "x".red(),
            error_codes::INVALID_WAV.red()
        );
        return Ok(ExitCode::from(1));
    };

    println!(
        "{} {} Hz, {} ch, {}-bit (format {})",
        "Format:".dimmed(),
        info.sample_rate,
        info.channels,
        info.bits_per_sample,
        info.audio_format
    );
    println!(
        "{} {} frames, {:.3}s",
        "Length:".dimmed(),
        info.frames(),
        info.duration_seconds()
    );
    if !info.is_consistent() {
        println!(
            "  {} byte rate or block align disagrees with the other fields",
            "!".yellow()
        );
    }
    println!("{} {}", "PCM hash:".dimmed(), hash);

    Ok(ExitCode::SUCCESS)
}

fn run_json(file: &str) -> Result<ExitCode> {
    let data = match fs::read(file) {
        Ok(data) => data,
        Err(e) => {
            let error = JsonError::new(error_codes::FILE_READ, e.to_string()).with_file(file);
            print_json(&InspectOutput::failure(vec![error]))?;
            return Ok(ExitCode::from(1));
        }
    };

    let Some((info, hash)) = parse(&data) else {
        let error =
            JsonError::new(error_codes::INVALID_WAV, "not a PCM WAV file").with_file(file);
        print_json(&InspectOutput::failure(vec![error]))?;
        return Ok(ExitCode::from(1));
    };

    print_json(&InspectOutput::success(InspectResult::new(file, &info, hash)))?;
    Ok(ExitCode::SUCCESS)
}
