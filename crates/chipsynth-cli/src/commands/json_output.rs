//! JSON output types for machine-readable CLI output.
//!
//! This module provides structured output types for the `--json` flag on
//! `render` and `inspect`.

use chipsynth_audio::{NoteEvent, Reseed, Seed, SeedProvenance, SynthError, WavInfo};
use serde::{Deserialize, Serialize};

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
/// Format: CLI_XXX for CLI-level errors; core errors pass through their
/// SYNTH_XXX codes.
pub mod error_codes {
    /// Config file could not be read
    pub const CONFIG_READ: &str = "CLI_001";
    /// Config file is not valid JSON or has unknown fields
    pub const CONFIG_PARSE: &str = "CLI_002";
    /// Seed is not a non-negative integer
    pub const INVALID_SEED: &str = "CLI_003";
    /// WAV file could not be read
    pub const FILE_READ: &str = "CLI_004";
    /// File is not a RIFF/WAVE file
    pub const INVALID_WAV: &str = "CLI_005";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "SYNTH_010")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// File involved (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
        }
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl From<&SynthError> for JsonError {
    fn from(err: &SynthError) -> Self {
        let json = JsonError::new(err.code(), err.to_string());
        match err {
            SynthError::Io { path, .. } => json.with_file(path.display().to_string()),
            _ => json,
        }
    }
}

/// JSON output for the `render` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOutput {
    /// Whether the render succeeded
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Seed of a run that failed after it was resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    /// Provenance of that seed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_provenance: Option<String>,
    /// Render details (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RenderResult>,
}

impl RenderOutput {
    /// Creates a successful render output.
    pub fn success(result: RenderResult) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            seed: None,
            seed_provenance: None,
            result: Some(result),
        }
    }

    /// Creates a failed render output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            seed: None,
            seed_provenance: None,
            result: None,
        }
    }

    /// Records the seed so a failed run can still be reproduced.
    pub fn with_seed(mut self, seed: &Seed, provenance: SeedProvenance) -> Self {
        self.seed = Some(seed.to_string());
        self.seed_provenance = Some(provenance.as_str().to_string());
        self
    }
}

/// Render result details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// Path of the written file
    pub output_path: String,
    /// Seed digits
    pub seed: String,
    /// "explicit" or "clock"
    pub seed_provenance: String,
    /// Whether the seed alone reproduces the file
    pub reproducible: bool,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count
    pub channels: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// Quantization rounding
    pub rounding: String,
    /// Pitch selection policy
    pub pitch_policy: String,
    /// Frames written
    pub frames: usize,
    /// Playback length in seconds
    pub duration_seconds: f64,
    /// Sum of note durations in seconds
    pub music_seconds: f64,
    /// BLAKE3 hash of the PCM payload
    pub pcm_hash: String,
    /// Every rendered note
    pub notes: Vec<NoteEvent>,
    /// Reseeds from external entropy
    pub reseeds: Vec<Reseed>,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

/// JSON output for the `inspect` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectOutput {
    /// Whether the file could be inspected
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Inspection details (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<InspectResult>,
}

impl InspectOutput {
    /// Creates a successful inspect output.
    pub fn success(result: InspectResult) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
        }
    }

    /// Creates a failed inspect output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
        }
    }
}

/// Inspection details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectResult {
    /// Inspected file
    pub file: String,
    /// Audio format tag (1 = PCM)
    pub audio_format: u16,
    /// Channel count
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// Frames in the data chunk
    pub frames: usize,
    /// Playback length in seconds
    pub duration_seconds: f64,
    /// Whether byte rate and block align agree with the other fields
    pub consistent: bool,
    /// BLAKE3 hash of the PCM payload
    pub pcm_hash: String,
}

impl InspectResult {
    /// Builds the record from parsed header fields.
    pub fn new(file: impl Into<String>, info: &WavInfo, pcm_hash: String) -> Self {
        Self {
            file: file.into(),
            audio_format: info.audio_format,
            channels: info.channels,
            sample_rate: info.sample_rate,
            bits_per_sample: info.bits_per_sample,
            frames: info.frames(),
            duration_seconds: info.duration_seconds(),
            consistent: info.is_consistent(),
            pcm_hash,
        }
    }
}

/// Prints `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synth_error_conversion_keeps_code_and_path() {
        let err = SynthError::io(
            "/tmp/out.wav",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let json = JsonError::from(&err);
        assert_eq!(json.code, "SYNTH_010");
        assert_eq!(json.file.as_deref(), Some("/tmp/out.wav"));

        let json = JsonError::from(&SynthError::InvalidSampleRate { rate: 0 });
        assert_eq!(json.code, "SYNTH_001");
        assert_eq!(json.file, None);
    }

    #[test]
    fn test_failure_output_omits_result() {
        let output = RenderOutput::failure(vec![JsonError::new(error_codes::CONFIG_READ, "nope")]);
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["success"], false);
        assert!(value.get("result").is_none());
        assert_eq!(value["errors"][0]["code"], "CLI_001");
        assert!(value["errors"][0].get("file").is_none());
        assert!(value.get("seed").is_none());
    }

    #[test]
    fn test_failure_output_can_carry_seed() {
        let output = RenderOutput::failure(Vec::new())
            .with_seed(&Seed::from(1234), SeedProvenance::Clock);
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["seed"], "1234");
        assert_eq!(value["seed_provenance"], "clock");
    }
}
