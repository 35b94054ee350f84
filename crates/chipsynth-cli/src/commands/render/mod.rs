//! Render command implementation
//!
//! Resolves the configuration, renders a melody and writes it as a WAV file.

mod human;
mod json;

#[cfg(test)]
mod tests;

use anyhow::Result;
use std::path::PathBuf;
use std::process::ExitCode;

use chipsynth_audio::{
    generate_with_rng, EntropySource, GenerateResult, RngProvider, SynthError, SynthParams,
};

use crate::config::{self, ConfigError, RenderOverrides};
use crate::entropy::FileEntropySource;
use crate::output_path::resolve_output_path;

/// Arguments of the render command.
#[derive(Debug, Clone, Default)]
pub struct RenderArgs {
    /// Output path (default: `<Documents>/output_song.wav`)
    pub output: Option<String>,
    /// JSON parameter file
    pub config: Option<String>,
    /// Command-line overrides
    pub overrides: RenderOverrides,
    /// Files to draw reseed entropy from
    pub entropy_files: Vec<String>,
    /// Suppress per-note lines
    pub quiet: bool,
}

/// Everything needed to render, resolved before any audio is produced.
pub(crate) struct RenderPlan {
    pub params: SynthParams,
    pub rng: RngProvider,
    pub output: PathBuf,
    pub entropy: Option<FileEntropySource>,
}

impl RenderPlan {
    /// Resolves configuration, seed, output path and entropy source.
    pub fn resolve(args: &RenderArgs) -> Result<Self, ConfigError> {
        let (params, seed) = config::resolve(args.config.as_deref(), &args.overrides)?;

        // Entropy is only consulted when a reseed interval is set
        let entropy = params.melody.reseed_every.map(|_| {
            if args.entropy_files.is_empty() {
                FileEntropySource::system()
            } else {
                FileEntropySource::new(args.entropy_files.iter().map(PathBuf::from).collect())
            }
        });

        Ok(Self {
            params,
            rng: RngProvider::from_optional(seed),
            output: resolve_output_path(args.output.as_deref()),
            entropy,
        })
    }

    /// Renders, encodes and writes the file.
    pub fn execute(&mut self) -> Result<GenerateResult, SynthError> {
        let entropy = self.entropy.as_mut().map(|e| e as &mut dyn EntropySource);
        let result = generate_with_rng(&self.params, &mut self.rng, entropy)?;
        result.write_to_file(&self.output)?;
        Ok(result)
    }
}

/// Exit code for a failed render: 1 for rejected input, 2 for output failures.
pub(crate) fn failure_code(err: &SynthError) -> ExitCode {
    if err.is_io() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

/// Run the render command
///
/// # Arguments
/// * `args` - Output, configuration and override arguments
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 success, 1 configuration error, 2 write error
pub fn run(args: &RenderArgs, json_output: bool) -> Result<ExitCode> {
    if json_output {
        json::run_json(args)
    } else {
        human::run_human(args)
    }
}
