//! Render configuration: an optional JSON file plus command-line overrides.

use std::io;
use std::path::Path;

use chipsynth_audio::{PitchPolicy, Rounding, Seed, SynthError, SynthParams};
use thiserror::Error;

use crate::commands::json_output::error_codes;

/// Errors raised while assembling the render configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// Config file path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The config file is not a valid parameter document.
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        /// Config file path.
        path: String,
        /// Parse failure.
        #[source]
        source: SynthError,
    },

    /// The seed given on the command line is not a non-negative integer.
    #[error(transparent)]
    Seed(SynthError),

    /// The merged parameters failed validation.
    #[error(transparent)]
    Invalid(SynthError),
}

impl ConfigError {
    /// Stable error code for JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => error_codes::CONFIG_READ,
            ConfigError::Parse { .. } => error_codes::CONFIG_PARSE,
            ConfigError::Seed(_) => error_codes::INVALID_SEED,
            ConfigError::Invalid(e) => e.code(),
        }
    }

    /// The config file involved, if any.
    pub fn file(&self) -> Option<&str> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path.as_str()),
            _ => None,
        }
    }
}

/// Loads parameters from `path`, or the defaults when no file is given.
pub fn load_params(path: Option<&str>) -> Result<SynthParams, ConfigError> {
    let Some(path) = path else {
        return Ok(SynthParams::default());
    };
    let text = std::fs::read_to_string(Path::new(path)).map_err(|source| ConfigError::Read {
        path: path.to_string(),
        source,
    })?;
    SynthParams::from_json(&text).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOverrides {
    /// Seed digits.
    pub seed: Option<String>,
    /// Target length in seconds.
    pub duration: Option<f64>,
    /// Sample rate in Hz.
    pub sample_rate: Option<u32>,
    /// Channel count.
    pub channels: Option<u16>,
    /// Bytes per sample.
    pub bytes_per_sample: Option<u16>,
    /// Quantization rounding.
    pub rounding: Option<Rounding>,
    /// Switch pitch selection to repeat avoidance.
    pub avoid_repeats: bool,
    /// Reseed interval in notes.
    pub reseed_every: Option<u32>,
}

impl RenderOverrides {
    /// Applies every override that was given.
    pub fn apply(&self, params: &mut SynthParams) {
        if let Some(duration) = self.duration {
            params.duration_seconds = duration;
        }
        if let Some(rate) = self.sample_rate {
            params.sample_rate = rate;
        }
        if let Some(channels) = self.channels {
            params.channels = channels;
        }
        if let Some(bytes) = self.bytes_per_sample {
            params.bytes_per_sample = bytes;
        }
        if let Some(rounding) = self.rounding {
            params.rounding = rounding;
        }
        // Keep a configured step size if the file already asks for the walk
        if self.avoid_repeats && params.melody.pitch_policy == PitchPolicy::Weighted {
            params.melody.pitch_policy = PitchPolicy::avoid_repeats();
        }
        if let Some(every) = self.reseed_every {
            params.melody.reseed_every = Some(every);
        }
    }

    /// Parses the seed override.
    pub fn seed(&self) -> Result<Option<Seed>, ConfigError> {
        self.seed
            .as_deref()
            .map(Seed::parse)
            .transpose()
            .map_err(ConfigError::Seed)
    }
}

/// Loads, overrides and validates the parameters of a render.
pub fn resolve(
    config_path: Option<&str>,
    overrides: &RenderOverrides,
) -> Result<(SynthParams, Option<Seed>), ConfigError> {
    let mut params = load_params(config_path)?;
    overrides.apply(&mut params);
    params.validate().map_err(ConfigError::Invalid)?;
    let seed = overrides.seed()?;
    Ok((params, seed))
}
