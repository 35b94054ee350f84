//! Error types for the synthesis pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;

/// Errors that can occur while configuring a run or writing its output.
///
/// Numeric edge cases inside a run (unknown waveforms, zero-frame notes,
/// missing entropy) are not errors; they degrade to silence, empty renders
/// or a skipped reseed.
#[derive(Debug, Error)]
pub enum SynthError {
    /// Invalid sample rate.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate.
        rate: u32,
    },

    /// Invalid channel count.
    #[error("invalid channel count: {channels}")]
    InvalidChannelCount {
        /// The invalid channel count.
        channels: u16,
    },

    /// Invalid duration.
    #[error("invalid duration: {duration} seconds")]
    InvalidDuration {
        /// The invalid duration.
        duration: f64,
    },

    /// Invalid frequency.
    #[error("invalid frequency: {freq} Hz")]
    InvalidFrequency {
        /// The invalid frequency.
        freq: f64,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Seed text is not a non-negative decimal integer.
    #[error("invalid seed '{text}': expected a non-negative decimal integer")]
    InvalidSeed {
        /// The rejected input.
        text: String,
    },

    /// A choice table or choice set has no entries.
    #[error("'{name}' must contain at least one entry")]
    EmptyTable {
        /// Table name.
        name: String,
    },

    /// A weighted table entry has a weight that is not a positive finite number.
    #[error("'{name}' has a non-positive weight: {weight}")]
    InvalidWeight {
        /// Table name.
        name: String,
        /// The rejected weight.
        weight: f64,
    },

    /// Sample width other than 1 or 2 bytes.
    #[error("unsupported sample width: {bytes} byte(s) per sample (expected 1 or 2)")]
    UnsupportedSampleWidth {
        /// The requested width in bytes.
        bytes: u16,
    },

    /// A run would produce more audio than one WAV file can hold.
    #[error("run of up to {frames} frames exceeds the WAV limit of {limit} frames")]
    RunTooLong {
        /// Worst-case frame count of the run.
        frames: u64,
        /// Most frames the output format can hold.
        limit: u64,
    },

    /// Output file could not be created or written.
    #[error("failed to write '{}': {source}", path.display())]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl SynthError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an I/O error bound to the path that failed.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable error code for machine-readable output.
    pub fn code(&self) -> &'static str {
        match self {
            SynthError::InvalidSampleRate { .. } => "SYNTH_001",
            SynthError::InvalidChannelCount { .. } => "SYNTH_002",
            SynthError::InvalidDuration { .. } => "SYNTH_003",
            SynthError::InvalidFrequency { .. } => "SYNTH_004",
            SynthError::InvalidParameter { .. } => "SYNTH_005",
            SynthError::InvalidSeed { .. } => "SYNTH_006",
            SynthError::EmptyTable { .. } => "SYNTH_007",
            SynthError::InvalidWeight { .. } => "SYNTH_008",
            SynthError::UnsupportedSampleWidth { .. } => "SYNTH_009",
            SynthError::Io { .. } => "SYNTH_010",
            SynthError::RunTooLong { .. } => "SYNTH_011",
        }
    }

    /// Error category: `config` for anything rejected before a run starts,
    /// `io` for output failures.
    pub fn category(&self) -> &'static str {
        match self {
            SynthError::Io { .. } => "io",
            _ => "config",
        }
    }

    /// Whether the error happened while writing output rather than validating input.
    pub fn is_io(&self) -> bool {
        matches!(self, SynthError::Io { .. })
    }
}
