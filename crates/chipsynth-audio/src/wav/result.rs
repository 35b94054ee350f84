//! WAV file generation result type.

use std::path::Path;

use crate::error::{SynthError, SynthResult};

use super::format::WavFormat;
use super::writer::{samples_to_pcm, write_bytes_to_file, write_wav_to_vec, Rounding};

/// Result of WAV file generation.
#[derive(Debug, Clone)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of PCM data only.
    pub pcm_hash: String,
    /// Container format.
    pub format: WavFormat,
    /// Rounding used during quantization.
    pub rounding: Rounding,
    /// Number of frames (samples per channel).
    pub num_frames: usize,
}

impl WavResult {
    /// Encodes mono samples, copying them into every channel of `format`.
    pub fn from_samples(samples: &[f64], format: WavFormat, rounding: Rounding) -> SynthResult<Self> {
        format.validate()?;
        let pcm = samples_to_pcm(samples, &format, rounding);
        let pcm_hash = blake3::hash(&pcm).to_hex().to_string();
        let wav_data = write_wav_to_vec(&format, &pcm).map_err(|_| SynthError::RunTooLong {
            frames: samples.len() as u64,
            limit: format.max_frames(),
        })?;

        Ok(Self {
            wav_data,
            pcm_hash,
            format,
            rounding,
            num_frames: samples.len(),
        })
    }

    /// Returns the duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.num_frames as f64 / self.format.sample_rate as f64
    }

    /// Writes the encoded file to `path`.
    pub fn write_to_file(&self, path: &Path) -> SynthResult<()> {
        write_bytes_to_file(path, &self.wav_data)
    }
}
