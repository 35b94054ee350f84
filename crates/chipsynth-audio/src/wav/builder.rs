//! WAV encoder builder pattern.

use std::path::Path;

use crate::error::SynthResult;

use super::format::{SampleWidth, WavFormat};
use super::result::WavResult;
use super::writer::{samples_to_pcm, Rounding};

/// WAV encoder builder.
///
/// ```
/// use chipsynth_audio::wav::{Rounding, SampleWidth, WavEncoder};
///
/// let wav = WavEncoder::new(22050)
///     .width(SampleWidth::Eight)
///     .rounding(Rounding::Nearest)
///     .encode(&[0.0, 0.5, -0.5])
///     .unwrap();
/// assert_eq!(wav.wav_data.len(), 44 + 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WavEncoder {
    format: WavFormat,
    rounding: Rounding,
}

impl WavEncoder {
    /// Creates a mono 16-bit encoder with truncating quantization.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            format: WavFormat::mono(sample_rate, SampleWidth::Sixteen),
            rounding: Rounding::Truncate,
        }
    }

    /// Creates an encoder for an existing format.
    pub fn with_format(format: WavFormat) -> Self {
        Self {
            format,
            rounding: Rounding::Truncate,
        }
    }

    /// Sets the channel count.
    pub fn channels(mut self, channels: u16) -> Self {
        self.format.channels = channels;
        self
    }

    /// Sets the sample width.
    pub fn width(mut self, width: SampleWidth) -> Self {
        self.format.width = width;
        self
    }

    /// Sets the quantization rounding.
    pub fn rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// The configured format.
    pub fn format(&self) -> WavFormat {
        self.format
    }

    /// Encodes mono samples into a complete file in memory.
    pub fn encode(&self, samples: &[f64]) -> SynthResult<WavResult> {
        WavResult::from_samples(samples, self.format, self.rounding)
    }

    /// Encodes mono samples and writes them to `path`.
    pub fn write(&self, samples: &[f64], path: &Path) -> SynthResult<WavResult> {
        let wav = self.encode(samples)?;
        wav.write_to_file(path)?;
        Ok(wav)
    }

    /// Returns the PCM data hash without building the container.
    pub fn pcm_hash(&self, samples: &[f64]) -> SynthResult<String> {
        self.format.validate()?;
        let pcm = samples_to_pcm(samples, &self.format, self.rounding);
        Ok(blake3::hash(&pcm).to_hex().to_string())
    }
}
