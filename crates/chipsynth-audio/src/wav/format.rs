//! WAV file format parameters.

use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};

use super::writer::MAX_DATA_LEN;

/// PCM sample width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleWidth {
    /// 8-bit, stored unsigned with a +128 offset.
    Eight,
    /// 16-bit signed little-endian.
    Sixteen,
}

impl SampleWidth {
    /// Maps a byte count to a width. Only 1 and 2 are supported.
    pub fn from_bytes(bytes: u16) -> SynthResult<Self> {
        match bytes {
            1 => Ok(SampleWidth::Eight),
            2 => Ok(SampleWidth::Sixteen),
            _ => Err(SynthError::UnsupportedSampleWidth { bytes }),
        }
    }

    /// Bytes per sample.
    pub fn bytes(self) -> u16 {
        match self {
            SampleWidth::Eight => 1,
            SampleWidth::Sixteen => 2,
        }
    }

    /// Bits per sample.
    pub fn bits(self) -> u16 {
        self.bytes() * 8
    }

    /// Largest quantized magnitude.
    pub fn full_scale(self) -> f64 {
        match self {
            SampleWidth::Eight => 127.0,
            SampleWidth::Sixteen => 32767.0,
        }
    }
}

/// WAV file format parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Sample width.
    pub width: SampleWidth,
}

impl WavFormat {
    /// Creates a format.
    pub fn new(channels: u16, sample_rate: u32, width: SampleWidth) -> Self {
        Self {
            channels,
            sample_rate,
            width,
        }
    }

    /// Creates a mono format.
    pub fn mono(sample_rate: u32, width: SampleWidth) -> Self {
        Self::new(1, sample_rate, width)
    }

    /// Rejects formats that cannot be expressed in a WAV header.
    pub fn validate(&self) -> SynthResult<()> {
        if self.sample_rate == 0 {
            return Err(SynthError::InvalidSampleRate {
                rate: self.sample_rate,
            });
        }
        if self.channels == 0 {
            return Err(SynthError::InvalidChannelCount {
                channels: self.channels,
            });
        }
        let block_align = self.channels as u64 * self.bytes_per_sample() as u64;
        if block_align > u16::MAX as u64 {
            return Err(SynthError::InvalidChannelCount {
                channels: self.channels,
            });
        }
        let byte_rate = self.sample_rate as u64 * block_align;
        if byte_rate > u32::MAX as u64 {
            return Err(SynthError::invalid_param(
                "sample_rate",
                format!("byte rate {byte_rate} does not fit in a WAV header"),
            ));
        }
        Ok(())
    }

    /// Bits per sample.
    pub fn bits_per_sample(&self) -> u16 {
        self.width.bits()
    }

    /// Calculates bytes per sample (per channel).
    pub fn bytes_per_sample(&self) -> u16 {
        self.width.bytes()
    }

    /// Calculates block align (bytes per sample frame).
    ///
    /// Saturates for formats that [`WavFormat::validate`] rejects.
    pub fn block_align(&self) -> u16 {
        self.channels.saturating_mul(self.bytes_per_sample())
    }

    /// Calculates byte rate (bytes per second).
    ///
    /// Saturates for formats that [`WavFormat::validate`] rejects.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.saturating_mul(self.block_align() as u32)
    }

    /// Most frames whose PCM data fits in one file.
    pub fn max_frames(&self) -> u64 {
        MAX_DATA_LEN as u64 / (self.channels as u64 * self.bytes_per_sample() as u64).max(1)
    }
}
