//! Core WAV writing and PCM conversion functions.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};

use super::format::{SampleWidth, WavFormat};

/// Size of the canonical PCM header.
pub const HEADER_LEN: usize = 44;

/// Largest PCM payload a RIFF size field can describe.
pub const MAX_DATA_LEN: usize = (u32::MAX - 36) as usize;

/// How scaled samples are turned into integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Toward zero.
    #[default]
    Truncate,
    /// To the nearest integer, halves away from zero.
    Nearest,
}

impl Rounding {
    /// Applies the rounding to a scaled sample.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::Truncate => value.trunc(),
            Rounding::Nearest => value.round(),
        }
    }

    /// Lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Rounding::Truncate => "truncate",
            Rounding::Nearest => "nearest",
        }
    }
}

/// Clips `sample` to [-1, 1] and scales it to a signed 8-bit value.
pub fn quantize_i8(sample: f64, rounding: Rounding) -> i8 {
    rounding.apply(sample.clamp(-1.0, 1.0) * 127.0) as i8
}

/// Clips `sample` to [-1, 1] and scales it to a signed 16-bit value.
pub fn quantize_i16(sample: f64, rounding: Rounding) -> i16 {
    rounding.apply(sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// Converts mono f64 samples to interleaved PCM bytes.
///
/// Every sample is written once per channel. 8-bit samples are stored
/// unsigned (`value + 128`) as the WAV format requires; 16-bit samples are
/// signed little-endian.
pub fn samples_to_pcm(samples: &[f64], format: &WavFormat, rounding: Rounding) -> Vec<u8> {
    let channels = format.channels as usize;
    let frame_len = channels * format.bytes_per_sample() as usize;
    let mut pcm = Vec::with_capacity(samples.len().saturating_mul(frame_len));

    for &sample in samples {
        match format.width {
            SampleWidth::Eight => {
                let byte = (quantize_i8(sample, rounding) as i16 + 128) as u8;
                pcm.extend(std::iter::repeat(byte).take(channels));
            }
            SampleWidth::Sixteen => {
                let bytes = quantize_i16(sample, rounding).to_le_bytes();
                for _ in 0..channels {
                    pcm.extend_from_slice(&bytes);
                }
            }
        }
    }

    pcm
}

/// Writes a complete WAV file to a writer.
///
/// Fails with `InvalidInput` if the format cannot be expressed in a header
/// or `pcm_data` is too large for the RIFF size fields.
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    format
        .validate()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    if pcm_data.len() > MAX_DATA_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} bytes of PCM data exceed the WAV size limit", pcm_data.len()),
        ));
    }
    let data_size = pcm_data.len() as u32;
    let file_size = 36 + data_size; // Total file size minus 8 bytes for RIFF header

    // RIFF header
    writer.write_all(b"RIFF")?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    // fmt chunk
    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?; // Chunk size (16 for PCM)
    writer.write_all(&1u16.to_le_bytes())?; // Audio format (1 = PCM)
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&format.byte_rate().to_le_bytes())?;
    writer.write_all(&format.block_align().to_le_bytes())?;
    writer.write_all(&format.bits_per_sample().to_le_bytes())?;

    // data chunk
    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)?;

    Ok(())
}

/// Writes a WAV file to a byte vector.
pub fn write_wav_to_vec(format: &WavFormat, pcm_data: &[u8]) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::with_capacity(HEADER_LEN + pcm_data.len());
    write_wav(&mut buffer, format, pcm_data)?;
    Ok(buffer)
}

/// Writes raw bytes to `path`, flushing before returning.
///
/// The file handle is dropped on every path out of this function.
pub fn write_bytes_to_file(path: &Path, bytes: &[u8]) -> SynthResult<()> {
    let file = File::create(path).map_err(|e| SynthError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes).map_err(|e| SynthError::io(path, e))?;
    writer.flush().map_err(|e| SynthError::io(path, e))
}

/// Encodes `samples` and writes a WAV file to `path`.
pub fn write_wav_file(
    path: &Path,
    samples: &[f64],
    format: &WavFormat,
    rounding: Rounding,
) -> SynthResult<()> {
    format.validate()?;
    let pcm = samples_to_pcm(samples, format, rounding);
    let file = File::create(path).map_err(|e| SynthError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write_wav(&mut writer, format, &pcm).map_err(|e| SynthError::io(path, e))?;
    writer.flush().map_err(|e| SynthError::io(path, e))
}
