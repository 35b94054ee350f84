//! PCM data extraction, header parsing and hashing utilities.

use serde::Serialize;

/// Iterates `(chunk_id, chunk_body)` pairs after the RIFF/WAVE preamble.
fn chunks<'a>(wav_data: &'a [u8]) -> Option<impl Iterator<Item = (&'a [u8], &'a [u8])> + 'a> {
    if wav_data.len() < 12 || &wav_data[0..4] != b"RIFF" || &wav_data[8..12] != b"WAVE" {
        return None;
    }

    let mut pos = 12;
    Some(std::iter::from_fn(move || {
        if pos + 8 > wav_data.len() {
            return None;
        }
        let chunk_id = &wav_data[pos..pos + 4];
        let chunk_size = read_u32(wav_data, pos + 4)? as usize;
        let body_start = pos + 8;
        let body_end = body_start.checked_add(chunk_size)?;
        if body_end > wav_data.len() {
            return None;
        }

        pos = body_end;
        // Align to word boundary
        if chunk_size % 2 != 0 {
            pos += 1;
        }
        Some((chunk_id, &wav_data[body_start..body_end]))
    }))
}

fn read_u16(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Extracts PCM data from a WAV file buffer.
///
/// Used for comparing WAV files by their audio content only.
///
/// # Returns
/// PCM data if found, or None if the format is invalid
pub fn extract_pcm_data(wav_data: &[u8]) -> Option<&[u8]> {
    chunks(wav_data)?.find(|(id, _)| *id == b"data").map(|(_, body)| body)
}

/// Computes the PCM hash of a WAV file.
///
/// # Returns
/// BLAKE3 hash of PCM data, or None if format is invalid
pub fn compute_pcm_hash(wav_data: &[u8]) -> Option<String> {
    extract_pcm_data(wav_data).map(|pcm| blake3::hash(pcm).to_hex().to_string())
}

/// Header fields of a PCM WAV file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WavInfo {
    /// Audio format tag (1 = PCM).
    pub audio_format: u16,
    /// Number of channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bytes per second as stored in the header.
    pub byte_rate: u32,
    /// Bytes per frame as stored in the header.
    pub block_align: u16,
    /// Bits per sample.
    pub bits_per_sample: u16,
    /// Length of the data chunk in bytes.
    pub data_len: usize,
}

impl WavInfo {
    /// Parses the `fmt ` and `data` chunks. Returns `None` for anything
    /// that is not a RIFF/WAVE file with both chunks present.
    pub fn parse(wav_data: &[u8]) -> Option<Self> {
        let mut fmt = None;
        let mut data_len = None;
        for (id, body) in chunks(wav_data)? {
            match id {
                b"fmt " if body.len() >= 16 => fmt = Some(body),
                b"data" => data_len = Some(body.len()),
                _ => {}
            }
        }
        let fmt = fmt?;

        Some(Self {
            audio_format: read_u16(fmt, 0)?,
            channels: read_u16(fmt, 2)?,
            sample_rate: read_u32(fmt, 4)?,
            byte_rate: read_u32(fmt, 8)?,
            block_align: read_u16(fmt, 12)?,
            bits_per_sample: read_u16(fmt, 14)?,
            data_len: data_len?,
        })
    }

    /// Number of sample frames in the data chunk.
    pub fn frames(&self) -> usize {
        match self.block_align {
            0 => 0,
            align => self.data_len / align as usize,
        }
    }

    /// Playback length in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Whether the header fields agree with each other.
    pub fn is_consistent(&self) -> bool {
        let block_align = self.channels as u32 * (self.bits_per_sample as u32).div_ceil(8);
        self.audio_format == 1
            && block_align == self.block_align as u32
            && self.sample_rate as u64 * block_align as u64 == self.byte_rate as u64
    }
}
