//! Deterministic WAV file writer.
//!
//! This module clips, quantizes and writes 8- or 16-bit PCM WAV files with
//! no timestamps or variable metadata, so the same samples always produce
//! the same bytes. The hash of the PCM data identifies a render.

mod builder;
mod format;
mod pcm;
mod result;
mod writer;


// Re-export public API
pub use builder::WavEncoder;
pub use format::{SampleWidth, WavFormat};
pub use pcm::{compute_pcm_hash, extract_pcm_data, WavInfo};
pub use result::WavResult;
pub use writer::{
    quantize_i16, quantize_i8, samples_to_pcm, write_bytes_to_file, write_wav, write_wav_file,
    write_wav_to_vec, Rounding, HEADER_LEN, MAX_DATA_LEN,
};
