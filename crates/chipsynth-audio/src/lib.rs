//! chipsynth audio core
//!
//! Procedural 8-bit style melodies rendered to PCM WAV files.
//!
//! # Overview
//!
//! A run is a straight pipeline:
//!
//! - The **sequencer** draws notes (pitch, waveform, duration, amplitude)
//!   from weighted tables until a target musical length is reached.
//! - The **note renderer** expands each note into samples using the
//!   stateless **waveform** generators and appends them to one buffer.
//! - The **WAV encoder** clips, quantizes and writes the buffer once.
//!
//! # Determinism
//!
//! Every decision is drawn from a single PCG32 stream seeded from an
//! arbitrary-precision integer via BLAKE3. Given the same seed and the same
//! [`SynthParams`], the output is byte-identical. Optional reseeding from an
//! external [`EntropySource`] is recorded in the result so a caller can tell
//! when a run stopped being reproducible.
//!
//! # Example
//!
//! ```
//! use chipsynth_audio::{generate, Seed, SynthParams};
//!
//! let params = SynthParams {
//!     sample_rate: 8000,
//!     duration_seconds: 1.0,
//!     ..Default::default()
//! };
//! let result = generate(&params, Some(Seed::from(42)), None)?;
//! println!("{} notes, PCM hash {}", result.notes.len(), result.wav.pcm_hash);
//! # Ok::<(), chipsynth_audio::SynthError>(())
//! ```

pub mod buffer;
pub mod entropy;
pub mod error;
pub mod generate;
pub mod note;
pub mod params;
pub mod policy;
pub mod render;
pub mod rng;
pub mod sequencer;
pub mod table;
pub mod wav;
pub mod waveform;

// Re-export main types at crate root
pub use buffer::SampleBuffer;
pub use entropy::{EntropySource, NoEntropy};
pub use error::{SynthError, SynthResult};
pub use generate::{
    generate, generate_with_rng, render_to_file, synthesize, GenerateResult, Synthesis,
};
pub use note::{Note, NoteEvent};
pub use params::{AmplitudeRange, MelodyConfig, SynthParams};
pub use policy::{PitchPolicy, RepeatAvoidance, SelectionHistory, SelectionPolicy, WeightedSampling};
pub use render::NoteRenderer;
pub use rng::{Reseed, RngProvider, Seed, SeedProvenance};
pub use sequencer::Sequencer;
pub use table::{WeightedEntry, WeightedTable};
pub use wav::{Rounding, SampleWidth, WavEncoder, WavFormat, WavInfo, WavResult};
pub use waveform::WaveformKind;
