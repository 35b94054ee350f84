//! Note descriptors and the per-note report produced by a run.

use serde::{Deserialize, Serialize};

use crate::waveform::WaveformKind;

/// An immutable note: everything the renderer needs besides the sample rate
/// and duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Pitch in Hz.
    pub frequency: f64,
    /// Peak scale applied to the waveform, nominally in `[0, 1]`.
    pub amplitude: f64,
    /// Waveform shape.
    pub waveform: WaveformKind,
    /// Length in seconds.
    pub duration: f64,
}

impl Note {
    /// Creates a note.
    pub fn new(frequency: f64, amplitude: f64, waveform: WaveformKind, duration: f64) -> Self {
        Self {
            frequency,
            amplitude,
            waveform,
            duration,
        }
    }
}

/// Record of one rendered note, reported back to the caller for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Zero-based position in the run.
    pub index: usize,
    /// Accumulated musical time at which the note starts, in seconds.
    pub start_seconds: f64,
    /// The note that was rendered.
    #[serde(flatten)]
    pub note: Note,
    /// Number of frames appended to the buffer.
    pub frames: usize,
    /// Whether the RNG stream was reseeded from external entropy right
    /// before this note was drawn.
    pub reseeded: bool,
}
