//! Expands notes into runs of samples.

use crate::buffer::SampleBuffer;
use crate::note::Note;
use crate::waveform;

/// Run-wide voice settings used to turn a [`Note`] into samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteRenderer {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Fraction of each period spent high, for square and pulse waves.
    pub duty_cycle: f64,
}

impl NoteRenderer {
    /// Creates a renderer.
    pub fn new(sample_rate: u32, duty_cycle: f64) -> Self {
        Self {
            sample_rate,
            duty_cycle,
        }
    }

    /// Number of frames a note of `duration` seconds occupies.
    ///
    /// Truncates `sample_rate * duration` toward zero; non-positive or
    /// non-finite durations give zero frames.
    pub fn frame_count(&self, duration: f64) -> usize {
        let frames = self.sample_rate as f64 * duration;
        if frames.is_finite() && frames > 0.0 {
            frames.floor() as usize
        } else {
            0
        }
    }

    /// Renders `note` starting from note-local time zero.
    pub fn render(&self, note: &Note) -> Vec<f64> {
        let frames = self.frame_count(note.duration);
        let rate = self.sample_rate as f64;

        (0..frames)
            .map(|i| {
                let t = i as f64 / rate;
                note.amplitude * waveform::sample(note.waveform, note.frequency, t, self.duty_cycle)
            })
            .collect()
    }

    /// Renders `note` and appends it to `buffer`, returning the frame count.
    pub fn render_into(&self, note: &Note, buffer: &mut SampleBuffer) -> usize {
        let samples = self.render(note);
        buffer.append(&samples);
        samples.len()
    }
}
