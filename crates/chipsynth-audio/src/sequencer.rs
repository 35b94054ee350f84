//! Melody sequencer.
//!
//! Draws notes until the accumulated musical time reaches the target. Each
//! note consumes the RNG stream in a fixed order: pitch, waveform, duration,
//! amplitude. Keeping that order stable is what makes a seed reproduce a
//! melody.

use crate::buffer::SampleBuffer;
use crate::entropy::EntropySource;
use crate::error::SynthResult;
use crate::note::{Note, NoteEvent};
use crate::params::{AmplitudeRange, MelodyConfig};
use crate::policy::{PitchPolicy, SelectionHistory, SelectionPolicy};
use crate::render::NoteRenderer;
use crate::rng::RngProvider;
use crate::table::WeightedTable;
use crate::waveform::WaveformKind;

/// Validated note selection tables.
#[derive(Debug, Clone)]
pub struct Sequencer {
    pitches: WeightedTable<f64>,
    waveforms: WeightedTable<WaveformKind>,
    durations: Vec<f64>,
    amplitude: AmplitudeRange,
    policy: PitchPolicy,
    reseed_every: Option<u32>,
}

impl Sequencer {
    /// Validates `config` and builds its tables.
    pub fn new(config: &MelodyConfig) -> SynthResult<Self> {
        config.validate()?;
        Ok(Self {
            pitches: WeightedTable::from_entries("pitches", &config.pitches)?,
            waveforms: WeightedTable::from_entries("waveforms", &config.waveforms)?,
            durations: config.durations.clone(),
            amplitude: config.amplitude,
            policy: config.pitch_policy,
            reseed_every: config.reseed_every,
        })
    }

    /// The pitch table.
    pub fn pitches(&self) -> &WeightedTable<f64> {
        &self.pitches
    }

    /// The pitch selection policy.
    pub fn policy(&self) -> PitchPolicy {
        self.policy
    }

    /// Draws the next note and records its pitch in `history`.
    ///
    /// Returns `None` only if the duration set is empty, which
    /// [`Sequencer::new`] rules out.
    pub fn draw_note(&self, rng: &mut RngProvider, history: &mut SelectionHistory) -> Option<Note> {
        let pitch_index = self.policy.select(&self.pitches, history, rng);
        history.push(pitch_index);
        let frequency = *self.pitches.get(pitch_index)?;

        let waveform = *rng.weighted_choice(&self.waveforms);
        let duration = *rng.uniform_choice(&self.durations)?;
        let amplitude = rng.uniform_range(self.amplitude.min, self.amplitude.max);

        Some(Note::new(frequency, amplitude, waveform, duration))
    }

    fn reseed_due(&self, index: usize) -> bool {
        match self.reseed_every {
            Some(every) if every > 0 => index > 0 && index % every as usize == 0,
            _ => false,
        }
    }

    /// Renders notes into `buffer` until `target_seconds` of music have been
    /// produced. The last note is never cut short. A non-positive target
    /// renders nothing and draws nothing.
    ///
    /// When an entropy source is given and a reseed interval is configured,
    /// the stream is reseeded before every n-th note (never the first). A
    /// source with nothing to give leaves the stream as it was.
    pub fn run(
        &self,
        target_seconds: f64,
        renderer: &NoteRenderer,
        rng: &mut RngProvider,
        mut entropy: Option<&mut dyn EntropySource>,
        buffer: &mut SampleBuffer,
    ) -> Vec<NoteEvent> {
        let mut events = Vec::new();
        let mut history = SelectionHistory::new();
        let mut elapsed = 0.0;

        while elapsed < target_seconds {
            let index = events.len();
            let reseeded = match entropy.as_mut() {
                Some(source) if self.reseed_due(index) => {
                    rng.try_reseed(&mut **source, index).is_some()
                }
                _ => false,
            };

            let Some(note) = self.draw_note(rng, &mut history) else {
                break;
            };
            let frames = renderer.render_into(&note, buffer);
            events.push(NoteEvent {
                index,
                start_seconds: elapsed,
                note,
                frames,
                reseeded,
            });
            elapsed += note.duration;
        }

        events
    }
}
