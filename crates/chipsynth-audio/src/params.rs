//! Run configuration.
//!
//! [`SynthParams`] describes a whole render: output format, target length
//! and the [`MelodyConfig`] that drives the sequencer. Every field has a
//! default, so a partial JSON document is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};
use crate::policy::PitchPolicy;
use crate::table::WeightedEntry;
use crate::wav::{Rounding, SampleWidth, WavFormat};
use crate::waveform::WaveformKind;

/// C major scale, C4 to C5, with the tonic and dominant favoured.
const DEFAULT_PITCHES: [(f64, f64); 8] = [
    (261.63, 4.0),
    (293.66, 2.0),
    (329.63, 3.0),
    (349.23, 2.0),
    (392.00, 3.0),
    (440.00, 2.0),
    (493.88, 1.0),
    (523.25, 2.0),
];

/// Bounds of the per-note amplitude draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AmplitudeRange {
    /// Lowest amplitude.
    pub min: f64,
    /// Highest amplitude.
    pub max: f64,
}

impl AmplitudeRange {
    /// A range that always yields `amplitude`.
    pub fn fixed(amplitude: f64) -> Self {
        Self {
            min: amplitude,
            max: amplitude,
        }
    }
}

impl Default for AmplitudeRange {
    fn default() -> Self {
        Self { min: 0.4, max: 0.7 }
    }
}

/// Policies the sequencer draws notes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MelodyConfig {
    /// Candidate pitches in Hz with relative weights.
    pub pitches: Vec<WeightedEntry<f64>>,
    /// Candidate waveforms with relative weights.
    pub waveforms: Vec<WeightedEntry<WaveformKind>>,
    /// Note lengths in seconds, picked uniformly.
    pub durations: Vec<f64>,
    /// Per-note amplitude bounds.
    pub amplitude: AmplitudeRange,
    /// How pitches are picked from the table.
    pub pitch_policy: PitchPolicy,
    /// Ask the entropy source for a reseed before every n-th note.
    pub reseed_every: Option<u32>,
}

impl Default for MelodyConfig {
    fn default() -> Self {
        Self {
            pitches: DEFAULT_PITCHES
                .iter()
                .map(|&(freq, weight)| WeightedEntry::new(freq, weight))
                .collect(),
            waveforms: vec![
                WeightedEntry::new(WaveformKind::Square, 5.0),
                WeightedEntry::new(WaveformKind::Triangle, 3.0),
                WeightedEntry::new(WaveformKind::Sawtooth, 2.0),
            ],
            durations: vec![0.2, 0.3, 0.4, 0.5],
            amplitude: AmplitudeRange::default(),
            pitch_policy: PitchPolicy::default(),
            reseed_every: None,
        }
    }
}

impl MelodyConfig {
    /// Checks values that table construction does not cover.
    pub fn validate(&self) -> SynthResult<()> {
        if self.pitches.is_empty() {
            return Err(SynthError::EmptyTable {
                name: "pitches".to_string(),
            });
        }
        if let Some(entry) = self
            .pitches
            .iter()
            .find(|e| !(e.value.is_finite() && e.value > 0.0))
        {
            return Err(SynthError::InvalidFrequency { freq: entry.value });
        }
        if self.waveforms.is_empty() {
            return Err(SynthError::EmptyTable {
                name: "waveforms".to_string(),
            });
        }
        if self.durations.is_empty() {
            return Err(SynthError::EmptyTable {
                name: "durations".to_string(),
            });
        }
        // Non-positive note lengths would never advance the sequencer.
        if let Some(&duration) = self
            .durations
            .iter()
            .find(|d| !(d.is_finite() && **d > 0.0))
        {
            return Err(SynthError::InvalidDuration { duration });
        }

        let AmplitudeRange { min, max } = self.amplitude;
        if !(min.is_finite() && max.is_finite() && 0.0 <= min && min <= max && max <= 1.0) {
            return Err(SynthError::invalid_param(
                "amplitude",
                format!("expected 0 <= min <= max <= 1, got [{min}, {max}]"),
            ));
        }
        if self.reseed_every == Some(0) {
            return Err(SynthError::invalid_param(
                "reseed_every",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Parameters of a whole render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthParams {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Output channels; the mono signal is copied into each.
    pub channels: u16,
    /// Target musical length in seconds. The last note may run past it.
    pub duration_seconds: f64,
    /// Bytes per PCM sample: 1 or 2.
    pub bytes_per_sample: u16,
    /// Quantization rounding.
    pub rounding: Rounding,
    /// Duty cycle for square and pulse waves, in (0, 1).
    pub duty_cycle: f64,
    /// Note selection.
    pub melody: MelodyConfig,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 1,
            duration_seconds: 120.0,
            bytes_per_sample: 2,
            rounding: Rounding::default(),
            duty_cycle: 0.5,
            melody: MelodyConfig::default(),
        }
    }
}

impl SynthParams {
    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> SynthResult<Self> {
        serde_json::from_str(json).map_err(|e| SynthError::invalid_param("config", e.to_string()))
    }

    /// Serializes to pretty JSON.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// PCM sample width.
    pub fn sample_width(&self) -> SynthResult<SampleWidth> {
        SampleWidth::from_bytes(self.bytes_per_sample)
    }

    /// Output container format.
    pub fn wav_format(&self) -> SynthResult<WavFormat> {
        Ok(WavFormat::new(
            self.channels,
            self.sample_rate,
            self.sample_width()?,
        ))
    }

    /// Checks every field before a run.
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
        if !self.duration_seconds.is_finite() {
            return Err(SynthError::InvalidDuration {
                duration: self.duration_seconds,
            });
        }
        self.wav_format()?.validate()?;
        if !(self.duty_cycle > 0.0 && self.duty_cycle < 1.0) {
            return Err(SynthError::invalid_param(
                "duty_cycle",
                format!("expected a value strictly between 0 and 1, got {}", self.duty_cycle),
            ));
        }
        self.melody.validate()?;
        self.validate_run_length()
    }

    /// Bounds the work of a run before any audio is rendered.
    ///
    /// Every note must last at least one sample period. The sequencer stops
    /// once the target is reached, so no run exceeds the target plus the
    /// longest note; that worst case must fit in one WAV file.
    fn validate_run_length(&self) -> SynthResult<()> {
        let period = 1.0 / self.sample_rate as f64;
        if let Some(&duration) = self.melody.durations.iter().find(|d| **d < period) {
            return Err(SynthError::InvalidDuration { duration });
        }

        let frames = self.max_run_frames();
        let limit = self.wav_format()?.max_frames();
        if frames > limit {
            return Err(SynthError::RunTooLong { frames, limit });
        }
        Ok(())
    }

    /// Worst-case frame count of a run: the target plus the longest note.
    /// Zero when the target is not positive.
    pub fn max_run_frames(&self) -> u64 {
        if self.duration_seconds <= 0.0 {
            return 0;
        }
        let longest = self.melody.durations.iter().copied().fold(0.0, f64::max);
        (self.sample_rate as f64 * (self.duration_seconds + longest)).floor() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let params = SynthParams::default();
        params.validate().unwrap();
        assert_eq!(params.sample_rate, 44100);
        assert_eq!(params.channels, 1);
        assert_eq!(params.melody.pitches.len(), 8);
        assert_eq!(params.melody.pitch_policy, PitchPolicy::Weighted);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params = SynthParams::from_json(
            r#"{
                "sample_rate": 22050,
                "melody": {
                    "pitches": [{"value": 440.0, "weight": 1}],
                    "pitch_policy": {"kind": "avoid_repeats"}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(params.sample_rate, 22050);
        assert_eq!(params.bytes_per_sample, 2);
        assert_eq!(params.melody.pitches, vec![WeightedEntry::new(440.0, 1.0)]);
        assert_eq!(params.melody.durations, MelodyConfig::default().durations);
        assert_eq!(params.melody.pitch_policy, PitchPolicy::avoid_repeats());
    }

    #[test]
    fn test_json_round_trip() {
        let params = SynthParams::default();
        let parsed = SynthParams::from_json(&params.to_json_pretty()).unwrap();
        assert_eq!(parsed, params);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = SynthParams::from_json(r#"{"sample_rte": 22050}"#).unwrap_err();
        assert!(err.to_string().contains("sample_rte"));
    }

    #[test]
    fn test_validation_errors() {
        let cases: Vec<(SynthParams, &str)> = vec![
            (
                SynthParams {
                    sample_rate: 0,
                    ..Default::default()
                },
                "SYNTH_001",
            ),
            (
                SynthParams {
                    channels: 0,
                    ..Default::default()
                },
                "SYNTH_002",
            ),
            (
                SynthParams {
                    duration_seconds: f64::NAN,
                    ..Default::default()
                },
                "SYNTH_003",
            ),
            (
                SynthParams {
                    bytes_per_sample: 3,
                    ..Default::default()
                },
                "SYNTH_009",
            ),
            (
                SynthParams {
                    duty_cycle: 1.0,
                    ..Default::default()
                },
                "SYNTH_005",
            ),
        ];
        for (params, code) in cases {
            assert_eq!(params.validate().unwrap_err().code(), code);
        }
    }

    #[test]
    fn test_negative_target_is_allowed() {
        let params = SynthParams {
            duration_seconds: -5.0,
            ..Default::default()
        };
        params.validate().unwrap();
    }

    #[test]
    fn test_target_beyond_wav_limit_is_rejected() {
        let params = SynthParams {
            duration_seconds: 1e12,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert_eq!(err.code(), "SYNTH_011");
        assert!(matches!(
            err,
            SynthError::RunTooLong { limit, .. } if limit == (u32::MAX as u64 - 36) / 2
        ));

        // 16-bit mono at 44.1 kHz holds a little under 48,700 seconds
        let near_limit = SynthParams {
            duration_seconds: 48_000.0,
            ..Default::default()
        };
        near_limit.validate().unwrap();
        let over_limit = SynthParams {
            duration_seconds: 49_000.0,
            ..Default::default()
        };
        assert_eq!(over_limit.validate().unwrap_err().code(), "SYNTH_011");

        // The same target fits when each frame is smaller
        let eight_bit = SynthParams {
            bytes_per_sample: 1,
            ..over_limit
        };
        eight_bit.validate().unwrap();
    }

    #[test]
    fn test_note_shorter_than_a_sample_is_rejected() {
        let mut params = SynthParams::default();
        params.melody.durations = vec![0.2, 1e-300];
        assert!(matches!(
            params.validate(),
            Err(SynthError::InvalidDuration { duration }) if duration == 1e-300
        ));

        params.sample_rate = 100;
        params.melody.durations = vec![0.005];
        assert_eq!(params.validate().unwrap_err().code(), "SYNTH_003");
        params.melody.durations = vec![0.01];
        params.validate().unwrap();
    }

    #[test]
    fn test_max_run_frames() {
        let mut params = SynthParams {
            sample_rate: 1000,
            duration_seconds: 2.0,
            ..Default::default()
        };
        assert_eq!(params.max_run_frames(), 2500);
        params.duration_seconds = -1.0;
        assert_eq!(params.max_run_frames(), 0);
    }

    #[test]
    fn test_melody_validation() {
        let mut melody = MelodyConfig::default();
        melody.durations = vec![0.2, 0.0];
        assert!(matches!(
            melody.validate(),
            Err(SynthError::InvalidDuration { .. })
        ));

        let mut melody = MelodyConfig::default();
        melody.pitches = vec![WeightedEntry::new(-440.0, 1.0)];
        assert!(matches!(
            melody.validate(),
            Err(SynthError::InvalidFrequency { .. })
        ));

        let mut melody = MelodyConfig::default();
        melody.amplitude = AmplitudeRange { min: 0.8, max: 0.2 };
        assert!(melody.validate().is_err());

        let mut melody = MelodyConfig::default();
        melody.waveforms.clear();
        assert!(matches!(
            melody.validate(),
            Err(SynthError::EmptyTable { .. })
        ));

        let mut melody = MelodyConfig::default();
        melody.reseed_every = Some(0);
        assert!(melody.validate().is_err());
    }
}
