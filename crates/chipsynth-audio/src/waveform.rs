//! Stateless waveform generators.
//!
//! Every generator is a pure function of `(frequency, t, duty_cycle)` where
//! `t` is the time in seconds since the start of the note. Nothing is cached
//! between calls, so the same arguments always produce the same sample.
//! No band-limiting is applied; the aliasing is part of the sound.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalization for [`WaveformKind::Harmonics`]: 1 / (1 + 1/2 + 1/3 + 1/4).
const HARMONICS_NORM: f64 = 12.0 / 25.0;

/// Waveform shapes understood by the generator.
///
/// Serialized by lowercase name. Names that match no shape deserialize to
/// [`WaveformKind::Unknown`], which renders silence instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WaveformKind {
    /// Two-level wave, high for `duty_cycle` of each period.
    Square,
    /// Pure sine.
    Sine,
    /// Linear ramps between -1 and 1.
    Triangle,
    /// Rising ramp from -1 to 1.
    Sawtooth,
    /// Asymmetric pulse: 1.0 high, -0.5 low.
    Pulse,
    /// Exponential decay within each period.
    Exponential,
    /// First four harmonics with 1/n amplitudes.
    Harmonics,
    /// Unrecognized shape; always silent.
    Unknown,
}

impl WaveformKind {
    /// Every recognized shape, in display order.
    pub const ALL: [WaveformKind; 7] = [
        WaveformKind::Square,
        WaveformKind::Sine,
        WaveformKind::Triangle,
        WaveformKind::Sawtooth,
        WaveformKind::Pulse,
        WaveformKind::Exponential,
        WaveformKind::Harmonics,
    ];

    /// Parses a shape name, case-insensitively. Unrecognized names map to
    /// [`WaveformKind::Unknown`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "square" => WaveformKind::Square,
            "sine" => WaveformKind::Sine,
            "triangle" => WaveformKind::Triangle,
            "sawtooth" | "saw" => WaveformKind::Sawtooth,
            "pulse" => WaveformKind::Pulse,
            "exponential" => WaveformKind::Exponential,
            "harmonics" => WaveformKind::Harmonics,
            _ => WaveformKind::Unknown,
        }
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            WaveformKind::Square => "square",
            WaveformKind::Sine => "sine",
            WaveformKind::Triangle => "triangle",
            WaveformKind::Sawtooth => "sawtooth",
            WaveformKind::Pulse => "pulse",
            WaveformKind::Exponential => "exponential",
            WaveformKind::Harmonics => "harmonics",
            WaveformKind::Unknown => "unknown",
        }
    }

    /// Evaluates this shape at time `t` (seconds) for the given frequency.
    pub fn sample(self, frequency: f64, t: f64, duty_cycle: f64) -> f64 {
        sample(self, frequency, t, duty_cycle)
    }
}

impl fmt::Display for WaveformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for WaveformKind {
    fn from(name: String) -> Self {
        WaveformKind::from_name(&name)
    }
}

impl From<WaveformKind> for String {
    fn from(kind: WaveformKind) -> Self {
        kind.name().to_string()
    }
}

/// Position within the current period, in `[0, 1)`.
#[inline]
pub fn phase(frequency: f64, t: f64) -> f64 {
    (t * frequency).rem_euclid(1.0)
}

/// Evaluates `kind` at time `t`.
///
/// Square, sine, triangle and sawtooth are bounded to `[-1, 1]` exactly.
/// [`WaveformKind::Unknown`] returns 0.0.
pub fn sample(kind: WaveformKind, frequency: f64, t: f64, duty_cycle: f64) -> f64 {
    match kind {
        WaveformKind::Square => square(phase(frequency, t), duty_cycle),
        WaveformKind::Sine => (2.0 * PI * frequency * t).sin(),
        WaveformKind::Triangle => triangle(phase(frequency, t)),
        WaveformKind::Sawtooth => sawtooth(phase(frequency, t)),
        WaveformKind::Pulse => pulse(phase(frequency, t), duty_cycle),
        WaveformKind::Exponential => exponential(phase(frequency, t)),
        WaveformKind::Harmonics => harmonics(frequency, t),
        WaveformKind::Unknown => 0.0,
    }
}

/// Square wave from a phase in `[0, 1)`.
#[inline]
pub fn square(phase: f64, duty_cycle: f64) -> f64 {
    if phase < duty_cycle {
        1.0
    } else {
        -1.0
    }
}

/// Triangle wave from a phase in `[0, 1)`: -1 at phase 0, 1 at phase 0.5.
#[inline]
pub fn triangle(phase: f64) -> f64 {
    1.0 - 2.0 * (2.0 * phase - 1.0).abs()
}

/// Sawtooth wave from a phase in `[0, 1)`.
#[inline]
pub fn sawtooth(phase: f64) -> f64 {
    2.0 * phase - 1.0
}

/// Pulse wave from a phase in `[0, 1)`. The low level is -0.5.
#[inline]
pub fn pulse(phase: f64, duty_cycle: f64) -> f64 {
    if phase < duty_cycle {
        1.0
    } else {
        -0.5
    }
}

/// Exponentially decaying ramp from a phase in `[0, 1)`.
#[inline]
pub fn exponential(phase: f64) -> f64 {
    2.0 * (-4.0 * phase).exp() - 1.0
}

/// Sum of the first four harmonics with 1/n amplitude, scaled into `[-1, 1]`.
pub fn harmonics(frequency: f64, t: f64) -> f64 {
    let sum: f64 = (1..=4)
        .map(|n| {
            let n = n as f64;
            (2.0 * PI * frequency * n * t).sin() / n
        })
        .sum();
    sum * HARMONICS_NORM
}
