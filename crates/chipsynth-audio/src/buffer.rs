//! Append-only sample buffer shared by every note in a run.

/// Mono samples in the conceptual range `[-1, 1]`.
///
/// Values may exceed the range until the encoder clips them. Samples are
/// only ever appended; the encoder consumes the buffer once at the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f64>,
}

impl SampleBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty buffer with room for `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Appends samples after everything already written.
    pub fn append(&mut self, samples: &[f64]) {
        self.samples.extend_from_slice(samples);
    }

    /// Appends samples from an iterator, returning how many were added.
    pub fn extend<I: IntoIterator<Item = f64>>(&mut self, samples: I) -> usize {
        let before = self.samples.len();
        self.samples.extend(samples);
        self.samples.len() - before
    }

    /// Number of samples written so far.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Read-only view of the samples.
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Length in seconds at the given sample rate.
    pub fn duration_seconds(&self, sample_rate: u32) -> f64 {
        if sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / sample_rate as f64
    }

    /// Consumes the buffer, returning the samples.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

impl From<Vec<f64>> for SampleBuffer {
    fn from(samples: Vec<f64>) -> Self {
        Self { samples }
    }
}
