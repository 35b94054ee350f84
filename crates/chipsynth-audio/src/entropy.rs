//! Optional external entropy for mid-run reseeding.
//!
//! Reseeding is best-effort. A source that cannot produce bytes returns
//! `None` and the run continues on its current stream.

/// Supplies 8 bytes of external entropy on request.
pub trait EntropySource {
    /// Next 8 bytes, or `None` if nothing is available right now.
    fn next_entropy_bytes(&mut self) -> Option<[u8; 8]>;
}

/// A source that never has entropy. Runs using it stay reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEntropy;

impl EntropySource for NoEntropy {
    fn next_entropy_bytes(&mut self) -> Option<[u8; 8]> {
        None
    }
}

impl<F> EntropySource for F
where
    F: FnMut() -> Option<[u8; 8]>,
{
    fn next_entropy_bytes(&mut self) -> Option<[u8; 8]> {
        self()
    }
}
