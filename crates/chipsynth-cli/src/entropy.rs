//! Entropy gathered from files.
//!
//! Each request reads up to [`READ_LIMIT`] bytes from the next file in the
//! rotation and folds them, together with a request counter, into 8 bytes
//! with BLAKE3. A file that cannot be opened or is empty yields nothing and
//! the run keeps its current stream.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chipsynth_audio::EntropySource;

/// Bytes read from a file per request.
pub const READ_LIMIT: u64 = 4096;

/// Kernel randomness device, used when reseeding is requested without files.
pub const SYSTEM_ENTROPY_PATH: &str = "/dev/urandom";

const ENTROPY_DOMAIN: &[u8] = b"chipsynth/entropy/v1:";

/// Rotates through a list of files, hashing a prefix of each.
#[derive(Debug, Clone)]
pub struct FileEntropySource {
    paths: Vec<PathBuf>,
    requests: u64,
}

impl FileEntropySource {
    /// Creates a source over `paths`. An empty list never yields entropy.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths, requests: 0 }
    }

    /// Source reading the system randomness device.
    pub fn system() -> Self {
        Self::new(vec![PathBuf::from(SYSTEM_ENTROPY_PATH)])
    }

    /// Files in rotation order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    fn read_prefix(path: &Path) -> Option<Vec<u8>> {
        let file = File::open(path).ok()?;
        let mut bytes = Vec::new();
        file.take(READ_LIMIT).read_to_end(&mut bytes).ok()?;
        (!bytes.is_empty()).then_some(bytes)
    }
}

impl EntropySource for FileEntropySource {
    fn next_entropy_bytes(&mut self) -> Option<[u8; 8]> {
        if self.paths.is_empty() {
            return None;
        }
        let request = self.requests;
        self.requests += 1;
        let path = &self.paths[(request % self.paths.len() as u64) as usize];
        let contents = Self::read_prefix(path)?;

        let mut hasher = blake3::Hasher::new();
        hasher.update(ENTROPY_DOMAIN);
        hasher.update(&request.to_le_bytes());
        hasher.update(&contents);
        let hash = hasher.finalize();

        let mut out = [0u8; 8];
        out.copy_from_slice(&hash.as_bytes()[..8]);
        Some(out)
    }
}
