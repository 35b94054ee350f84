//! Default output location.

use std::path::{Path, PathBuf};

/// File name used when no output path is given.
pub const DEFAULT_FILE_NAME: &str = "output_song.wav";

/// The user's documents directory, if one can be found.
///
/// Prefers the platform documents directory and falls back to
/// `~/Documents` when that exists.
pub fn documents_dir() -> Option<PathBuf> {
    dirs::document_dir().or_else(|| {
        dirs::home_dir()
            .map(|home| home.join("Documents"))
            .filter(|dir| dir.is_dir())
    })
}

/// `<Documents>/output_song.wav`, or `./output_song.wav` when there is no
/// documents directory.
pub fn default_output_path() -> PathBuf {
    default_output_path_in(documents_dir().as_deref())
}

fn default_output_path_in(documents: Option<&Path>) -> PathBuf {
    documents
        .unwrap_or_else(|| Path::new("."))
        .join(DEFAULT_FILE_NAME)
}

/// Uses `explicit` when given, the default location otherwise.
pub fn resolve_output_path(explicit: Option<&str>) -> PathBuf {
    match explicit {
        Some(path) => PathBuf::from(path),
        None => default_output_path(),
    }
}
