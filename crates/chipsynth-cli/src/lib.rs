//! chipsynth CLI library.
//!
//! This crate provides the pieces of the `chipsynth` binary that sit around
//! the audio core: configuration loading, default output locations, file
//! backed entropy and the render/inspect commands.

pub mod commands;
pub mod config;
pub mod entropy;
pub mod output_path;
