//! chipsynth CLI - Command-line interface for procedural chiptune rendering
//!
//! This binary renders seeded 8-bit style melodies to WAV files and inspects
//! the files it produced.

use clap::{Parser, Subcommand, ValueEnum};
use std::process::ExitCode;

use chipsynth_audio::Rounding;
use chipsynth_cli::commands;
use chipsynth_cli::commands::render::RenderArgs;
use chipsynth_cli::config::RenderOverrides;

/// chipsynth - Seeded procedural chiptune synthesizer
#[derive(Parser)]
#[command(name = "chipsynth")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Quantization rounding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RoundingArg {
    /// Drop the fractional part (matches most legacy renders)
    Truncate,
    /// Round to the nearest integer level
    Nearest,
}

impl From<RoundingArg> for Rounding {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::Truncate => Rounding::Truncate,
            RoundingArg::Nearest => Rounding::Nearest,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render a procedural melody to a WAV file
    Render {
        /// Output file path (default: <Documents>/output_song.wav)
        #[arg(short, long)]
        output: Option<String>,

        /// JSON parameter file
        #[arg(short, long)]
        config: Option<String>,

        /// Seed digits (default: derived from the clock)
        #[arg(long)]
        seed: Option<String>,

        /// Target length of music in seconds
        #[arg(short, long, allow_negative_numbers = true)]
        duration: Option<f64>,

        /// Sample rate in Hz
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Number of output channels
        #[arg(long)]
        channels: Option<u16>,

        /// Bytes per sample (1 or 2)
        #[arg(long)]
        bytes_per_sample: Option<u16>,

        /// Quantization rounding
        #[arg(long, value_enum)]
        rounding: Option<RoundingArg>,

        /// Pick pitches by a random walk that avoids recent repeats
        #[arg(long)]
        avoid_repeats: bool,

        /// Reseed from external entropy every N notes
        #[arg(long)]
        reseed_every: Option<u32>,

        /// File to draw reseed entropy from (repeatable; default: system entropy)
        #[arg(long = "entropy-file")]
        entropy_files: Vec<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,

        /// Suppress per-note lines
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print header fields and the PCM hash of a WAV file
    Inspect {
        /// Path to the WAV file
        file: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            output,
            config,
            seed,
            duration,
            sample_rate,
            channels,
            bytes_per_sample,
            rounding,
            avoid_repeats,
            reseed_every,
            entropy_files,
            json,
            quiet,
        } => {
            let args = RenderArgs {
                output,
                config,
                overrides: RenderOverrides {
                    seed,
                    duration,
                    sample_rate,
                    channels,
                    bytes_per_sample,
                    rounding: rounding.map(Rounding::from),
                    avoid_repeats,
                    reseed_every,
                },
                entropy_files,
                quiet,
            };
            commands::render::run(&args, json)
        }
        Commands::Inspect { file, json } => commands::inspect::run(&file, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
