//! CLI Module
//!
//! Command-line interface for the Sonify renderer.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Sonify - turn images into sound
#[derive(Parser, Debug)]
#[command(name = "sonify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Strategy choice for `init-config`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyArg {
    Palette,
    Columns,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render dominant colors as layered tones
    #[command(name = "palette")]
    Palette {
        /// Source image
        input: PathBuf,

        /// Output WAV file
        output: PathBuf,

        /// Clip length in seconds
        #[arg(short, long, default_value_t = 7.0)]
        duration: f64,

        /// Output sample rate in Hz
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,

        /// Number of dominant colors
        #[arg(short, long, default_value_t = 50)]
        colors: usize,

        /// Reverb time in seconds
        #[arg(long, default_value_t = 0.3)]
        reverb: f64,

        /// Tone volume
        #[arg(long, default_value_t = 0.2)]
        volume: f64,

        /// Keep the original resolution instead of resizing to 100x100
        #[arg(long)]
        no_resize: bool,

        /// Random seed for tone placement
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Render pixel columns as a chord of sustained sines
    #[command(name = "columns")]
    Columns {
        /// Source image
        input: PathBuf,

        /// Output WAV file
        output: PathBuf,

        /// Clip length in seconds
        #[arg(short, long, default_value_t = 15.0)]
        duration: f64,

        /// Output sample rate in Hz
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,

        /// Frequency of the first column in Hz
        #[arg(long, default_value_t = 200.0)]
        min_freq: f64,

        /// Exclusive upper frequency in Hz
        #[arg(long, default_value_t = 2000.0)]
        max_freq: f64,

        /// Use the inverse-contrast curve instead of plain inversion
        #[arg(long)]
        contrast: bool,

        /// Offset K of the inverse-contrast curve
        #[arg(long, default_value_t = 100.0)]
        contrast_offset: f64,

        /// Zero intensities at or below 0.5
        #[arg(long)]
        highpass: bool,

        /// Take amplitudes from rows (index modulo height) instead of columns
        #[arg(long)]
        row_wrap: bool,

        /// Keep the original resolution instead of resizing to 100x100
        #[arg(long)]
        no_resize: bool,
    },

    /// Render using a JSON config file
    #[command(name = "render")]
    Render {
        /// Source image
        input: PathBuf,

        /// Output WAV file
        output: PathBuf,

        /// Config file (see init-config)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Render every image in a directory
    #[command(name = "batch")]
    Batch {
        /// Directory searched recursively for images
        input_dir: PathBuf,

        /// Directory receiving the WAV files and manifest
        output_dir: PathBuf,

        /// Config file (defaults to the palette strategy)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Measure a rendered WAV file
    #[command(name = "analyze")]
    Analyze {
        /// WAV file to analyze
        path: PathBuf,
    },

    /// Write a default config file
    #[command(name = "init-config")]
    InitConfig {
        /// Destination path
        path: PathBuf,

        /// Strategy to configure
        #[arg(short, long, value_enum, default_value_t = StrategyArg::Palette)]
        strategy: StrategyArg,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_columns() {
        let cli = Cli::parse_from([
            "sonify", "columns", "in.png", "out.wav", "--contrast", "--min-freq", "100",
        ]);
        match cli.command {
            Some(Commands::Columns {
                contrast, min_freq, max_freq, ..
            }) => {
                assert!(contrast);
                assert_eq!(min_freq, 100.0);
                assert_eq!(max_freq, 2000.0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
