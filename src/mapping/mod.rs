//! Frequency Mapper
//!
//! Derives tone descriptors from a normalized image. Two strategies share the
//! [`FrequencyMapper`] capability and are selected through the [`Mapper`]
//! tagged variant:
//! - Palette: dominant colors become short, randomly placed tones
//! - Column scan: every pixel column becomes a sustained sine

pub mod color;
pub mod columns;
pub mod palette;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::raster::{ColorMode, ImageSample};

pub use color::{rgb_to_hsv, Hsv};
pub use columns::{map_columns, AmplitudeSlice, ColumnMapper, ColumnTone};
pub use palette::{extract_palette, PaletteColor, PaletteMapper};

/// Parameters for one synthesized sound event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneDescriptor {
    /// Frequency in Hz (> 0)
    pub frequency: f64,
    /// Duration in seconds (> 0)
    pub duration: f64,
    /// Amplitude multiplier in [0, 1]
    pub amplitude_scale: f64,
    /// Overtone strength (>= 0)
    pub overtone_factor: f64,
    /// Start time within the clip in seconds (>= 0)
    pub start_offset: f64,
}

/// How the compositor combines a mapper's tones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Enveloped, reverberated tones added at their own offsets
    Placed,
    /// Sustained sines summed over the whole clip, then faded
    Continuous,
}

/// Shared capability of every mapping strategy
pub trait FrequencyMapper {
    /// Color space the loader must produce for this mapper
    fn color_mode(&self) -> ColorMode;

    /// How the resulting tones are laid out in the clip
    fn layout(&self) -> Layout;

    /// Derive tone descriptors from a sample
    ///
    /// All randomness comes from `rng`, so a seeded source reproduces the
    /// same descriptors.
    fn map_tones(&self, sample: &ImageSample, rng: &mut dyn RngCore) -> Result<Vec<ToneDescriptor>>;
}

impl FrequencyMapper for PaletteMapper {
    fn color_mode(&self) -> ColorMode {
        ColorMode::Rgb
    }

    fn layout(&self) -> Layout {
        Layout::Placed
    }

    fn map_tones(&self, sample: &ImageSample, rng: &mut dyn RngCore) -> Result<Vec<ToneDescriptor>> {
        self.map_palette(sample, rng)
    }
}

impl FrequencyMapper for ColumnMapper {
    fn color_mode(&self) -> ColorMode {
        ColorMode::Luma
    }

    fn layout(&self) -> Layout {
        Layout::Continuous
    }

    fn map_tones(&self, sample: &ImageSample, _rng: &mut dyn RngCore) -> Result<Vec<ToneDescriptor>> {
        self.map_column_tones(sample)
    }
}

/// Strategy selected by configuration
#[derive(Debug, Clone, PartialEq)]
pub enum Mapper {
    Palette(PaletteMapper),
    ColumnScan(ColumnMapper),
}

impl Mapper {
    fn inner(&self) -> &dyn FrequencyMapper {
        match self {
            Mapper::Palette(m) => m,
            Mapper::ColumnScan(m) => m,
        }
    }

    /// Short strategy name for logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            Mapper::Palette(_) => "palette",
            Mapper::ColumnScan(_) => "column_scan",
        }
    }
}

impl FrequencyMapper for Mapper {
    fn color_mode(&self) -> ColorMode {
        self.inner().color_mode()
    }

    fn layout(&self) -> Layout {
        self.inner().layout()
    }

    fn map_tones(&self, sample: &ImageSample, rng: &mut dyn RngCore) -> Result<Vec<ToneDescriptor>> {
        self.inner().map_tones(sample, rng)
    }
}
