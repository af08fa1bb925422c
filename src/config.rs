//! Render configuration
//!
//! Every tunable of the pipeline lives here as an explicit, serializable
//! parameter. Configs round-trip through JSON files.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dsp::reverb::DEFAULT_REVERB_TIME;
use crate::engine::{
    Compositor, DEFAULT_FADE_SECS, DEFAULT_SAMPLE_RATE, DEFAULT_TONE_VOLUME, MAX_DURATION_SECS,
};
use crate::error::{Result, SonifyError};
use crate::mapping::columns::{DEFAULT_MAX_FREQ, DEFAULT_MIN_FREQ};
use crate::mapping::palette::{DEFAULT_NUM_COLORS, DEFAULT_TONE_DURATION};
use crate::mapping::{AmplitudeSlice, ColumnMapper, Mapper, PaletteMapper};
use crate::raster::{LoadOptions, Tonemap, DEFAULT_CONTRAST_OFFSET};

/// Default clip length for the palette strategy, in seconds
pub const DEFAULT_PALETTE_DURATION: f64 = 7.0;

/// Default clip length for the column-scan strategy, in seconds
pub const DEFAULT_COLUMN_DURATION: f64 = 15.0;

/// Palette strategy settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteSettings {
    /// Maximum number of dominant colors
    pub num_colors: usize,
    /// Resize to `[width, height]` before counting colors
    pub resize: Option<[u32; 2]>,
    /// Inclusive range of tone durations in seconds
    pub tone_duration: [f64; 2],
    /// Fundamental volume of each tone
    pub volume: f64,
    /// Reverb time in seconds
    pub reverb_time: f64,
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self {
            num_colors: DEFAULT_NUM_COLORS,
            resize: Some([100, 100]),
            tone_duration: [DEFAULT_TONE_DURATION.0, DEFAULT_TONE_DURATION.1],
            volume: DEFAULT_TONE_VOLUME,
            reverb_time: DEFAULT_REVERB_TIME,
        }
    }
}

/// Column-scan strategy settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSettings {
    /// Frequency of column 0 in Hz
    pub min_freq: f64,
    /// Exclusive upper frequency bound in Hz
    pub max_freq: f64,
    /// Use `1 / (x + K)` instead of `1 - x`
    pub contrast: bool,
    /// `K` of the inverse-contrast curve
    pub contrast_offset: f64,
    /// Zero intensities at or below 0.5
    pub highpass: bool,
    /// Resize to `[width, height]` before preprocessing
    pub resize: Option<[u32; 2]>,
    /// Fade-in/out length in seconds
    pub fade_secs: f64,
    /// Which image slice drives each column's amplitude
    pub amplitude_slice: AmplitudeSlice,
}

impl Default for ColumnSettings {
    fn default() -> Self {
        Self {
            min_freq: DEFAULT_MIN_FREQ,
            max_freq: DEFAULT_MAX_FREQ,
            contrast: false,
            contrast_offset: DEFAULT_CONTRAST_OFFSET,
            highpass: false,
            resize: Some([100, 100]),
            fade_secs: DEFAULT_FADE_SECS,
            amplitude_slice: AmplitudeSlice::Column,
        }
    }
}

/// Sonification strategy with its settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Strategy {
    Palette(PaletteSettings),
    ColumnScan(ColumnSettings),
}

/// Complete render configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SonifyConfig {
    /// Output clip length in seconds
    pub duration_secs: f64,
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Random seed; drawn at render time when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(flatten)]
    pub strategy: Strategy,
}

impl Default for SonifyConfig {
    fn default() -> Self {
        Self::palette()
    }
}

impl SonifyConfig {
    /// Default palette configuration (7 s at 44.1 kHz)
    pub fn palette() -> Self {
        Self {
            duration_secs: DEFAULT_PALETTE_DURATION,
            sample_rate: DEFAULT_SAMPLE_RATE,
            seed: None,
            strategy: Strategy::Palette(PaletteSettings::default()),
        }
    }

    /// Default column-scan configuration (15 s at 44.1 kHz)
    pub fn column_scan() -> Self {
        Self {
            duration_secs: DEFAULT_COLUMN_DURATION,
            sample_rate: DEFAULT_SAMPLE_RATE,
            seed: None,
            strategy: Strategy::ColumnScan(ColumnSettings::default()),
        }
    }

    /// Builder-style seed setter
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter is usable
    pub fn validate(&self) -> Result<()> {
        if !(self.duration_secs > 0.0 && self.duration_secs <= MAX_DURATION_SECS) {
            return Err(SonifyError::invalid_parameter(
                "duration_secs",
                self.duration_secs,
                format!("0 < seconds <= {}", MAX_DURATION_SECS),
            ));
        }
        if self.sample_rate == 0 {
            return Err(SonifyError::invalid_parameter("sample_rate", self.sample_rate, "> 0 Hz"));
        }

        match &self.strategy {
            Strategy::Palette(p) => {
                if p.num_colors == 0 {
                    return Err(SonifyError::invalid_parameter("num_colors", p.num_colors, ">= 1"));
                }
                validate_resize(p.resize)?;
                let [min, max] = p.tone_duration;
                if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
                    return Err(SonifyError::invalid_parameter(
                        "tone_duration",
                        format!("[{}, {}]", min, max),
                        "0 < min <= max seconds",
                    ));
                }
                if !(p.volume.is_finite() && p.volume > 0.0) {
                    return Err(SonifyError::invalid_parameter("volume", p.volume, "> 0"));
                }
                if !(p.reverb_time >= 0.0 && p.reverb_time <= self.duration_secs) {
                    return Err(SonifyError::invalid_parameter(
                        "reverb_time",
                        p.reverb_time,
                        "0 <= seconds <= duration_secs",
                    ));
                }
            }
            Strategy::ColumnScan(c) => {
                if !(c.min_freq.is_finite() && c.min_freq > 0.0) {
                    return Err(SonifyError::invalid_parameter("min_freq", c.min_freq, "> 0 Hz"));
                }
                if !(c.max_freq.is_finite() && c.max_freq >= c.min_freq) {
                    return Err(SonifyError::invalid_parameter(
                        "max_freq",
                        c.max_freq,
                        ">= min_freq",
                    ));
                }
                if c.contrast && !(c.contrast_offset.is_finite() && c.contrast_offset > 0.0) {
                    return Err(SonifyError::invalid_parameter(
                        "contrast_offset",
                        c.contrast_offset,
                        "> 0",
                    ));
                }
                validate_resize(c.resize)?;
                if !(c.fade_secs.is_finite() && c.fade_secs >= 0.0) {
                    return Err(SonifyError::invalid_parameter(
                        "fade_secs",
                        c.fade_secs,
                        ">= 0 seconds",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Loader options for the configured strategy
    pub fn load_options(&self) -> LoadOptions {
        match &self.strategy {
            Strategy::Palette(p) => LoadOptions::palette(p.resize.map(|[w, h]| (w, h))),
            Strategy::ColumnScan(c) => {
                let tonemap = if c.contrast {
                    Tonemap::InverseContrast {
                        offset: c.contrast_offset,
                    }
                } else {
                    Tonemap::Invert
                };
                LoadOptions::column_scan(tonemap, c.highpass, c.resize.map(|[w, h]| (w, h)))
            }
        }
    }

    /// Frequency mapper for the configured strategy
    pub fn mapper(&self) -> Mapper {
        match &self.strategy {
            Strategy::Palette(p) => Mapper::Palette(PaletteMapper {
                num_colors: p.num_colors,
                total_duration: self.duration_secs,
                tone_duration: (p.tone_duration[0], p.tone_duration[1]),
            }),
            Strategy::ColumnScan(c) => Mapper::ColumnScan(ColumnMapper {
                min_freq: c.min_freq,
                max_freq: c.max_freq,
                total_duration: self.duration_secs,
                slice: c.amplitude_slice,
            }),
        }
    }

    /// Compositor for the configured output format
    pub fn compositor(&self) -> Result<Compositor> {
        let mut compositor = Compositor::new(self.sample_rate, self.duration_secs)?;
        match &self.strategy {
            Strategy::Palette(p) => {
                compositor.tone_volume = p.volume;
                compositor.reverb_time = p.reverb_time;
            }
            Strategy::ColumnScan(c) => {
                compositor.fade_secs = c.fade_secs;
            }
        }
        Ok(compositor)
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text).map_err(|e| SonifyError::Config {
            reason: format!("{}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

fn validate_resize(resize: Option<[u32; 2]>) -> Result<()> {
    match resize {
        Some([w, h]) if w == 0 || h == 0 => Err(SonifyError::invalid_parameter(
            "resize",
            format!("{}x{}", w, h),
            "non-zero width and height",
        )),
        _ => Ok(()),
    }
}
