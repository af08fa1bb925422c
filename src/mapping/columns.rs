//! Column-scan strategy: one sustained sine per pixel column
//!
//! Column `i` of `n` sounds at `min + i * (max - min) / n` Hz for the whole
//! clip, with an amplitude taken from the image's mean brightness.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SonifyError};
use crate::mapping::ToneDescriptor;
use crate::raster::ImageSample;

/// Default lowest column frequency in Hz
pub const DEFAULT_MIN_FREQ: f64 = 200.0;

/// Default upper (exclusive) column frequency in Hz
pub const DEFAULT_MAX_FREQ: f64 = 2000.0;

/// Which slice of the image drives a column's amplitude
///
/// The default takes column `i`'s own mean, so a left-to-right gradient rises
/// in loudness with frequency. [`AmplitudeSlice::RowWrap`] is the alternative
/// wraparound rule (mean of row `i mod height`); pick it explicitly when that
/// behavior is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmplitudeSlice {
    /// Mean of pixel column `i`
    #[default]
    Column,
    /// Mean of row `i mod height`, so a non-square image still yields one
    /// amplitude per column
    RowWrap,
}

/// Frequency and amplitude of one column's tone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnTone {
    pub frequency: f64,
    pub amplitude_scale: f64,
}

/// Assign a frequency and amplitude to every pixel column
///
/// # Errors
/// * `InvalidParameter` - If `min_freq` is not positive or exceeds `max_freq`
pub fn map_columns(
    sample: &ImageSample,
    min_freq: f64,
    max_freq: f64,
    slice: AmplitudeSlice,
) -> Result<Vec<ColumnTone>> {
    if !(min_freq.is_finite() && min_freq > 0.0) {
        return Err(SonifyError::invalid_parameter("min_freq", min_freq, "> 0 Hz"));
    }
    if !(max_freq.is_finite() && max_freq >= min_freq) {
        return Err(SonifyError::invalid_parameter(
            "max_freq",
            max_freq,
            format!(">= min_freq ({} Hz)", min_freq),
        ));
    }

    let n = sample.width();
    let step = (max_freq - min_freq) / n.max(1) as f64;

    let tones = (0..n)
        .map(|i| {
            let amplitude_scale = match slice {
                AmplitudeSlice::Column => sample.column_mean(i),
                AmplitudeSlice::RowWrap => sample.row_mean(i % sample.height().max(1)),
            };
            ColumnTone {
                frequency: min_freq + i as f64 * step,
                amplitude_scale,
            }
        })
        .collect();

    Ok(tones)
}

/// Maps every pixel column to a full-length tone
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapper {
    pub min_freq: f64,
    pub max_freq: f64,
    /// Length of the output clip in seconds
    pub total_duration: f64,
    pub slice: AmplitudeSlice,
}

impl ColumnMapper {
    pub fn new(min_freq: f64, max_freq: f64, total_duration: f64) -> Self {
        Self {
            min_freq,
            max_freq,
            total_duration,
            slice: AmplitudeSlice::default(),
        }
    }

    /// Column tones as descriptors spanning the whole clip
    pub fn map_column_tones(&self, sample: &ImageSample) -> Result<Vec<ToneDescriptor>> {
        if !(self.total_duration.is_finite() && self.total_duration > 0.0) {
            return Err(SonifyError::invalid_parameter(
                "total_duration",
                self.total_duration,
                "> 0 seconds",
            ));
        }

        let tones = map_columns(sample, self.min_freq, self.max_freq, self.slice)?;
        Ok(tones
            .into_iter()
            .map(|tone| ToneDescriptor {
                frequency: tone.frequency,
                duration: self.total_duration,
                amplitude_scale: tone.amplitude_scale,
                overtone_factor: 0.0,
                start_offset: 0.0,
            })
            .collect())
    }
}
