//! Image loading and normalization
//!
//! Reads a raster file through the `image` crate, optionally resizes it,
//! converts it to RGB or luminance and produces an [`ImageSample`] in [0, 1].
//! Column-scan sources additionally get flipped, tonemapped and rescaled.

use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SonifyError};
use crate::raster::sample::ImageSample;

/// Intensities at or below this value are zeroed by the high-pass step
pub const HIGHPASS_THRESHOLD: f64 = 0.5;

/// Default offset `K` of the inverse-contrast curve `1 / (x + K)`
pub const DEFAULT_CONTRAST_OFFSET: f64 = 100.0;

/// Color space of the produced sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Three channels: red, green, blue
    Rgb,
    /// Single luminance channel
    Luma,
}

impl ColorMode {
    /// Channels per pixel for this mode
    pub fn channels(&self) -> usize {
        match self {
            ColorMode::Rgb => 3,
            ColorMode::Luma => 1,
        }
    }
}

/// Intensity transform applied during column-scan preprocessing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Tonemap {
    /// `1 / (x + offset)`: compresses a huge dynamic range
    InverseContrast { offset: f64 },
    /// `1 - x`
    Invert,
}

impl Tonemap {
    /// Map a single intensity
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            Tonemap::InverseContrast { offset } => 1.0 / (x + offset),
            Tonemap::Invert => 1.0 - x,
        }
    }
}

/// How to turn an image file into a sample
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Target color space
    pub mode: ColorMode,
    /// Resize to `(width, height)` before any other processing
    pub resize: Option<(u32, u32)>,
    /// Column-scan preprocessing: vertical flip, this tonemap, min-max rescale
    pub scan: Option<Tonemap>,
    /// Zero every value at or below [`HIGHPASS_THRESHOLD`]
    pub highpass: bool,
}

impl LoadOptions {
    /// Options used by the palette strategy
    pub fn palette(resize: Option<(u32, u32)>) -> Self {
        Self {
            mode: ColorMode::Rgb,
            resize,
            scan: None,
            highpass: false,
        }
    }

    /// Options used by the column-scan strategy
    pub fn column_scan(tonemap: Tonemap, highpass: bool, resize: Option<(u32, u32)>) -> Self {
        Self {
            mode: ColorMode::Luma,
            resize,
            scan: Some(tonemap),
            highpass,
        }
    }
}

/// Read an image file and normalize it
///
/// # Errors
/// * `ImageRead` - If the file is missing, unreadable, or not a supported format
/// * `InvalidParameter` - If the options are unusable (zero resize, bad offset)
pub fn load(path: &Path, options: &LoadOptions) -> Result<ImageSample> {
    let image = image::open(path).map_err(|source| SonifyError::ImageRead {
        path: path.display().to_string(),
        source,
    })?;

    debug!(
        "Decoded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );

    normalize(&image, options)
}

/// Normalize an already-decoded image
pub fn normalize(image: &DynamicImage, options: &LoadOptions) -> Result<ImageSample> {
    let resized;
    let image = match options.resize {
        Some((width, height)) => {
            if width == 0 || height == 0 {
                return Err(SonifyError::invalid_parameter(
                    "resize",
                    format!("{}x{}", width, height),
                    "non-zero width and height",
                ));
            }
            resized = image.resize_exact(width, height, FilterType::CatmullRom);
            &resized
        }
        None => image,
    };

    let (width, height) = (image.width() as usize, image.height() as usize);
    let data: Vec<f64> = match options.mode {
        ColorMode::Rgb => image
            .to_rgb8()
            .into_raw()
            .into_iter()
            .map(|v| v as f64 / 255.0)
            .collect(),
        ColorMode::Luma => image
            .to_luma8()
            .into_raw()
            .into_iter()
            .map(|v| v as f64 / 255.0)
            .collect(),
    };

    let mut sample = ImageSample::new(data, height, width, options.mode.channels())?;

    if let Some(tonemap) = options.scan {
        sample = scan_preprocess(&sample, tonemap)?;
    }

    if options.highpass {
        highpass(&mut sample);
    }

    Ok(sample)
}

/// Flip vertically, apply `tonemap`, then min-max rescale to [0, 1]
///
/// After flipping, row 0 is the bottom of the picture. A constant image
/// rescales to all zeros.
pub fn scan_preprocess(sample: &ImageSample, tonemap: Tonemap) -> Result<ImageSample> {
    if let Tonemap::InverseContrast { offset } = tonemap {
        if !(offset.is_finite() && offset > 0.0) {
            return Err(SonifyError::invalid_parameter("contrast_offset", offset, "> 0"));
        }
    }

    let (height, width, channels) = sample.shape();
    let stride = width * channels;

    let mapped: Vec<f64> = sample
        .data()
        .chunks_exact(stride.max(1))
        .rev()
        .flat_map(|row| row.iter().map(|&x| tonemap.apply(x)))
        .collect();

    let (min, max) = mapped
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    let rescaled = if range > 0.0 && range.is_finite() {
        mapped.into_iter().map(|v| ((v - min) / range).clamp(0.0, 1.0)).collect()
    } else {
        vec![0.0; mapped.len()]
    };

    ImageSample::new(rescaled, height, width, channels)
}

/// Hard intensity threshold: keep only values above 0.5
///
/// Despite the name this is not a frequency-domain filter.
pub fn highpass(sample: &mut ImageSample) {
    sample.map_in_place(|v| if v <= HIGHPASS_THRESHOLD { 0.0 } else { v });
}

// ============================================================================
// Tests
// ============================================================================
