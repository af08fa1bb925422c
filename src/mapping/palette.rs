//! Palette strategy: dominant colors become layered tones
//!
//! Hue picks the pitch (150-400 Hz), saturation the overtone strength and
//! value a gentle upward pitch shift. Each color's tone gets a random length
//! and start offset from the injected random source.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SonifyError};
use crate::mapping::color::{rgb_to_hsv, Hsv};
use crate::mapping::ToneDescriptor;
use crate::raster::ImageSample;

/// Lowest base frequency (hue 0)
pub const BASE_FREQUENCY: f64 = 150.0;

/// Width of the hue frequency band in Hz
pub const HUE_SPAN: f64 = 250.0;

/// Default number of dominant colors
pub const DEFAULT_NUM_COLORS: usize = 50;

/// Default range of per-tone durations in seconds
pub const DEFAULT_TONE_DURATION: (f64, f64) = (1.5, 3.0);

/// One dominant color and the sound parameters derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteColor {
    /// 8-bit RGB components
    pub rgb: [u8; 3],
    /// Number of pixels with exactly this color
    pub count: usize,
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
    /// `150 + hue * 250` Hz
    pub base_frequency: f64,
    /// `1 + saturation * 0.3`
    pub overtone_factor: f64,
    /// `1 + value * 0.2`
    pub pitch_shift: f64,
}

impl PaletteColor {
    /// Derive sound parameters for a color
    pub fn new(rgb: [u8; 3], count: usize) -> Self {
        let [r, g, b] = rgb.map(|c| c as f64 / 255.0);
        let Hsv {
            hue,
            saturation,
            value,
        } = rgb_to_hsv(r, g, b);

        Self {
            rgb,
            count,
            hue,
            saturation,
            value,
            base_frequency: BASE_FREQUENCY + hue * HUE_SPAN,
            overtone_factor: 1.0 + saturation * 0.3,
            pitch_shift: 1.0 + value * 0.2,
        }
    }

    /// Effective tone frequency: base frequency times pitch shift
    pub fn frequency(&self) -> f64 {
        self.base_frequency * self.pitch_shift
    }
}

/// Count distinct colors and keep the `num_colors` most frequent
///
/// Equal counts are ordered by ascending `(r, g, b)`.
///
/// # Errors
/// * `InvalidParameter` - If the sample is not three-channel
pub fn extract_palette(sample: &ImageSample, num_colors: usize) -> Result<Vec<PaletteColor>> {
    if sample.channels() != 3 {
        return Err(SonifyError::invalid_parameter(
            "channels",
            sample.channels(),
            "3 (RGB sample)",
        ));
    }

    let mut counts: BTreeMap<[u8; 3], usize> = BTreeMap::new();
    for px in sample.pixels() {
        let rgb = [quantize(px[0]), quantize(px[1]), quantize(px[2])];
        *counts.entry(rgb).or_insert(0) += 1;
    }

    // BTreeMap iterates in ascending color order; the stable sort keeps it for ties
    let mut ranked: Vec<([u8; 3], usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(ranked
        .into_iter()
        .take(num_colors)
        .map(|(rgb, count)| PaletteColor::new(rgb, count))
        .collect())
}

#[inline]
fn quantize(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Maps a sample's dominant colors to randomly placed tones
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteMapper {
    /// Maximum number of colors (and tones)
    pub num_colors: usize,
    /// Length of the output clip in seconds
    pub total_duration: f64,
    /// Inclusive range tone durations are drawn from
    pub tone_duration: (f64, f64),
}

impl PaletteMapper {
    pub fn new(num_colors: usize, total_duration: f64) -> Self {
        Self {
            num_colors,
            total_duration,
            tone_duration: DEFAULT_TONE_DURATION,
        }
    }

    /// One tone descriptor per dominant color
    ///
    /// Durations are drawn from `tone_duration` (clamped to the clip length),
    /// start offsets from `[0, total_duration - duration]`.
    pub fn map_palette<R: Rng + ?Sized>(
        &self,
        sample: &ImageSample,
        rng: &mut R,
    ) -> Result<Vec<ToneDescriptor>> {
        let (lo, hi) = self.duration_bounds()?;
        let palette = extract_palette(sample, self.num_colors)?;

        let tones = palette
            .iter()
            .map(|color| {
                let duration = rng.gen_range(lo..=hi);
                let latest = (self.total_duration - duration).max(0.0);
                let start_offset = rng.gen_range(0.0..=latest);
                ToneDescriptor {
                    frequency: color.frequency(),
                    duration,
                    amplitude_scale: 1.0,
                    overtone_factor: color.overtone_factor,
                    start_offset,
                }
            })
            .collect();

        Ok(tones)
    }

    fn duration_bounds(&self) -> Result<(f64, f64)> {
        if !(self.total_duration.is_finite() && self.total_duration > 0.0) {
            return Err(SonifyError::invalid_parameter(
                "total_duration",
                self.total_duration,
                "> 0 seconds",
            ));
        }
        let (min, max) = self.tone_duration;
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(SonifyError::invalid_parameter(
                "tone_duration",
                format!("{}..{}", min, max),
                "0 < min <= max seconds",
            ));
        }
        Ok((min.min(self.total_duration), max.min(self.total_duration)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rgb_sample(pixels: &[[u8; 3]]) -> ImageSample {
        let data = pixels
            .iter()
            .flat_map(|px| px.iter().map(|&c| c as f64 / 255.0))
            .collect();
        ImageSample::new(data, 1, pixels.len(), 3).unwrap()
    }

    #[test]
    fn test_solid_red() {
        let sample = rgb_sample(&[[255, 0, 0]; 4]);
        let palette = extract_palette(&sample, 50).unwrap();
        assert_eq!(palette.len(), 1);

        let red = &palette[0];
        assert_eq!(red.count, 4);
        assert_relative_eq!(red.hue, 0.0);
        assert_relative_eq!(red.base_frequency, 150.0);
        assert_relative_eq!(red.overtone_factor, 1.3);
        assert_relative_eq!(red.frequency(), 180.0);
    }

    #[test]
    fn test_ranked_by_count_then_color() {
        let sample = rgb_sample(&[
            [0, 0, 255],
            [0, 255, 0],
            [0, 255, 0],
            [255, 0, 0],
            [0, 0, 255],
            [10, 10, 10],
        ]);
        let palette = extract_palette(&sample, 3).unwrap();
        let colors: Vec<[u8; 3]> = palette.iter().map(|c| c.rgb).collect();
        assert_eq!(colors, vec![[0, 0, 255], [0, 255, 0], [10, 10, 10]]);
    }

    #[test]
    fn test_rejects_luma_sample() {
        let sample = ImageSample::from_fn(2, 2, |_, _| 0.5);
        assert!(extract_palette(&sample, 5).is_err());
    }

    #[test]
    fn test_descriptors_within_clip() {
        let pixels: Vec<[u8; 3]> = (0..60).map(|i| [i as u8 * 4, 100, 200]).collect();
        let sample = rgb_sample(&pixels);
        let mapper = PaletteMapper::new(50, 7.0);
        let mut rng = StdRng::seed_from_u64(7);

        let tones = mapper.map_palette(&sample, &mut rng).unwrap();
        assert_eq!(tones.len(), 50);
        for tone in &tones {
            assert!((1.5..=3.0).contains(&tone.duration));
            assert!(tone.start_offset >= 0.0);
            assert!(tone.start_offset + tone.duration <= 7.0 + 1e-9);
            assert!((150.0..=400.0 * 1.2).contains(&tone.frequency));
        }
    }

    #[test]
    fn test_short_clip_clamps_duration() {
        let sample = rgb_sample(&[[10, 20, 30]]);
        let mapper = PaletteMapper::new(5, 1.0);
        let mut rng = StdRng::seed_from_u64(1);

        let tones = mapper.map_palette(&sample, &mut rng).unwrap();
        assert_eq!(tones[0].duration, 1.0);
        assert_eq!(tones[0].start_offset, 0.0);
    }

    #[test]
    fn test_same_seed_same_tones() {
        let sample = rgb_sample(&[[10, 20, 30], [200, 100, 0], [5, 5, 250]]);
        let mapper = PaletteMapper::new(50, 15.0);

        let a = mapper
            .map_palette(&sample, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = mapper
            .map_palette(&sample, &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bad_duration_range() {
        let sample = rgb_sample(&[[10, 20, 30]]);
        let mut mapper = PaletteMapper::new(5, 7.0);
        mapper.tone_duration = (3.0, 1.0);
        assert!(mapper
            .map_palette(&sample, &mut StdRng::seed_from_u64(1))
            .is_err());
    }
}
