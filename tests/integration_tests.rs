//! Integration Tests
//!
//! End-to-end tests for the Sonify rendering pipeline.

use std::path::Path;

use image::{GrayImage, Luma, Rgb, RgbImage};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use sonify::analysis::dominant_frequency;
use sonify::engine::AudioClip;
use sonify::mapping::{map_columns, AmplitudeSlice, FrequencyMapper, PaletteMapper};
use sonify::raster::{self, ImageSample, LoadOptions};
use sonify::{SonifyConfig, SonifyError, Sonifier, Strategy};

/// Palette config small enough to render quickly
fn quick_palette(seed: u64) -> SonifyConfig {
    let mut config = SonifyConfig::palette().with_seed(seed);
    config.duration_secs = 3.0;
    config.sample_rate = 8000;
    config
}

fn save_gradient(path: &Path) {
    // column i has intensity i / 100
    GrayImage::from_fn(100, 100, |x, _| Luma([(x as f64 / 100.0 * 255.0).round() as u8]))
        .save(path)
        .unwrap();
}

// === Scenario A: solid red ===

#[test]
fn test_solid_red_yields_single_low_tone() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("red.png");
    RgbImage::from_pixel(2, 2, Rgb([255, 0, 0])).save(&input).unwrap();

    let sample = raster::load(&input, &LoadOptions::palette(Some((100, 100)))).unwrap();
    let mapper = PaletteMapper::new(50, 3.0);
    let mut rng = <rand::rngs::StdRng as rand::SeedableRng>::seed_from_u64(5);
    let tones = mapper.map_tones(&sample, &mut rng).unwrap();

    assert_eq!(tones.len(), 1);
    // hue 0 -> 150 Hz base, raised 20% by full brightness
    assert!((tones[0].frequency - 180.0).abs() < 1e-9);
}

#[test]
fn test_solid_red_spectral_peak() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("red.png");
    let output = dir.path().join("red.wav");
    RgbImage::from_pixel(2, 2, Rgb([255, 0, 0])).save(&input).unwrap();

    let report = Sonifier::new(quick_palette(11))
        .unwrap()
        .render_file(&input, &output)
        .unwrap();
    assert_eq!(report.tone_count, 1);

    let clip = AudioClip::read_wav(&output).unwrap();
    let peak = dominant_frequency(&clip.to_f64(), clip.sample_rate).unwrap();
    assert!((peak - 180.0).abs() < 3.0, "dominant frequency {}", peak);
}

// === Scenario B: horizontal gradient ===

#[test]
fn test_gradient_column_mapping() {
    let sample = ImageSample::from_fn(100, 100, |_, col| col as f64 / 100.0);
    let tones = map_columns(&sample, 200.0, 2000.0, AmplitudeSlice::Column).unwrap();

    assert_eq!(tones.len(), 100);
    assert!(tones[0].amplitude_scale < 1e-9);
    assert!(tones[99].amplitude_scale > 0.98);
    assert!((tones[0].frequency - 200.0).abs() < 1e-9);
    assert!((tones[99].frequency - 1982.0).abs() < 1e-9);
}

#[test]
fn test_gradient_column_render() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("gradient.png");
    let output = dir.path().join("gradient.wav");
    save_gradient(&input);

    let mut config = SonifyConfig::column_scan();
    config.duration_secs = 2.0;
    config.sample_rate = 8000;
    if let Strategy::ColumnScan(c) = &mut config.strategy {
        c.resize = None;
    }

    let report = Sonifier::new(config).unwrap().render_file(&input, &output).unwrap();
    assert_eq!(report.tone_count, 100);
    assert_eq!(report.sample_count, 16000);
    assert_eq!(report.peak, 32767);

    // inversion makes the dark left edge (200 Hz) the loudest column
    let clip = AudioClip::read_wav(&output).unwrap();
    let peak = dominant_frequency(&clip.to_f64(), clip.sample_rate).unwrap();
    assert!((peak - 200.0).abs() < 2.0, "dominant frequency {}", peak);

    // faded in and out
    assert_eq!(clip.samples[0], 0);
    assert_eq!(clip.samples[clip.len() - 1], 0);
}

// === Normalization ===

#[test]
fn test_output_peak_is_exactly_full_scale() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("noise.png");
    RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8]))
        .save(&input)
        .unwrap();

    for seed in [1, 2, 3] {
        let rendering = Sonifier::new(quick_palette(seed))
            .unwrap()
            .render_image(&input)
            .unwrap();
        assert_eq!(rendering.clip.peak(), 32767);
        assert_eq!(rendering.clip.len(), 24000);
    }
}

#[test]
fn test_black_image_with_highpass_is_empty_signal() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("flat.png");
    let output = dir.path().join("flat.wav");
    GrayImage::from_pixel(10, 10, Luma([40])).save(&input).unwrap();

    let mut config = SonifyConfig::column_scan();
    config.duration_secs = 1.0;
    config.sample_rate = 8000;
    if let Strategy::ColumnScan(c) = &mut config.strategy {
        c.highpass = true;
    }

    let err = Sonifier::new(config)
        .unwrap()
        .render_file(&input, &output)
        .unwrap_err();
    assert!(matches!(err, SonifyError::EmptySignal));
    assert!(!output.exists(), "no partial clip may be written");
}

// === Idempotence ===

#[test]
fn test_same_seed_bit_identical_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("swatch.png");
    RgbImage::from_fn(8, 8, |x, y| Rgb([(x * 30) as u8, 90, (y * 30) as u8]))
        .save(&input)
        .unwrap();

    let first = dir.path().join("first.wav");
    let second = dir.path().join("second.wav");
    let sonifier = Sonifier::new(quick_palette(2024)).unwrap();
    let a = sonifier.render_file(&input, &first).unwrap();
    let b = sonifier.render_file(&input, &second).unwrap();

    assert_eq!(a.sha256, b.sha256);
    assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[test]
fn test_different_seed_moves_tones() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("swatch.png");
    RgbImage::from_fn(8, 8, |x, y| Rgb([(x * 30) as u8, 90, (y * 30) as u8]))
        .save(&input)
        .unwrap();

    let a = Sonifier::new(quick_palette(1)).unwrap().render_image(&input).unwrap();
    let b = Sonifier::new(quick_palette(2)).unwrap().render_image(&input).unwrap();
    assert!(a.clip != b.clip);
}

// === Errors ===

#[test]
fn test_missing_image() {
    let dir = tempdir().unwrap();
    let err = Sonifier::new(quick_palette(0))
        .unwrap()
        .render_file(&dir.path().join("missing.png"), &dir.path().join("out.wav"))
        .unwrap_err();
    assert_eq!(err.error_code(), "IMAGE_READ");
}
