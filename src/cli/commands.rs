//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::analysis::ClipAnalysis;
use crate::cli::{Commands, StrategyArg};
use crate::config::{ColumnSettings, PaletteSettings, SonifyConfig, Strategy};
use crate::engine::AudioClip;
use crate::error::Result;
use crate::mapping::AmplitudeSlice;
use crate::pipeline::{RenderReport, Sonifier};

/// File extensions picked up by `batch`
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "webp"];

/// Name of the manifest written by `batch`
pub const MANIFEST_NAME: &str = "manifest.json";

/// Outcome of a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchManifest {
    pub generated_at: DateTime<Utc>,
    pub config: SonifyConfig,
    pub rendered: Vec<RenderReport>,
    /// `(input, error message)` for every image that failed
    pub failed: Vec<(PathBuf, String)>,
}

/// Dispatch a parsed command
pub fn run(cmd: Commands, json: bool) -> Result<()> {
    match cmd {
        Commands::Palette {
            input,
            output,
            duration,
            sample_rate,
            colors,
            reverb,
            volume,
            no_resize,
            seed,
        } => {
            let config = SonifyConfig {
                duration_secs: duration,
                sample_rate,
                seed,
                strategy: Strategy::Palette(PaletteSettings {
                    num_colors: colors,
                    resize: if no_resize { None } else { Some([100, 100]) },
                    volume,
                    reverb_time: reverb,
                    ..PaletteSettings::default()
                }),
            };
            render(config, &input, &output, json)
        }
        Commands::Columns {
            input,
            output,
            duration,
            sample_rate,
            min_freq,
            max_freq,
            contrast,
            contrast_offset,
            highpass,
            row_wrap,
            no_resize,
        } => {
            let config = SonifyConfig {
                duration_secs: duration,
                sample_rate,
                seed: None,
                strategy: Strategy::ColumnScan(ColumnSettings {
                    min_freq,
                    max_freq,
                    contrast,
                    contrast_offset,
                    highpass,
                    resize: if no_resize { None } else { Some([100, 100]) },
                    amplitude_slice: if row_wrap {
                        AmplitudeSlice::RowWrap
                    } else {
                        AmplitudeSlice::Column
                    },
                    ..ColumnSettings::default()
                }),
            };
            render(config, &input, &output, json)
        }
        Commands::Render {
            input,
            output,
            config,
        } => render(SonifyConfig::load(&config)?, &input, &output, json),
        Commands::Batch {
            input_dir,
            output_dir,
            config,
        } => {
            let config = match config {
                Some(path) => SonifyConfig::load(&path)?,
                None => SonifyConfig::palette(),
            };
            let manifest = batch(config, &input_dir, &output_dir)?;
            println!(
                "Rendered {} images, {} failed. Manifest: {}",
                manifest.rendered.len(),
                manifest.failed.len(),
                output_dir.join(MANIFEST_NAME).display()
            );
            Ok(())
        }
        Commands::Analyze { path } => analyze(&path, json),
        Commands::InitConfig { path, strategy } => init_config(&path, strategy),
    }
}

/// Render one image with `config`
pub fn render(config: SonifyConfig, input: &Path, output: &Path, json: bool) -> Result<()> {
    let report = Sonifier::new(config)?.render_file(input, output)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("WAV file created: {}", report.output.display());
        println!(
            "{} tones | {:.2}s @ {} Hz | seed {}",
            report.tone_count, report.duration_secs, report.sample_rate, report.seed
        );
        println!("SHA-256: {}", report.sha256);
    }

    Ok(())
}

/// Render every image under `input_dir` into `output_dir`
///
/// A failing image is recorded in the manifest and does not stop the batch.
/// When the config has no seed, one is drawn once so every file in the batch
/// shares it.
pub fn batch(mut config: SonifyConfig, input_dir: &Path, output_dir: &Path) -> Result<BatchManifest> {
    if config.seed.is_none() {
        config.seed = Some(rand::random());
    }
    let sonifier = Sonifier::new(config.clone())?;
    std::fs::create_dir_all(output_dir)?;

    let mut inputs: Vec<PathBuf> = WalkDir::new(input_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_image(path))
        .collect();
    inputs.sort();

    info!("Found {} images in {}", inputs.len(), input_dir.display());

    let mut rendered = Vec::new();
    let mut failed = Vec::new();
    for input in inputs {
        let output = output_dir.join(output_name(&input, input_dir));
        match sonifier.render_file(&input, &output) {
            Ok(report) => rendered.push(report),
            Err(e) => {
                warn!("Skipping {}: {}", input.display(), e);
                failed.push((input, e.to_string()));
            }
        }
    }

    let manifest = BatchManifest {
        generated_at: Utc::now(),
        config,
        rendered,
        failed,
    };
    std::fs::write(
        output_dir.join(MANIFEST_NAME),
        serde_json::to_string_pretty(&manifest)?,
    )?;

    Ok(manifest)
}

/// Print measurements of a WAV file
pub fn analyze(path: &Path, json: bool) -> Result<()> {
    let clip = AudioClip::read_wav(path)?;
    let analysis = ClipAnalysis::analyze(&clip);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("{}", analysis.summary());
    }

    Ok(())
}

/// Write a default config file for `strategy`
pub fn init_config(path: &Path, strategy: StrategyArg) -> Result<()> {
    let config = match strategy {
        StrategyArg::Palette => SonifyConfig::palette(),
        StrategyArg::Columns => SonifyConfig::column_scan(),
    };
    config.save(path)?;
    println!("Config written: {}", path.display());
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Flattened `.wav` name for an input, unique across subdirectories
fn output_name(input: &Path, root: &Path) -> String {
    let relative = input.strip_prefix(root).unwrap_or(input).with_extension("");
    let stem: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    format!("{}.wav", stem.join("_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn test_is_image() {
        assert!(is_image(Path::new("a/b/photo.JPG")));
        assert!(is_image(Path::new("sky.png")));
        assert!(!is_image(Path::new("notes.txt")));
        assert!(!is_image(Path::new("noext")));
    }

    #[test]
    fn test_output_name_flattens_subdirs() {
        let root = Path::new("/data/in");
        assert_eq!(output_name(Path::new("/data/in/a.png"), root), "a.wav");
        assert_eq!(output_name(Path::new("/data/in/x/b.jpg"), root), "x_b.wav");
    }

    #[test]
    fn test_batch_renders_and_records_failures() {
        let input_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();

        RgbImage::from_pixel(4, 4, Rgb([0, 128, 255]))
            .save(input_dir.path().join("good.png"))
            .unwrap();
        std::fs::write(input_dir.path().join("bad.png"), b"garbage").unwrap();
        std::fs::write(input_dir.path().join("readme.txt"), b"ignored").unwrap();

        let mut config = SonifyConfig::palette();
        config.duration_secs = 1.0;
        config.sample_rate = 8000;
        if let Strategy::Palette(p) = &mut config.strategy {
            p.tone_duration = [0.5, 0.8];
            p.resize = None;
        }

        let manifest = batch(config, input_dir.path(), output_dir.path()).unwrap();
        assert_eq!(manifest.rendered.len(), 1);
        assert_eq!(manifest.failed.len(), 1);
        assert!(manifest.config.seed.is_some());
        assert!(output_dir.path().join("good.wav").exists());
        assert!(!output_dir.path().join("bad.wav").exists());
        assert!(output_dir.path().join(MANIFEST_NAME).exists());
    }

    #[test]
    fn test_init_config_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("columns.json");
        init_config(&path, StrategyArg::Columns).unwrap();
        assert_eq!(SonifyConfig::load(&path).unwrap(), SonifyConfig::column_scan());
    }
}
