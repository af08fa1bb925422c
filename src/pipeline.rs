//! End-to-end rendering
//!
//! Image Loader → Frequency Mapper → Compositor → WAV file. The clip is
//! fully built in memory before anything touches the output path, so a failed
//! render never leaves a partial file behind.

use std::path::{Path, PathBuf};

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::SonifyConfig;
use crate::engine::AudioClip;
use crate::error::Result;
use crate::mapping::{FrequencyMapper, ToneDescriptor};
use crate::raster::{self, ImageSample};

/// Summary of one completed render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Strategy name (`palette` or `column_scan`)
    pub strategy: String,
    /// Seed that drove every random draw
    pub seed: u64,
    pub tone_count: usize,
    pub sample_count: usize,
    pub sample_rate: u32,
    pub duration_secs: f64,
    pub peak: u16,
    /// Hex SHA-256 of the written WAV file
    pub sha256: String,
}

/// Rendered clip plus the tones that produced it
#[derive(Debug, Clone)]
pub struct Rendering {
    pub clip: AudioClip,
    pub tones: Vec<ToneDescriptor>,
    pub seed: u64,
}

/// Runs the full image-to-sound pipeline for one configuration
#[derive(Debug, Clone)]
pub struct Sonifier {
    config: SonifyConfig,
}

impl Sonifier {
    /// Create a sonifier, validating the configuration
    pub fn new(config: SonifyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SonifyConfig {
        &self.config
    }

    /// Configured seed, or a fresh one from the thread RNG
    fn resolve_seed(&self) -> u64 {
        self.config
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen())
    }

    /// Render an already-loaded sample
    pub fn render_sample(&self, sample: &ImageSample) -> Result<Rendering> {
        let seed = self.resolve_seed();
        let mut rng = StdRng::seed_from_u64(seed);

        let mapper = self.config.mapper();
        let tones = mapper.map_tones(sample, &mut rng)?;
        info!(
            "Mapped {}x{} image to {} tones ({} strategy, seed {})",
            sample.width(),
            sample.height(),
            tones.len(),
            mapper.name(),
            seed
        );

        let clip = self.config.compositor()?.compose(&tones, mapper.layout())?;
        Ok(Rendering { clip, tones, seed })
    }

    /// Load an image file and render it
    pub fn render_image(&self, input: &Path) -> Result<Rendering> {
        let sample = raster::load(input, &self.config.load_options())?;
        self.render_sample(&sample)
    }

    /// Render `input` and write the WAV to `output`
    pub fn render_file(&self, input: &Path, output: &Path) -> Result<RenderReport> {
        let rendering = self.render_image(input)?;
        let bytes = rendering.clip.to_wav_bytes()?;
        std::fs::write(output, &bytes)?;

        info!("WAV file created: {}", output.display());

        Ok(RenderReport {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            strategy: self.config.mapper().name().to_string(),
            seed: rendering.seed,
            tone_count: rendering.tones.len(),
            sample_count: rendering.clip.len(),
            sample_rate: rendering.clip.sample_rate,
            duration_secs: rendering.clip.duration(),
            peak: rendering.clip.peak(),
            sha256: sha256_hex(&bytes),
        })
    }
}

/// Hex-encoded SHA-256 digest
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
