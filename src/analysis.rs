//! Clip verification utilities
//!
//! Objective measurements of a rendered clip so its content can be checked
//! without listening to it.
//!
//! # Measurements
//! - Peak level
//! - RMS level
//! - Dominant frequency (FFT)

use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::engine::buffer::linear_to_db;
use crate::engine::AudioClip;

/// One bin of a magnitude spectrum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralBin {
    pub frequency: f64,
    pub magnitude: f64,
}

/// Hann-windowed magnitude spectrum over the positive frequencies
///
/// Uses the whole signal as one FFT frame, so the bin spacing is
/// `sample_rate / samples.len()`.
pub fn spectrum(samples: &[f64], sample_rate: u32) -> Vec<SpectralBin> {
    let n = samples.len();
    if n < 2 || sample_rate == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let window = 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / n as f64).cos());
            Complex::new(s * window, 0.0)
        })
        .collect();

    fft.process(&mut buffer);

    let bin_hz = sample_rate as f64 / n as f64;
    buffer
        .iter()
        .take(n / 2)
        .enumerate()
        .map(|(i, c)| SpectralBin {
            frequency: i as f64 * bin_hz,
            magnitude: c.norm() / (n as f64 / 2.0),
        })
        .collect()
}

/// Frequency of the strongest non-DC spectral bin
///
/// Returns `None` for signals too short to analyze or with no energy.
pub fn dominant_frequency(samples: &[f64], sample_rate: u32) -> Option<f64> {
    spectrum(samples, sample_rate)
        .into_iter()
        .skip(1)
        .filter(|bin| bin.magnitude > 0.0)
        .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
        .map(|bin| bin.frequency)
}

/// Measurements of a rendered clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipAnalysis {
    /// Duration in seconds
    pub duration: f64,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Peak absolute 16-bit sample
    pub peak: u16,
    /// RMS level in dBFS
    pub rms_db: f64,
    /// Strongest frequency in Hz
    pub dominant_frequency: Option<f64>,
}

impl ClipAnalysis {
    /// Analyze a quantized clip
    pub fn analyze(clip: &AudioClip) -> Self {
        let samples = clip.to_f64();
        let rms = if samples.is_empty() {
            0.0
        } else {
            (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
        };

        Self {
            duration: clip.duration(),
            sample_rate: clip.sample_rate,
            peak: clip.peak(),
            rms_db: linear_to_db(rms),
            dominant_frequency: dominant_frequency(&samples, clip.sample_rate),
        }
    }

    /// Generate a summary string for display
    pub fn summary(&self) -> String {
        let mut s = format!(
            "Duration: {:.2}s @ {} Hz\nPeak: {} | RMS: {:.1} dBFS",
            self.duration, self.sample_rate, self.peak, self.rms_db
        );
        if let Some(freq) = self.dominant_frequency {
            s.push_str(&format!("\nDominant frequency: {:.1} Hz", freq));
        }
        s
    }
}
