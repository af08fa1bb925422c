//! Waveform Buffer Management
//!
//! Provides the floating-point sample buffer shared by every synthesis stage
//! and the helpers the compositor uses to accumulate, normalize and fade it.

use crate::error::{Result, SonifyError};

// ============================================================================
// Constants
// ============================================================================

/// Default output sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

// ============================================================================
// Helper Functions
// ============================================================================

/// Number of samples covering `duration_secs` at `sample_rate`
///
/// Rounds to the nearest whole sample.
#[inline]
pub fn samples_for(duration_secs: f64, sample_rate: u32) -> usize {
    (duration_secs * sample_rate as f64).round().max(0.0) as usize
}

/// Convert linear amplitude to decibels
///
/// Returns -f64::INFINITY for zero input.
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        f64::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

// ============================================================================
// Waveform
// ============================================================================

/// Mono floating-point sample buffer at a fixed sample rate
///
/// Used both for short tone buffers produced by the synthesizer and for the
/// master buffer owned by the compositor.
///
/// # Example
/// ```
/// use sonify::engine::Waveform;
///
/// let wave = Waveform::silence(44100, 44100);
/// assert_eq!(wave.len(), 44100);
/// assert_eq!(wave.duration(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Sample data
    pub samples: Vec<f64>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Waveform {
    /// Create a zero-initialized buffer of `num_samples`
    pub fn silence(num_samples: usize, sample_rate: u32) -> Self {
        Self {
            samples: vec![0.0; num_samples],
            sample_rate,
        }
    }

    /// Wrap existing samples
    pub fn from_samples(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Maximum absolute sample value (0.0 for an empty buffer)
    pub fn peak(&self) -> f64 {
        self.samples.iter().map(|s| s.abs()).fold(0.0_f64, f64::max)
    }

    /// Check all samples are finite (no NaN/Inf)
    pub fn is_finite(&self) -> bool {
        self.samples.iter().all(|s| s.is_finite())
    }

    /// Add `other` into this buffer starting at `offset`
    ///
    /// Samples that would land past the end are discarded; nothing wraps.
    /// Returns the number of samples actually accumulated.
    pub fn mix_in(&mut self, offset: usize, other: &[f64]) -> usize {
        if offset >= self.samples.len() {
            return 0;
        }
        let available = self.samples.len() - offset;
        let count = other.len().min(available);
        for (dst, src) in self.samples[offset..offset + count]
            .iter_mut()
            .zip(&other[..count])
        {
            *dst += *src;
        }
        count
    }

    /// Scale the buffer so its peak absolute value is 1.0
    ///
    /// # Errors
    /// * `EmptySignal` - If the buffer is silent or contains non-finite samples
    pub fn normalize_peak(&mut self) -> Result<()> {
        let peak = self.checked_peak()?;
        for s in self.samples.iter_mut() {
            *s /= peak;
        }
        Ok(())
    }

    /// Peak value, rejecting silent or corrupted buffers
    pub(crate) fn checked_peak(&self) -> Result<f64> {
        if !self.is_finite() {
            return Err(SonifyError::EmptySignal);
        }
        let peak = self.peak();
        if peak <= 0.0 {
            return Err(SonifyError::EmptySignal);
        }
        Ok(peak)
    }

    /// Apply linear fade-in and fade-out ramps of `fade_samples` each
    ///
    /// The ramp length is clamped to half the buffer so the two ramps never
    /// overlap. Fade-in runs 0 → 1, fade-out runs 1 → 0, both inclusive.
    pub fn apply_fades(&mut self, fade_samples: usize) {
        let len = self.samples.len();
        let fade = fade_samples.min(len / 2);
        if fade == 0 {
            return;
        }

        let step = if fade > 1 { 1.0 / (fade - 1) as f64 } else { 0.0 };
        for i in 0..fade {
            let gain = i as f64 * step;
            self.samples[i] *= gain;
            self.samples[len - 1 - i] *= gain;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
