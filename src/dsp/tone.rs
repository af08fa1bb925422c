//! Enveloped additive tone synthesis
//!
//! Each tone is a sine fundamental plus two soft harmonics at 2x and 3x the
//! fundamental, all shaped by a Hann envelope so that every tone starts and
//! ends in silence wherever it is placed.

use std::f64::consts::PI;

use crate::engine::buffer::{samples_for, Waveform};
use crate::error::{Result, SonifyError};

/// Relative weight of the first overtone (2x fundamental)
pub const FIRST_OVERTONE_WEIGHT: f64 = 0.1;

/// Relative weight of the second overtone (3x fundamental)
pub const SECOND_OVERTONE_WEIGHT: f64 = 0.05;

/// Default tone volume
pub const DEFAULT_VOLUME: f64 = 0.3;

/// Default overtone factor
pub const DEFAULT_OVERTONE_FACTOR: f64 = 0.2;

/// Hann envelope value at time `t` of a tone lasting `duration`
///
/// Zero at `t = 0` and `t = duration`, unity at the midpoint.
#[inline]
pub fn hann_envelope(t: f64, duration: f64) -> f64 {
    0.5 * (1.0 - (2.0 * PI * t / duration).cos())
}

/// Upper bound on the absolute amplitude of a synthesized tone
pub fn peak_bound(volume: f64, overtone_factor: f64) -> f64 {
    volume.abs()
        * (1.0
            + FIRST_OVERTONE_WEIGHT * overtone_factor
            + SECOND_OVERTONE_WEIGHT * overtone_factor.sqrt())
}

/// Synthesize an enveloped tone with soft overtones
///
/// # Arguments
/// * `frequency` - Fundamental frequency in Hz
/// * `duration` - Tone length in seconds
/// * `sample_rate` - Sample rate in Hz
/// * `volume` - Amplitude of the fundamental
/// * `overtone_factor` - Strength of the harmonic overtones (0 = pure sine)
///
/// # Returns
/// A waveform of exactly `round(duration * sample_rate)` samples
///
/// # Errors
/// * `InvalidParameter` - If frequency, duration or sample rate are not
///   positive, or the overtone factor is negative
pub fn synthesize(
    frequency: f64,
    duration: f64,
    sample_rate: u32,
    volume: f64,
    overtone_factor: f64,
) -> Result<Waveform> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(SonifyError::invalid_parameter("frequency", frequency, "> 0 Hz"));
    }
    if !(duration.is_finite() && duration > 0.0) {
        return Err(SonifyError::invalid_parameter("duration", duration, "> 0 seconds"));
    }
    if sample_rate == 0 {
        return Err(SonifyError::invalid_parameter("sample_rate", sample_rate, "> 0 Hz"));
    }
    if !(overtone_factor.is_finite() && overtone_factor >= 0.0) {
        return Err(SonifyError::invalid_parameter(
            "overtone_factor",
            overtone_factor,
            ">= 0",
        ));
    }

    let num_samples = samples_for(duration, sample_rate);
    if num_samples == 0 {
        return Ok(Waveform::silence(0, sample_rate));
    }

    let step = duration / num_samples as f64;
    let first = volume * FIRST_OVERTONE_WEIGHT * overtone_factor;
    let second = volume * SECOND_OVERTONE_WEIGHT * overtone_factor.sqrt();
    let omega = 2.0 * PI * frequency;

    let samples = (0..num_samples)
        .map(|i| {
            let t = i as f64 * step;
            let envelope = hann_envelope(t, duration);
            let phase = omega * t;
            envelope * (volume * phase.sin() + first * (2.0 * phase).sin() + second * (3.0 * phase).sin())
        })
        .collect();

    Ok(Waveform::from_samples(samples, sample_rate))
}

/// Fill `num_samples` of a constant-amplitude sine, starting at phase zero
///
/// Used for the continuous column-scan layout where every tone spans the
/// whole clip and no envelope is applied per tone.
pub fn sustained_sine(frequency: f64, amplitude: f64, num_samples: usize, sample_rate: u32) -> Vec<f64> {
    let omega = 2.0 * PI * frequency / sample_rate as f64;
    (0..num_samples)
        .map(|i| amplitude * (omega * i as f64).sin())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test_case(440.0, 1.0, 44100 ; "one second at cd rate")]
    #[test_case(150.0, 1.5, 44100 ; "shortest palette tone")]
    #[test_case(333.3, 2.345_67, 22050 ; "fractional duration")]
    #[test_case(1000.0, 0.001, 8000 ; "very short")]
    fn test_length_matches_duration(frequency: f64, duration: f64, sample_rate: u32) {
        let wave = synthesize(frequency, duration, sample_rate, 0.3, 0.2).unwrap();
        assert_eq!(wave.len(), (duration * sample_rate as f64).round() as usize);
        assert_eq!(wave.sample_rate, sample_rate);
    }

    #[test]
    fn test_starts_and_ends_silent() {
        let wave = synthesize(440.0, 0.5, 44100, 0.3, 1.0).unwrap();
        assert_eq!(wave.samples[0], 0.0);
        assert!(wave.samples[wave.len() - 1].abs() < 1e-6);
    }

    #[test]
    fn test_peak_within_bound() {
        for &(volume, factor) in &[(0.2, 1.0), (0.3, 0.2), (1.0, 1.3), (0.5, 0.0)] {
            let wave = synthesize(220.0, 1.0, 44100, volume, factor).unwrap();
            assert!(wave.peak() <= peak_bound(volume, factor) + 1e-12);
        }
        assert_relative_eq!(peak_bound(1.0, 1.0), 1.15);
    }

    #[test]
    fn test_envelope_shape() {
        assert_eq!(hann_envelope(0.0, 2.0), 0.0);
        assert_relative_eq!(hann_envelope(1.0, 2.0), 1.0);
        assert!(hann_envelope(2.0, 2.0).abs() < 1e-12);
        assert_relative_eq!(hann_envelope(0.5, 2.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_pure_sine_without_overtones() {
        let sample_rate = 8000;
        let wave = synthesize(100.0, 1.0, sample_rate, 1.0, 0.0).unwrap();
        let t = 2000.0 / sample_rate as f64;
        let expected = hann_envelope(t, 1.0) * (2.0 * PI * 100.0 * t).sin();
        assert_relative_eq!(wave.samples[2000], expected, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(synthesize(0.0, 1.0, 44100, 0.3, 0.2).is_err());
        assert!(synthesize(-5.0, 1.0, 44100, 0.3, 0.2).is_err());
        assert!(synthesize(440.0, 0.0, 44100, 0.3, 0.2).is_err());
        assert!(synthesize(440.0, -1.0, 44100, 0.3, 0.2).is_err());
        assert!(synthesize(440.0, 1.0, 0, 0.3, 0.2).is_err());
        assert!(synthesize(440.0, 1.0, 44100, 0.3, -0.1).is_err());
        assert!(synthesize(f64::NAN, 1.0, 44100, 0.3, 0.2).is_err());

        let err = synthesize(440.0, 0.0, 44100, 0.3, 0.2).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }

    #[test]
    fn test_sustained_sine() {
        let wave = sustained_sine(1000.0, 0.5, 8, 8000);
        assert_eq!(wave.len(), 8);
        assert_eq!(wave[0], 0.0);
        assert_relative_eq!(wave[2], 0.5, epsilon = 1e-12);
        assert_relative_eq!(wave[6], -0.5, epsilon = 1e-12);
    }
}
