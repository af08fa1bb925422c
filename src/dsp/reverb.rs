//! Short convolution reverb
//!
//! A deliberately minimal spatial effect: the impulse response is a unit
//! impulse followed by a single soft echo one sample later. The reverb time
//! only sets the nominal response length; the zero tail is never stored. It is
//! not a room model.

use crate::engine::buffer::{samples_for, Waveform};
use crate::error::{Result, SonifyError};

/// Gain of the echo tap in the impulse response
pub const ECHO_GAIN: f64 = 0.15;

/// Default reverb time in seconds
pub const DEFAULT_REVERB_TIME: f64 = 0.3;

/// Length of the impulse response for `reverb_time` seconds at `sample_rate`
///
/// `round(reverb_time * sample_rate) + 1`, saturating for huge reverb times.
pub fn impulse_response_len(sample_rate: u32, reverb_time: f64) -> Result<usize> {
    if !(reverb_time.is_finite() && reverb_time >= 0.0) {
        return Err(SonifyError::invalid_parameter(
            "reverb_time",
            reverb_time,
            ">= 0 seconds",
        ));
    }
    Ok(samples_for(reverb_time, sample_rate).saturating_add(1))
}

/// Non-zero leading taps of the impulse response
///
/// Index 0 holds the dry signal, index 1 (when the response is longer than one
/// sample) the echo. Every later tap is zero and is never materialized.
pub fn impulse_taps(sample_rate: u32, reverb_time: f64) -> Result<&'static [f64]> {
    if impulse_response_len(sample_rate, reverb_time)? > 1 {
        Ok(&[1.0, ECHO_GAIN])
    } else {
        Ok(&[1.0])
    }
}

/// Linear convolution of `signal` with `kernel`, truncated to `signal.len()`
///
/// Equivalent to the first `signal.len()` samples of a full convolution.
/// Zero kernel taps are skipped, so long sparse responses stay cheap.
pub fn convolve_truncated(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let mut output = vec![0.0; signal.len()];

    for (lag, &tap) in kernel.iter().enumerate() {
        if tap == 0.0 || lag >= signal.len() {
            continue;
        }
        for (out, &x) in output[lag..].iter_mut().zip(signal) {
            *out += tap * x;
        }
    }

    output
}

/// Apply the reverb to a tone
///
/// The output always has exactly the same length as the input, whatever the
/// reverb time.
///
/// # Errors
/// * `InvalidParameter` - If `reverb_time` is negative or not finite
pub fn apply_reverb(wave: &Waveform, sample_rate: u32, reverb_time: f64) -> Result<Waveform> {
    let taps = impulse_taps(sample_rate, reverb_time)?;
    let samples = convolve_truncated(&wave.samples, taps);
    Ok(Waveform::from_samples(samples, wave.sample_rate))
}

// ============================================================================
// Tests
// ============================================================================
