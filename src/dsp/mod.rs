//! Synthesis and effects
//!
//! Tone generation and the short reverb applied to palette tones.

pub mod reverb;
pub mod tone;

pub use reverb::{apply_reverb, convolve_truncated, impulse_response_len, impulse_taps};
pub use tone::{hann_envelope, peak_bound, sustained_sine, synthesize};
