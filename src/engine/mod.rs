//! Audio Engine Module
//!
//! Core rendering engine including:
//! - Waveform buffer management
//! - Tone compositing into the master buffer
//! - Quantization and WAV file I/O

pub mod buffer;
pub mod compositor;
pub mod io;

pub use buffer::{samples_for, Waveform, DEFAULT_SAMPLE_RATE};
pub use compositor::{Compositor, DEFAULT_FADE_SECS, DEFAULT_TONE_VOLUME, MAX_DURATION_SECS};
pub use io::{AudioClip, I16_PEAK};
