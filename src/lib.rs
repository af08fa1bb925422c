//! Sonify - Deterministic Image Sonification
//!
//! Sonify turns a still image into a fixed-length audio clip. Two strategies
//! are available:
//! 1. Palette - Dominant colors become enveloped, reverberated tones placed at
//!    random (seeded) offsets
//! 2. Column scan - Every pixel column becomes a sustained sine whose loudness
//!    follows the column's brightness
//!
//! # Architecture
//!
//! The pipeline runs leaf-first:
//! - `raster`: image loading and normalization to [0, 1]
//! - `mapping`: image → tone descriptors
//! - `dsp`: tone synthesis and reverb
//! - `engine`: compositing, quantization and WAV I/O

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod pipeline;
pub mod raster;

pub use config::{SonifyConfig, Strategy};
pub use error::{Result, SonifyError};
pub use pipeline::{RenderReport, Sonifier};
