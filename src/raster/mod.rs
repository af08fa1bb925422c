//! Image Loader/Normalizer
//!
//! Turns a raster file into a read-only [`ImageSample`] in [0, 1].

pub mod loader;
pub mod sample;

pub use loader::{
    highpass, load, normalize, scan_preprocess, ColorMode, LoadOptions, Tonemap,
    DEFAULT_CONTRAST_OFFSET, HIGHPASS_THRESHOLD,
};
pub use sample::ImageSample;
