//! Normalized image sample type

use crate::error::{Result, SonifyError};

/// Row-major image intensities in [0, 1]
///
/// Shape is `(height, width, channels)`; `channels` is 3 for RGB samples and
/// 1 for luminance samples. Produced once by the loader and read-only after.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSample {
    data: Vec<f64>,
    height: usize,
    width: usize,
    channels: usize,
}

impl ImageSample {
    /// Create a sample from row-major data
    ///
    /// # Errors
    /// * `InvalidParameter` - If the data length does not match the shape or a
    ///   value lies outside [0, 1]
    pub fn new(data: Vec<f64>, height: usize, width: usize, channels: usize) -> Result<Self> {
        if channels == 0 {
            return Err(SonifyError::invalid_parameter("channels", channels, ">= 1"));
        }
        let expected = height * width * channels;
        if data.len() != expected {
            return Err(SonifyError::invalid_parameter(
                "data",
                format!("{} values", data.len()),
                format!("{} values for {}x{}x{}", expected, height, width, channels),
            ));
        }
        if let Some(bad) = data.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(SonifyError::invalid_parameter("intensity", bad, "0.0 to 1.0"));
        }

        Ok(Self {
            data,
            height,
            width,
            channels,
        })
    }

    /// Build a single-channel sample from a function of `(row, col)`
    ///
    /// Values are clamped to [0, 1].
    pub fn from_fn(height: usize, width: usize, f: impl Fn(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(height * width);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col).clamp(0.0, 1.0));
            }
        }
        Self {
            data,
            height,
            width,
            channels: 1,
        }
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of channels per pixel
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `(height, width, channels)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height, self.width, self.channels)
    }

    /// Raw row-major values
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns true if the sample has no pixels
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Channel values of the pixel at `(row, col)`
    pub fn pixel(&self, row: usize, col: usize) -> Option<&[f64]> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let start = (row * self.width + col) * self.channels;
        Some(&self.data[start..start + self.channels])
    }

    /// Iterate over every pixel in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.channels)
    }

    /// Mean intensity over all channels of pixel column `col`
    pub fn column_mean(&self, col: usize) -> f64 {
        if col >= self.width || self.height == 0 {
            return 0.0;
        }
        let sum: f64 = (0..self.height)
            .filter_map(|row| self.pixel(row, col))
            .flat_map(|px| px.iter())
            .sum();
        sum / (self.height * self.channels) as f64
    }

    /// Mean intensity over all channels of row `row`
    pub fn row_mean(&self, row: usize) -> f64 {
        if row >= self.height || self.width == 0 {
            return 0.0;
        }
        let stride = self.width * self.channels;
        let slice = &self.data[row * stride..(row + 1) * stride];
        slice.iter().sum::<f64>() / stride as f64
    }

    /// Apply `f` to every value, clamping the result back into [0, 1]
    pub(crate) fn map_in_place(&mut self, f: impl Fn(f64) -> f64) {
        for v in self.data.iter_mut() {
            *v = f(*v).clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_validates_shape() {
        assert!(ImageSample::new(vec![0.0; 6], 1, 2, 3).is_ok());
        assert!(ImageSample::new(vec![0.0; 5], 1, 2, 3).is_err());
        assert!(ImageSample::new(vec![], 0, 0, 0).is_err());
    }

    #[test]
    fn test_new_validates_range() {
        assert!(ImageSample::new(vec![0.5, 1.5], 1, 2, 1).is_err());
        assert!(ImageSample::new(vec![-0.1, 0.5], 1, 2, 1).is_err());
    }

    #[test]
    fn test_pixel_access() {
        let sample = ImageSample::new(vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6], 1, 2, 3).unwrap();
        assert_eq!(sample.pixel(0, 1), Some(&[0.4, 0.5, 0.6][..]));
        assert_eq!(sample.pixel(1, 0), None);
        assert_eq!(sample.pixels().count(), 2);
    }

    #[test]
    fn test_row_and_column_means() {
        // 2 rows x 3 cols, value = col / 2
        let sample = ImageSample::from_fn(2, 3, |_, col| col as f64 / 2.0);
        assert_relative_eq!(sample.column_mean(0), 0.0);
        assert_relative_eq!(sample.column_mean(2), 1.0);
        assert_relative_eq!(sample.row_mean(0), 0.5);
        assert_relative_eq!(sample.row_mean(1), 0.5);
        assert_eq!(sample.column_mean(3), 0.0);
    }
}
