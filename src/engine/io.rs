//! Audio clip quantization and WAV file I/O
//!
//! The persisted artifact is always 16-bit signed PCM, mono. Normalization is
//! exact: the loudest sample of the master buffer becomes ±32767.

use std::io::Cursor;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::engine::buffer::Waveform;
use crate::error::{Result, SonifyError};

/// Largest representable 16-bit magnitude used for normalization
pub const I16_PEAK: f64 = 32767.0;

/// Quantized output clip: signed 16-bit mono samples plus sample rate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    /// Quantized sample data
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioClip {
    /// Normalize a master buffer to full 16-bit scale and quantize it
    ///
    /// # Errors
    /// * `EmptySignal` - If the buffer's peak is zero or not finite. Checked
    ///   before dividing, so a silent composite never yields a garbage clip.
    pub fn quantize(master: &Waveform) -> Result<Self> {
        let peak = master.checked_peak()?;
        let samples = master
            .samples
            .iter()
            .map(|&s| (s / peak * I16_PEAK).clamp(-I16_PEAK, I16_PEAK) as i16)
            .collect();

        Ok(Self {
            samples,
            sample_rate: master.sample_rate,
        })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the clip holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Maximum absolute sample value
    pub fn peak(&self) -> u16 {
        self.samples
            .iter()
            .map(|s| s.unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// Samples rescaled to [-1, 1] floats, for analysis
    pub fn to_f64(&self) -> Vec<f64> {
        self.samples.iter().map(|&s| s as f64 / I16_PEAK).collect()
    }

    /// WAV header description of this clip
    pub fn wav_spec(&self) -> WavSpec {
        WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    /// Encode the clip as an in-memory WAV file
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        let wrap = |source| SonifyError::AudioWrite {
            path: "<memory>".to_string(),
            source,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, self.wav_spec()).map_err(wrap)?;
            for &sample in &self.samples {
                writer.write_sample(sample).map_err(wrap)?;
            }
            writer.finalize().map_err(wrap)?;
        }

        Ok(cursor.into_inner())
    }

    /// Read a 16-bit mono PCM WAV file
    ///
    /// # Errors
    /// * `AudioRead` - If the file is missing, malformed, or not 16-bit mono PCM
    pub fn read_wav(path: &Path) -> Result<Self> {
        let wrap = |source| SonifyError::AudioRead {
            path: path.display().to_string(),
            source,
        };

        let reader = WavReader::open(path).map_err(wrap)?;
        let spec = reader.spec();
        if spec.channels != 1
            || spec.bits_per_sample != 16
            || spec.sample_format != SampleFormat::Int
        {
            return Err(wrap(hound::Error::Unsupported));
        }

        let samples = reader
            .into_samples::<i16>()
            .collect::<std::result::Result<Vec<i16>, _>>()
            .map_err(wrap)?;

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_quantize_peak_is_exact() {
        let master = Waveform::from_samples(vec![0.0, 0.013, -0.021, 0.007], 8000);
        let clip = AudioClip::quantize(&master).unwrap();
        assert_eq!(clip.peak(), 32767);
        assert_eq!(clip.samples[2], -32767);
    }

    #[test]
    fn test_quantize_silent_is_rejected() {
        let master = Waveform::silence(100, 8000);
        assert!(matches!(
            AudioClip::quantize(&master),
            Err(SonifyError::EmptySignal)
        ));
    }

    #[test]
    fn test_quantize_empty_is_rejected() {
        let master = Waveform::silence(0, 8000);
        assert!(matches!(
            AudioClip::quantize(&master),
            Err(SonifyError::EmptySignal)
        ));
    }

    #[test]
    fn test_write_and_read_wav() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.wav");

        let clip = AudioClip {
            samples: vec![0, 100, -32767, 32767, 5],
            sample_rate: 22050,
        };
        std::fs::write(&path, clip.to_wav_bytes().unwrap()).unwrap();

        let loaded = AudioClip::read_wav(&path).unwrap();
        assert_eq!(loaded, clip);
    }

    #[test]
    fn test_wav_bytes_header() {
        let clip = AudioClip {
            samples: vec![1, -2, 3, -4],
            sample_rate: 44100,
        };
        let bytes = clip.to_wav_bytes().unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        // 44-byte canonical header plus two bytes per sample
        assert_eq!(bytes.len(), 44 + 2 * clip.len());
    }

    #[test]
    fn test_read_missing_file() {
        let err = AudioClip::read_wav(Path::new("/nonexistent/clip.wav")).unwrap_err();
        assert_eq!(err.error_code(), "AUDIO_READ");
    }

    #[test]
    fn test_read_rejects_stereo() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.finalize().unwrap();

        assert!(AudioClip::read_wav(&path).is_err());
    }
}
