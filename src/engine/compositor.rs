//! Audio Compositor
//!
//! Owns the master buffer. Tones are accumulated into it strictly one after
//! another, then the buffer is normalized and quantized to 16-bit.

use log::{debug, info};

use crate::dsp::reverb::{apply_reverb, DEFAULT_REVERB_TIME};
use crate::dsp::tone::{synthesize, sustained_sine};
use crate::engine::buffer::{samples_for, Waveform, DEFAULT_SAMPLE_RATE};
use crate::engine::io::AudioClip;
use crate::error::{Result, SonifyError};
use crate::mapping::{Layout, ToneDescriptor};

/// Default volume of a placed tone's fundamental
pub const DEFAULT_TONE_VOLUME: f64 = 0.2;

/// Default fade-in/out length for continuous layouts, in seconds
pub const DEFAULT_FADE_SECS: f64 = 0.5;

/// Longest clip the compositor will allocate, in seconds
pub const MAX_DURATION_SECS: f64 = 3600.0;

/// Places or sums tones into a fixed-length clip
#[derive(Debug, Clone, PartialEq)]
pub struct Compositor {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Output length in seconds
    pub total_duration: f64,
    /// Fundamental volume of placed tones
    pub tone_volume: f64,
    /// Reverb time applied to placed tones
    pub reverb_time: f64,
    /// Fade length for continuous layouts
    pub fade_secs: f64,
}

impl Compositor {
    /// Create a compositor with default tone settings
    ///
    /// # Errors
    /// * `InvalidParameter` - If sample rate is zero or duration is outside
    ///   `(0, MAX_DURATION_SECS]`
    pub fn new(sample_rate: u32, total_duration: f64) -> Result<Self> {
        if sample_rate == 0 {
            return Err(SonifyError::invalid_parameter("sample_rate", sample_rate, "> 0 Hz"));
        }
        if !(total_duration > 0.0 && total_duration <= MAX_DURATION_SECS) {
            return Err(SonifyError::invalid_parameter(
                "total_duration",
                total_duration,
                format!("0 < seconds <= {}", MAX_DURATION_SECS),
            ));
        }

        Ok(Self {
            sample_rate,
            total_duration,
            tone_volume: DEFAULT_TONE_VOLUME,
            reverb_time: DEFAULT_REVERB_TIME,
            fade_secs: DEFAULT_FADE_SECS,
        })
    }

    /// Length of the master buffer in samples
    pub fn master_len(&self) -> usize {
        samples_for(self.total_duration, self.sample_rate)
    }

    /// Compose tones into a finished clip
    pub fn compose(&self, tones: &[ToneDescriptor], layout: Layout) -> Result<AudioClip> {
        let master = match layout {
            Layout::Placed => self.mix_placed(tones)?,
            Layout::Continuous => self.mix_continuous(tones)?,
        };
        let clip = AudioClip::quantize(&master)?;

        info!(
            "Composed {} tones ({:?}) into {:.2}s at {} Hz",
            tones.len(),
            layout,
            clip.duration(),
            clip.sample_rate
        );
        Ok(clip)
    }

    /// Synthesize, reverb and add each tone at its own offset
    ///
    /// A tone overflowing the end of the clip is truncated; nothing wraps.
    pub fn mix_placed(&self, tones: &[ToneDescriptor]) -> Result<Waveform> {
        let mut master = Waveform::silence(self.master_len(), self.sample_rate);

        for tone in tones {
            let wave = synthesize(
                tone.frequency,
                tone.duration,
                self.sample_rate,
                self.tone_volume * tone.amplitude_scale,
                tone.overtone_factor,
            )?;
            let wave = apply_reverb(&wave, self.sample_rate, self.reverb_time)?;

            let start = samples_for(tone.start_offset, self.sample_rate);
            let written = master.mix_in(start, &wave.samples);
            if written < wave.len() {
                debug!(
                    "Tone at {:.1} Hz truncated: {} of {} samples fit",
                    tone.frequency,
                    written,
                    wave.len()
                );
            }
        }

        Ok(master)
    }

    /// Sum full-length sines, peak-normalize, then fade in and out
    ///
    /// # Errors
    /// * `EmptySignal` - If the summed columns are silent
    pub fn mix_continuous(&self, tones: &[ToneDescriptor]) -> Result<Waveform> {
        let len = self.master_len();
        let mut master = Waveform::silence(len, self.sample_rate);

        for tone in tones {
            if !(tone.frequency.is_finite() && tone.frequency > 0.0) {
                return Err(SonifyError::invalid_parameter("frequency", tone.frequency, "> 0 Hz"));
            }
            if tone.amplitude_scale == 0.0 {
                continue;
            }
            let wave = sustained_sine(tone.frequency, tone.amplitude_scale, len, self.sample_rate);
            master.mix_in(0, &wave);
        }

        master.normalize_peak()?;
        master.apply_fades(samples_for(self.fade_secs, self.sample_rate));
        Ok(master)
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            total_duration: 7.0,
            tone_volume: DEFAULT_TONE_VOLUME,
            reverb_time: DEFAULT_REVERB_TIME,
            fade_secs: DEFAULT_FADE_SECS,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
