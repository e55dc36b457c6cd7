//! Decoded audio with millisecond-based addressing.

use crate::error::{Result, TolkError};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use tempfile::NamedTempFile;

/// Sample rate the extractor normalizes to, in Hz.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Decoded mono PCM audio with a known duration.
///
/// Created by the extractor from a source media file; engines borrow it for
/// the duration of a run. When the waveform owns a backing temp file (the
/// extracted WAV), that file is removed exactly once, when the waveform is
/// dropped at the end of the run.
pub struct Waveform {
    samples: Vec<i16>,
    sample_rate: u32,
    _backing: Option<NamedTempFile>,
}

impl Waveform {
    /// Wrap already-decoded mono samples. No backing file is attached.
    pub fn from_samples(samples: Vec<i16>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(TolkError::Audio("sample rate must be positive".to_string()));
        }

        Ok(Self {
            samples,
            sample_rate,
            _backing: None,
        })
    }

    /// Load a mono 16-bit WAV file into memory.
    pub fn from_wav_file(path: &Path) -> Result<Self> {
        let mut reader = WavReader::open(path)?;
        let spec = reader.spec();

        if spec.channels != 1 {
            return Err(TolkError::Audio(format!(
                "expected mono WAV (1 channel), got {} channels",
                spec.channels
            )));
        }

        let samples = reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Self::from_samples(samples, spec.sample_rate)
    }

    /// Attach the temp file backing this waveform so it lives as long as the
    /// waveform and is deleted when it drops.
    pub(crate) fn with_backing(mut self, backing: NamedTempFile) -> Self {
        self._backing = Some(backing);
        self
    }

    /// Total duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Borrow the samples in `[start_ms, end_ms)`, clamped to the waveform.
    pub fn slice(&self, start_ms: u64, end_ms: u64) -> &[i16] {
        let start = self.sample_index(start_ms);
        let end = self.sample_index(end_ms).max(start);
        &self.samples[start..end]
    }

    /// Write the samples in `[start_ms, end_ms)` as a standalone mono WAV.
    pub fn export_range(&self, path: &Path, start_ms: u64, end_ms: u64) -> Result<()> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::create(path, spec)?;
        for &sample in self.slice(start_ms, end_ms) {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;

        Ok(())
    }

    /// All samples normalized to `f32` in `[-1.0, 1.0]`, the format ASR
    /// backends expect.
    pub fn to_f32(&self) -> Vec<f32> {
        self.samples
            .iter()
            .map(|&s| s as f32 / i16::MAX as f32)
            .collect()
    }

    fn sample_index(&self, ms: u64) -> usize {
        let index = (ms as u128 * self.sample_rate as u128 / 1000) as usize;
        index.min(self.samples.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waveform_of_ms(ms: u64) -> Waveform {
        let count = (ms * TARGET_SAMPLE_RATE as u64 / 1000) as usize;
        let samples = (0..count).map(|i| (i % 100) as i16).collect();
        Waveform::from_samples(samples, TARGET_SAMPLE_RATE).unwrap()
    }

    #[test]
    fn test_duration_from_sample_count() {
        assert_eq!(waveform_of_ms(0).duration_ms(), 0);
        assert_eq!(waveform_of_ms(1_000).duration_ms(), 1_000);
        assert_eq!(waveform_of_ms(40_000).duration_ms(), 40_000);
    }

    #[test]
    fn test_rejects_zero_sample_rate() {
        assert!(Waveform::from_samples(vec![0; 16], 0).is_err());
    }

    #[test]
    fn test_slice_addresses_by_milliseconds() {
        let waveform = waveform_of_ms(2_000);

        assert_eq!(waveform.slice(0, 1_000).len(), 16_000);
        assert_eq!(waveform.slice(500, 1_500).len(), 16_000);
        assert_eq!(waveform.slice(1_000, 1_000).len(), 0);
    }

    #[test]
    fn test_slice_clamps_past_end() {
        let waveform = waveform_of_ms(1_000);

        assert_eq!(waveform.slice(500, 10_000).len(), 8_000);
        assert_eq!(waveform.slice(5_000, 10_000).len(), 0);
    }

    #[test]
    fn test_adjacent_slices_cover_all_samples() {
        let waveform = waveform_of_ms(2_500);

        let total: usize = [(0, 1_000), (1_000, 2_000), (2_000, 2_500)]
            .iter()
            .map(|&(s, e)| waveform.slice(s, e).len())
            .sum();
        assert_eq!(total, 2_500 * 16);
    }

    #[test]
    fn test_export_range_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("range.wav");

        let waveform = waveform_of_ms(1_000);
        waveform.export_range(&path, 250, 750).unwrap();

        let reloaded = Waveform::from_wav_file(&path).unwrap();
        assert_eq!(reloaded.sample_rate(), TARGET_SAMPLE_RATE);
        assert_eq!(reloaded.duration_ms(), 500);
        assert_eq!(reloaded.slice(0, 500), waveform.slice(250, 750));
    }

    #[test]
    fn test_rejects_stereo_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");

        let spec = WavSpec {
            channels: 2,
            sample_rate: TARGET_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for _ in 0..64 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        assert!(Waveform::from_wav_file(&path).is_err());
    }

    #[test]
    fn test_to_f32_normalizes() {
        let waveform =
            Waveform::from_samples(vec![0, i16::MAX, -i16::MAX], TARGET_SAMPLE_RATE).unwrap();

        let normalized = waveform.to_f32();
        assert_eq!(normalized, vec![0.0, 1.0, -1.0]);
    }
}
