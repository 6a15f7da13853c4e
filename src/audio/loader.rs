// Audio file loading
// Reads WAV files from disk, normalizes samples to f32, and folds to mono

use hound::{SampleFormat, WavReader};
use std::path::Path;
use thiserror::Error;

use crate::audio::resample::Resampler;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Failed to read WAV file: {0}")]
    WavRead(#[from] hound::Error),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to construct resampler: {0}")]
    ResamplerConstruction(#[from] rubato::ResamplerConstructionError),

    #[error("Resampling failed: {0}")]
    Resample(#[from] rubato::ResampleError),
}

/// Decoded audio ready for feature extraction
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Mono samples normalized to f32 in range [-1.0, 1.0]
    pub samples: Vec<f32>,

    /// Sample rate in Hz after any resampling
    pub sample_rate: u32,
}

/// Read a file's native sample rate from its WAV header without decoding samples
pub fn native_sample_rate(path: &Path) -> Result<u32, AudioError> {
    let reader = WavReader::open(path)?;
    Ok(reader.spec().sample_rate)
}

/// Load a WAV file as normalized mono samples
///
/// When `target_rate` is given and differs from the file's native rate, the
/// samples are resampled to it; otherwise they are returned at the native rate.
pub fn load(path: &Path, target_rate: Option<u32>) -> Result<AudioData, AudioError> {
    let mut reader = WavReader::open(path)?;

    let spec = reader.spec();
    let native_rate = spec.sample_rate;
    let channels = spec.channels;

    // Read and normalize samples to f32 [-1.0, 1.0]
    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 8) => {
            // 8-bit PCM: unsigned, range [0, 255] -> [-1.0, 1.0]
            reader
                .samples::<i32>()
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .map(|s| (s as f32 - 128.0) / 128.0)
                .collect()
        }
        (SampleFormat::Int, 16) => {
            // 16-bit PCM: signed, range [-32768, 32767] -> [-1.0, 1.0]
            reader
                .samples::<i16>()
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .map(|s| s as f32 / 32768.0)
                .collect()
        }
        (SampleFormat::Int, 24) => {
            // 24-bit PCM: signed, range [-8388608, 8388607] -> [-1.0, 1.0]
            reader
                .samples::<i32>()
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .map(|s| s as f32 / 8388608.0)
                .collect()
        }
        (SampleFormat::Int, 32) => {
            // 32-bit PCM: signed, range [-2147483648, 2147483647] -> [-1.0, 1.0]
            reader
                .samples::<i32>()
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .map(|s| s as f32 / 2147483648.0)
                .collect()
        }
        (SampleFormat::Float, 32) => {
            // 32-bit float: already in [-1.0, 1.0] (typically)
            reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?
        }
        _ => {
            return Err(AudioError::UnsupportedFormat(format!(
                "{:?} {}-bit audio",
                spec.sample_format, spec.bits_per_sample
            )));
        }
    };

    let mono = fold_to_mono(&samples, channels);

    match target_rate {
        Some(rate) if rate != native_rate => {
            let resampled = Resampler::resample(&mono, native_rate, rate)?;
            Ok(AudioData {
                samples: resampled,
                sample_rate: rate,
            })
        }
        _ => Ok(AudioData {
            samples: mono,
            sample_rate: native_rate,
        }),
    }
}

/// Fold interleaved multi-channel samples to mono by averaging channels
fn fold_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }

    let channels = channels as usize;
    let frame_count = samples.len() / channels;
    let mut mono = Vec::with_capacity(frame_count);

    for frame_idx in 0..frame_count {
        let mut sum = 0.0;
        for ch in 0..channels {
            sum += samples[frame_idx * channels + ch];
        }
        mono.push(sum / channels as f32);
    }

    mono
}
