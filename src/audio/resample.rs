// Audio resampling
// One-shot sinc resampling of whole mono buffers

use rubato::{
    Resampler as RubatoResampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType,
    WindowFunction,
};

use crate::audio::loader::AudioError;

/// Whole-buffer sample-rate converter
pub struct Resampler;

impl Resampler {
    /// Resample a mono buffer from one sample rate to another
    pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioError> {
        if from_rate == to_rate || samples.is_empty() {
            return Ok(samples.to_vec());
        }

        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let mut resampler = SincFixedIn::<f32>::new(
            to_rate as f64 / from_rate as f64,
            2.0,
            params,
            samples.len(),
            1,
        )?;

        let input = vec![samples.to_vec()];
        let output = resampler.process(&input, None)?;

        Ok(output.into_iter().next().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_same_rate_is_identity() {
        let samples = vec![0.1, 0.2, 0.3, 0.4];
        let out = Resampler::resample(&samples, 44100, 44100).unwrap();
        assert_eq!(out, samples);
    }

    #[test]
    fn test_resample_empty_buffer() {
        let out = Resampler::resample(&[], 44100, 22050).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_resample_halves_length() {
        let samples: Vec<f32> = (0..44100)
            .map(|i| (i as f32 * 220.0 * 2.0 * std::f32::consts::PI / 44100.0).sin())
            .collect();

        let out = Resampler::resample(&samples, 44100, 22050).unwrap();

        let drift = out.len() as i64 - 22050;
        assert!(drift.abs() < 1000, "unexpected output length: {}", out.len());
    }
}
