// Spectral feature extraction
// Hann-windowed frame analysis, spectral centroid, and spectral flatness

use realfft::RealFftPlanner;

use crate::features::{ExtractorError, FeatureMatrix, FrameParams};

/// Floor applied to power values before logarithms
const POWER_FLOOR: f32 = 1e-10;

/// Spectral centroid per frame (center of mass of the magnitude spectrum, Hz)
///
/// Output shape is 1 x n_frames; a signal shorter than one window produces an
/// empty matrix.
pub fn spectral_centroid(
    samples: &[f32],
    params: &FrameParams,
) -> Result<FeatureMatrix, ExtractorError> {
    let spectra = magnitude_frames(samples, params);
    if spectra.is_empty() {
        return Ok(FeatureMatrix::empty());
    }

    let bin_width = params.sr as f32 / params.n_fft as f32;
    let row = spectra
        .iter()
        .map(|spectrum| {
            let mut weighted_sum = 0.0;
            let mut total_magnitude = 0.0;

            for (bin, &magnitude) in spectrum.iter().enumerate() {
                weighted_sum += bin as f32 * bin_width * magnitude;
                total_magnitude += magnitude;
            }

            if total_magnitude > 0.0 {
                weighted_sum / total_magnitude
            } else {
                0.0
            }
        })
        .collect();

    Ok(FeatureMatrix::from_rows(vec![row]))
}

/// Spectral flatness per frame (geometric over arithmetic mean of the power
/// spectrum; near 1.0 for noise, near 0.0 for tonal content)
///
/// Output shape is 1 x n_frames; a signal shorter than one window produces an
/// empty matrix.
pub fn spectral_flatness(
    samples: &[f32],
    params: &FrameParams,
) -> Result<FeatureMatrix, ExtractorError> {
    let spectra = magnitude_frames(samples, params);
    if spectra.is_empty() {
        return Ok(FeatureMatrix::empty());
    }

    let row = spectra
        .iter()
        .map(|spectrum| {
            let mut log_sum = 0.0;
            let mut sum = 0.0;

            for &magnitude in spectrum {
                let power = (magnitude * magnitude).max(POWER_FLOOR);
                log_sum += power.ln();
                sum += power;
            }

            let count = spectrum.len() as f32;
            (log_sum / count).exp() / (sum / count)
        })
        .collect();

    Ok(FeatureMatrix::from_rows(vec![row]))
}

/// Split samples into hop-advanced Hann windows and return one magnitude
/// spectrum of n_fft/2 + 1 bins per frame
///
/// Windows of `win_length` samples are zero-padded up to `n_fft` before the
/// FFT. Returns no frames when the signal is shorter than one window.
pub(crate) fn magnitude_frames(samples: &[f32], params: &FrameParams) -> Vec<Vec<f32>> {
    let win_length = params.win_length.min(params.n_fft);
    let hop_length = params.hop_length;

    if win_length == 0 || hop_length == 0 || samples.len() < win_length {
        return Vec::new();
    }

    let num_frames = (samples.len() - win_length) / hop_length + 1;

    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(params.n_fft);

    let mut frames = Vec::with_capacity(num_frames);

    for frame_idx in 0..num_frames {
        let start = frame_idx * hop_length;

        let mut input = fft.make_input_vec();
        input[..win_length].copy_from_slice(&samples[start..start + win_length]);
        apply_hann_window(&mut input[..win_length]);

        let mut spectrum = fft.make_output_vec();
        fft.process(&mut input, &mut spectrum).unwrap();

        frames.push(spectrum.iter().map(|c| c.norm()).collect());
    }

    frames
}

/// Apply a Hann window in place to reduce spectral leakage
fn apply_hann_window(samples: &mut [f32]) {
    let n = samples.len();
    if n == 0 {
        return;
    }

    for i in 0..n {
        let window_val = 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / n as f32).cos());
        samples[i] *= window_val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sr: u32, num_samples: usize) -> Vec<f32> {
        (0..num_samples)
            .map(|i| (i as f32 * freq * 2.0 * std::f32::consts::PI / sr as f32).sin())
            .collect()
    }

    // Deterministic noise-like signal, no rand dependency needed
    fn pseudo_noise(num_samples: usize) -> Vec<f32> {
        let mut state: u32 = 0x1234_5678;
        (0..num_samples)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 8) as f32 / 8_388_608.0 - 1.0
            })
            .collect()
    }

    #[test]
    fn test_hann_window_tapers_edges() {
        let mut samples = vec![1.0; 100];
        apply_hann_window(&mut samples);

        assert!(samples[0] < 0.1);
        assert!(samples[99] < 0.1);
        assert!(samples[50] > 0.9);
    }

    #[test]
    fn test_frame_count_arithmetic() {
        let params = FrameParams {
            sr: 8000,
            n_fft: 256,
            win_length: 256,
            hop_length: 128,
            ..FrameParams::default()
        };

        // 1024 samples, 256-sample windows every 128: (1024 - 256) / 128 + 1 = 7
        let frames = magnitude_frames(&vec![0.0; 1024], &params);
        assert_eq!(frames.len(), 7);
        assert_eq!(frames[0].len(), 129);
    }

    #[test]
    fn test_short_signal_yields_no_frames() {
        let params = FrameParams::default();
        let frames = magnitude_frames(&[0.0; 100], &params);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_centroid_tracks_sine_frequency() {
        let sr = 22050;
        let params = FrameParams {
            sr,
            ..FrameParams::default()
        };
        let samples = sine(440.0, sr, sr as usize);

        let matrix = spectral_centroid(&samples, &params).unwrap();

        assert_eq!(matrix.num_rows(), 1);
        let row = &matrix.rows()[0];
        assert!(!row.is_empty());
        let mean = row.iter().sum::<f32>() / row.len() as f32;
        assert!(
            (mean - 440.0).abs() < 50.0,
            "centroid {} too far from 440 Hz",
            mean
        );
    }

    #[test]
    fn test_centroid_orders_by_frequency() {
        let sr = 22050;
        let params = FrameParams {
            sr,
            ..FrameParams::default()
        };

        let low = spectral_centroid(&sine(220.0, sr, sr as usize), &params).unwrap();
        let high = spectral_centroid(&sine(1760.0, sr, sr as usize), &params).unwrap();

        assert!(low.rows()[0][0] < high.rows()[0][0]);
    }

    #[test]
    fn test_centroid_of_empty_signal() {
        let params = FrameParams::default();
        let matrix = spectral_centroid(&[], &params).unwrap();
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_flatness_separates_noise_from_tone() {
        let sr = 22050;
        let params = FrameParams {
            sr,
            ..FrameParams::default()
        };

        let tone = spectral_flatness(&sine(440.0, sr, sr as usize), &params).unwrap();
        let noise = spectral_flatness(&pseudo_noise(sr as usize), &params).unwrap();

        let tone_mean =
            tone.rows()[0].iter().sum::<f32>() / tone.rows()[0].len() as f32;
        let noise_mean =
            noise.rows()[0].iter().sum::<f32>() / noise.rows()[0].len() as f32;

        assert!(tone_mean < 0.05, "tone flatness {} too high", tone_mean);
        assert!(noise_mean > 0.2, "noise flatness {} too low", noise_mean);
        assert!(tone_mean < noise_mean);
    }

    #[test]
    fn test_flatness_shape() {
        let params = FrameParams {
            sr: 8000,
            n_fft: 256,
            win_length: 256,
            hop_length: 128,
            ..FrameParams::default()
        };

        let matrix = spectral_flatness(&vec![0.1; 1024], &params).unwrap();
        assert_eq!(matrix.num_rows(), 1);
        assert_eq!(matrix.num_cols(), 7);
    }
}
