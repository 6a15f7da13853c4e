// MFCC extraction
// Log-mel filterbank energies followed by a DCT-II per analysis frame

use crate::features::spectral::magnitude_frames;
use crate::features::{ExtractorError, FeatureMatrix, FrameParams};

/// Floor applied to filterbank energies before the logarithm
const ENERGY_FLOOR: f32 = 1e-10;

/// Mel-frequency cepstral coefficients
///
/// Output shape is n_mfcc x n_frames (coefficients as rows, frames as
/// columns); a signal shorter than one window produces an empty matrix.
pub fn mfcc(samples: &[f32], params: &FrameParams) -> Result<FeatureMatrix, ExtractorError> {
    let spectra = magnitude_frames(samples, params);
    if spectra.is_empty() {
        return Ok(FeatureMatrix::empty());
    }

    let filterbank = mel_filterbank(params.sr, params.n_fft, params.n_mels);

    let mut rows: Vec<Vec<f32>> = (0..params.n_mfcc)
        .map(|_| Vec::with_capacity(spectra.len()))
        .collect();

    for spectrum in &spectra {
        let power: Vec<f32> = spectrum.iter().map(|m| m * m).collect();

        let log_energies: Vec<f32> = filterbank
            .iter()
            .map(|filter| {
                let energy: f32 = filter.iter().zip(&power).map(|(w, p)| w * p).sum();
                energy.max(ENERGY_FLOOR).ln()
            })
            .collect();

        let coeffs = dct_coefficients(&log_energies, params.n_mfcc);
        for (row, coeff) in rows.iter_mut().zip(coeffs) {
            row.push(coeff);
        }
    }

    Ok(FeatureMatrix::from_rows(rows))
}

/// Hz to mel (HTK convention)
fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Mel to Hz (HTK convention)
fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0_f32.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filterbank, n_mels filters over n_fft/2 + 1 bins
///
/// Filter centers are spaced evenly on the mel scale from 0 Hz to sr/2.
fn mel_filterbank(sample_rate: u32, n_fft: usize, n_mels: usize) -> Vec<Vec<f32>> {
    let n_bins = n_fft / 2 + 1;
    let max_mel = hz_to_mel(sample_rate as f32 / 2.0);

    // n_mels + 2 edge frequencies: each filter spans its two neighbors
    let edges: Vec<f32> = (0..n_mels + 2)
        .map(|i| mel_to_hz(max_mel * i as f32 / (n_mels + 1) as f32))
        .collect();

    let bin_width = sample_rate as f32 / n_fft as f32;
    let mut filterbank = Vec::with_capacity(n_mels);

    for m in 1..=n_mels {
        let (lower, center, upper) = (edges[m - 1], edges[m], edges[m + 1]);
        let mut filter = vec![0.0; n_bins];

        for (bin, weight) in filter.iter_mut().enumerate() {
            let freq = bin as f32 * bin_width;
            let value = if freq <= center {
                (freq - lower) / (center - lower)
            } else {
                (upper - freq) / (upper - center)
            };
            *weight = value.max(0.0);
        }

        filterbank.push(filter);
    }

    filterbank
}

/// Orthonormal DCT-II keeping the first n_mfcc coefficients
fn dct_coefficients(log_energies: &[f32], n_mfcc: usize) -> Vec<f32> {
    let n = log_energies.len() as f32;

    (0..n_mfcc)
        .map(|i| {
            let sum: f32 = log_energies
                .iter()
                .enumerate()
                .map(|(m, &energy)| {
                    energy * (std::f32::consts::PI * i as f32 * (m as f32 + 0.5) / n).cos()
                })
                .sum();

            let scale = if i == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            scale * sum
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sr: u32, num_samples: usize) -> Vec<f32> {
        (0..num_samples)
            .map(|i| (i as f32 * freq * 2.0 * std::f32::consts::PI / sr as f32).sin())
            .collect()
    }

    #[test]
    fn test_mfcc_shape() {
        let sr = 22050;
        let params = FrameParams {
            sr,
            ..FrameParams::default()
        };
        let samples = sine(440.0, sr, 8192);

        let matrix = mfcc(&samples, &params).unwrap();

        // (8192 - 2048) / 512 + 1 = 13 frames
        assert_eq!(matrix.num_rows(), 13);
        assert_eq!(matrix.num_cols(), 13);
    }

    #[test]
    fn test_mfcc_empty_signal() {
        let params = FrameParams::default();
        let matrix = mfcc(&[], &params).unwrap();
        assert!(matrix.is_empty());
    }

    #[test]
    fn test_first_coefficient_tracks_energy() {
        let sr = 22050;
        let params = FrameParams {
            sr,
            ..FrameParams::default()
        };

        let quiet: Vec<f32> = sine(440.0, sr, 8192).iter().map(|s| s * 0.01).collect();
        let loud = sine(440.0, sr, 8192);

        let quiet_mfcc = mfcc(&quiet, &params).unwrap();
        let loud_mfcc = mfcc(&loud, &params).unwrap();

        assert!(loud_mfcc.rows()[0][0] > quiet_mfcc.rows()[0][0]);
    }

    #[test]
    fn test_filterbank_shape_and_coverage() {
        let filterbank = mel_filterbank(22050, 2048, 40);

        assert_eq!(filterbank.len(), 40);
        assert_eq!(filterbank[0].len(), 1025);

        // Every filter carries some weight
        for filter in &filterbank {
            assert!(filter.iter().sum::<f32>() > 0.0);
        }
    }

    #[test]
    fn test_dct_constant_input_loads_only_first_coefficient() {
        let energies = vec![1.0; 16];
        let coeffs = dct_coefficients(&energies, 4);

        assert!(coeffs[0] > 0.0);
        for &c in &coeffs[1..] {
            assert!(c.abs() < 1e-5);
        }
    }
}
