// Feature extraction module
// Frame parameters, the extractor capability, and built-in extractors

pub mod matrix;
pub mod mfcc;
pub mod spectral;

pub use matrix::FeatureMatrix;
pub use mfcc::mfcc;
pub use spectral::{spectral_centroid, spectral_flatness};

use serde::{Deserialize, Serialize};

/// Opaque error produced by an extractor
///
/// The pipeline never inspects extractor failures; they surface to the caller
/// unchanged.
pub type ExtractorError = Box<dyn std::error::Error + Send + Sync>;

/// Frame analysis parameters passed through to extractors
///
/// The pipeline does not validate these; each extractor reads the fields it
/// cares about and ignores the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameParams {
    /// Sample rate of the corpus in Hz
    pub sr: u32,

    /// FFT size in samples (windows are zero-padded up to this)
    pub n_fft: usize,

    /// Analysis window length in samples
    pub win_length: usize,

    /// Hop between consecutive windows in samples
    pub hop_length: usize,

    /// Number of MFCC coefficients to keep
    pub n_mfcc: usize,

    /// Number of mel filterbank bands
    pub n_mels: usize,
}

impl Default for FrameParams {
    fn default() -> Self {
        FrameParams {
            sr: 22050,
            n_fft: 2048,
            win_length: 2048,
            hop_length: 512,
            n_mfcc: 13,
            n_mels: 40,
        }
    }
}

/// Capability mapping a sample buffer to a 2-D feature matrix
pub trait Extractor {
    fn extract(&self, samples: &[f32], params: &FrameParams)
        -> Result<FeatureMatrix, ExtractorError>;
}

impl<F> Extractor for F
where
    F: Fn(&[f32], &FrameParams) -> Result<FeatureMatrix, ExtractorError>,
{
    fn extract(
        &self,
        samples: &[f32],
        params: &FrameParams,
    ) -> Result<FeatureMatrix, ExtractorError> {
        self(samples, params)
    }
}
