// Audio decoding module
// WAV file loading, sample normalization, and resampling

pub mod loader;
pub mod resample;

pub use loader::{load, native_sample_rate, AudioData, AudioError};
pub use resample::Resampler;
