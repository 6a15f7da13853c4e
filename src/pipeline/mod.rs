// Pipeline module
// Corpus loading, CSV export, and the batch extraction pipeline

pub mod batch;
pub mod corpus;
pub mod export;

pub use batch::FeaturePipeline;
pub use corpus::{AudioCorpus, WAV_EXTENSION};
pub use export::CSV_EXTENSION;

use thiserror::Error;

use crate::audio::AudioError;
use crate::features::ExtractorError;

/// Errors surfaced by corpus loading and extraction runs
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Sample rate was neither supplied nor detectable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Output extension other than the supported CSV format
    #[error("Unsupported output format: {0}")]
    UnsupportedOutputFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Extractor failure, surfaced unchanged
    #[error("{0}")]
    Extraction(ExtractorError),
}
