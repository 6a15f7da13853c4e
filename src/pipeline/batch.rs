// Batch extraction pipeline
// Runs an extractor over a loaded corpus and writes feature matrices to CSV

use std::path::Path;

use crate::features::{Extractor, FrameParams};
use crate::pipeline::corpus::AudioCorpus;
use crate::pipeline::export;
use crate::pipeline::PipelineError;

/// Batch pipeline over a loaded audio corpus
///
/// Unifies directory loading, extraction, and CSV output behind two layouts:
/// one output file per input (`extract_one_to_one`) or a single shared output
/// file for the whole corpus (`extract_all_to_one`). The extractor is an
/// injected capability; the pipeline never inspects it.
pub struct FeaturePipeline {
    corpus: AudioCorpus,
}

impl FeaturePipeline {
    pub fn new(corpus: AudioCorpus) -> Self {
        FeaturePipeline { corpus }
    }

    /// Load a corpus and wrap it in a pipeline in one step
    pub fn from_directory(
        directory: &Path,
        extension: &str,
        sample_rate: Option<u32>,
    ) -> Result<Self, PipelineError> {
        Ok(FeaturePipeline {
            corpus: AudioCorpus::load(directory, extension, sample_rate)?,
        })
    }

    pub fn corpus(&self) -> &AudioCorpus {
        &self.corpus
    }

    /// Write one output file per corpus item
    ///
    /// Item i goes to `base_filename + i + output_extension` inside
    /// `destination_dir` (created if absent), truncating any existing file.
    /// Matrices are transposed before writing, so each output row is one
    /// analysis frame and each column one feature channel. Numbering mirrors
    /// load order.
    pub fn extract_one_to_one<E: Extractor>(
        &self,
        destination_dir: &Path,
        extractor: E,
        params: &FrameParams,
        base_filename: &str,
        output_extension: &str,
    ) -> Result<(), PipelineError> {
        export::check_output_extension(output_extension)?;
        export::materialize_dir(destination_dir)?;

        for (i, samples) in self.corpus.items().iter().enumerate() {
            let matrix = extractor
                .extract(samples, params)
                .map_err(PipelineError::Extraction)?;

            let path = destination_dir.join(format!("{}{}{}", base_filename, i, output_extension));
            export::write_matrix(&path, &matrix.transposed())?;
            log::debug!("Wrote {}", path.display());
        }

        log::info!(
            "Wrote {} per-input file(s) to {}",
            self.corpus.len(),
            destination_dir.display()
        );
        Ok(())
    }

    /// Append every corpus item's matrix into a single shared output file
    ///
    /// Matrices are written untransposed, one row block per item in load
    /// order, with no separator between blocks. The file is opened in append
    /// mode for every item, so repeated calls keep accumulating rows; callers
    /// wanting a clean rerun clear the destination themselves.
    pub fn extract_all_to_one<E: Extractor>(
        &self,
        destination_dir: &Path,
        extractor: E,
        params: &FrameParams,
        filename: &str,
        output_extension: &str,
    ) -> Result<(), PipelineError> {
        export::check_output_extension(output_extension)?;
        export::materialize_dir(destination_dir)?;

        let path = destination_dir.join(format!("{}{}", filename, output_extension));

        for samples in self.corpus.items() {
            let matrix = extractor
                .extract(samples, params)
                .map_err(PipelineError::Extraction)?;
            export::append_matrix(&path, &matrix)?;
        }

        log::info!(
            "Appended {} block(s) to {}",
            self.corpus.len(),
            path.display()
        );
        Ok(())
    }
}
