// CSV output for feature matrices
// Directory materialization plus overwrite- and append-mode row writers

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use crate::features::FeatureMatrix;
use crate::pipeline::PipelineError;

/// The only supported output extension
pub const CSV_EXTENSION: &str = ".csv";

/// Reject any output extension other than the supported CSV format
///
/// Runs before anything touches the filesystem, so an unsupported request
/// writes nothing.
pub(crate) fn check_output_extension(extension: &str) -> Result<(), PipelineError> {
    if extension == CSV_EXTENSION {
        Ok(())
    } else {
        Err(PipelineError::UnsupportedOutputFormat(extension.to_string()))
    }
}

/// Create the destination directory (single level) if it does not exist
///
/// Parent directories must already exist; a present directory is a no-op.
pub(crate) fn materialize_dir(directory: &Path) -> Result<(), PipelineError> {
    if directory.exists() {
        return Ok(());
    }
    fs::create_dir(directory)?;
    Ok(())
}

/// Write every matrix row as one CSV record, truncating any existing file
pub(crate) fn write_matrix(path: &Path, matrix: &FeatureMatrix) -> Result<(), PipelineError> {
    let file = File::create(path)?;
    write_rows(file, matrix)
}

/// Append every matrix row as CSV records at the end of the file, creating it
/// if absent
pub(crate) fn append_matrix(path: &Path, matrix: &FeatureMatrix) -> Result<(), PipelineError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    write_rows(file, matrix)
}

// The handle is scoped to this call: flushed here, closed on drop before the
// caller moves to the next item.
fn write_rows(file: File, matrix: &FeatureMatrix) -> Result<(), PipelineError> {
    let mut writer = csv::Writer::from_writer(file);

    for row in matrix.rows() {
        writer.serialize(row)?;
    }

    writer.flush()?;
    Ok(())
}
