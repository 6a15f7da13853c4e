// Audio corpus loading
// Scans a directory, eagerly loads every matching file, resolves the sample rate

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::audio;
use crate::pipeline::PipelineError;

/// The audio extension the sample-rate probe understands
pub const WAV_EXTENSION: &str = ".wav";

/// Ordered collection of mono sample buffers loaded from one directory
///
/// Built once, eagerly, and immutable afterwards. Items keep the order the
/// directory enumeration produced them in; `paths` records the source file of
/// each item at the same index.
#[derive(Debug, Clone)]
pub struct AudioCorpus {
    items: Vec<Vec<f32>>,
    paths: Vec<PathBuf>,
    sample_rate: u32,
}

impl AudioCorpus {
    /// Load every file in `directory` whose name ends with `extension`
    ///
    /// With a supplied `sample_rate`, every file is resampled to it on load.
    /// Without one, the rate is probed from the first matching file's header
    /// and files load at their native rate; probing with no matching file is
    /// a configuration error. A missing directory with a supplied rate yields
    /// an empty corpus.
    pub fn load(
        directory: &Path,
        extension: &str,
        sample_rate: Option<u32>,
    ) -> Result<Self, PipelineError> {
        let matching = list_matching(directory, extension)?;

        let resolved_rate = match sample_rate {
            Some(rate) => rate,
            None if extension == WAV_EXTENSION => match matching.first() {
                Some(first) => audio::native_sample_rate(first)?,
                None => {
                    return Err(PipelineError::Configuration(format!(
                        "sample rate was not supplied and no {} file was found in {} to detect it from",
                        extension,
                        directory.display()
                    )))
                }
            },
            None => {
                return Err(PipelineError::Configuration(format!(
                    "sample rate must be supplied for {} corpora",
                    extension
                )))
            }
        };

        let mut items = Vec::with_capacity(matching.len());
        for path in &matching {
            // Resample only when the caller pinned a rate explicitly
            let loaded = audio::load(path, sample_rate)?;
            log::debug!(
                "Loaded {} ({} samples at {} Hz)",
                path.display(),
                loaded.samples.len(),
                loaded.sample_rate
            );
            items.push(loaded.samples);
        }

        log::info!(
            "Loaded {} file(s) from {} at {} Hz",
            items.len(),
            directory.display(),
            resolved_rate
        );

        Ok(AudioCorpus {
            items,
            paths: matching,
            sample_rate: resolved_rate,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sample buffers in load order
    pub fn items(&self) -> &[Vec<f32>] {
        &self.items
    }

    /// Source file of each item, at the same index
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Enumerate `directory` non-recursively and keep files whose name ends with
/// `extension`, in enumeration order; a missing directory yields no entries
fn list_matching(directory: &Path, extension: &str) -> Result<Vec<PathBuf>, PipelineError> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut matching = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(extension) {
            matching.push(entry.path());
        }
    }

    Ok(matching)
}
