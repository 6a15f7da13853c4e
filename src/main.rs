//! Audiofeat CLI - extract features from a directory of WAV files into CSV

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;

use audiofeat::features::{mfcc, spectral_centroid, spectral_flatness, Extractor, FrameParams};
use audiofeat::pipeline::{FeaturePipeline, PipelineError, CSV_EXTENSION};

#[derive(Parser, Debug)]
#[command(name = "audiofeat")]
#[command(version, about = "Batch audio feature extraction to CSV", long_about = None)]
struct Cli {
    /// Directory containing the input audio files
    input_dir: PathBuf,

    /// File extension filter; every file in the directory ending with this is loaded
    #[arg(short, long, default_value = ".wav")]
    extension: String,

    /// Resample inputs to this rate on load (default: detect from the first matching file)
    #[arg(short, long)]
    sample_rate: Option<u32>,

    /// Feature to extract
    #[arg(short, long, value_enum, default_value_t = Feature::Mfcc)]
    feature: Feature,

    /// Output layout: one file per input, or one shared file for the corpus
    #[arg(short, long, value_enum, default_value_t = Mode::PerInput)]
    mode: Mode,

    /// Destination directory for output files (created if absent)
    #[arg(short, long, default_value = "features")]
    output_dir: PathBuf,

    /// Base name for output files
    #[arg(short = 'n', long, default_value = "features")]
    name: String,

    /// JSON file with frame parameters; unspecified fields use the defaults
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// FFT size in samples
    #[arg(long)]
    n_fft: Option<usize>,

    /// Analysis window length in samples
    #[arg(long)]
    win_length: Option<usize>,

    /// Hop between consecutive windows in samples
    #[arg(long)]
    hop_length: Option<usize>,

    /// Number of MFCC coefficients
    #[arg(long)]
    n_mfcc: Option<usize>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Feature {
    Mfcc,
    Centroid,
    Flatness,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    PerInput,
    Shared,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let pipeline = FeaturePipeline::from_directory(&cli.input_dir, &cli.extension, cli.sample_rate)
        .with_context(|| format!("failed to load corpus from {}", cli.input_dir.display()))?;

    info!(
        "Corpus: {} file(s) at {} Hz",
        pipeline.corpus().len(),
        pipeline.corpus().sample_rate()
    );

    let params = frame_params(&cli, &pipeline)?;

    match cli.feature {
        Feature::Mfcc => run(&pipeline, &cli, mfcc, &params),
        Feature::Centroid => run(&pipeline, &cli, spectral_centroid, &params),
        Feature::Flatness => run(&pipeline, &cli, spectral_flatness, &params),
    }
    .context("extraction failed")?;

    info!("Done");
    Ok(())
}

fn frame_params(cli: &Cli, pipeline: &FeaturePipeline) -> Result<FrameParams> {
    let mut params = match &cli.params {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read params file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid params file {}", path.display()))?
        }
        None => FrameParams::default(),
    };

    // sr always follows the corpus; the remaining flags override file/defaults
    params.sr = pipeline.corpus().sample_rate();
    if let Some(n_fft) = cli.n_fft {
        params.n_fft = n_fft;
    }
    if let Some(win_length) = cli.win_length {
        params.win_length = win_length;
    }
    if let Some(hop_length) = cli.hop_length {
        params.hop_length = hop_length;
    }
    if let Some(n_mfcc) = cli.n_mfcc {
        params.n_mfcc = n_mfcc;
    }

    Ok(params)
}

fn run<E: Extractor>(
    pipeline: &FeaturePipeline,
    cli: &Cli,
    extractor: E,
    params: &FrameParams,
) -> Result<(), PipelineError> {
    match cli.mode {
        Mode::PerInput => pipeline.extract_one_to_one(
            &cli.output_dir,
            extractor,
            params,
            &cli.name,
            CSV_EXTENSION,
        ),
        Mode::Shared => pipeline.extract_all_to_one(
            &cli.output_dir,
            extractor,
            params,
            &cli.name,
            CSV_EXTENSION,
        ),
    }
}
