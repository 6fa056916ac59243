use crate::cleanup::cleanup;
use crate::discovery::{discover, ImageFile};
use crate::error::{ConvertError, Result};
use crate::processing::{convert_file, ConversionOptions, ConversionResult};
use crate::report::{self, RunStatus};
use crate::utils::{calculate_compression_ratio, create_progress_bar};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// The file that stopped a run and why.
#[derive(Debug)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: ConvertError,
}

/// Counters for one run over the discovered files.
#[derive(Debug)]
pub struct RunSummary {
    pub found: usize,
    pub converted: usize,
    pub original_bytes: u64,
    pub output_bytes: u64,
    pub failure: Option<FailedFile>,
}

impl RunSummary {
    fn new(found: usize) -> Self {
        Self {
            found,
            converted: 0,
            original_bytes: 0,
            output_bytes: 0,
            failure: None,
        }
    }

    fn record(&mut self, result: &ConversionResult) {
        self.converted += 1;
        self.original_bytes += result.original_size;
        self.output_bytes += result.output_size;
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Runs the whole pipeline and reports the verdict.
///
/// An empty input tree is reported and mapped to `RunStatus::NoImagesFound`;
/// filesystem errors outside per-file conversion propagate.
pub fn run(input_dir: &Path, options: &ConversionOptions) -> Result<RunStatus> {
    match run_batch(input_dir, options) {
        Ok(summary) => Ok(report::report(summary.found, summary.is_success())),
        Err(ConvertError::NoImageFilesFound(dir)) => {
            report::report_no_images(&dir);
            Ok(report::report(0, false))
        }
        Err(e) => Err(e),
    }
}

/// cleanup -> discover -> convert.
///
/// Stale outputs are removed from the output directory, or from `input_dir`
/// when no output directory is configured. Nothing is written when no images
/// are found.
pub fn run_batch(input_dir: &Path, options: &ConversionOptions) -> Result<RunSummary> {
    let cleanup_dir = options.output_dir.as_deref().unwrap_or(input_dir);
    cleanup(cleanup_dir, options.format.as_deref())?;

    let image_files = discover(input_dir)?;
    if image_files.is_empty() {
        return Err(ConvertError::NoImageFilesFound(input_dir.to_path_buf()));
    }
    tracing::debug!(count = image_files.len(), "found image files to process");

    if let Some(output_dir) = &options.output_dir {
        fs::create_dir_all(output_dir)
            .map_err(|e| ConvertError::DirectoryCreationFailed(output_dir.clone(), e))?;
    }

    Ok(convert_all(&image_files, options))
}

/// Converts `files` in order, stopping at the first failure.
///
/// Files converted before the failure are kept; files after it are never
/// attempted.
pub fn convert_all(files: &[ImageFile], options: &ConversionOptions) -> RunSummary {
    convert_each(files, |path| convert_file(path, options))
}

fn convert_each<F>(files: &[ImageFile], mut convert: F) -> RunSummary
where
    F: FnMut(&Path) -> Result<ConversionResult>,
{
    let start_time = Instant::now();
    let progress = create_progress_bar(files.len() as u64);
    let mut summary = RunSummary::new(files.len());

    for file in files {
        progress.set_message(file.file_name());

        match convert(file.path()) {
            Ok(result) => {
                progress.suspend(|| report::report_conversion(&result));
                summary.record(&result);
                progress.inc(1);
            }
            Err(error) => {
                progress.suspend(|| report::report_failure(file.path(), &error));
                summary.failure = Some(FailedFile {
                    path: file.path().to_path_buf(),
                    error,
                });
                break;
            }
        }
    }

    progress.finish_and_clear();

    tracing::debug!(
        converted = summary.converted,
        found = summary.found,
        original_bytes = summary.original_bytes,
        output_bytes = summary.output_bytes,
        ratio = calculate_compression_ratio(summary.original_bytes, summary.output_bytes),
        elapsed = ?start_time.elapsed(),
        "run finished"
    );

    summary
}
