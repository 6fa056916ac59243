//! Console reporting for a run: one line per converted or deleted file and a
//! final verdict that decides the process exit code.

use crate::constants::{CONVERT_PREFIX, DELETE_PREFIX, SUCCESS_PREFIX};
use crate::error::ConvertError;
use crate::processing::ConversionResult;
use crate::utils::format_kb;
use std::path::Path;
use std::process::ExitCode;

pub const COMPLETION_MESSAGE: &str = "All images processed.";

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `photo.png, 1024x768, 120.50 KB -> photo.mini.jpg, 800x600, 45.10 KB`
pub fn format_conversion(result: &ConversionResult) -> String {
    let (ow, oh) = result.original_dimensions;
    let (nw, nh) = result.output_dimensions;
    format!(
        "{}, {}x{}, {} -> {}, {}x{}, {}",
        display_name(&result.input_path),
        ow,
        oh,
        format_kb(result.original_size),
        display_name(&result.output_path),
        nw,
        nh,
        format_kb(result.output_size)
    )
}

pub fn report_conversion(result: &ConversionResult) {
    crate::info!("{} {}", CONVERT_PREFIX, format_conversion(result));
}

pub fn report_failure(path: &Path, error: &ConvertError) {
    crate::error!("Error processing {}: {}", display_name(path), error);
}

pub fn report_deletion(path: &Path) {
    crate::info!("{} Deleted: {}", DELETE_PREFIX, display_name(path));
}

pub fn report_deletion_failure(path: &Path, error: &std::io::Error) {
    crate::warn!("Could not delete {}: {}", display_name(path), error);
}

pub fn report_no_images(dir: &Path) {
    crate::error!("No image files found in {}", dir.display());
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Failed,
    NoImagesFound,
}

impl RunStatus {
    pub fn exit_code(self) -> ExitCode {
        match self {
            RunStatus::Completed => ExitCode::SUCCESS,
            RunStatus::Failed | RunStatus::NoImagesFound => ExitCode::FAILURE,
        }
    }
}

/// Final verdict for a run.
///
/// Zero discovered files and any failed conversion both exit non-zero; the
/// completion message is printed only when everything succeeded.
pub fn report(files_found: usize, success: bool) -> RunStatus {
    if files_found == 0 {
        return RunStatus::NoImagesFound;
    }

    if success {
        crate::info!("{} {}", SUCCESS_PREFIX, COMPLETION_MESSAGE);
        RunStatus::Completed
    } else {
        RunStatus::Failed
    }
}
