use crate::discovery::is_prior_output;
use crate::error::Result;
use crate::formats::normalized_extension;
use crate::report;
use std::fs;
use std::path::{Path, PathBuf};

/// Removes stale `.mini.<ext>` outputs from `target_dir` before a run.
///
/// Only direct entries are examined. Without a target format nothing is
/// deleted. A file that cannot be removed is reported and skipped; failing
/// to list the directory is an error. Returns the deleted paths.
pub fn cleanup(target_dir: &Path, target_format: Option<&str>) -> Result<Vec<PathBuf>> {
    let Some(format) = target_format else {
        tracing::debug!("no target format given, skipping cleanup");
        return Ok(Vec::new());
    };

    if !target_dir.is_dir() {
        tracing::debug!(dir = %target_dir.display(), "cleanup directory does not exist yet");
        return Ok(Vec::new());
    }

    let extension = normalized_extension(format);
    let mut deleted = Vec::new();

    for entry in fs::read_dir(target_dir)? {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type()?.is_file() || !is_stale_output(&path, &extension) {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                report::report_deletion(&path);
                deleted.push(path);
            }
            Err(e) => report::report_deletion_failure(&path, &e),
        }
    }

    Ok(deleted)
}

fn is_stale_output(path: &Path, extension: &str) -> bool {
    is_prior_output(path)
        && path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(extension))
            .unwrap_or(false)
}
