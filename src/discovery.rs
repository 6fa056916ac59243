use crate::constants::{MINI_MARKER, SUPPORTED_IMAGE_EXTENSIONS};
use crate::error::{ConvertError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A discovered input image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    path: PathBuf,
    extension: String,
}

impl ImageFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lowercased extension as found on disk.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Recursively collects the input images under `root`.
///
/// Traversal is depth-first with entries sorted by file name inside each
/// directory. Symlinked directories are not followed. Files already carrying
/// the `.mini.` marker are left out. Any read error propagates.
pub fn discover(root: &Path) -> Result<Vec<ImageFile>> {
    if !fs::metadata(root)?.is_dir() {
        return Err(ConvertError::NotADirectory(root.to_path_buf()));
    }

    let mut image_files = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();

        // Symlinks to files count, symlinks to directories do not.
        if !path.is_file() {
            continue;
        }

        if is_prior_output(path) {
            tracing::trace!(path = %path.display(), "skipping prior output");
            continue;
        }

        if let Some(extension) = image_extension(path) {
            tracing::debug!(path = %path.display(), "discovered image");
            image_files.push(ImageFile {
                path: path.to_path_buf(),
                extension,
            });
        }
    }

    Ok(image_files)
}

pub fn is_image_file(path: &Path) -> bool {
    image_extension(path).is_some()
}

/// Whether the file name marks the file as the output of an earlier run.
pub fn is_prior_output(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().contains(MINI_MARKER))
        .unwrap_or(false)
}

fn image_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(str::to_lowercase)
        .filter(|ext| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
