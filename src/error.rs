use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Invalid file name: {0}")]
    InvalidFileName(PathBuf),

    #[error("Failed to create output directory {0}: {1}")]
    DirectoryCreationFailed(PathBuf, #[source] std::io::Error),

    #[error("No image files found in {0}")]
    NoImageFilesFound(PathBuf),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
