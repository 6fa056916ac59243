/// Target format handling
///
/// Format names arrive as free text from the command line or are derived from
/// the detected source format. Both paths resolve to a `TargetFormat`, which
/// owns the output extension used for naming and cleanup.
use crate::error::{ConvertError, Result};
use image::ImageFormat;
use std::fmt;
use std::str::FromStr;

/// Formats the converter can encode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    /// Lossy JPEG, alpha is dropped
    Jpeg,
    /// Lossless PNG, optimized with oxipng
    Png,
    /// WebP, lossy or lossless
    WebP,
    Gif,
    Bmp,
    Tiff,
}

impl TargetFormat {
    /// Returns the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "jpg",
            TargetFormat::Png => "png",
            TargetFormat::WebP => "webp",
            TargetFormat::Gif => "gif",
            TargetFormat::Bmp => "bmp",
            TargetFormat::Tiff => "tiff",
        }
    }

    /// Maps a detected source format onto an encodable target
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(TargetFormat::Jpeg),
            ImageFormat::Png => Some(TargetFormat::Png),
            ImageFormat::WebP => Some(TargetFormat::WebP),
            ImageFormat::Gif => Some(TargetFormat::Gif),
            ImageFormat::Bmp => Some(TargetFormat::Bmp),
            ImageFormat::Tiff => Some(TargetFormat::Tiff),
            _ => None,
        }
    }

    /// Whether the encoder makes use of the 0-100 quality value
    pub fn uses_quality(&self) -> bool {
        matches!(
            self,
            TargetFormat::Jpeg | TargetFormat::Png | TargetFormat::WebP
        )
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetFormat::Jpeg => "JPEG",
            TargetFormat::Png => "PNG",
            TargetFormat::WebP => "WebP",
            TargetFormat::Gif => "GIF",
            TargetFormat::Bmp => "BMP",
            TargetFormat::Tiff => "TIFF",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TargetFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(TargetFormat::Jpeg),
            "png" => Ok(TargetFormat::Png),
            "webp" => Ok(TargetFormat::WebP),
            "gif" => Ok(TargetFormat::Gif),
            "bmp" => Ok(TargetFormat::Bmp),
            "tiff" | "tif" => Ok(TargetFormat::Tiff),
            _ => Err(ConvertError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Extension a format name produces on disk.
///
/// Unknown names are kept as given (lowercased) so cleanup still compares
/// against what the user asked for.
pub fn normalized_extension(format: &str) -> String {
    format
        .parse::<TargetFormat>()
        .map(|f| f.extension().to_string())
        .unwrap_or_else(|_| format.trim().to_lowercase())
}
