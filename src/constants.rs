/// Infix that marks a file as the output of a previous run.
pub const MINI_MARKER: &str = ".mini.";

/// Extensions (lowercase) picked up by discovery.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "svg", "tiff", "jp2",
];

pub const DEFAULT_QUALITY_THRESHOLD: f64 = 0.7;
pub const MIN_QUALITY_THRESHOLD: f64 = 0.0;
pub const MAX_QUALITY_THRESHOLD: f64 = 1.0;

// PNG output tuning, selected by the 0-100 quality value
pub const PNG_OPTIMIZATION_PRESET: u8 = 4;
pub const ZOPFLI_QUALITY_THRESHOLD: u8 = 90;
pub const HIGH_COMPRESSION_QUALITY_THRESHOLD: u8 = 70;
pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;

// libwebp's default effort for lossless output
pub const WEBP_LOSSLESS_EFFORT: f32 = 75.0;

pub const BYTES_PER_KB: f64 = 1024.0;

pub const PROGRESS_BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";
pub const PROGRESS_BAR_CHARS: &str = "=>-";

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️ ";
pub const ERROR_PREFIX: &str = "❌";
pub const DELETE_PREFIX: &str = "🗑️ ";
pub const CONVERT_PREFIX: &str = "🗜️ ";
