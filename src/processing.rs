use crate::constants::{
    HIGH_COMPRESSION_QUALITY_THRESHOLD, LIBDEFLATER_HIGH_LEVEL, LIBDEFLATER_LOW_LEVEL,
    MINI_MARKER, PNG_OPTIMIZATION_PRESET, WEBP_LOSSLESS_EFFORT, ZOPFLI_ITERATIONS,
    ZOPFLI_QUALITY_THRESHOLD,
};
use crate::error::{ConvertError, Result};
use crate::formats::TargetFormat;
use crate::quality::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use oxipng::{Deflaters, Options};
use std::fs;
use std::io::{Cursor, Write};
use std::num::NonZeroU8;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Resolved run configuration, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct ConversionOptions {
    pub output_dir: Option<PathBuf>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<String>,
    pub quality: Quality,
}

impl ConversionOptions {
    pub fn new(
        output_dir: Option<PathBuf>,
        width: Option<u32>,
        height: Option<u32>,
        format: Option<String>,
        quality: Option<&str>,
    ) -> Self {
        Self {
            output_dir,
            width,
            height,
            format,
            quality: Quality::parse(quality),
        }
    }

    /// Bounding box for a source of the given size; unset sides keep the
    /// source dimension.
    pub fn target_box(&self, (width, height): (u32, u32)) -> (u32, u32) {
        (self.width.unwrap_or(width), self.height.unwrap_or(height))
    }

    /// The requested format, or the source's own format when none was given.
    pub fn resolve_format(&self, source: ImageFormat) -> Result<TargetFormat> {
        match &self.format {
            Some(name) => name.parse(),
            None => TargetFormat::from_image_format(source)
                .ok_or_else(|| ConvertError::UnsupportedFormat(format!("{:?}", source))),
        }
    }
}

/// Outcome of converting one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub input_path: PathBuf,
    pub original_dimensions: (u32, u32),
    pub original_size: u64,
    pub output_path: PathBuf,
    pub output_dimensions: (u32, u32),
    pub output_size: u64,
}

/// A decoded input together with what was learned while reading it.
pub struct SourceImage {
    pub image: DynamicImage,
    pub format: ImageFormat,
    pub file_size: u64,
}

/// Converts a single file: load -> resize -> normalize -> encode -> write.
///
/// Returns the before/after statistics, read back from the written file.
pub fn convert_file(input_path: &Path, options: &ConversionOptions) -> Result<ConversionResult> {
    let SourceImage {
        mut image,
        format: source_format,
        file_size: original_size,
    } = load_source(input_path)?;
    let original_dimensions = image.dimensions();

    let (width, height) = options.target_box(original_dimensions);
    let target_format = options.resolve_format(source_format)?;
    tracing::debug!(
        input = %input_path.display(),
        width,
        height,
        format = %target_format,
        quality = options.quality.value(),
        quality_applied = target_format.uses_quality(),
        lossless = options.quality.is_lossless(),
        "resolved conversion settings"
    );

    resize_to_fit(&mut image, width, height);
    let intermediate = to_lossless_intermediate(&image)?;
    let encoded = encode_target(&intermediate, target_format, options.quality)?;

    let output_path = output_path_for(input_path, options.output_dir.as_deref(), target_format)?;
    write_output(&output_path, &encoded)?;

    let output_size = fs::metadata(&output_path)?.len();
    let output_dimensions = image::image_dimensions(&output_path)?;

    Ok(ConversionResult {
        input_path: input_path.to_path_buf(),
        original_dimensions,
        original_size,
        output_path,
        output_dimensions,
        output_size,
    })
}

/// Reads and decodes an image, detecting the format from its content.
pub fn load_source(input_path: &Path) -> Result<SourceImage> {
    let file_size = fs::metadata(input_path)?.len();

    let reader = ImageReader::open(input_path)?.with_guessed_format()?;
    let format = reader.format().ok_or_else(|| {
        ConvertError::UnsupportedFormat(format!("unrecognized image data in {}", input_path.display()))
    })?;
    let image = reader.decode()?;

    Ok(SourceImage {
        image,
        format,
        file_size,
    })
}

/// Fits the image inside `width` x `height`, preserving aspect ratio.
///
/// Leaves the image untouched when it already has exactly those dimensions.
pub fn resize_image(img: &mut DynamicImage, options: &ConversionOptions) {
    let (width, height) = options.target_box(img.dimensions());
    resize_to_fit(img, width, height);
}

pub fn resize_to_fit(img: &mut DynamicImage, width: u32, height: u32) {
    if img.dimensions() == (width, height) {
        return;
    }
    *img = img.resize(width, height, FilterType::Lanczos3);
}

/// Round-trips the image through uncompressed 8-bit PNG.
///
/// Normalizes the pixel layout to RGB8 or RGBA8 so every target encoder
/// receives a color type it accepts.
pub fn to_lossless_intermediate(img: &DynamicImage) -> Result<DynamicImage> {
    let normalized = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };

    let mut buffer = Cursor::new(Vec::new());
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Fast, PngFilterType::NoFilter);
    normalized.write_with_encoder(encoder)?;

    Ok(image::load_from_memory_with_format(
        buffer.get_ref(),
        ImageFormat::Png,
    )?)
}

/// Encodes into the target format.
///
/// JPEG and WebP take the quality value, and PNG uses it to pick a deflate
/// strategy. GIF, BMP and TIFF ignore both quality and the lossless flag.
pub fn encode_target(img: &DynamicImage, format: TargetFormat, quality: Quality) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());

    match format {
        TargetFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            // The JPEG encoder's scale starts at 1.
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.value().max(1));
            rgb.write_with_encoder(encoder)?;
        }
        TargetFormat::Png => {
            img.write_with_encoder(PngEncoder::new(&mut buffer))?;
            return optimize_png(buffer.get_ref(), quality);
        }
        TargetFormat::WebP => {
            let rgba = img.to_rgba8();
            let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
            // In lossless mode the quality argument is compression effort.
            let factor = if quality.is_lossless() {
                WEBP_LOSSLESS_EFFORT
            } else {
                f32::from(quality.value())
            };
            let encoded = encoder
                .encode_simple(quality.is_lossless(), factor)
                .map_err(|e| ConvertError::Encoding(format!("WebP: {:?}", e)))?;
            return Ok(encoded.to_vec());
        }
        TargetFormat::Gif => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut buffer, ImageFormat::Gif)?;
        }
        TargetFormat::Bmp => {
            img.write_to(&mut buffer, ImageFormat::Bmp)?;
        }
        TargetFormat::Tiff => {
            img.write_to(&mut buffer, ImageFormat::Tiff)?;
        }
    }

    Ok(buffer.into_inner())
}

fn optimize_png(png: &[u8], quality: Quality) -> Result<Vec<u8>> {
    let mut options = Options::from_preset(PNG_OPTIMIZATION_PRESET);
    options.deflate = png_deflater(quality);

    oxipng::optimize_from_memory(png, &options)
        .map_err(|e| ConvertError::PngOptimization(e.to_string()))
}

fn png_deflater(quality: Quality) -> Deflaters {
    let value = quality.value();
    if value >= ZOPFLI_QUALITY_THRESHOLD {
        if let Some(iterations) = NonZeroU8::new(ZOPFLI_ITERATIONS) {
            return Deflaters::Zopfli { iterations };
        }
    }

    let compression = if value >= HIGH_COMPRESSION_QUALITY_THRESHOLD {
        LIBDEFLATER_HIGH_LEVEL
    } else {
        LIBDEFLATER_LOW_LEVEL
    };
    Deflaters::Libdeflater { compression }
}

/// `<dir>/<stem>.mini.<ext>`, where `<dir>` is the output directory if set
/// and the input's own directory otherwise.
pub fn output_path_for(
    input_path: &Path,
    output_dir: Option<&Path>,
    format: TargetFormat,
) -> Result<PathBuf> {
    let file_stem = input_path
        .file_stem()
        .ok_or_else(|| ConvertError::InvalidFileName(input_path.to_path_buf()))?;

    let output_filename = format!(
        "{}{}{}",
        file_stem.to_string_lossy(),
        MINI_MARKER,
        format.extension()
    );

    Ok(match output_dir {
        Some(dir) => dir.join(output_filename),
        None => input_path.with_file_name(output_filename),
    })
}

/// Writes `bytes` to `output_path`, replacing any existing file.
///
/// The data goes to a temporary file in the same directory first, so a
/// failed write never leaves a truncated output behind.
pub fn write_output(output_path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent)?;
    // Temporary files are created owner-only.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.persist(output_path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    #[test]
    fn test_conversion_options_defaults() {
        let options = ConversionOptions::new(None, None, None, None, None);
        assert_eq!(options.output_dir, None);
        assert_eq!(options.quality.value(), 70);
        assert_eq!(options.target_box((640, 480)), (640, 480));
    }

    #[test]
    fn test_target_box_single_side() {
        let options = ConversionOptions::new(None, Some(800), None, None, None);
        assert_eq!(options.target_box((2000, 1500)), (800, 1500));

        let options = ConversionOptions::new(None, None, Some(600), None, None);
        assert_eq!(options.target_box((2000, 1500)), (2000, 600));
    }

    #[test]
    fn test_resolve_format() {
        let options = ConversionOptions::default();
        assert_eq!(
            options.resolve_format(ImageFormat::Png).unwrap(),
            TargetFormat::Png
        );
        assert!(matches!(
            options.resolve_format(ImageFormat::Ico),
            Err(ConvertError::UnsupportedFormat(_))
        ));

        let options = ConversionOptions::new(None, None, None, Some("jpeg".to_string()), None);
        assert_eq!(
            options.resolve_format(ImageFormat::Png).unwrap(),
            TargetFormat::Jpeg
        );

        let options = ConversionOptions::new(None, None, None, Some("jp2".to_string()), None);
        assert!(options.resolve_format(ImageFormat::Png).is_err());
    }

    #[test]
    fn test_resize_to_fit_both_dimensions() {
        let mut img = DynamicImage::new_rgb8(2000, 1500);
        resize_to_fit(&mut img, 800, 600);
        assert_eq!(img.dimensions(), (800, 600));
    }

    #[test]
    fn test_resize_to_fit_preserves_aspect_ratio() {
        let mut img = DynamicImage::new_rgb8(1000, 500);
        resize_to_fit(&mut img, 800, 600);
        assert_eq!(img.dimensions(), (800, 400));
    }

    #[test]
    fn test_resize_image_width_only() {
        let mut img = DynamicImage::new_rgb8(2000, 1500);
        let options = ConversionOptions::new(None, Some(1000), None, None, None);

        resize_image(&mut img, &options);

        assert_eq!(img.dimensions(), (1000, 750));
    }

    #[test]
    fn test_resize_image_width_larger_than_source_keeps_size() {
        let mut img = DynamicImage::new_rgb8(400, 300);
        let options = ConversionOptions::new(None, Some(800), None, None, None);

        resize_image(&mut img, &options);

        assert_eq!(img.dimensions(), (400, 300));
    }

    #[test]
    fn test_resize_image_no_dimensions() {
        let mut img = DynamicImage::new_rgb8(2000, 1500);
        resize_image(&mut img, &ConversionOptions::default());
        assert_eq!(img.dimensions(), (2000, 1500));
    }

    #[test]
    fn test_intermediate_normalizes_color_type() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 4])));
        let intermediate = to_lossless_intermediate(&rgba).unwrap();
        assert_eq!(intermediate.color(), image::ColorType::Rgba8);
        assert_eq!(intermediate.to_rgba8(), rgba.to_rgba8());

        let gray16 = DynamicImage::new_luma16(4, 4);
        let intermediate = to_lossless_intermediate(&gray16).unwrap();
        assert_eq!(intermediate.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_encode_target_every_format() {
        let img = to_lossless_intermediate(&gradient(32, 24)).unwrap();

        for (format, expected) in [
            (TargetFormat::Jpeg, ImageFormat::Jpeg),
            (TargetFormat::Png, ImageFormat::Png),
            (TargetFormat::WebP, ImageFormat::WebP),
            (TargetFormat::Gif, ImageFormat::Gif),
            (TargetFormat::Bmp, ImageFormat::Bmp),
            (TargetFormat::Tiff, ImageFormat::Tiff),
        ] {
            let bytes = encode_target(&img, format, Quality::default()).unwrap();
            assert_eq!(image::guess_format(&bytes).unwrap(), expected, "{format}");
        }
    }

    #[test]
    fn test_lossless_flag_accepted_by_every_format() {
        let img = to_lossless_intermediate(&gradient(8, 8)).unwrap();
        let lossless = Quality::parse(Some("1"));

        for format in [
            TargetFormat::Jpeg,
            TargetFormat::Png,
            TargetFormat::WebP,
            TargetFormat::Gif,
            TargetFormat::Bmp,
            TargetFormat::Tiff,
        ] {
            assert!(encode_target(&img, format, lossless).is_ok(), "{format}");
        }
    }

    #[test]
    fn test_lossless_webp_preserves_pixels() {
        let img = to_lossless_intermediate(&gradient(16, 16)).unwrap();
        let bytes = encode_target(&img, TargetFormat::WebP, Quality::parse(Some("1"))).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.to_rgb8(), img.to_rgb8());
    }

    #[test]
    fn test_jpeg_quality_affects_size() {
        let img = to_lossless_intermediate(&gradient(128, 128)).unwrap();
        let low = encode_target(&img, TargetFormat::Jpeg, Quality::parse(Some("0.1"))).unwrap();
        let high = encode_target(&img, TargetFormat::Jpeg, Quality::parse(Some("0.95"))).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_png_deflater_selection() {
        assert!(matches!(
            png_deflater(Quality::parse(Some("1"))),
            Deflaters::Zopfli { .. }
        ));
        assert!(matches!(
            png_deflater(Quality::default()),
            Deflaters::Libdeflater {
                compression: LIBDEFLATER_HIGH_LEVEL
            }
        ));
        assert!(matches!(
            png_deflater(Quality::parse(Some("0.3"))),
            Deflaters::Libdeflater {
                compression: LIBDEFLATER_LOW_LEVEL
            }
        ));
    }

    #[test]
    fn test_output_path_beside_input() {
        let path = output_path_for(Path::new("/imgs/photo.png"), None, TargetFormat::Jpeg).unwrap();
        assert_eq!(path, PathBuf::from("/imgs/photo.mini.jpg"));
    }

    #[test]
    fn test_output_path_in_output_dir() {
        let path = output_path_for(
            Path::new("/imgs/nested/photo.png"),
            Some(Path::new("/out")),
            TargetFormat::Jpeg,
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/out/photo.mini.jpg"));
    }

    #[test]
    fn test_output_path_keeps_inner_dots() {
        let path = output_path_for(Path::new("a.b.webp"), None, TargetFormat::WebP).unwrap();
        assert_eq!(path, PathBuf::from("a.b.mini.webp"));
    }

    #[test]
    fn test_write_output_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.mini.png");
        fs::write(&path, b"old contents that are longer").unwrap();

        write_output(&path, b"new").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_convert_file_with_format_and_box() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("photo.png");
        gradient(200, 100).save(&input).unwrap();

        let options = ConversionOptions::new(
            None,
            Some(80),
            Some(60),
            Some("jpeg".to_string()),
            None,
        );
        let result = convert_file(&input, &options).unwrap();

        assert_eq!(result.original_dimensions, (200, 100));
        assert_eq!(result.output_dimensions, (80, 40));
        assert_eq!(result.output_path, temp_dir.path().join("photo.mini.jpg"));
        assert_eq!(result.output_size, fs::metadata(&result.output_path).unwrap().len());
        assert!(input.exists());
    }

    #[test]
    fn test_convert_file_keeps_source_format() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("photo.jpeg");
        gradient(40, 30).save_with_format(&input, ImageFormat::Jpeg).unwrap();

        let result = convert_file(&input, &ConversionOptions::default()).unwrap();

        assert_eq!(result.output_path, temp_dir.path().join("photo.mini.jpg"));
        assert_eq!(result.output_dimensions, (40, 30));
    }

    #[test]
    fn test_convert_file_rejects_corrupt_input() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("broken.png");
        fs::write(&input, b"not really a png").unwrap();

        let result = convert_file(&input, &ConversionOptions::default());

        assert!(result.is_err());
        assert!(!temp_dir.path().join("broken.mini.png").exists());
    }

    #[test]
    fn test_convert_file_oversized_webp_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("strip.png");
        gradient(16384, 2).save(&input).unwrap();

        let options = ConversionOptions::new(None, None, None, Some("webp".to_string()), None);
        let result = convert_file(&input, &options);

        assert!(matches!(result, Err(ConvertError::Encoding(_))));
        assert!(!temp_dir.path().join("strip.mini.webp").exists());
    }

    #[test]
    fn test_load_source_not_found() {
        let result = load_source(Path::new("nonexistent.jpg"));
        assert!(matches!(result, Err(ConvertError::Io(_))));
    }
}
