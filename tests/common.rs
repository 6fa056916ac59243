#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

pub fn write_rgb_image(path: &Path, width: u32, height: u32, format: ImageFormat) {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 90])
    }))
    .save_with_format(path, format)
    .unwrap();
}

pub fn write_rgba_png(path: &Path, width: u32, height: u32) {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([10, 200, 30, 128])))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

/// Three real images and one text file in `dir`.
pub fn create_test_image_files(dir: &Path) -> Vec<PathBuf> {
    let jpg_file = dir.join("one.jpg");
    let png_file = dir.join("two.png");
    let bmp_file = dir.join("three.bmp");
    let txt_file = dir.join("notes.txt");

    write_rgb_image(&jpg_file, 64, 48, ImageFormat::Jpeg);
    write_rgb_image(&png_file, 48, 64, ImageFormat::Png);
    write_rgb_image(&bmp_file, 32, 32, ImageFormat::Bmp);
    File::create(&txt_file)
        .unwrap()
        .write_all(b"not an image")
        .unwrap();

    vec![jpg_file, png_file, bmp_file, txt_file]
}

pub fn create_nested_directory_structure(dir: &Path) -> PathBuf {
    let subdir = dir.join("subdir").join("deeper");
    fs::create_dir_all(&subdir).unwrap();

    write_rgb_image(&subdir.join("nested.png"), 20, 10, ImageFormat::Png);
    File::create(subdir.join("nested.txt"))
        .unwrap()
        .write_all(b"nested text")
        .unwrap();

    subdir
}

pub fn write_corrupt_image(path: &Path) {
    File::create(path)
        .unwrap()
        .write_all(b"fake image data")
        .unwrap();
}

/// Names of the `.mini.` outputs directly inside `dir`, sorted.
pub fn mini_outputs(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains(".mini."))
        .collect();
    names.sort();
    names
}
