use crate::constants::{BYTES_PER_KB, PROGRESS_BAR_CHARS, PROGRESS_BAR_TEMPLATE};
use crate::logger::is_quiet;
use indicatif::{ProgressBar, ProgressStyle};

/// Size in kilobytes with two decimals, e.g. `"12.34 KB"`.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / BYTES_PER_KB)
}

/// Calculate compression ratio as a percentage
///
/// Positive means the output is smaller, negative means it grew.
pub fn calculate_compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}

/// Progress bar for a run over `total` files, hidden in quiet mode.
pub fn create_progress_bar(total: u64) -> ProgressBar {
    if is_quiet() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
        pb.set_style(style.progress_chars(PROGRESS_BAR_CHARS));
    }
    pb
}
