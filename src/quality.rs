use crate::constants::{DEFAULT_QUALITY_THRESHOLD, MAX_QUALITY_THRESHOLD, MIN_QUALITY_THRESHOLD};

/// Quality threshold in `[0, 1]` and the encoder settings derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quality {
    threshold: f64,
}

impl Quality {
    /// Parses the raw `-q` value.
    ///
    /// Missing or non-numeric input falls back to the default threshold;
    /// numbers outside `[0, 1]` are clamped.
    pub fn parse(raw: Option<&str>) -> Self {
        let threshold = raw
            .and_then(|s| s.trim().parse::<f64>().ok())
            .unwrap_or(DEFAULT_QUALITY_THRESHOLD);
        Self::from_threshold(threshold)
    }

    pub fn from_threshold(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            DEFAULT_QUALITY_THRESHOLD
        } else {
            threshold.clamp(MIN_QUALITY_THRESHOLD, MAX_QUALITY_THRESHOLD)
        };
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Encoder quality on the 0-100 scale.
    pub fn value(&self) -> u8 {
        (self.threshold * 100.0).round() as u8
    }

    /// Lossless encoding is requested only at the top of the scale.
    pub fn is_lossless(&self) -> bool {
        self.threshold >= MAX_QUALITY_THRESHOLD
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::from_threshold(DEFAULT_QUALITY_THRESHOLD)
    }
}
