//! Line-level types.

use std::fmt;

/// A font size quantized to a tenth of a point.
///
/// Glyph sizes coming out of a content stream are floats that differ in the
/// last bits between spans set in the same font. Quantizing once gives a
/// value that can key maps and compare exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontSize(u32);

impl FontSize {
    /// Quantize a size in points.
    ///
    /// Returns `None` for sizes that carry no usable information
    /// (non-finite, zero, negative, or smaller than 0.05pt).
    pub fn from_points(points: f32) -> Option<Self> {
        if !points.is_finite() || points <= 0.0 {
            return None;
        }
        let tenths = (points * 10.0).round();
        if tenths < 1.0 || tenths > u32::MAX as f32 {
            return None;
        }
        Some(Self(tenths as u32))
    }

    /// Build a size from tenths of a point.
    pub const fn from_tenths(tenths: u32) -> Self {
        Self(tenths)
    }

    /// Size in points.
    pub fn points(self) -> f32 {
        self.0 as f32 / 10.0
    }

    /// Size in tenths of a point.
    pub const fn tenths(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}pt", self.0 / 10, self.0 % 10)
    }
}

/// One visually distinct text line.
///
/// Fields are private: a record is populated exactly once by the extractor
/// and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    text: String,
    font_size: FontSize,
    page: u32,
}

impl LineRecord {
    /// Create a line record. `page` is 1-based.
    pub fn new(text: impl Into<String>, font_size: FontSize, page: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            page,
        }
    }

    /// Raw line text as extracted.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Largest glyph size on the line.
    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
