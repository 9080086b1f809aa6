//! Outline output types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Heading level of an outline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// All levels, outermost first.
    pub const ALL: [HeadingLevel; 3] = [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3];

    /// Level for a 0-based tier rank (0 = largest size).
    pub fn from_rank(rank: usize) -> Option<Self> {
        Self::ALL.get(rank).copied()
    }

    /// Numeric depth, 1 for H1.
    pub fn depth(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Label used in the JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One heading in the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Normalized heading text
    pub text: String,
    /// 1-based page number
    pub page: u32,
}

impl HeadingEntry {
    /// Create a heading entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Title and headings of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineDocument {
    /// Document title (may be empty)
    pub title: String,
    /// Headings in document order
    pub outline: Vec<HeadingEntry>,
}

impl OutlineDocument {
    /// Create an outline with a title and no headings.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            outline: Vec::new(),
        }
    }

    /// Append a heading.
    pub fn push(&mut self, entry: HeadingEntry) {
        self.outline.push(entry);
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    /// Whether the outline has no headings.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Headings at the given level.
    pub fn headings_at(&self, level: HeadingLevel) -> impl Iterator<Item = &HeadingEntry> {
        self.outline.iter().filter(move |h| h.level == level)
    }
}
