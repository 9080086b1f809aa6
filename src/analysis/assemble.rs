//! Outline assembly.

use crate::model::{HeadingEntry, LineRecord, OutlineDocument};

use super::filter::HeadingFilter;
use super::font_stats::SizeTierMap;
use super::normalize::normalize_text;

/// Turns accepted tier-sized lines into an [`OutlineDocument`].
#[derive(Debug, Clone)]
pub struct OutlineAssembler<'a> {
    tiers: &'a SizeTierMap,
    filter: HeadingFilter,
    title_lines: &'a [usize],
}

impl<'a> OutlineAssembler<'a> {
    /// Create an assembler for a tier map and acceptance filter.
    pub fn new(tiers: &'a SizeTierMap, filter: HeadingFilter) -> Self {
        Self {
            tiers,
            filter,
            title_lines: &[],
        }
    }

    /// Exclude the title lines at `indices` from the outline.
    pub fn with_title_lines(mut self, indices: &'a [usize]) -> Self {
        self.title_lines = indices;
        self
    }

    /// Walk `lines` in document order and collect headings.
    pub fn assemble(&self, title: impl Into<String>, lines: &[LineRecord]) -> OutlineDocument {
        let mut doc = OutlineDocument::new(title);

        for (idx, line) in lines.iter().enumerate() {
            if self.title_lines.contains(&idx) {
                continue;
            }
            let Some(level) = self.tiers.level_of(line.font_size()) else {
                continue;
            };
            if !self.filter.accepts(line.text()) {
                log::debug!(
                    "Rejected {} candidate on page {}: {:?}",
                    level,
                    line.page(),
                    line.text()
                );
                continue;
            }

            let text = normalize_text(line.text());
            if text.is_empty() {
                continue;
            }
            doc.push(HeadingEntry::new(level, text, line.page()));
        }

        doc
    }
}
