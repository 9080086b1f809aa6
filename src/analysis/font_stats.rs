//! Font size statistics: body size estimation and heading tier selection.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{FontSize, HeadingLevel, LineRecord};

/// How much each line contributes to the size histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyWeight {
    /// One count per line
    #[default]
    Lines,
    /// One count per whitespace-separated word
    Words,
}

impl FrequencyWeight {
    fn weight_of(self, line: &LineRecord) -> usize {
        match self {
            FrequencyWeight::Lines => 1,
            FrequencyWeight::Words => line.word_count(),
        }
    }
}

/// Frequency of each font size across a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeHistogram {
    counts: BTreeMap<FontSize, usize>,
}

impl SizeHistogram {
    /// Build the histogram for a document's lines.
    pub fn from_lines<'a, I>(lines: I, weight: FrequencyWeight) -> Self
    where
        I: IntoIterator<Item = &'a LineRecord>,
    {
        let mut counts = BTreeMap::new();
        for line in lines {
            let w = weight.weight_of(line);
            if w > 0 {
                *counts.entry(line.font_size()).or_insert(0) += w;
            }
        }
        Self { counts }
    }

    /// Count recorded for a size.
    pub fn count(&self, size: FontSize) -> usize {
        self.counts.get(&size).copied().unwrap_or(0)
    }

    /// Whether no size was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The most frequent size. Ties go to the smallest size.
    pub fn body_size(&self) -> Option<FontSize> {
        // BTreeMap iterates ascending, so keeping only strictly larger counts
        // leaves the smallest of the tied sizes.
        let mut best: Option<(FontSize, usize)> = None;
        for (&size, &count) in &self.counts {
            match best {
                Some((_, c)) if count <= c => {}
                _ => best = Some((size, count)),
            }
        }
        best.map(|(size, _)| size)
    }
}

/// Mapping from heading font sizes to levels, largest size first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeTierMap {
    tiers: Vec<(FontSize, HeadingLevel)>,
}

impl SizeTierMap {
    /// Select up to three heading tiers from the given sizes.
    pub fn select<I>(sizes: I, body: FontSize) -> Self
    where
        I: IntoIterator<Item = FontSize>,
    {
        Self::select_with_limit(sizes, body, HeadingLevel::ALL.len() as u8)
    }

    /// Select up to `max_levels` heading tiers (clamped to 1..=3).
    ///
    /// Distinct sizes other than `body` are sorted descending; the largest
    /// becomes H1, the next H2 and so on.
    pub fn select_with_limit<I>(sizes: I, body: FontSize, max_levels: u8) -> Self
    where
        I: IntoIterator<Item = FontSize>,
    {
        let limit = usize::from(max_levels.clamp(1, HeadingLevel::ALL.len() as u8));
        let distinct: BTreeSet<FontSize> = sizes.into_iter().filter(|&s| s != body).collect();

        let tiers = distinct
            .into_iter()
            .rev()
            .take(limit)
            .enumerate()
            .filter_map(|(rank, size)| HeadingLevel::from_rank(rank).map(|level| (size, level)))
            .collect();

        Self { tiers }
    }

    /// Level assigned to a size, if it is a heading tier.
    pub fn level_of(&self, size: FontSize) -> Option<HeadingLevel> {
        self.tiers
            .iter()
            .find(|(s, _)| *s == size)
            .map(|(_, level)| *level)
    }

    /// Tiers, largest size first.
    pub fn tiers(&self) -> &[(FontSize, HeadingLevel)] {
        &self.tiers
    }

    /// Number of tiers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Whether there are no heading tiers.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(points: u32) -> FontSize {
        FontSize::from_tenths(points * 10)
    }

    fn line(text: &str, points: u32) -> LineRecord {
        LineRecord::new(text, size(points), 1)
    }

    #[test]
    fn test_body_size_is_most_frequent() {
        let lines = vec![
            line("Title", 18),
            line("a", 10),
            line("b", 10),
            line("c", 10),
            line("Heading", 14),
        ];
        let hist = SizeHistogram::from_lines(&lines, FrequencyWeight::Lines);
        assert_eq!(hist.body_size(), Some(size(10)));
        assert_eq!(hist.count(size(10)), 3);
    }

    #[test]
    fn test_body_size_tie_prefers_smallest() {
        let lines = vec![line("a", 12), line("b", 9), line("c", 12), line("d", 9)];
        let hist = SizeHistogram::from_lines(&lines, FrequencyWeight::Lines);
        assert_eq!(hist.body_size(), Some(size(9)));
    }

    #[test]
    fn test_body_size_of_empty_document() {
        let hist = SizeHistogram::from_lines(&[], FrequencyWeight::Lines);
        assert!(hist.is_empty());
        assert_eq!(hist.body_size(), None);
    }

    #[test]
    fn test_word_weighting_changes_body_size() {
        let lines = vec![
            line("One two three four five six", 11),
            line("A", 14),
            line("B", 14),
        ];
        let by_lines = SizeHistogram::from_lines(&lines, FrequencyWeight::Lines);
        let by_words = SizeHistogram::from_lines(&lines, FrequencyWeight::Words);
        assert_eq!(by_lines.body_size(), Some(size(14)));
        assert_eq!(by_words.body_size(), Some(size(11)));
    }

    #[test]
    fn test_body_size_is_deterministic() {
        let lines: Vec<_> = (0..40)
            .map(|i| line("x", [9, 10, 11, 12][i % 4]))
            .collect();
        let first = SizeHistogram::from_lines(&lines, FrequencyWeight::Lines).body_size();
        for _ in 0..5 {
            let again = SizeHistogram::from_lines(&lines, FrequencyWeight::Lines).body_size();
            assert_eq!(first, again);
        }
        assert_eq!(first, Some(size(9)));
    }

    #[test]
    fn test_tiers_are_strictly_decreasing() {
        let sizes = [size(10), size(24), size(14), size(18), size(12), size(14)];
        let tiers = SizeTierMap::select(sizes, size(10));

        assert_eq!(
            tiers.tiers(),
            &[
                (size(24), HeadingLevel::H1),
                (size(18), HeadingLevel::H2),
                (size(14), HeadingLevel::H3),
            ]
        );
        assert!(tiers.tiers().windows(2).all(|w| w[0].0 > w[1].0));
        assert_eq!(tiers.level_of(size(12)), None);
    }

    #[test]
    fn test_body_size_is_never_a_tier() {
        let tiers = SizeTierMap::select([size(10), size(8)], size(10));
        assert_eq!(tiers.len(), 1);
        assert_eq!(tiers.level_of(size(10)), None);
        assert_eq!(tiers.level_of(size(8)), Some(HeadingLevel::H1));
    }

    #[test]
    fn test_no_tiers_without_other_sizes() {
        assert!(SizeTierMap::select([size(10), size(10)], size(10)).is_empty());
    }

    #[test]
    fn test_max_levels_limits_tiers() {
        let sizes = [size(20), size(16), size(12)];
        let tiers = SizeTierMap::select_with_limit(sizes, size(10), 2);
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers.level_of(size(12)), None);

        let clamped = SizeTierMap::select_with_limit(sizes, size(10), 0);
        assert_eq!(clamped.len(), 1);
    }
}
