//! Heading inference over extracted lines.
//!
//! The pipeline is a pure function of the line list:
//!
//! 1. the title is the first run of largest lines on page 1;
//! 2. the most frequent size is taken as body text;
//! 3. the three largest other sizes become H1..H3;
//! 4. tier-sized lines pass a language-dependent filter;
//! 5. surviving lines are normalized and emitted in document order.
//!
//! "Most frequent size is body text" is a statistical assumption. Documents
//! that are mostly set in large type (slide decks, posters) come out wrong.

mod assemble;
mod filter;
mod font_stats;
mod language;
mod normalize;
mod title;

pub use assemble::OutlineAssembler;
pub use filter::{cue_text, has_heading_cue, AcceptancePolicy, HeadingFilter, PolicyMode};
pub use font_stats::{FrequencyWeight, SizeHistogram, SizeTierMap};
pub use language::{Detection, Language, LanguageDetector};
pub use normalize::normalize_text;
pub use title::{infer_title, InferredTitle};

use crate::model::{LineRecord, OutlineDocument};
use crate::parser::ExtractOptions;

/// Pages sampled for language detection.
const SAMPLE_PAGES: u32 = 2;

/// Maximum characters in the language detection sample.
const SAMPLE_CHARS: usize = 4000;

/// What to do when no title line is found on page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleFallback {
    /// Leave the title empty
    #[default]
    Empty,
    /// Use the document info `/Title`, then the file name stem
    MetadataThenFileStem,
}

/// Options for outline extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineOptions {
    /// Line extraction options
    pub extract: ExtractOptions,

    /// Heading acceptance policy selection
    pub policy: PolicyMode,

    /// Histogram weighting for body size estimation
    pub weight: FrequencyWeight,

    /// Title used when page 1 has no usable line
    pub title_fallback: TitleFallback,

    /// Deepest heading level to emit (1-3)
    pub max_levels: u8,
}

impl OutlineOptions {
    /// Create new outline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction options.
    pub fn with_extract(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    /// Set policy mode.
    pub fn with_policy(mut self, policy: PolicyMode) -> Self {
        self.policy = policy;
        self
    }

    /// Set histogram weighting.
    pub fn with_weight(mut self, weight: FrequencyWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Set title fallback.
    pub fn with_title_fallback(mut self, fallback: TitleFallback) -> Self {
        self.title_fallback = fallback;
        self
    }

    /// Limit the number of heading levels (clamped to 1-3).
    pub fn with_max_levels(mut self, levels: u8) -> Self {
        self.max_levels = levels.clamp(1, 3);
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            policy: PolicyMode::Auto,
            weight: FrequencyWeight::Lines,
            title_fallback: TitleFallback::Empty,
            max_levels: 3,
        }
    }
}

/// Infer the title and heading outline of a document from its lines.
pub fn infer_outline(lines: &[LineRecord], options: &OutlineOptions) -> OutlineDocument {
    let (title_text, title_lines) = infer_title(lines)
        .map(|t| (t.text, t.line_indices))
        .unwrap_or_default();

    let histogram = SizeHistogram::from_lines(lines, options.weight);
    let Some(body) = histogram.body_size() else {
        log::debug!("No sized text; outline is empty");
        return OutlineDocument::new(title_text);
    };

    let candidates = lines
        .iter()
        .enumerate()
        .filter(|(idx, _)| !title_lines.contains(idx))
        .map(|(_, line)| line.font_size());
    let tiers = SizeTierMap::select_with_limit(candidates, body, options.max_levels);

    log::debug!(
        "Body size {}, heading tiers: {}",
        body,
        tiers
            .tiers()
            .iter()
            .map(|(size, level)| format!("{}={}", level, size))
            .collect::<Vec<_>>()
            .join(", ")
    );

    if tiers.is_empty() {
        return OutlineDocument::new(title_text);
    }

    let policy = options.policy.resolve(|| {
        let detection = LanguageDetector::new().detect(&language_sample(lines));
        log::debug!("Detected language: {}", detection);
        detection
    });
    log::debug!("Heading acceptance policy: {:?}", policy);

    OutlineAssembler::new(&tiers, HeadingFilter::new(policy))
        .with_title_lines(&title_lines)
        .assemble(title_text, lines)
}

/// Text of the first pages, used as the language detection sample.
pub fn language_sample(lines: &[LineRecord]) -> String {
    let joined = lines
        .iter()
        .filter(|l| l.page() <= SAMPLE_PAGES)
        .map(LineRecord::text)
        .collect::<Vec<_>>()
        .join("\n");

    match joined.char_indices().nth(SAMPLE_CHARS) {
        Some((cut, _)) => joined[..cut].to_string(),
        None => joined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FontSize, HeadingEntry, HeadingLevel};

    fn size(points: u32) -> FontSize {
        FontSize::from_tenths(points * 10)
    }

    fn line(text: &str, points: u32, page: u32) -> LineRecord {
        LineRecord::new(text, size(points), page)
    }

    const ENGLISH_BODY: &str =
        "The results of the study are described in this section and in the pages that follow.";

    const GERMAN_BODY: &str =
        "Die Ergebnisse der Studie werden in diesem Abschnitt und auf den folgenden Seiten beschrieben.";

    /// Title at 18pt, headings at 14pt, 50 body lines at 10pt over three pages.
    fn report() -> Vec<LineRecord> {
        let mut lines = vec![line("Report Title", 18, 1), line("1. Introduction", 14, 1)];
        for i in 0..20 {
            lines.push(line(ENGLISH_BODY, 10, 1 + (i / 10)));
        }
        lines.push(line("2. Background", 14, 2));
        for _ in 0..30 {
            lines.push(line(ENGLISH_BODY, 10, 3));
        }
        lines
    }

    #[test]
    fn test_report_scenario() {
        let doc = infer_outline(&report(), &OutlineOptions::default());

        assert_eq!(doc.title, "Report Title");
        assert_eq!(
            doc.outline,
            vec![
                HeadingEntry::new(HeadingLevel::H1, "1. Introduction", 1),
                HeadingEntry::new(HeadingLevel::H1, "2. Background", 2),
            ]
        );
    }

    #[test]
    fn test_two_line_title_does_not_take_a_tier() {
        let mut lines = vec![
            line("Annual Report", 24, 1),
            line("2024", 24, 1),
            line("1. Introduction", 14, 1),
        ];
        lines.extend((0..20).map(|_| line(ENGLISH_BODY, 10, 1)));
        lines.push(line("2. Results", 14, 2));

        let doc = infer_outline(&lines, &OutlineOptions::default());

        assert_eq!(doc.title, "Annual Report 2024");
        assert_eq!(
            doc.outline,
            vec![
                HeadingEntry::new(HeadingLevel::H1, "1. Introduction", 1),
                HeadingEntry::new(HeadingLevel::H1, "2. Results", 2),
            ]
        );
    }

    #[test]
    fn test_empty_document() {
        let doc = infer_outline(&[], &OutlineOptions::default());
        assert_eq!(doc.title, "");
        assert!(doc.outline.is_empty());
    }

    #[test]
    fn test_non_english_heading_without_numbering_is_kept() {
        let mut lines = vec![line("Jahresbericht", 20, 1), line("Einleitung", 14, 1)];
        lines.extend((0..30).map(|_| line(GERMAN_BODY, 10, 1)));
        lines.push(line("Ergebnisse", 14, 2));

        let doc = infer_outline(&lines, &OutlineOptions::default());

        assert_eq!(doc.title, "Jahresbericht");
        let texts: Vec<_> = doc.outline.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, ["Einleitung", "Ergebnisse"]);
    }

    #[test]
    fn test_english_document_requires_cues() {
        let mut lines = report();
        lines.insert(3, line("Unnumbered Heading", 14, 1));

        let doc = infer_outline(&lines, &OutlineOptions::default());
        assert!(doc.outline.iter().all(|h| h.text != "Unnumbered Heading"));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_size_only_is_independent_of_text() {
        let make = |heading: &str| {
            let mut lines = vec![line("Titel", 20, 1), line(heading, 14, 1)];
            lines.extend((0..10).map(|_| line(GERMAN_BODY, 10, 1)));
            lines
        };
        let options = OutlineOptions::new().with_policy(PolicyMode::SizeOnly);

        for heading in ["1. Numbered", "Plain words", "ends with colon:", "日本語"] {
            let doc = infer_outline(&make(heading), &options);
            assert_eq!(doc.len(), 1, "heading {:?} should be kept", heading);
            assert_eq!(doc.outline[0].level, HeadingLevel::H1);
        }
    }

    #[test]
    fn test_bullet_heading_scenario() {
        let mut lines = report();
        lines.push(line("■ 1. Scope", 14, 3));

        let doc = infer_outline(&lines, &OutlineOptions::default());
        assert_eq!(
            doc.outline.last(),
            Some(&HeadingEntry::new(HeadingLevel::H1, "1. Scope", 3))
        );
    }

    #[test]
    fn test_no_heading_at_body_size_and_pages_non_decreasing() {
        let mut lines = vec![line("Guide", 24, 1)];
        for page in 1..=4 {
            lines.push(line(&format!("{}. Part {}", page, page), 16, page));
            lines.push(line(&format!("{}.1 Detail", page), 12, page));
            lines.extend((0..8).map(|_| line(ENGLISH_BODY, 10, page)));
        }
        lines.push(line("5. Not a heading at body size", 10, 4));

        let doc = infer_outline(&lines, &OutlineOptions::default());

        assert_eq!(doc.len(), 8);
        assert!(doc.outline.iter().all(|h| !h.text.contains("body size")));
        assert!(doc.outline.windows(2).all(|w| w[0].page <= w[1].page));
        assert_eq!(doc.headings_at(HeadingLevel::H2).count(), 4);
    }

    #[test]
    fn test_word_weighting_option() {
        // Three short 14pt lines outnumber two long 10pt lines by count but
        // not by words.
        let lines = vec![
            line("Title", 20, 1),
            line("Alpha", 14, 1),
            line("Beta", 14, 1),
            line("Gamma", 14, 1),
            line(ENGLISH_BODY, 10, 1),
            line(ENGLISH_BODY, 10, 1),
        ];
        let by_lines = infer_outline(
            &lines,
            &OutlineOptions::new().with_policy(PolicyMode::SizeOnly),
        );
        let by_words = infer_outline(
            &lines,
            &OutlineOptions::new()
                .with_policy(PolicyMode::SizeOnly)
                .with_weight(FrequencyWeight::Words),
        );

        assert_eq!(by_lines.len(), 2);
        assert_eq!(by_words.len(), 3);
    }

    #[test]
    fn test_max_levels_option() {
        let lines = vec![
            line("Title", 24, 1),
            line("1. Top", 18, 1),
            line("1.1 Mid", 14, 1),
            line("1.1.1 Low", 12, 1),
            line(ENGLISH_BODY, 10, 1),
            line(ENGLISH_BODY, 10, 1),
        ];
        let doc = infer_outline(
            &lines,
            &OutlineOptions::new()
                .with_policy(PolicyMode::EnglishCues)
                .with_max_levels(2),
        );
        let levels: Vec<_> = doc.outline.iter().map(|h| h.level).collect();
        assert_eq!(levels, [HeadingLevel::H1, HeadingLevel::H2]);
    }

    #[test]
    fn test_language_sample_limits() {
        let lines = vec![
            line("page one", 10, 1),
            line("page two", 10, 2),
            line("page three", 10, 3),
        ];
        assert_eq!(language_sample(&lines), "page one\npage two");

        let long = vec![line(&"é".repeat(5000), 10, 1)];
        assert_eq!(language_sample(&long).chars().count(), SAMPLE_CHARS);
    }
}
