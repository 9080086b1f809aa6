//! Coarse document language identification.
//!
//! Two signals are used: the dominant writing script of the sample, and for
//! Latin-script text the number of function words from a small per-language
//! list. The result only has to be good enough to pick a heading acceptance
//! policy, so anything ambiguous is reported as inconclusive.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;

/// Fewer alphabetic characters than this is too little text to judge.
const MIN_LETTERS: usize = 20;

/// Minimum stop-word hits for a Latin-script language to be reported.
const MIN_STOPWORD_HITS: usize = 3;

/// Minimum share of sample words that must be stop words of the winner.
const MIN_STOPWORD_RATIO: f32 = 0.05;

/// Minimum share of letters in the dominant script.
const MIN_SCRIPT_SHARE: f32 = 0.5;

/// A language the detector can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    French,
    German,
    Spanish,
    Italian,
    Portuguese,
    Dutch,
    Russian,
    Greek,
    Arabic,
    Hebrew,
    Hindi,
    Thai,
    Chinese,
    Japanese,
    Korean,
}

impl Language {
    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
            Language::German => "de",
            Language::Spanish => "es",
            Language::Italian => "it",
            Language::Portuguese => "pt",
            Language::Dutch => "nl",
            Language::Russian => "ru",
            Language::Greek => "el",
            Language::Arabic => "ar",
            Language::Hebrew => "he",
            Language::Hindi => "hi",
            Language::Thai => "th",
            Language::Chinese => "zh",
            Language::Japanese => "ja",
            Language::Korean => "ko",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of language detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    language: Option<Language>,
    confidence: f32,
}

impl Detection {
    /// A detection that could not decide.
    pub fn inconclusive() -> Self {
        Self {
            language: None,
            confidence: 0.0,
        }
    }

    /// A detection that settled on `language`.
    pub fn detected(language: Language, confidence: f32) -> Self {
        Self {
            language: Some(language),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Detected language, `None` when inconclusive.
    pub fn language(&self) -> Option<Language> {
        self.language
    }

    /// Confidence in 0.0..=1.0.
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Whether a language was identified.
    pub fn is_conclusive(&self) -> bool {
        self.language.is_some()
    }

    /// Whether the document was identified as English.
    pub fn is_english(&self) -> bool {
        self.language == Some(Language::English)
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.language {
            Some(lang) => write!(f, "{} ({:.2})", lang, self.confidence),
            None => f.write_str("inconclusive"),
        }
    }
}

/// Writing systems distinguished by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Script {
    Latin,
    Cyrillic,
    Greek,
    Arabic,
    Hebrew,
    Devanagari,
    Thai,
    Han,
    Kana,
    Hangul,
}

const SCRIPTS: [Script; 10] = [
    Script::Latin,
    Script::Cyrillic,
    Script::Greek,
    Script::Arabic,
    Script::Hebrew,
    Script::Devanagari,
    Script::Thai,
    Script::Han,
    Script::Kana,
    Script::Hangul,
];

fn script_of(c: char) -> Option<Script> {
    let code = c as u32;
    let script = match code {
        0x0041..=0x005A | 0x0061..=0x007A => Script::Latin,
        0x00C0..=0x024F | 0x1E00..=0x1EFF => Script::Latin,
        0x0370..=0x03FF | 0x1F00..=0x1FFF => Script::Greek,
        0x0400..=0x052F => Script::Cyrillic,
        0x0590..=0x05FF => Script::Hebrew,
        0x0600..=0x06FF | 0x0750..=0x077F | 0x08A0..=0x08FF => Script::Arabic,
        0xFB50..=0xFDFF | 0xFE70..=0xFEFF => Script::Arabic,
        0x0900..=0x097F => Script::Devanagari,
        0x0E00..=0x0E7F => Script::Thai,
        0x3040..=0x30FF => Script::Kana,
        0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0x20000..=0x2EBEF => Script::Han,
        0x1100..=0x11FF | 0x3130..=0x318F | 0xAC00..=0xD7AF => Script::Hangul,
        _ => return None,
    };
    Some(script)
}

/// Function words per Latin-script language.
static STOPWORDS: Lazy<Vec<(Language, HashSet<&'static str>)>> = Lazy::new(|| {
    let table: [(Language, &[&str]); 7] = [
        (
            Language::English,
            &[
                "the", "and", "of", "to", "in", "is", "that", "for", "with", "this", "are", "on",
                "be", "as", "by", "it", "from", "was", "which", "an", "or", "not", "have", "at",
                "we", "our", "these", "can", "will", "has",
            ],
        ),
        (
            Language::French,
            &[
                "le", "la", "les", "des", "et", "est", "une", "un", "du", "dans", "que", "pour",
                "qui", "sur", "pas", "au", "aux", "sont", "avec", "ce", "cette", "par", "ne",
                "il", "nous",
            ],
        ),
        (
            Language::German,
            &[
                "der", "die", "das", "und", "ist", "nicht", "ein", "eine", "zu", "den", "von",
                "mit", "sich", "des", "auf", "für", "im", "dem", "auch", "es", "wird", "werden",
                "wir", "oder",
            ],
        ),
        (
            Language::Spanish,
            &[
                "el", "los", "las", "y", "que", "en", "una", "es", "por", "para", "con", "del",
                "se", "al", "como", "más", "su", "lo", "pero", "sus", "este", "esta",
            ],
        ),
        (
            Language::Italian,
            &[
                "il", "di", "che", "è", "per", "non", "della", "sono", "gli", "nel", "dei",
                "delle", "anche", "questo", "questa", "alla", "degli", "essere",
            ],
        ),
        (
            Language::Portuguese,
            &[
                "os", "do", "da", "em", "um", "uma", "para", "com", "não", "dos", "das", "no",
                "na", "mais", "são", "ao", "pela", "pelo", "isso",
            ],
        ),
        (
            Language::Dutch,
            &[
                "het", "een", "en", "van", "dat", "niet", "op", "te", "met", "voor", "zijn",
                "er", "aan", "ook", "wordt", "naar", "bij", "deze", "worden",
            ],
        ),
    ];
    table
        .into_iter()
        .map(|(lang, words)| (lang, words.iter().copied().collect()))
        .collect()
});

/// Script and stop-word based language detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    /// Create a detector.
    pub fn new() -> Self {
        Self
    }

    /// Classify a text sample.
    pub fn detect(&self, sample: &str) -> Detection {
        let mut script_counts = [0usize; SCRIPTS.len()];
        let mut letters = 0usize;
        for c in sample.chars().filter(|c| c.is_alphabetic()) {
            letters += 1;
            if let Some(script) = script_of(c) {
                if let Some(idx) = SCRIPTS.iter().position(|s| *s == script) {
                    script_counts[idx] += 1;
                }
            }
        }

        if letters < MIN_LETTERS {
            return Detection::inconclusive();
        }

        let count_of = |script: Script| {
            SCRIPTS
                .iter()
                .position(|s| *s == script)
                .map_or(0, |idx| script_counts[idx])
        };

        // Kanji-heavy Japanese still carries kana; count both toward Han.
        let cjk = count_of(Script::Han) + count_of(Script::Kana);
        let (dominant, count) = SCRIPTS
            .iter()
            .map(|&s| match s {
                Script::Han => (s, cjk),
                Script::Kana => (s, 0),
                _ => (s, count_of(s)),
            })
            .max_by_key(|&(_, n)| n)
            .unwrap_or((Script::Latin, 0));

        let share = count as f32 / letters as f32;
        if share < MIN_SCRIPT_SHARE {
            return Detection::inconclusive();
        }

        let language = match dominant {
            Script::Latin => return detect_latin(sample),
            Script::Han if count_of(Script::Kana) > 0 => Language::Japanese,
            Script::Han | Script::Kana => Language::Chinese,
            Script::Hangul => Language::Korean,
            Script::Cyrillic => Language::Russian,
            Script::Greek => Language::Greek,
            Script::Arabic => Language::Arabic,
            Script::Hebrew => Language::Hebrew,
            Script::Devanagari => Language::Hindi,
            Script::Thai => Language::Thai,
        };
        Detection::detected(language, share)
    }
}

fn detect_latin(sample: &str) -> Detection {
    let mut hits = vec![0usize; STOPWORDS.len()];
    let mut words = 0usize;

    for word in sample
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
    {
        words += 1;
        let word = word.to_lowercase();
        for (idx, (_, list)) in STOPWORDS.iter().enumerate() {
            if list.contains(word.as_str()) {
                hits[idx] += 1;
            }
        }
    }

    let mut ranked: Vec<(usize, usize)> = hits.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let (best_idx, best) = ranked[0];
    let runner_up = ranked.get(1).map_or(0, |r| r.1);

    if best < MIN_STOPWORD_HITS
        || (best as f32) < words as f32 * MIN_STOPWORD_RATIO
        || best == runner_up
    {
        return Detection::inconclusive();
    }

    let confidence = best as f32 / (best + runner_up) as f32;
    Detection::detected(STOPWORDS[best_idx].0, confidence)
}
