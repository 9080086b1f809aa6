//! Language-conditional heading acceptance.

use once_cell::sync::Lazy;
use regex::Regex;

use super::language::Detection;
use super::normalize::is_roman_numeral;

/// Leading section number: `1`, `1.`, `2.1`, `3)`.
static NUMBERING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)*(?:[.)]|\s|$)").unwrap());

/// Leading letter run closed by `.` or `)`: `IV.`, `ii)`.
static LETTER_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Za-z]+)[.)]").unwrap());

/// How the acceptance policy is chosen for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyMode {
    /// Pick from language detection
    #[default]
    Auto,
    /// Always require numbering or a trailing colon
    EnglishCues,
    /// Accept on size alone
    SizeOnly,
}

impl PolicyMode {
    /// Resolve to a concrete policy. `detect` only runs in `Auto` mode.
    pub fn resolve<F>(self, detect: F) -> AcceptancePolicy
    where
        F: FnOnce() -> Detection,
    {
        match self {
            PolicyMode::Auto => AcceptancePolicy::from(detect()),
            PolicyMode::EnglishCues => AcceptancePolicy::EnglishCues,
            PolicyMode::SizeOnly => AcceptancePolicy::SizeOnly,
        }
    }
}

/// Rule a tier-sized line must pass to become a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptancePolicy {
    /// Line must start with numbering or end with a colon
    EnglishCues,
    /// Tier membership is enough
    SizeOnly,
}

impl From<Detection> for AcceptancePolicy {
    fn from(detection: Detection) -> Self {
        if detection.is_english() {
            AcceptancePolicy::EnglishCues
        } else {
            AcceptancePolicy::SizeOnly
        }
    }
}

/// Applies an [`AcceptancePolicy`] to raw line text.
#[derive(Debug, Clone, Copy)]
pub struct HeadingFilter {
    policy: AcceptancePolicy,
}

impl HeadingFilter {
    /// Create a filter for a policy.
    pub fn new(policy: AcceptancePolicy) -> Self {
        Self { policy }
    }

    /// The policy in effect.
    pub fn policy(&self) -> AcceptancePolicy {
        self.policy
    }

    /// Whether a tier-sized line with this raw text is a heading.
    pub fn accepts(&self, raw: &str) -> bool {
        match self.policy {
            AcceptancePolicy::SizeOnly => true,
            AcceptancePolicy::EnglishCues => has_heading_cue(raw),
        }
    }
}

/// Raw text with surrounding whitespace and leading decorative glyphs removed.
///
/// Trailing punctuation is kept so a closing colon is still visible.
pub fn cue_text(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_start()
}

/// Whether the text starts with section numbering or ends with a colon.
pub fn has_heading_cue(raw: &str) -> bool {
    let text = cue_text(raw);
    NUMBERING.is_match(text)
        || has_roman_marker(text)
        || text.ends_with(':')
        || text.ends_with('：')
}

/// A well-formed Roman numeral in a single case, followed by `.` or `)`.
fn has_roman_marker(text: &str) -> bool {
    let Some(letters) = LETTER_MARKER.captures(text).and_then(|c| c.get(1)) else {
        return false;
    };
    let letters = letters.as_str();
    let single_case = letters.chars().all(|c| c.is_ascii_uppercase())
        || letters.chars().all(|c| c.is_ascii_lowercase());
    single_case && is_roman_numeral(letters)
}
