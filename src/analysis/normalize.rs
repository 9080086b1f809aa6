//! Heading text normalization.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// A well-formed Roman numeral (1..=3999), any case.
static ROMAN_NUMERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:m{0,3}(?:cm|cd|d?c{0,3})(?:xc|xl|l?x{0,3})(?:ix|iv|v?i{0,3}))$").unwrap()
});

/// Words that introduce a numbered division.
const DIVISION_WORDS: &[&str] = &["part", "chapter", "section", "book", "volume", "appendix"];

const BRACKETS: &[(char, char)] = &[('(', ')'), ('[', ']'), ('{', '}')];

/// Clean a raw line for display.
///
/// Drops replacement and private-use characters, applies NFKC, collapses
/// whitespace, strips decorative characters from both ends and upper-cases
/// Roman-numeral section markers. Applying it twice gives the same result
/// as applying it once.
pub fn normalize_text(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|&c| c != '\u{FFFD}' && !is_private_use(c))
        .nfkc()
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let stripped = strip_edges(&collapsed);

    uppercase_roman_markers(stripped)
}

fn is_private_use(c: char) -> bool {
    matches!(c as u32, 0xE000..=0xF8FF | 0xF0000..=0xFFFFD | 0x100000..=0x10FFFD)
}

/// Remove non-alphanumeric characters at both ends.
///
/// An opening bracket at the start survives when its closing partner occurs
/// later in the text, and the other way round at the end.
fn strip_edges(text: &str) -> &str {
    let mut current = text;
    loop {
        let next = strip_trailing(strip_leading(current));
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}

fn strip_leading(text: &str) -> &str {
    for (idx, c) in text.char_indices() {
        if c.is_alphanumeric() {
            return &text[idx..];
        }
        let balanced = BRACKETS
            .iter()
            .any(|&(open, close)| c == open && text[idx + c.len_utf8()..].contains(close));
        if balanced {
            return &text[idx..];
        }
    }
    ""
}

fn strip_trailing(text: &str) -> &str {
    for (idx, c) in text.char_indices().rev() {
        let end = idx + c.len_utf8();
        if c.is_alphanumeric() {
            return &text[..end];
        }
        let balanced = BRACKETS
            .iter()
            .any(|&(open, close)| c == close && text[..idx].contains(open));
        if balanced {
            return &text[..end];
        }
    }
    ""
}

pub(super) fn is_roman_numeral(token: &str) -> bool {
    !token.is_empty() && ROMAN_NUMERAL.is_match(token)
}

/// Split a token into its leading ASCII-letter run and the rest.
fn split_letters(token: &str) -> (&str, &str) {
    let end = token
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(token.len());
    token.split_at(end)
}

fn uppercase_roman_markers(text: &str) -> String {
    let mut tokens = Vec::new();
    let mut after_division = false;

    for (i, token) in text.split(' ').enumerate() {
        let (letters, rest) = split_letters(token);

        let leading_marker = i == 0 && rest.starts_with(&['.', ')'][..]);
        let division_marker =
            after_division && (rest.is_empty() || rest.starts_with(&['.', ')', ':'][..]));

        if (leading_marker || division_marker) && is_roman_numeral(letters) {
            tokens.push(format!("{}{}", letters.to_ascii_uppercase(), rest));
        } else {
            tokens.push(token.to_string());
        }

        after_division = rest.is_empty()
            && DIVISION_WORDS
                .iter()
                .any(|w| letters.eq_ignore_ascii_case(w));
    }

    tokens.join(" ")
}
