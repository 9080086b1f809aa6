//! Line extraction from PDF content streams.
//!
//! Walks the text operators of every page, tracking the text and graphics
//! matrices closely enough to know where each string lands and how large it
//! is drawn. Strings sharing a baseline are merged into one [`LineRecord`]
//! carrying the largest glyph size on the line.
//!
//! Lines come out in content-stream order. No attempt is made to recover
//! reading order from positions: columns, tables and floating boxes come out
//! however the producer wrote them.

use crate::error::{Error, Result};
use crate::model::{FontSize, LineRecord};

use super::backend::{get_number_from_value, ContentOp, PageId, PdfBackend, PdfValue};
use super::options::{ErrorMode, ExtractOptions};

/// Average glyph advance as a fraction of the font size, used to estimate
/// where a string ends when glyph widths are unknown.
const AVG_GLYPH_ADVANCE: f32 = 0.5;

/// TJ adjustments (thousandths of an em) past this value read as a word gap.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Baseline shift, relative to font size, that still counts as the same line.
const BASELINE_TOLERANCE: f32 = 0.3;

/// Horizontal gap, relative to font size, that separates two words.
const WORD_GAP: f32 = 0.1;

/// A positioned string in device space.
#[derive(Debug, Clone)]
struct TextSpan {
    text: String,
    x: f32,
    y: f32,
    width: f32,
    font_size: f32,
}

/// Extracts [`LineRecord`]s from every page of a document.
pub struct LineExtractor<'a, B: PdfBackend + ?Sized> {
    backend: &'a B,
    options: ExtractOptions,
}

impl<'a, B: PdfBackend + ?Sized> LineExtractor<'a, B> {
    /// Create an extractor with default options.
    pub fn new(backend: &'a B) -> Self {
        Self::with_options(backend, ExtractOptions::default())
    }

    /// Create an extractor with custom options.
    pub fn with_options(backend: &'a B, options: ExtractOptions) -> Self {
        Self { backend, options }
    }

    /// Extract lines from all pages in page order.
    pub fn extract(&self) -> Result<Vec<LineRecord>> {
        let pages = self.backend.pages();
        let limit = self.options.max_pages.map_or(usize::MAX, |n| n as usize);

        let mut lines = Vec::new();
        for (&page_num, &page_id) in pages.iter().take(limit) {
            match self.extract_page(page_num, page_id) {
                Ok(page_lines) => {
                    log::debug!("Page {}: {} lines", page_num, page_lines.len());
                    lines.extend(page_lines);
                }
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(Error::TextExtract(format!("Page {}: {}", page_num, e)));
                    }
                    log::warn!("Failed to extract text from page {}: {}", page_num, e);
                }
            }
        }

        Ok(lines)
    }

    /// Extract lines from a single page.
    pub fn extract_page(&self, page_num: u32, page_id: PageId) -> Result<Vec<LineRecord>> {
        let content = self.backend.page_content(page_id)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }
        let ops = self.backend.decode_content(&content)?;
        let spans = self.collect_spans(page_id, &ops);
        Ok(group_spans_into_lines(spans, page_num))
    }

    /// Run the content stream and collect positioned strings.
    fn collect_spans(&self, page_id: PageId, ops: &[ContentOp]) -> Vec<TextSpan> {
        let mut state = TextState::default();
        let mut spans = Vec::new();

        for op in ops {
            let operands = &op.operands;
            match op.operator.as_str() {
                "q" => state.save(),
                "Q" => state.restore(),
                "cm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        state.ctm = m.multiply(&state.ctm);
                    }
                }
                "BT" => state.begin_text(),
                "ET" => state.in_text = false,
                "Tf" => {
                    if let [PdfValue::Name(name), size, ..] = operands.as_slice() {
                        state.font = name.clone();
                        state.font_size = get_number_from_value(size).unwrap_or(0.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = operands.first().and_then(get_number_from_value) {
                        state.leading = leading;
                    }
                }
                "Td" | "TD" => {
                    if let [tx, ty, ..] = operands.as_slice() {
                        let tx = get_number_from_value(tx).unwrap_or(0.0);
                        let ty = get_number_from_value(ty).unwrap_or(0.0);
                        if op.operator == "TD" {
                            state.leading = -ty;
                        }
                        state.move_line(tx, ty);
                    }
                }
                "Tm" => {
                    if let Some(m) = Matrix::from_operands(operands) {
                        state.line_matrix = m;
                        state.text_matrix = m;
                    }
                }
                "T*" => state.next_line(),
                "Tj" => {
                    if let Some(PdfValue::Str(bytes)) = operands.first() {
                        let text = self.backend.decode_text(page_id, &state.font, bytes);
                        state.show(text, 0.0, &mut spans);
                    }
                }
                "TJ" => {
                    if let Some(PdfValue::Array(items)) = operands.first() {
                        let (text, shift) = self.decode_tj(page_id, &state.font, items);
                        state.show(text, shift, &mut spans);
                    }
                }
                "'" | "\"" => {
                    state.next_line();
                    let idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(PdfValue::Str(bytes)) = operands.get(idx) {
                        let text = self.backend.decode_text(page_id, &state.font, bytes);
                        state.show(text, 0.0, &mut spans);
                    }
                }
                _ => {}
            }
        }

        spans
    }

    /// Decode a TJ array into text plus the total positioning adjustment
    /// (in thousandths of an em, positive moves right).
    fn decode_tj(&self, page_id: PageId, font: &[u8], items: &[PdfValue]) -> (String, f32) {
        let mut combined = String::new();
        let mut shift = 0.0;

        for item in items {
            match item {
                PdfValue::Str(bytes) => {
                    combined.push_str(&self.backend.decode_text(page_id, font, bytes));
                }
                PdfValue::Integer(_) | PdfValue::Real(_) => {
                    let adjustment = -get_number_from_value(item).unwrap_or(0.0);
                    shift += adjustment;
                    if adjustment > TJ_SPACE_THRESHOLD {
                        if let Some(last) = combined.chars().last() {
                            if !last.is_whitespace() && !is_spaceless_script_char(last) {
                                combined.push(' ');
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        (combined, shift)
    }
}

/// Text and graphics state tracked while running a content stream.
#[derive(Debug, Clone)]
struct TextState {
    ctm: Matrix,
    saved_ctm: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    font: Vec<u8>,
    font_size: f32,
    leading: f32,
    in_text: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            saved_ctm: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            font: Vec::new(),
            font_size: 0.0,
            leading: 0.0,
            in_text: false,
        }
    }
}

impl TextState {
    fn save(&mut self) {
        self.saved_ctm.push(self.ctm);
    }

    fn restore(&mut self) {
        if let Some(ctm) = self.saved_ctm.pop() {
            self.ctm = ctm;
        }
    }

    fn begin_text(&mut self) {
        self.in_text = true;
        self.text_matrix = Matrix::IDENTITY;
        self.line_matrix = Matrix::IDENTITY;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translation(tx, ty).multiply(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    /// Record a shown string and advance the text matrix past it.
    ///
    /// `shift` is the TJ positioning total in thousandths of an em.
    fn show(&mut self, text: String, shift: f32, spans: &mut Vec<TextSpan>) {
        if !self.in_text {
            return;
        }

        let glyphs = text.chars().count() as f32;
        let advance = (glyphs * AVG_GLYPH_ADVANCE + shift / 1000.0) * self.font_size;
        let rendering = self.text_matrix.multiply(&self.ctm);

        if !text.trim().is_empty() {
            spans.push(TextSpan {
                text,
                x: rendering.e,
                y: rendering.f,
                width: advance.max(0.0) * rendering.x_scale(),
                font_size: self.font_size * rendering.y_scale(),
            });
        }

        self.text_matrix = Matrix::translation(advance, 0.0).multiply(&self.text_matrix);
    }
}

/// A PDF transformation matrix `[a b c d e f]`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    fn from_operands(operands: &[PdfValue]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        let n: Vec<f32> = operands[..6]
            .iter()
            .map(get_number_from_value)
            .collect::<Option<_>>()?;
        Some(Self {
            a: n[0],
            b: n[1],
            c: n[2],
            d: n[3],
            e: n[4],
            f: n[5],
        })
    }

    /// `self × other` in PDF row-vector convention.
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn x_scale(&self) -> f32 {
        self.a.hypot(self.b)
    }

    fn y_scale(&self) -> f32 {
        self.c.hypot(self.d)
    }
}

/// Merge consecutive spans that share a baseline into lines.
fn group_spans_into_lines(spans: Vec<TextSpan>, page: u32) -> Vec<LineRecord> {
    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();

    for span in spans {
        if let Some(first) = current.first() {
            let tolerance = first.font_size.max(span.font_size).abs() * BASELINE_TOLERANCE;
            if (span.y - first.y).abs() > tolerance {
                lines.extend(finish_line(std::mem::take(&mut current), page));
            }
        }
        current.push(span);
    }
    lines.extend(finish_line(current, page));

    lines
}

fn finish_line(spans: Vec<TextSpan>, page: u32) -> Option<LineRecord> {
    if spans.is_empty() {
        return None;
    }

    let text = join_spans(&spans);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let max_size = spans
        .iter()
        .filter_map(|s| FontSize::from_points(s.font_size))
        .max();

    match max_size {
        Some(size) => Some(LineRecord::new(text, size, page)),
        None => {
            log::debug!("Page {}: dropping line without usable font size: {:?}", page, text);
            None
        }
    }
}

/// Concatenate span texts, inserting a space where the horizontal gap
/// between spans is wider than a fraction of the font size.
fn join_spans(spans: &[TextSpan]) -> String {
    let mut result = String::new();

    for (i, span) in spans.iter().enumerate() {
        if i > 0 {
            let prev = &spans[i - 1];
            let gap = span.x - (prev.x + prev.width);
            let threshold = prev.font_size.max(span.font_size).abs() * WORD_GAP;

            let prev_last = prev.text.chars().last();
            let curr_first = span.text.chars().next();
            let both_spaceless = prev_last.is_some_and(is_spaceless_script_char)
                && curr_first.is_some_and(is_spaceless_script_char);
            let has_space = prev_last.is_some_and(char::is_whitespace)
                || curr_first.is_some_and(char::is_whitespace);

            if gap > threshold && !both_spaceless && !has_space {
                result.push(' ');
            }
        }
        result.push_str(&span.text);
    }

    result
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
