//! Synthetic PDF generation for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// One text line: font size in points and text.
pub type Line<'a> = (f32, &'a str);

/// Filler paragraph used as body text.
pub const ENGLISH_BODY: &str =
    "The results of the study are described in this section and in the pages that follow.";

/// German filler paragraph used as body text.
pub const GERMAN_BODY: &str =
    "Die Ergebnisse der Studie werden in diesem Abschnitt und auf den folgenden Seiten beschrieben.";

/// Builder for small text-only PDFs.
#[derive(Default)]
pub struct TestPdf<'a> {
    pages: Vec<Vec<Line<'a>>>,
    info_title: Option<&'a str>,
}

impl<'a> TestPdf<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page. An empty page gets no content stream at all.
    pub fn page(mut self, lines: Vec<Line<'a>>) -> Self {
        self.pages.push(lines);
        self
    }

    /// Set `/Title` in the document information dictionary.
    pub fn info_title(mut self, title: &'a str) -> Self {
        self.info_title = Some(title);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id: ObjectId = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in &self.pages {
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => resources_id,
            };
            if !lines.is_empty() {
                let content = page_content(lines);
                let stream = Stream::new(Dictionary::new(), content);
                let content_id = doc.add_object(Object::Stream(stream));
                page.set("Contents", content_id);
            }
            kids.push(doc.add_object(page).into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = self.info_title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title),
            });
            doc.trailer.set("Info", info_id);
        }

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("failed to save test PDF");
        buf
    }
}

/// Content stream placing each line on its own baseline, top to bottom.
fn page_content(lines: &[Line<'_>]) -> Vec<u8> {
    let mut operations = Vec::new();
    let mut y = 760.0_f32;
    for &(size, text) in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), size.into()]));
        operations.push(Operation::new("Td", vec![72.into(), y.into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(text)]));
        operations.push(Operation::new("ET", vec![]));
        y -= size * 1.5;
    }
    Content { operations }
        .encode()
        .expect("failed to encode content stream")
}

/// A report: 18pt title, numbered 14pt headings, 10pt body over three pages.
pub fn report_pdf() -> Vec<u8> {
    let mut page1 = vec![(18.0, "Report Title"), (14.0, "1. Introduction")];
    page1.extend(std::iter::repeat((10.0, ENGLISH_BODY)).take(15));

    let mut page2 = vec![(10.0, ENGLISH_BODY); 5];
    page2.push((14.0, "2. Background"));
    page2.extend(std::iter::repeat((10.0, ENGLISH_BODY)).take(10));

    let page3 = vec![(10.0, ENGLISH_BODY); 20];

    TestPdf::new().page(page1).page(page2).page(page3).build()
}
