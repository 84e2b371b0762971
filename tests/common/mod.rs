//! Shared helpers for integration tests: synthetic PDFs and stub classifiers.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pdfoutline::FeatureVector;

/// Baseline of the first line on each page.
const FIRST_BASELINE: f32 = 720.0;

/// Vertical distance between consecutive lines.
const LINE_SPACING: f32 = 30.0;

/// Lines at or above this size are set in the bold font.
const BOLD_SIZE: f32 = 14.0;

/// Build a PDF whose pages hold the given `(text, font_size)` lines,
/// one text object per line, top to bottom.
pub fn build_pdf(pages: &[&[(&str, f32)]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (i, (text, size)) in lines.iter().enumerate() {
            let font = if *size >= BOLD_SIZE { "F2" } else { "F1" };
            let baseline = FIRST_BASELINE - LINE_SPACING * i as f32;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), Object::Real(*size)]));
            operations.push(Operation::new(
                "Td",
                vec![Object::Real(72.0), Object::Real(baseline)],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content encodes"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => regular_id,
                    "F2" => bold_id,
                },
            },
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        });
        kids.push(page_id.into());
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

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("document saves");
    buffer
}

/// Build a one-page PDF whose `Contents` is an array of raw content streams,
/// stored exactly as given. Font `F1` is Helvetica.
pub fn build_multi_stream_pdf(streams: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let contents: Vec<Object> = streams
        .iter()
        .map(|data| {
            doc.add_object(Stream::new(dictionary! {}, data.as_bytes().to_vec()))
                .into()
        })
        .collect();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => contents,
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(page_id)],
            "Count" => 1_i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("document saves");
    buffer
}

/// Write a synthetic PDF into `dir` and return its path.
pub fn write_pdf(dir: &Path, name: &str, pages: &[&[(&str, f32)]]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, build_pdf(pages)).expect("pdf written");
    path
}

/// A report-like document: title, two sections, body text.
pub fn sample_report() -> Vec<u8> {
    build_pdf(&[
        &[
            ("Annual Report 2025", 24.0),
            ("Introduction", 18.0),
            ("This report covers the year.", 12.0),
            ("It was a busy year.", 12.0),
        ],
        &[
            ("Financial Results", 13.5),
            ("Revenue grew in every quarter.", 12.0),
            ("Costs stayed flat.", 12.0),
        ],
    ])
}

/// Classifier stub: a line is a heading when it is larger than the body text.
pub fn larger_than_body(features: &FeatureVector) -> u8 {
    features.font_flag
}

/// Classifier stub that never finds a heading.
pub fn no_headings(_: &FeatureVector) -> u8 {
    0
}

/// A decision tree artifact equivalent to [`larger_than_body`].
pub const FONT_FLAG_MODEL: &str = r#"{
  "features": ["font_flag", "num_words", "text_case", "verb_count", "noun_count", "cardinal_count"],
  "model": {
    "kind": "decision_tree",
    "nodes": [
      {"split": {"feature": 0, "threshold": 0.5, "left": 1, "right": 2}},
      {"leaf": {"class": 0}},
      {"leaf": {"class": 1}}
    ]
  }
}"#;

/// Write [`FONT_FLAG_MODEL`] into `dir` and return its path.
pub fn write_model(dir: &Path) -> PathBuf {
    let path = dir.join("heading_model.json");
    fs::write(&path, FONT_FLAG_MODEL).expect("model written");
    path
}
