//! Benchmarks for outline extraction.
//!
//! Run with: cargo bench
//!
//! Documents are synthetic: each page has a large heading followed by body lines.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pdfoutline::outline::{assemble_lines, FeatureExtractor};
use pdfoutline::{extract_outline_from_bytes, FeatureVector, LexiconTagger, Line, PositionedToken};

/// Creates a PDF with `page_count` pages of one heading and twenty body lines.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in 0..page_count {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Real(20.0)]),
            Operation::new("Td", vec![Object::Real(72.0), Object::Real(720.0)]),
            Operation::new(
                "Tj",
                vec![Object::string_literal(format!("Section {} Overview of Results", page + 1))],
            ),
            Operation::new("Tf", vec!["F1".into(), Object::Real(11.0)]),
        ];
        for line in 0..20 {
            operations.push(Operation::new(
                "Td",
                vec![Object::Real(0.0), Object::Real(-24.0)],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(format!(
                    "Line {} describes the measured values and reviews 3 proposals.",
                    line + 1
                ))],
            ));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations }.encode().unwrap();
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut data = Vec::new();
    doc.save_to(&mut data).unwrap();
    data
}

fn larger_than_body(features: &FeatureVector) -> u8 {
    features.font_flag
}

/// Benchmark line assembly from positioned tokens.
fn bench_line_assembly(c: &mut Criterion) {
    let tokens: Vec<PositionedToken> = (0..50)
        .flat_map(|line| {
            (0..10).map(move |word| {
                PositionedToken::new(
                    format!("word{}", word),
                    72.0 + 40.0 * (9 - word) as f32,
                    60.0 + 14.0 * line as f32,
                    11.0,
                )
            })
        })
        .collect();

    c.bench_function("assemble_500_tokens", |b| {
        b.iter(|| assemble_lines(black_box(&tokens), 1));
    });
}

/// Benchmark tagging and feature extraction.
fn bench_feature_extraction(c: &mut Criterion) {
    let tagger = LexiconTagger::new();
    let extractor = FeatureExtractor::new(&tagger);
    let line = Line::new(
        "3.2 The committee will review 12 funding proposals in March",
        12.0,
        1,
    );

    c.bench_function("extract_features", |b| {
        b.iter(|| extractor.extract(black_box(&line), 11.0).unwrap());
    });
}

/// Benchmark the full pipeline at various document sizes.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline");

    for page_count in [1, 5, 10].iter() {
        let data = create_test_pdf(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| extract_outline_from_bytes(black_box(&data), &larger_than_body).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_line_assembly,
    bench_feature_extraction,
    bench_pipeline,
);
criterion_main!(benches);
