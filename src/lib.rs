//! # pdfoutline
//!
//! Title and heading extraction from PDF documents.
//!
//! A document is read twice: once as font-tagged spans grouped into lines,
//! from which the title is chosen by font size, and once as positioned
//! words assembled into lines, which a trained classifier sorts into
//! headings and body text. Heading levels (H1/H2/H3) follow from each
//! heading's size relative to the document's most common font size.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfoutline::{extract_outline, render, HeadingModel};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let model = HeadingModel::load("heading_model.json")?;
//!     let outline = extract_outline("document.pdf", &model)?;
//!
//!     println!("{}", render::to_json(&outline, render::JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Batch processing
//!
//! ```no_run
//! use pdfoutline::{BatchOptions, BatchRunner, HeadingModel};
//!
//! fn main() -> pdfoutline::Result<()> {
//!     let model = HeadingModel::load("heading_model.json")?;
//!     let options = BatchOptions::new()
//!         .with_input_dir("pdfs")
//!         .with_output_dir("outlines");
//!
//!     let report = BatchRunner::new(&model, options).run()?;
//!     println!("{} written, {} failed", report.succeeded(), report.failed());
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod classifier;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{BatchOptions, BatchReport, BatchRunner, FileOutcome};
pub use classifier::{HeadingClassifier, HeadingModel};
pub use error::{Error, Result};
pub use model::{DocumentResult, Heading, HeadingLevel, Line, PositionedToken, UNTITLED_DOCUMENT};
pub use outline::{DocumentPipeline, FeatureVector, LexiconTagger, PosTagger, TextCase};
pub use parser::{DocumentSource, ErrorMode, ParseOptions, PdfDocument};
pub use render::JsonFormat;

use std::path::Path;

/// Extract the title and headings of a PDF file.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{extract_outline, HeadingModel};
///
/// let model = HeadingModel::load("heading_model.json").unwrap();
/// let outline = extract_outline("document.pdf", &model).unwrap();
/// println!("{}", outline.title);
/// ```
pub fn extract_outline<P: AsRef<Path>>(
    path: P,
    classifier: &dyn HeadingClassifier,
) -> Result<DocumentResult> {
    extract_outline_with_options(path, classifier, ParseOptions::default())
}

/// Extract the title and headings of a PDF file with custom parse options.
///
/// # Example
///
/// ```no_run
/// use pdfoutline::{extract_outline_with_options, HeadingModel, ParseOptions};
///
/// let model = HeadingModel::load("heading_model.json").unwrap();
/// let outline =
///     extract_outline_with_options("document.pdf", &model, ParseOptions::new().lenient())
///         .unwrap();
/// ```
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    classifier: &dyn HeadingClassifier,
    options: ParseOptions,
) -> Result<DocumentResult> {
    DocumentPipeline::new(classifier).process_file(path, &options)
}

/// Extract the title and headings of a PDF held in memory.
pub fn extract_outline_from_bytes(
    data: &[u8],
    classifier: &dyn HeadingClassifier,
) -> Result<DocumentResult> {
    let document = PdfDocument::from_bytes(data)?;
    DocumentPipeline::new(classifier).process(&document)
}
