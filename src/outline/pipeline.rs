//! Per-document orchestration of the title and heading passes.

use std::collections::BTreeMap;
use std::path::Path;

use crate::classifier::HeadingClassifier;
use crate::error::Result;
use crate::model::{DocumentResult, Heading, Line, UNTITLED_DOCUMENT};
use crate::parser::{DocumentSource, ParseOptions, PdfDocument, TokenPage};

use super::headings::HeadingClassifierStage;
use super::lines::{assemble_lines, FontStatistics};
use super::tagger::{LexiconTagger, PosTagger};
use super::title::detect_title;

/// Extracts the outline of one document at a time.
///
/// The classifier is borrowed, so a single loaded model can serve any number
/// of pipelines and documents.
pub struct DocumentPipeline<'a> {
    classifier: &'a dyn HeadingClassifier,
    tagger: Box<dyn PosTagger>,
}

impl<'a> DocumentPipeline<'a> {
    /// Create a pipeline using the built-in [`LexiconTagger`].
    pub fn new(classifier: &'a dyn HeadingClassifier) -> Self {
        Self {
            classifier,
            tagger: Box::new(LexiconTagger::new()),
        }
    }

    /// Replace the part-of-speech tagger.
    pub fn with_tagger(mut self, tagger: impl PosTagger + 'static) -> Self {
        self.tagger = Box::new(tagger);
        self
    }

    /// Open a PDF file and extract its outline.
    pub fn process_file<P: AsRef<Path>>(
        &self,
        path: P,
        options: &ParseOptions,
    ) -> Result<DocumentResult> {
        let path = path.as_ref();
        log::info!("Processing {}", path.display());
        let document = PdfDocument::open_with_options(path, options.clone())?;
        self.process(&document)
    }

    /// Extract the outline of an opened document.
    ///
    /// The title comes from the span view and the headings from the token
    /// view; the two passes are independent.
    pub fn process(&self, source: &dyn DocumentSource) -> Result<DocumentResult> {
        let title = detect_title(&source.span_pages()?);
        let headings = self.detect_headings(&source.token_pages()?)?;
        Ok(resolve_title(title, headings))
    }

    /// Run the heading pass over the token view.
    pub fn detect_headings(&self, pages: &[TokenPage]) -> Result<Vec<Heading>> {
        let lines_by_page = assemble_pages(pages);
        let stats = FontStatistics::from_lines(lines_by_page.values().flatten());

        let Some(modal_font_size) = stats.modal_size() else {
            log::warn!("No text lines found");
            return Ok(Vec::new());
        };
        log::debug!("Modal font size: {}", modal_font_size);

        HeadingClassifierStage::new(self.classifier, self.tagger.as_ref())
            .classify(&lines_by_page, modal_font_size)
    }
}

/// Assemble the lines of every page, keyed by page number.
pub fn assemble_pages(pages: &[TokenPage]) -> BTreeMap<u32, Vec<Line>> {
    pages
        .iter()
        .map(|page| (page.number, assemble_lines(&page.tokens, page.number)))
        .collect()
}

/// Combine the title and headings into the final result.
///
/// An untitled document takes its first heading as the title, and that
/// heading leaves the list.
pub fn resolve_title(title: String, mut headings: Vec<Heading>) -> DocumentResult {
    if title == UNTITLED_DOCUMENT && !headings.is_empty() {
        let first = headings.remove(0);
        return DocumentResult {
            title: first.text,
            headings,
        };
    }
    DocumentResult { title, headings }
}
