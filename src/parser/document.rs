//! Document handle exposing the two read-only views used by the outline passes.
//!
//! The span view groups text spans into baseline-aligned lines and keeps each
//! span's font metadata. The token view splits spans into positioned words in
//! top-down page coordinates. Each view re-reads the page content on its own.

use std::path::Path;

use crate::error::Result;
use crate::model::PositionedToken;

use super::backend::{LopdfBackend, PageId, PdfBackend};
use super::content::{SpanExtractor, TextSpan};
use super::options::ParseOptions;

/// Font size given to words whose span reports no usable size.
const FALLBACK_FONT_SIZE: f32 = 12.0;

/// Spans whose baselines differ by less than this fraction of the font size share a line.
const BASELINE_TOLERANCE: f32 = 0.3;

/// Spans on one baseline, sorted left to right.
#[derive(Debug, Clone)]
pub struct SpanLine {
    pub spans: Vec<TextSpan>,
}

impl SpanLine {
    /// Create a line from spans, sorting them by X position.
    pub fn from_spans(mut spans: Vec<TextSpan>) -> Self {
        spans.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self { spans }
    }

    /// Span texts, each trimmed, joined with single spaces.
    pub fn merged_text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The leftmost span, whose font metadata describes the line.
    pub fn first_span(&self) -> Option<&TextSpan> {
        self.spans.first()
    }
}

/// Span view of one page.
#[derive(Debug, Clone)]
pub struct SpanPage {
    /// 1-based page number
    pub number: u32,
    pub lines: Vec<SpanLine>,
}

/// Token view of one page.
#[derive(Debug, Clone)]
pub struct TokenPage {
    /// 1-based page number
    pub number: u32,
    pub tokens: Vec<PositionedToken>,
}

/// A readable document offering both extraction views.
pub trait DocumentSource {
    /// Lines of font-tagged spans, page by page.
    fn span_pages(&self) -> Result<Vec<SpanPage>>;

    /// Positioned word tokens, page by page.
    fn token_pages(&self) -> Result<Vec<TokenPage>>;
}

/// A PDF document read through a [`PdfBackend`].
pub struct PdfDocument<B: PdfBackend = LopdfBackend> {
    backend: B,
    options: ParseOptions,
}

impl PdfDocument<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let backend = LopdfBackend::load_file(path)?;
        Ok(Self::with_backend(backend, options))
    }

    /// Read a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Read a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self::with_backend(backend, options))
    }
}

impl<B: PdfBackend> PdfDocument<B> {
    /// Wrap an already opened backend.
    pub fn with_backend(backend: B, options: ParseOptions) -> Self {
        Self { backend, options }
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Extract the spans of one page, honouring the error mode.
    fn page_spans(&self, number: u32, page: PageId) -> Result<Vec<TextSpan>> {
        let extracted = SpanExtractor::new(&self.backend, page).and_then(|e| e.extract());
        match extracted {
            Ok(spans) => Ok(spans),
            Err(e) if self.options.is_lenient() => {
                log::warn!("Failed to extract text from page {}: {}", number, e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

impl<B: PdfBackend> DocumentSource for PdfDocument<B> {
    fn span_pages(&self) -> Result<Vec<SpanPage>> {
        let mut pages = Vec::new();
        for (number, page) in self.backend.pages() {
            let spans = self.page_spans(number, page)?;
            pages.push(SpanPage {
                number,
                lines: group_spans_into_lines(spans),
            });
        }
        Ok(pages)
    }

    fn token_pages(&self) -> Result<Vec<TokenPage>> {
        let mut pages = Vec::new();
        for (number, page) in self.backend.pages() {
            let (_, height) = self.backend.page_size(page);
            let tokens = self
                .page_spans(number, page)?
                .iter()
                .flat_map(|span| span_tokens(span, height))
                .collect();
            pages.push(TokenPage { number, tokens });
        }
        Ok(pages)
    }
}

/// Group spans into lines by baseline, top of the page first.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<SpanLine> {
    if spans.is_empty() {
        return vec![];
    }

    // PDF Y grows upwards
    spans.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut lines = Vec::new();
    let mut current: Vec<TextSpan> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.font_size * BASELINE_TOLERANCE;
        match current_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(SpanLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(SpanLine::from_spans(current));
    }

    lines
}

/// Split a span into whitespace-delimited words in top-down coordinates.
///
/// Word X positions are interpolated from character offsets within the span.
pub fn span_tokens(span: &TextSpan, page_height: f32) -> Vec<PositionedToken> {
    let font_size = if span.font_size.is_finite() && span.font_size > 0.0 {
        span.font_size
    } else {
        FALLBACK_FONT_SIZE
    };

    let char_count = span.text.chars().count().max(1);
    let char_width = span.width / char_count as f32;
    let top = page_height - span.top();

    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut word_start = 0usize;

    for (i, c) in span.text.chars().enumerate() {
        if c.is_whitespace() {
            if !word.is_empty() {
                let x = span.x + word_start as f32 * char_width;
                tokens.push(PositionedToken::new(std::mem::take(&mut word), x, top, font_size));
            }
        } else {
            if word.is_empty() {
                word_start = i;
            }
            word.push(c);
        }
    }
    if !word.is_empty() {
        let x = span.x + word_start as f32 * char_width;
        tokens.push(PositionedToken::new(word, x, top, font_size));
    }

    tokens
}
