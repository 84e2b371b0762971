//! PDF reading: backend access, content stream interpretation and document views.

pub mod backend;
mod content;
mod document;
mod options;

pub use backend::{LopdfBackend, PdfBackend};
pub use content::{TextSpan, FLAG_BOLD, FLAG_ITALIC};
pub use document::{
    group_spans_into_lines, span_tokens, DocumentSource, PdfDocument, SpanLine, SpanPage,
    TokenPage,
};
pub use options::{ErrorMode, ParseOptions};
