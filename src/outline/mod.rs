//! Title and heading inference.
//!
//! Two independent passes read a [`DocumentSource`](crate::parser::DocumentSource):
//! the title pass ranks span lines by font size, and the heading pass
//! assembles token lines, extracts features, and asks a
//! [`HeadingClassifier`](crate::classifier::HeadingClassifier) which lines
//! are headings. [`DocumentPipeline`] merges the two.

mod features;
mod headings;
mod lines;
mod pipeline;
mod tagger;
mod title;

pub use features::{FeatureExtractor, FeatureVector, TextCase, FEATURE_NAMES};
pub use headings::{heading_level, HeadingClassifierStage, H1_RATIO, H2_RATIO};
pub use lines::{assemble_lines, FontStatistics};
pub use pipeline::{assemble_pages, resolve_title, DocumentPipeline};
pub use tagger::{word_tokenize, LexiconTagger, PosTagger};
pub use title::{compose_title, detect_title, heading_candidates, TITLE_MIN_FONT_SIZE};
