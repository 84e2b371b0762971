//! Title detection from the span view.
//!
//! Independent of the classifier: any line whose leading span is set at
//! [`TITLE_MIN_FONT_SIZE`] or larger is a candidate, and the title is composed
//! from the largest candidates.

use unicode_normalization::UnicodeNormalization;

use crate::model::{HeadingCandidate, UNTITLED_DOCUMENT};
use crate::parser::SpanPage;

/// Smallest leading-span font size considered for the title.
pub const TITLE_MIN_FONT_SIZE: f32 = 13.0;

/// Line text never taken as a title candidate (compared case-insensitively).
const EXCLUDED_TEXT: &str = "overview";

/// Collect title candidates from every line of every page.
///
/// Each line's spans are merged into one string; the font metadata of the
/// line's first span describes the candidate.
pub fn heading_candidates(pages: &[SpanPage]) -> Vec<HeadingCandidate> {
    let mut candidates = Vec::new();

    for page in pages {
        for line in &page.lines {
            let Some(first) = line.first_span() else {
                continue;
            };
            let text = line.merged_text();
            if first.font_size < TITLE_MIN_FONT_SIZE || is_excluded(&text) {
                continue;
            }
            candidates.push(HeadingCandidate {
                text,
                font_size: first.font_size,
                font_name: first.font_name.clone(),
                flags: first.flags(),
                page: page.number,
            });
        }
    }

    log::debug!("{} title candidates", candidates.len());
    candidates
}

fn is_excluded(text: &str) -> bool {
    let normalized: String = text.trim().nfkc().collect();
    normalized.to_lowercase() == EXCLUDED_TEXT
}

/// Compose a title from candidates.
///
/// Two or more candidates: the two largest by font size, ordered by page and
/// joined with a space. One candidate: its text. None: [`UNTITLED_DOCUMENT`].
pub fn compose_title(candidates: &[HeadingCandidate]) -> String {
    let title = match candidates {
        [] => UNTITLED_DOCUMENT.to_string(),
        [only] => only.text.clone(),
        _ => {
            let mut by_size: Vec<&HeadingCandidate> = candidates.iter().collect();
            // stable: equal sizes keep document order
            by_size.sort_by(|a, b| b.font_size.total_cmp(&a.font_size));
            let mut top: Vec<&HeadingCandidate> = by_size.into_iter().take(2).collect();
            top.sort_by_key(|c| c.page);
            top.iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        }
    };

    title.trim().to_string()
}

/// Detect the document title from its span view.
pub fn detect_title(pages: &[SpanPage]) -> String {
    compose_title(&heading_candidates(pages))
}
