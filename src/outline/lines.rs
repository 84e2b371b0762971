//! Line assembly from positioned tokens, and document font statistics.

use std::collections::BTreeMap;

use crate::model::{Line, PositionedToken};

/// Quantize a vertical coordinate to its line key (tenths of a point, truncated).
fn line_key(y: f32) -> i64 {
    (f64::from(y) * 10.0).floor() as i64
}

/// Group one page's tokens into visual lines.
///
/// Tokens whose vertical coordinate falls in the same tenth of a point form a
/// line. Within a line tokens are ordered by X and their texts joined with
/// single spaces; the line's font size is the largest token size. Lines come
/// out top to bottom.
pub fn assemble_lines(tokens: &[PositionedToken], page: u32) -> Vec<Line> {
    let mut groups: BTreeMap<i64, Vec<&PositionedToken>> = BTreeMap::new();
    for token in tokens {
        groups.entry(line_key(token.y)).or_default().push(token);
    }

    groups
        .into_values()
        .map(|mut group| {
            group.sort_by(|a, b| a.x.total_cmp(&b.x));
            let text = group
                .iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let font_size = group
                .iter()
                .map(|t| t.font_size)
                .fold(f32::NEG_INFINITY, f32::max);
            Line::new(text, font_size, page)
        })
        .collect()
}

/// Font size observations for a whole document.
#[derive(Debug, Clone, Default)]
pub struct FontStatistics {
    sizes: Vec<f32>,
}

impl FontStatistics {
    /// Collect the font sizes of every line.
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a Line>) -> Self {
        let mut stats = Self::default();
        for line in lines {
            stats.add_size(line.font_size);
        }
        stats
    }

    /// Add a font size observation.
    pub fn add_size(&mut self, size: f32) {
        self.sizes.push(size);
    }

    /// The most frequent font size; the smallest one on ties.
    ///
    /// Returns `None` when nothing was observed.
    pub fn modal_size(&self) -> Option<f32> {
        let mut sorted = self.sizes.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mut best: Option<(f32, usize)> = None;
        let mut i = 0;
        while i < sorted.len() {
            let size = sorted[i];
            let run = sorted[i..].iter().take_while(|s| **s == size).count().max(1);
            if best.map_or(true, |(_, count)| run > count) {
                best = Some((size, run));
            }
            i += run;
        }
        best.map(|(size, _)| size)
    }
}
