//! Per-line feature extraction for the heading classifier.

use crate::error::Result;
use crate::model::Line;

use super::tagger::PosTagger;

/// Feature names in the column order the classifier expects.
pub const FEATURE_NAMES: [&str; 6] = [
    "font_flag",
    "num_words",
    "text_case",
    "verb_count",
    "noun_count",
    "cardinal_count",
];

/// Letter case shape of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextCase {
    Lower = 0,
    Upper = 1,
    Title = 2,
    Mixed = 3,
}

impl TextCase {
    /// Classify text, checking lowercase, then uppercase, then title case.
    pub fn of(text: &str) -> Self {
        if is_lower(text) {
            TextCase::Lower
        } else if is_upper(text) {
            TextCase::Upper
        } else if is_title(text) {
            TextCase::Title
        } else {
            TextCase::Mixed
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// At least one cased character, and none of them uppercase.
fn is_lower(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            return false;
        }
        cased |= c.is_lowercase();
    }
    cased
}

/// At least one cased character, and none of them lowercase.
fn is_upper(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        cased |= c.is_uppercase();
    }
    cased
}

/// Uppercase letters only start a cased run, lowercase letters only continue one.
fn is_title(text: &str) -> bool {
    let mut cased = false;
    let mut previous_cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            cased = true;
        } else {
            previous_cased = false;
        }
    }
    cased
}

/// The six classifier inputs for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureVector {
    /// 1 when the line is set larger than the document's modal font size
    pub font_flag: u8,
    pub num_words: u32,
    pub text_case: TextCase,
    pub verb_count: u32,
    pub noun_count: u32,
    pub cardinal_count: u32,
}

impl FeatureVector {
    /// Values in [`FEATURE_NAMES`] order.
    pub fn to_array(&self) -> [f64; 6] {
        [
            f64::from(self.font_flag),
            f64::from(self.num_words),
            f64::from(self.text_case.code()),
            f64::from(self.verb_count),
            f64::from(self.noun_count),
            f64::from(self.cardinal_count),
        ]
    }
}

/// Turns lines into feature vectors using a part-of-speech tagger.
pub struct FeatureExtractor<'a, T: PosTagger + ?Sized> {
    tagger: &'a T,
}

impl<'a, T: PosTagger + ?Sized> FeatureExtractor<'a, T> {
    pub fn new(tagger: &'a T) -> Self {
        Self { tagger }
    }

    /// Compute the feature vector of `line` against the document's modal font size.
    ///
    /// Tagging failures are returned as errors.
    pub fn extract(&self, line: &Line, modal_font_size: f32) -> Result<FeatureVector> {
        let tagged = self.tagger.tag(&line.text)?;
        let count = |prefix: &str| {
            tagged
                .iter()
                .filter(|(_, tag)| tag.starts_with(prefix))
                .count() as u32
        };

        Ok(FeatureVector {
            font_flag: u8::from(line.font_size > modal_font_size),
            num_words: line.text.split_whitespace().count() as u32,
            text_case: TextCase::of(&line.text),
            verb_count: count("VB"),
            noun_count: count("NN"),
            cardinal_count: count("CD"),
        })
    }
}
