//! Classifier-driven heading detection over assembled lines.

use std::collections::BTreeMap;

use crate::classifier::HeadingClassifier;
use crate::error::{Error, Result};
use crate::model::{Heading, HeadingLevel, Line};

use super::features::FeatureExtractor;
use super::tagger::PosTagger;

/// Minimum size ratio to the modal font size for an H1.
pub const H1_RATIO: f64 = 1.2;

/// Minimum size ratio to the modal font size for an H2.
pub const H2_RATIO: f64 = 1.1;

/// Level of a heading line from its size relative to the modal font size.
pub fn heading_level(font_size: f32, modal_font_size: f32) -> HeadingLevel {
    let size = f64::from(font_size);
    let modal = f64::from(modal_font_size);
    if size >= H1_RATIO * modal {
        HeadingLevel::H1
    } else if size >= H2_RATIO * modal {
        HeadingLevel::H2
    } else {
        HeadingLevel::H3
    }
}

/// Runs feature extraction and the classifier page by page.
pub struct HeadingClassifierStage<'a> {
    classifier: &'a dyn HeadingClassifier,
    tagger: &'a dyn PosTagger,
}

impl<'a> HeadingClassifierStage<'a> {
    pub fn new(classifier: &'a dyn HeadingClassifier, tagger: &'a dyn PosTagger) -> Self {
        Self { classifier, tagger }
    }

    /// Classify every line and return the positive ones as headings.
    ///
    /// Pages are visited in ascending order and each page is sent to the
    /// classifier as one batch. Headings keep their top-to-bottom order.
    pub fn classify(
        &self,
        lines_by_page: &BTreeMap<u32, Vec<Line>>,
        modal_font_size: f32,
    ) -> Result<Vec<Heading>> {
        let extractor = FeatureExtractor::new(self.tagger);
        let mut headings = Vec::new();

        for (&page, lines) in lines_by_page {
            if lines.is_empty() {
                continue;
            }

            let batch = lines
                .iter()
                .map(|line| extractor.extract(line, modal_font_size))
                .collect::<Result<Vec<_>>>()?;
            let predictions = self.classifier.predict(&batch)?;
            if predictions.len() != lines.len() {
                return Err(Error::Prediction(format!(
                    "page {}: {} predictions for {} lines",
                    page,
                    predictions.len(),
                    lines.len()
                )));
            }

            for (line, prediction) in lines.iter().zip(predictions) {
                match prediction {
                    0 => {}
                    1 => headings.push(Heading {
                        level: heading_level(line.font_size, modal_font_size),
                        text: line.text.clone(),
                        page,
                    }),
                    other => {
                        return Err(Error::Prediction(format!(
                            "page {}: unexpected class {}",
                            page, other
                        )));
                    }
                }
            }
        }

        log::debug!("{} lines classified as headings", headings.len());
        Ok(headings)
    }
}
