//! Types shared between the extraction passes and the outline output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Title used when no heading candidate survives filtering.
pub const UNTITLED_DOCUMENT: &str = "Untitled Document";

/// A single word placed on a page.
///
/// `y` is measured from the top of the page down to the top of the word.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
}

impl PositionedToken {
    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size,
        }
    }
}

/// A visual line assembled from tokens sharing a vertical band.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Token texts joined by single spaces, left to right
    pub text: String,
    /// Largest token font size on the line
    pub font_size: f32,
    /// 1-based page number
    pub page: u32,
}

impl Line {
    pub fn new(text: impl Into<String>, font_size: f32, page: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            page,
        }
    }
}

/// A font-size-filtered line considered for the document title.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    pub text: String,
    pub font_size: f32,
    pub font_name: String,
    pub flags: u32,
    pub page: u32,
}

/// Heading level inferred from relative font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classifier-predicted heading in the output outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

/// The extracted outline of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResult {
    pub title: String,
    pub headings: Vec<Heading>,
}
