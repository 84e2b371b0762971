//! Error types for pdfoutline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting an outline.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// A line could not be tokenized or tagged.
    #[error("Feature extraction error: {0}")]
    FeatureExtraction(String),

    /// The classifier artifact does not exist.
    #[error("Model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    /// The classifier artifact exists but could not be deserialized or validated.
    #[error("Error loading model: {0}")]
    ModelLoad(String),

    /// The classifier returned an unusable prediction batch.
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Error serializing the output.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error aborts a whole run rather than a single document.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ModelNotFound(_) | Error::ModelLoad(_))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        let err = Error::ModelNotFound(PathBuf::from("heading_model.json"));
        assert_eq!(err.to_string(), "Model file not found: heading_model.json");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_only_model_errors_are_fatal() {
        assert!(Error::ModelLoad("bad json".into()).is_fatal());
        assert!(Error::ModelNotFound(PathBuf::from("m.json")).is_fatal());
        assert!(!Error::PdfParse("xref".into()).is_fatal());
        assert!(!Error::FeatureExtraction("tag".into()).is_fatal());
        assert!(!Error::UnknownFormat.is_fatal());
    }
}
