//! Directory batch processing.
//!
//! Every `*.pdf` file in the input directory is run through a
//! [`DocumentPipeline`] and its outline written to `<stem>.json` in the output
//! directory. Per-document failures are logged and recorded in the
//! [`BatchReport`]; they never stop the batch.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::classifier::HeadingClassifier;
use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::outline::DocumentPipeline;
use crate::parser::ParseOptions;
use crate::render::{write_json, JsonFormat};

/// Default input directory.
pub const DEFAULT_INPUT_DIR: &str = "/app/input";

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "/app/output";

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory scanned for PDF files
    pub input_dir: PathBuf,
    /// Directory receiving one JSON file per PDF
    pub output_dir: PathBuf,
    /// Output JSON layout
    pub json_format: JsonFormat,
    /// Options used to open each PDF
    pub parse: ParseOptions,
    /// Process documents on the rayon thread pool
    pub parallel: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            json_format: JsonFormat::Pretty,
            parse: ParseOptions::default(),
            parallel: false,
        }
    }
}

impl BatchOptions {
    /// Create batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input directory.
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Set the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// What happened to one input file.
#[derive(Debug)]
pub enum FileOutcome {
    Written {
        input: PathBuf,
        output: PathBuf,
        title: String,
        heading_count: usize,
    },
    Failed {
        input: PathBuf,
        error: Error,
    },
}

impl FileOutcome {
    /// The input PDF this outcome belongs to.
    pub fn input(&self) -> &Path {
        match self {
            FileOutcome::Written { input, .. } | FileOutcome::Failed { input, .. } => input,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Written { .. })
    }
}

/// Outcomes of a batch run, in directory-listing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// Number of documents whose JSON was written.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of documents that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Whether the input directory held no PDF files.
    pub fn no_pdfs_found(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// List the PDF files of a directory, in listing order.
///
/// Subdirectories and files without a `.pdf` extension are skipped.
pub fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            pdfs.push(path);
        }
    }
    Ok(pdfs)
}

/// Runs the outline pipeline over a directory.
pub struct BatchRunner<'a> {
    pipeline: DocumentPipeline<'a>,
    options: BatchOptions,
}

impl<'a> BatchRunner<'a> {
    pub fn new(classifier: &'a dyn HeadingClassifier, options: BatchOptions) -> Self {
        Self {
            pipeline: DocumentPipeline::new(classifier),
            options,
        }
    }

    /// Use a preconfigured pipeline.
    pub fn with_pipeline(pipeline: DocumentPipeline<'a>, options: BatchOptions) -> Self {
        Self { pipeline, options }
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Process every PDF in the input directory.
    ///
    /// Fails only when the output directory cannot be created or the input
    /// directory cannot be listed.
    pub fn run(&self) -> Result<BatchReport> {
        self.run_with_progress(|_| {})
    }

    /// Like [`run`](Self::run), calling `on_done` after each document.
    pub fn run_with_progress<F>(&self, on_done: F) -> Result<BatchReport>
    where
        F: Fn(&FileOutcome) + Sync,
    {
        fs::create_dir_all(&self.options.output_dir)?;
        let inputs = list_pdfs(&self.options.input_dir)?;
        Ok(self.process_listed(&inputs, on_done))
    }

    /// Process PDFs already listed with [`list_pdfs`], in the given order.
    ///
    /// The input directory is not read again.
    pub fn process_inputs<F>(&self, inputs: &[PathBuf], on_done: F) -> Result<BatchReport>
    where
        F: Fn(&FileOutcome) + Sync,
    {
        fs::create_dir_all(&self.options.output_dir)?;
        Ok(self.process_listed(inputs, on_done))
    }

    fn process_listed<F>(&self, inputs: &[PathBuf], on_done: F) -> BatchReport
    where
        F: Fn(&FileOutcome) + Sync,
    {
        if inputs.is_empty() {
            log::warn!(
                "No PDF files found in {}",
                self.options.input_dir.display()
            );
            return BatchReport::default();
        }
        log::info!("Found {} PDF files", inputs.len());

        let process = |input: &PathBuf| {
            let outcome = self.process_one(input);
            on_done(&outcome);
            outcome
        };
        let outcomes: Vec<FileOutcome> = if self.options.parallel {
            inputs.par_iter().map(process).collect()
        } else {
            inputs.iter().map(process).collect()
        };

        let report = BatchReport { outcomes };
        log::info!(
            "Batch complete: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        report
    }

    /// Path of the JSON file written for `input`.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let mut name = input
            .file_stem()
            .unwrap_or(OsStr::new("document"))
            .to_os_string();
        name.push(".json");
        self.options.output_dir.join(name)
    }

    fn process_one(&self, input: &Path) -> FileOutcome {
        let output = self.output_path(input);
        let result = self
            .pipeline
            .process_file(input, &self.options.parse)
            .and_then(|outline| {
                write_json(&outline, &output, self.options.json_format)?;
                Ok(outline)
            });

        match result {
            Ok(outline) => {
                log::info!(
                    "Processed {} -> {}",
                    input.display(),
                    output.display()
                );
                FileOutcome::Written {
                    input: input.to_path_buf(),
                    output,
                    title: outline.title,
                    heading_count: outline.headings.len(),
                }
            }
            Err(error) => {
                log::error!("Error processing {}: {}", input.display(), error);
                FileOutcome::Failed {
                    input: input.to_path_buf(),
                    error,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::FeatureVector;
    use tempfile::tempdir;

    fn never(_: &FeatureVector) -> u8 {
        0
    }

    #[test]
    fn test_batch_options_builder() {
        let options = BatchOptions::new()
            .with_input_dir("in")
            .with_output_dir("out")
            .with_json_format(JsonFormat::Compact)
            .with_parse_options(ParseOptions::new().lenient())
            .with_parallel(true);

        assert_eq!(options.input_dir, PathBuf::from("in"));
        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert_eq!(options.json_format, JsonFormat::Compact);
        assert!(options.parse.is_lenient());
        assert!(options.parallel);
    }

    #[test]
    fn test_default_directories() {
        let options = BatchOptions::default();
        assert_eq!(options.input_dir, PathBuf::from("/app/input"));
        assert_eq!(options.output_dir, PathBuf::from("/app/output"));
        assert!(!options.parallel);
    }

    #[test]
    fn test_list_pdfs_filters() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.pdf"), b"").unwrap();
        fs::write(dir.path().join("B.PDF"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let mut names: Vec<_> = list_pdfs(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["B.PDF", "a.pdf"]);
    }

    #[test]
    fn test_output_path_uses_stem() {
        let classifier = never;
        let runner = BatchRunner::new(&classifier, BatchOptions::new().with_output_dir("/tmp/out"));
        assert_eq!(
            runner.output_path(Path::new("/in/report.v2.PDF")),
            PathBuf::from("/tmp/out/report.v2.json")
        );
    }

    #[test]
    fn test_empty_directory() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        let out_dir = output.path().join("nested");
        let options = BatchOptions::new()
            .with_input_dir(input.path())
            .with_output_dir(&out_dir);

        let report = BatchRunner::new(&never, options).run().unwrap();
        assert!(report.no_pdfs_found());
        assert_eq!(report.succeeded(), 0);
        assert!(out_dir.is_dir());
    }

    #[test]
    fn test_missing_input_directory() {
        let output = tempdir().unwrap();
        let options = BatchOptions::new()
            .with_input_dir("/nonexistent/input")
            .with_output_dir(output.path());
        let result = BatchRunner::new(&never, options).run();
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_process_inputs_keeps_given_order() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        let out_dir = output.path().join("outlines");
        let first = input.path().join("z.pdf");
        let second = input.path().join("a.pdf");
        fs::write(&first, b"garbage").unwrap();
        fs::write(&second, b"garbage").unwrap();
        // Listed but gone before processing.
        let missing = input.path().join("m.pdf");

        let options = BatchOptions::new()
            .with_input_dir(input.path())
            .with_output_dir(&out_dir);
        let inputs = vec![first.clone(), missing.clone(), second.clone()];
        let report = BatchRunner::new(&never, options)
            .process_inputs(&inputs, |_| {})
            .unwrap();

        let seen: Vec<_> = report
            .outcomes
            .iter()
            .map(|o| o.input().to_path_buf())
            .collect();
        assert_eq!(seen, inputs);
        assert_eq!(report.failed(), 3);
        assert!(out_dir.is_dir());
    }

    #[test]
    fn test_invalid_pdf_is_recorded_as_failure() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(input.path().join("broken.pdf"), b"not a pdf at all").unwrap();

        let options = BatchOptions::new()
            .with_input_dir(input.path())
            .with_output_dir(output.path());
        let report = BatchRunner::new(&never, options).run().unwrap();

        assert_eq!(report.failed(), 1);
        assert!(matches!(
            &report.outcomes[0],
            FileOutcome::Failed {
                error: Error::UnknownFormat,
                ..
            }
        ));
        assert!(!output.path().join("broken.json").exists());
    }
}
