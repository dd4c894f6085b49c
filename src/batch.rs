//! Batch processing of PDF directories.
//!
//! Every document is handled in isolation: a failure is turned into a
//! degraded record for that file and never stops the batch. Records are
//! collected first and written afterwards, one `<stem>.json` per input.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::model::OutlineResult;
use crate::outline::OutlineExtractor;
use crate::parser::{ExtractOptions, LayoutSource, LopdfSource};
use crate::render::{to_json, JsonFormat};

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Per-document extraction options
    pub extract: ExtractOptions,

    /// Process documents in parallel
    pub parallel: bool,

    /// Upper bound on worker threads (`None` = CPU count)
    pub max_workers: Option<usize>,

    /// Output JSON layout
    pub json_format: JsonFormat,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process documents one after another on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Cap the number of worker threads.
    pub fn with_max_workers(mut self, workers: usize) -> Self {
        self.max_workers = Some(workers.max(1));
        self
    }

    /// Set per-document extraction options.
    pub fn with_extract_options(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    /// Set the output JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Worker count for `jobs` documents.
    fn worker_count(&self, jobs: usize) -> usize {
        let cap = self.max_workers.unwrap_or_else(num_cpus::get);
        cap.min(jobs).max(1)
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            parallel: true,
            max_workers: None,
            json_format: JsonFormat::Pretty,
        }
    }
}

/// Outcome tag of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The outline was extracted
    Success,
    /// A degraded record was produced
    Error,
}

/// The record produced for one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    /// Input path
    pub path: PathBuf,

    /// Outcome tag
    pub status: Status,

    /// The record to persist
    pub result: OutlineResult,
}

impl FileReport {
    /// Check if extraction succeeded.
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Output file name: the input stem with a `.json` extension.
    pub fn output_name(&self) -> String {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        format!("{}.json", stem)
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Files processed
    pub total: usize,
    /// Files with an extracted outline
    pub succeeded: usize,
    /// Files with a degraded record
    pub failed: usize,
    /// Output files written
    pub written: Vec<PathBuf>,
}

/// Turn an extraction error into the degraded record for a document.
pub fn failure_record(name: &str, error: &Error) -> OutlineResult {
    let message = match error {
        Error::PageLimitExceeded { .. } => format!("Error: {}", error),
        _ => format!("Error processing file: {}", error),
    };
    OutlineResult::failure(name, message)
}

/// Run one document's work, turning a panic into an error.
///
/// lopdf can panic on malformed files.
fn guarded<T>(work: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(work)).unwrap_or_else(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown cause".to_string());
        Err(Error::Other(format!("extraction panicked: {}", detail)))
    })
}

/// Extract one document from any layout source, never failing.
///
/// `name` is used as the title of the degraded record on error, including
/// when the source panics.
pub fn process_source<S: LayoutSource + ?Sized>(
    name: &str,
    source: &S,
    options: &ExtractOptions,
) -> (Status, OutlineResult) {
    let extractor = OutlineExtractor::with_options(options.clone());
    match guarded(|| extractor.extract(source)) {
        Ok(result) => (Status::Success, result),
        Err(e) => {
            log::warn!("Failed to process {}: {}", name, e);
            (Status::Error, failure_record(name, &e))
        }
    }
}

/// Open and extract one PDF file, never failing.
pub fn process_file(path: &Path, options: &ExtractOptions) -> FileReport {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let (status, result) = match guarded(|| LopdfSource::open(path)) {
        Ok(source) => process_source(&name, &source, options),
        Err(e) => {
            log::warn!("Failed to open {}: {}", name, e);
            (Status::Error, failure_record(&name, &e))
        }
    };

    FileReport {
        path: path.to_path_buf(),
        status,
        result,
    }
}

/// List `*.pdf` files (any extension case) directly inside a directory, sorted.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Process files, in parallel unless disabled. Reports keep input order.
pub fn process_paths(paths: &[PathBuf], options: &BatchOptions) -> Result<Vec<FileReport>> {
    process_paths_with(paths, options, |_| {})
}

/// Like [`process_paths`], calling `on_done` as each file finishes.
pub fn process_paths_with<F>(
    paths: &[PathBuf],
    options: &BatchOptions,
    on_done: F,
) -> Result<Vec<FileReport>>
where
    F: Fn(&FileReport) + Sync,
{
    let process = |path: &PathBuf| {
        let report = process_file(path, &options.extract);
        on_done(&report);
        report
    };

    if !options.parallel || paths.len() <= 1 {
        return Ok(paths.iter().map(process).collect());
    }

    let workers = options.worker_count(paths.len());
    log::info!("Processing {} files with {} workers", paths.len(), workers);

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| Error::Other(format!("Failed to build worker pool: {}", e)))?;

    Ok(pool.install(|| paths.par_iter().map(process).collect()))
}

/// Write each report to `<out_dir>/<stem>.json`, creating the directory.
pub fn write_reports(
    reports: &[FileReport],
    out_dir: &Path,
    format: JsonFormat,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(reports.len());
    for report in reports {
        let out_path = out_dir.join(report.output_name());
        fs::write(&out_path, to_json(&report.result, format)?)?;
        written.push(out_path);
    }
    Ok(written)
}

/// Process every PDF in `input_dir` and write records to `output_dir`.
pub fn run_batch(input_dir: &Path, output_dir: &Path, options: &BatchOptions) -> Result<BatchSummary> {
    let paths = discover_pdfs(input_dir)?;
    log::info!("Found {} PDF files in {}", paths.len(), input_dir.display());

    let reports = process_paths(&paths, options)?;
    let written = write_reports(&reports, output_dir, options.json_format)?;

    let succeeded = reports.iter().filter(|r| r.is_success()).count();
    Ok(BatchSummary {
        total: reports.len(),
        succeeded,
        failed: reports.len() - succeeded,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, LayoutDocument, LayoutPage, OutlineEntry, TocEntry};

    #[test]
    fn test_failure_messages() {
        let limit = Error::PageLimitExceeded {
            pages: 60,
            limit: 50,
        };
        assert_eq!(
            failure_record("big.pdf", &limit),
            OutlineResult::failure("big.pdf", "Error: PDF exceeds 50 page limit")
        );

        let other = failure_record("bad.pdf", &Error::UnknownFormat);
        assert_eq!(other.title, "bad.pdf");
        assert!(other.outline[0].text.starts_with("Error processing file: "));
        assert_eq!(other.outline[0].level, HeadingLevel::H1);
        assert_eq!(other.outline[0].page, 1);
    }

    #[test]
    fn test_process_source_page_limit() {
        let mut doc = LayoutDocument::new();
        for n in 1..=60 {
            doc.add_page(LayoutPage::new(n));
        }
        let (status, result) = process_source("long.pdf", &doc, &ExtractOptions::default());
        assert_eq!(status, Status::Error);
        assert_eq!(result.title, "long.pdf");
        assert_eq!(
            result.outline,
            vec![OutlineEntry::new(
                HeadingLevel::H1,
                "Error: PDF exceeds 50 page limit",
                1
            )]
        );
    }

    /// Source that panics while laying out a page.
    struct PanickingSource;

    impl LayoutSource for PanickingSource {
        fn page_count(&self) -> u32 {
            1
        }

        fn metadata_title(&self) -> Option<String> {
            Some("Has A Title".to_string())
        }

        fn page(&self, _page_num: u32) -> Result<LayoutPage> {
            panic!("corrupt xref table")
        }

        fn native_toc(&self) -> Result<Vec<TocEntry>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_process_source_contains_panic() {
        let (status, result) =
            process_source("bad.pdf", &PanickingSource, &ExtractOptions::default());
        assert_eq!(status, Status::Error);
        assert_eq!(result.title, "bad.pdf");
        assert_eq!(result.outline.len(), 1);
        assert_eq!(
            result.outline[0].text,
            "Error processing file: extraction panicked: corrupt xref table"
        );
    }

    #[test]
    fn test_output_name() {
        let report = FileReport {
            path: PathBuf::from("in/Report.Final.PDF"),
            status: Status::Success,
            result: OutlineResult::default(),
        };
        assert_eq!(report.output_name(), "Report.Final.json");
    }

    #[test]
    fn test_worker_count() {
        let options = BatchOptions::new().with_max_workers(4);
        assert_eq!(options.worker_count(2), 2);
        assert_eq!(options.worker_count(10), 4);
        assert_eq!(options.worker_count(0), 1);
    }
}
