//! # pdf-outline
//!
//! Title and heading outline extraction from PDF layout.
//!
//! PDFs rarely say which text is a heading. This library reconstructs a
//! document outline (title plus H1/H2/H3 headings with page numbers) from
//! typography: the most common font size is taken as body text, larger
//! sizes are ranked into levels, and each text block is classified with a
//! mix of font signals and textual patterns. When the document carries its
//! own bookmarks, those are used instead.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{extract_outline, render, JsonFormat};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     let result = extract_outline("document.pdf")?;
//!     println!("{}", render::to_json(&result, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Layout sources
//!
//! Extraction works on any [`LayoutSource`]. [`LopdfSource`] reads PDF files
//! with lopdf; [`LayoutDocument`] holds layout built in memory:
//!
//! ```
//! use pdf_outline::{LayoutBlock, LayoutDocument, LayoutPage, OutlineExtractor, TextSpan};
//!
//! let doc = LayoutDocument::new().with_page(
//!     LayoutPage::new(1)
//!         .with_block(LayoutBlock::from_spans(vec![TextSpan::new(
//!             "Annual Report",
//!             24.0,
//!             "Helvetica-Bold",
//!         )]))
//!         .with_block(LayoutBlock::from_spans(vec![TextSpan::new(
//!             "This report covers the fiscal year.",
//!             10.0,
//!             "Helvetica",
//!         )])),
//! );
//!
//! let result = OutlineExtractor::new().extract(&doc).unwrap();
//! assert_eq!(result.title, "Annual Report");
//! assert_eq!(result.outline.len(), 1);
//! ```

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use batch::{BatchOptions, BatchSummary, FileReport, Status};
pub use detect::{has_pdf_extension, is_pdf_bytes, pdf_version_from_bytes, pdf_version_from_path};
pub use error::{Error, Result};
pub use model::{
    HeadingLevel, LayoutBlock, LayoutDocument, LayoutLine, LayoutPage, OutlineEntry,
    OutlineResult, TextBlock, TextSpan, TocEntry,
};
pub use outline::{FontProfile, OutlineExtractor};
pub use parser::{ErrorMode, ExtractOptions, LayoutSource, LopdfSource, DEFAULT_PAGE_LIMIT};
pub use render::JsonFormat;

use std::path::Path;

/// Extract the outline of a PDF file with default options.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::extract_outline;
///
/// let result = extract_outline("document.pdf").unwrap();
/// for entry in &result.outline {
///     println!("{} {} (p. {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn extract_outline<P: AsRef<Path>>(path: P) -> Result<OutlineResult> {
    extract_outline_with_options(path, ExtractOptions::default())
}

/// Extract the outline of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{extract_outline_with_options, ExtractOptions};
///
/// let options = ExtractOptions::new().without_page_limit().strict();
/// let result = extract_outline_with_options("long.pdf", options).unwrap();
/// ```
pub fn extract_outline_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<OutlineResult> {
    let source = LopdfSource::open(path)?;
    OutlineExtractor::with_options(options).extract(&source)
}

/// Extract the outline of a PDF held in memory.
pub fn extract_outline_from_bytes(data: &[u8]) -> Result<OutlineResult> {
    let source = LopdfSource::from_bytes(data)?;
    OutlineExtractor::new().extract(&source)
}

/// Extract a PDF file's outline and render it as JSON.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{to_json, JsonFormat};
///
/// let json = to_json("document.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("document.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let result = extract_outline(path)?;
    render::to_json(&result, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_empty_bytes() {
        assert!(matches!(
            extract_outline_from_bytes(&[]),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_extract_from_non_pdf_bytes() {
        let data = [0xFF, 0xFE, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05];
        assert!(extract_outline_from_bytes(&data).is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = extract_outline("does/not/exist.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
