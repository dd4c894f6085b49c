//! Outline extraction.
//!
//! An [`OutlineExtractor`] turns one [`LayoutSource`] into an
//! [`OutlineResult`]. A usable native table of contents is taken as-is;
//! otherwise headings are inferred from typography:
//!
//! 1. every page is reduced to [`TextBlock`]s,
//! 2. a [`FontProfile`] picks the body size and ranks larger sizes,
//! 3. each block is cleaned, classified and assigned a level.
//!
//! The title is resolved independently of the outline.

mod builder;
mod classify;
mod normalize;
mod profile;
mod title;
mod toc;

pub use builder::{build_outline, collect_blocks, OutlineBuilder};
pub use classify::is_heading;
pub use normalize::{clean, collapse_whitespace};
pub use profile::{profile, FontHistogram, FontProfile, LevelMap};
pub use title::{resolve_title, UNTITLED};
pub use toc::from_native_toc;

use crate::error::{Error, Result};
use crate::model::{OutlineEntry, OutlineResult, TextBlock};
use crate::parser::{ErrorMode, ExtractOptions, LayoutSource};

/// Per-document outline extractor.
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    options: ExtractOptions,
}

impl OutlineExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with the given options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Set the maximum accepted page count.
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.options = self.options.with_page_limit(limit);
        self
    }

    /// Accept documents of any length.
    pub fn without_page_limit(mut self) -> Self {
        self.options = self.options.without_page_limit();
        self
    }

    /// Fail the document when a page cannot be laid out.
    pub fn strict(mut self) -> Self {
        self.options = self.options.strict();
        self
    }

    /// Skip pages that cannot be laid out.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract the title and outline of a document.
    pub fn extract<S: LayoutSource + ?Sized>(&self, source: &S) -> Result<OutlineResult> {
        let pages = source.page_count();
        if let Some(limit) = self.options.page_limit {
            if pages > limit {
                return Err(Error::PageLimitExceeded { pages, limit });
            }
        }

        let title = resolve_title(source);
        let outline = self.outline(source)?;

        log::debug!("Extracted {} outline entries from {} pages", outline.len(), pages);
        Ok(OutlineResult::new(title, outline))
    }

    fn outline<S: LayoutSource + ?Sized>(&self, source: &S) -> Result<Vec<OutlineEntry>> {
        match source.native_toc() {
            Ok(entries) => {
                if let Some(outline) = from_native_toc(&entries) {
                    log::debug!("Using native table of contents ({} entries)", outline.len());
                    return Ok(outline);
                }
            }
            Err(e) => {
                if self.options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Failed to read native table of contents: {}", e);
            }
        }

        let blocks = collect_blocks(source, self.options.error_mode)?;
        Ok(heuristic_outline(&blocks))
    }
}

/// Infer an outline from blocks alone.
pub fn heuristic_outline(blocks: &[TextBlock]) -> Vec<OutlineEntry> {
    match profile(blocks) {
        Some(profile) => build_outline(blocks, &profile),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        HeadingLevel, LayoutBlock, LayoutDocument, LayoutPage, TextSpan, TocEntry,
    };

    fn page(number: u32, spans: Vec<(&str, f32, &str)>) -> LayoutPage {
        spans
            .into_iter()
            .fold(LayoutPage::new(number), |page, (text, size, font)| {
                page.with_block(LayoutBlock::from_spans(vec![TextSpan::new(text, size, font)]))
            })
    }

    fn sample() -> LayoutDocument {
        LayoutDocument::new()
            .with_page(page(
                1,
                vec![
                    ("Annual Report", 24.0, "Helvetica-Bold"),
                    ("This report covers the fiscal year.", 10.0, "Helvetica"),
                ],
            ))
            .with_page(page(
                2,
                vec![
                    ("Results", 16.0, "Helvetica"),
                    ("Revenue grew steadily across regions.", 10.0, "Helvetica"),
                ],
            ))
    }

    #[test]
    fn test_heuristic_extraction() {
        let result = OutlineExtractor::new().extract(&sample()).unwrap();
        assert_eq!(result.title, "Annual Report");
        assert_eq!(
            result.outline,
            vec![
                OutlineEntry::new(HeadingLevel::H1, "Annual Report", 1),
                OutlineEntry::new(HeadingLevel::H2, "Results", 2),
            ]
        );
    }

    #[test]
    fn test_native_toc_takes_precedence() {
        let doc = sample()
            .with_toc_entry(TocEntry::new(1, "Intro", 1))
            .with_toc_entry(TocEntry::new(2, "Details", 2));
        let result = OutlineExtractor::new().extract(&doc).unwrap();
        assert_eq!(
            result.outline,
            vec![
                OutlineEntry::new(HeadingLevel::H1, "Intro", 1),
                OutlineEntry::new(HeadingLevel::H2, "Details", 2),
            ]
        );
    }

    #[test]
    fn test_too_deep_toc_falls_back() {
        let doc = sample().with_toc_entry(TocEntry::new(4, "Deep", 1));
        let result = OutlineExtractor::new().extract(&doc).unwrap();
        assert_eq!(result.outline.len(), 2);
        assert_eq!(result.outline[0].text, "Annual Report");
    }

    #[test]
    fn test_page_limit() {
        let mut doc = LayoutDocument::new();
        for n in 1..=3 {
            doc.add_page(LayoutPage::new(n));
        }

        let err = OutlineExtractor::new().with_page_limit(2).extract(&doc).err().unwrap();
        assert!(matches!(err, Error::PageLimitExceeded { pages: 3, limit: 2 }));
        assert!(OutlineExtractor::new().with_page_limit(3).extract(&doc).is_ok());
        assert!(OutlineExtractor::new().without_page_limit().extract(&doc).is_ok());
    }

    #[test]
    fn test_empty_document() {
        let result = OutlineExtractor::new().extract(&LayoutDocument::new()).unwrap();
        assert_eq!(result.title, UNTITLED);
        assert!(result.outline.is_empty());
    }

    #[test]
    fn test_builder_options() {
        let extractor = OutlineExtractor::new().strict().with_page_limit(10);
        assert_eq!(extractor.options().error_mode, ErrorMode::Strict);
        assert_eq!(extractor.options().page_limit, Some(10));
        assert_eq!(extractor.lenient().options().error_mode, ErrorMode::Lenient);
    }
}
