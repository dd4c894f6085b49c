//! Document-layout interface.
//!
//! The extractor never touches a concrete PDF library. Everything it needs
//! (page count, per-page blocks with font metrics, native outline, metadata
//! title) comes through [`LayoutSource`], so the heuristics can run against
//! `lopdf` or against an in-memory [`LayoutDocument`] alike.

use crate::error::{Error, Result};
use crate::model::{LayoutDocument, LayoutPage, TocEntry};

/// Abstract interface for laid-out document access.
pub trait LayoutSource {
    /// Total number of pages.
    fn page_count(&self) -> u32;

    /// Title from document metadata, if the document carries one.
    fn metadata_title(&self) -> Option<String>;

    /// Blocks of a page (1-indexed), in extraction order.
    fn page(&self, page_num: u32) -> Result<LayoutPage>;

    /// Native outline entries in document order. Empty when absent.
    fn native_toc(&self) -> Result<Vec<TocEntry>>;
}

impl LayoutSource for LayoutDocument {
    fn page_count(&self) -> u32 {
        LayoutDocument::page_count(self)
    }

    fn metadata_title(&self) -> Option<String> {
        self.title.clone()
    }

    fn page(&self, page_num: u32) -> Result<LayoutPage> {
        self.get_page(page_num)
            .cloned()
            .ok_or(Error::PageOutOfRange(page_num, self.page_count()))
    }

    fn native_toc(&self) -> Result<Vec<TocEntry>> {
        Ok(self.toc.clone())
    }
}

impl<T: LayoutSource + ?Sized> LayoutSource for &T {
    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn metadata_title(&self) -> Option<String> {
        (**self).metadata_title()
    }

    fn page(&self, page_num: u32) -> Result<LayoutPage> {
        (**self).page(page_num)
    }

    fn native_toc(&self) -> Result<Vec<TocEntry>> {
        (**self).native_toc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_source() {
        let doc = LayoutDocument::new()
            .with_title("Report")
            .with_page(LayoutPage::new(1))
            .with_toc_entry(TocEntry::new(1, "Intro", 1));

        assert_eq!(LayoutSource::page_count(&doc), 1);
        assert_eq!(doc.metadata_title().as_deref(), Some("Report"));
        assert_eq!(doc.page(1).unwrap().number, 1);
        assert_eq!(doc.native_toc().unwrap().len(), 1);
    }

    #[test]
    fn test_in_memory_page_out_of_range() {
        let doc = LayoutDocument::new().with_page(LayoutPage::new(1));
        let err = doc.page(2).unwrap_err();
        assert!(matches!(err, Error::PageOutOfRange(2, 1)));
    }
}
