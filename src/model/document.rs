//! Document-level layout types.

use super::LayoutPage;
use serde::{Deserialize, Serialize};

/// A fully laid-out document held in memory.
///
/// This is the owned form of the layout interface: tests build it by hand,
/// and callers that already run their own layout engine can fill it in and
/// hand it to the extractor directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Title from the document information dictionary
    pub title: Option<String>,

    /// Pages in the document
    pub pages: Vec<LayoutPage>,

    /// Native table of contents (bookmarks), flattened in document order
    pub toc: Vec<TocEntry>,
}

impl LayoutDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the metadata title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a page.
    pub fn with_page(mut self, page: LayoutPage) -> Self {
        self.add_page(page);
        self
    }

    /// Append a native TOC entry.
    pub fn with_toc_entry(mut self, entry: TocEntry) -> Self {
        self.toc.push(entry);
        self
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: LayoutPage) {
        self.pages.push(page);
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&LayoutPage> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }
}

/// A single native outline entry (bookmark).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Nesting depth (1 = top level)
    pub depth: u32,

    /// Entry title as stored in the document
    pub title: String,

    /// Target page number (1-indexed)
    pub page: u32,
}

impl TocEntry {
    /// Create a new TOC entry.
    pub fn new(depth: u32, title: impl Into<String>, page: u32) -> Self {
        Self {
            depth,
            title: title.into(),
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = LayoutDocument::new();
        assert_eq!(doc.page_count(), 0);
        assert!(doc.title.is_none());
        assert!(doc.toc.is_empty());
    }

    #[test]
    fn test_get_page_is_one_indexed() {
        let doc = LayoutDocument::new()
            .with_page(LayoutPage::new(1))
            .with_page(LayoutPage::new(2));

        assert!(doc.get_page(0).is_none());
        assert_eq!(doc.get_page(2).map(|p| p.number), Some(2));
        assert!(doc.get_page(3).is_none());
    }
}
