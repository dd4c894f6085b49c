//! Model types for layout input and outline output.
//!
//! Layout types describe what the document-layout interface hands to the
//! extractor (pages, blocks, lines, spans, native TOC). Outline types are
//! the per-document record the extractor produces.

mod document;
mod outline;
mod page;

pub use document::{LayoutDocument, TocEntry};
pub use outline::{HeadingLevel, OutlineEntry, OutlineResult};
pub use page::{round_size, LayoutBlock, LayoutLine, LayoutPage, TextBlock, TextSpan};
