//! Document-layout interface and its lopdf binding.

mod layout;
mod options;
mod pdf_source;
mod source;
mod toc;

pub use layout::LayoutAnalyzer;
pub use options::{ErrorMode, ExtractOptions, DEFAULT_PAGE_LIMIT};
pub use pdf_source::LopdfSource;
pub use source::LayoutSource;
