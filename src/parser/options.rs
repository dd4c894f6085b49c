//! Extraction options and configuration.

/// Default maximum number of pages processed per document.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Options for extracting an outline from one document.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum page count accepted (`None` = unlimited)
    pub page_limit: Option<u32>,

    /// Error handling mode for per-page layout failures
    pub error_mode: ErrorMode,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page limit.
    pub fn with_page_limit(mut self, limit: u32) -> Self {
        self.page_limit = Some(limit);
        self
    }

    /// Accept documents of any length.
    pub fn without_page_limit(mut self) -> Self {
        self.page_limit = None;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail the document when any page cannot be laid out.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Skip pages that cannot be laid out.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            page_limit: Some(DEFAULT_PAGE_LIMIT),
            error_mode: ErrorMode::Lenient,
        }
    }
}

/// Error handling mode during page layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page error
    Strict,
    /// Skip unreadable pages and continue
    #[default]
    Lenient,
}
