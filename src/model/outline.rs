//! Outline output types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Heading level token. Orders as `H1 < H2 < H3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Map a native outline depth (1-based) to a level.
    ///
    /// Depths outside 1..=3 have no level.
    pub fn from_depth(depth: u32) -> Option<Self> {
        match depth {
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            _ => None,
        }
    }

    /// The level as its output token.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One heading in the produced outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,

    /// Cleaned heading text
    pub text: String,

    /// Page number (1-indexed)
    pub page: u32,
}

impl OutlineEntry {
    /// Create a new outline entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// The record produced for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineResult {
    /// Document title
    pub title: String,

    /// Headings in document order
    pub outline: Vec<OutlineEntry>,
}

impl OutlineResult {
    /// Create a result from a title and outline.
    pub fn new(title: impl Into<String>, outline: Vec<OutlineEntry>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// A degraded record describing a failure: one H1 entry on page 1.
    pub fn failure(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            title,
            vec![OutlineEntry::new(HeadingLevel::H1, message, 1)],
        )
    }

    /// Check if the outline has no entries.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_depth() {
        assert_eq!(HeadingLevel::from_depth(1), Some(HeadingLevel::H1));
        assert_eq!(HeadingLevel::from_depth(3), Some(HeadingLevel::H3));
        assert_eq!(HeadingLevel::from_depth(0), None);
        assert_eq!(HeadingLevel::from_depth(4), None);
    }

    #[test]
    fn test_level_ordering_matches_tokens() {
        assert!(HeadingLevel::H1 < HeadingLevel::H2);
        assert!(HeadingLevel::H2 < HeadingLevel::H3);
        assert!(HeadingLevel::H1.as_str() < HeadingLevel::H3.as_str());
    }

    #[test]
    fn test_entry_serializes_level_token() {
        let entry = OutlineEntry::new(HeadingLevel::H2, "Details", 2);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"level":"H2","text":"Details","page":2}"#);
    }

    #[test]
    fn test_failure_record() {
        let result = OutlineResult::failure("a.pdf", "Error: boom");
        assert_eq!(result.title, "a.pdf");
        assert_eq!(
            result.outline,
            vec![OutlineEntry::new(HeadingLevel::H1, "Error: boom", 1)]
        );
    }
}
