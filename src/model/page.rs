//! Page-level layout types.

use serde::{Deserialize, Serialize};

/// Round a point size to a whole number, ties to even.
pub fn round_size(size: f32) -> i32 {
    size.round_ties_even() as i32
}

/// A run of text sharing one font and size within a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(text: impl Into<String>, font_size: f32, font_name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size,
            font_name: font_name.into(),
        }
    }

    /// Whether the font name signals a bold face.
    pub fn is_bold(&self) -> bool {
        self.font_name.to_lowercase().contains("bold")
    }
}

/// A line of spans in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutLine {
    /// Spans in this line
    pub spans: Vec<TextSpan>,
}

impl LayoutLine {
    /// Create a line from spans.
    pub fn new(spans: Vec<TextSpan>) -> Self {
        Self { spans }
    }

    /// Span texts, each trimmed, joined by single spaces.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Rounded size of the first span, or `None` for an empty line.
    pub fn font_size(&self) -> Option<i32> {
        self.spans.first().map(|s| round_size(s.font_size))
    }
}

/// A paragraph-like group of lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutBlock {
    /// Lines in this block
    pub lines: Vec<LayoutLine>,
}

impl LayoutBlock {
    /// Create a block from lines.
    pub fn new(lines: Vec<LayoutLine>) -> Self {
        Self { lines }
    }

    /// Create a single-line block from spans.
    pub fn from_spans(spans: Vec<TextSpan>) -> Self {
        Self::new(vec![LayoutLine::new(spans)])
    }

    /// Reduce the block to a classifiable [`TextBlock`].
    ///
    /// Only spans with non-blank text contribute. The font size is the
    /// mean of the individually rounded span sizes, rounded again; the
    /// block is bold if any contributing span is bold. Returns `None`
    /// when no span carries text.
    pub fn to_text_block(&self, page: u32) -> Option<TextBlock> {
        let mut parts = Vec::new();
        let mut size_sum: i64 = 0;
        let mut is_bold = false;

        for span in self.lines.iter().flat_map(|l| l.spans.iter()) {
            let text = span.text.trim();
            if text.is_empty() {
                continue;
            }
            parts.push(text);
            size_sum += i64::from(round_size(span.font_size));
            is_bold |= span.is_bold();
        }

        if parts.is_empty() {
            return None;
        }

        let avg = size_sum as f64 / parts.len() as f64;
        Some(TextBlock {
            text: parts.join(" "),
            font_size: avg.round_ties_even() as i32,
            is_bold,
            page,
        })
    }
}

/// A page of laid-out text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutPage {
    /// Page number (1-indexed)
    pub number: u32,
    /// Blocks in extraction order
    pub blocks: Vec<LayoutBlock>,
}

impl LayoutPage {
    /// Create an empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            blocks: Vec::new(),
        }
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: LayoutBlock) {
        self.blocks.push(block);
    }

    /// Builder-style variant of [`add_block`](Self::add_block).
    pub fn with_block(mut self, block: LayoutBlock) -> Self {
        self.add_block(block);
        self
    }

    /// Classifiable blocks of this page, in extraction order.
    pub fn text_blocks(&self) -> Vec<TextBlock> {
        self.blocks
            .iter()
            .filter_map(|b| b.to_text_block(self.number))
            .collect()
    }

    /// Check if the page has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A block reduced to the signals used for heading classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Concatenated span text
    pub text: String,
    /// Rounded average font size
    pub font_size: i32,
    /// Whether any span is bold
    pub is_bold: bool,
    /// Page number (1-indexed)
    pub page: u32,
}

impl TextBlock {
    /// Create a text block directly.
    pub fn new(text: impl Into<String>, font_size: i32, is_bold: bool, page: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            is_bold,
            page,
        }
    }
}
