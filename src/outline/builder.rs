//! Heuristic outline construction.

use std::collections::HashSet;

use crate::error::Result;
use crate::model::{HeadingLevel, OutlineEntry, TextBlock};
use crate::parser::{ErrorMode, LayoutSource};

use super::classify::is_heading;
use super::normalize::clean;
use super::profile::FontProfile;

/// Collect the classifiable blocks of every page, pages ascending.
///
/// In lenient mode a page whose layout cannot be extracted is skipped with a
/// warning; in strict mode the error is returned.
pub fn collect_blocks<S: LayoutSource + ?Sized>(
    source: &S,
    error_mode: ErrorMode,
) -> Result<Vec<TextBlock>> {
    let mut blocks = Vec::new();

    for page_num in 1..=source.page_count() {
        match source.page(page_num) {
            Ok(page) => blocks.extend(page.text_blocks()),
            Err(e) => {
                if error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Failed to extract layout from page {}: {}", page_num, e);
            }
        }
    }

    Ok(blocks)
}

/// Builds outline entries from text blocks and a font profile.
pub struct OutlineBuilder<'a> {
    profile: &'a FontProfile,
    seen: HashSet<(u32, String)>,
    entries: Vec<OutlineEntry>,
}

impl<'a> OutlineBuilder<'a> {
    /// Create a builder for one document.
    pub fn new(profile: &'a FontProfile) -> Self {
        Self {
            profile,
            seen: HashSet::new(),
            entries: Vec::new(),
        }
    }

    /// Classify one block, appending it if it is a new heading.
    ///
    /// Returns `true` if an entry was added.
    pub fn push(&mut self, block: &TextBlock) -> bool {
        let text = clean(&block.text);
        if text.is_empty() {
            return false;
        }

        if !is_heading(&text, block.font_size, block.is_bold, self.profile) {
            return false;
        }

        let Some(level) = self.level_for(block) else {
            return false;
        };

        if !self.seen.insert((block.page, text.to_lowercase())) {
            return false;
        }

        self.entries.push(OutlineEntry::new(level, text, block.page));
        true
    }

    /// Finish and return the entries in insertion order.
    pub fn finish(self) -> Vec<OutlineEntry> {
        self.entries
    }

    fn level_for(&self, block: &TextBlock) -> Option<HeadingLevel> {
        self.profile.level_for(block.font_size).or_else(|| {
            (block.is_bold && block.font_size >= self.profile.body_size).then_some(HeadingLevel::H3)
        })
    }
}

/// Build an outline from blocks in page and extraction order.
pub fn build_outline(blocks: &[TextBlock], profile: &FontProfile) -> Vec<OutlineEntry> {
    let mut builder = OutlineBuilder::new(profile);
    for block in blocks {
        builder.push(block);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{LayoutBlock, LayoutPage, TextSpan, TocEntry};
    use crate::outline::profile::profile;

    fn block(text: &str, size: i32, bold: bool, page: u32) -> TextBlock {
        TextBlock::new(text, size, bold, page)
    }

    #[test]
    fn test_levels_from_ranking() {
        let blocks = vec![
            block("Annual Report", 24, true, 1),
            block("Body text that runs on for a while.", 10, false, 1),
            block("Financial Highlights", 18, false, 1),
            block("More body text for the profile.", 10, false, 1),
            block("Revenue", 14, false, 2),
            block("Yet more body text here.", 10, false, 2),
        ];
        let p = profile(&blocks).unwrap();
        let outline = build_outline(&blocks, &p);

        assert_eq!(
            outline,
            vec![
                OutlineEntry::new(HeadingLevel::H1, "Annual Report", 1),
                OutlineEntry::new(HeadingLevel::H2, "Financial Highlights", 1),
                OutlineEntry::new(HeadingLevel::H3, "Revenue", 2),
            ]
        );
    }

    #[test]
    fn test_bold_body_size_becomes_h3() {
        let blocks = vec![
            block("Intro paragraph of ordinary text.", 10, false, 1),
            block("Body continues on the next page.", 10, false, 2),
            block("1.1 Overview", 10, true, 3),
        ];
        let p = profile(&blocks).unwrap();
        let outline = build_outline(&blocks, &p);
        assert_eq!(
            outline,
            vec![OutlineEntry::new(HeadingLevel::H3, "1.1 Overview", 3)]
        );
    }

    #[test]
    fn test_pattern_heading_without_level_is_skipped() {
        // A structural match at body size, not bold, has no level.
        let blocks = vec![
            block("Body text one.", 10, false, 1),
            block("Chapter 2", 10, false, 1),
        ];
        let p = profile(&blocks).unwrap();
        assert!(build_outline(&blocks, &p).is_empty());
    }

    #[test]
    fn test_dedupe_per_page_case_insensitive() {
        let blocks = vec![
            block("Body text.", 10, false, 1),
            block("Body text again.", 10, false, 1),
            block("Still body text.", 10, false, 2),
            block("Last of the body text.", 10, false, 2),
            block("Summary", 16, false, 1),
            block("SUMMARY", 16, false, 1),
            block("Summary", 16, false, 2),
        ];
        let p = profile(&blocks).unwrap();
        let outline = build_outline(&blocks, &p);
        assert_eq!(
            outline,
            vec![
                OutlineEntry::new(HeadingLevel::H1, "Summary", 1),
                OutlineEntry::new(HeadingLevel::H1, "Summary", 2),
            ]
        );
    }

    #[test]
    fn test_noise_excluded() {
        let blocks = vec![
            block("Body text.", 10, false, 1),
            block("Body text again.", 10, false, 1),
            block("AAAAAAAAAAAAAAAAAAAA pricing $5,000.00", 20, true, 1),
        ];
        let p = profile(&blocks).unwrap();
        assert!(build_outline(&blocks, &p).is_empty());
    }

    #[test]
    fn test_entry_text_is_cleaned() {
        let blocks = vec![
            block("Body text.", 10, false, 1),
            block("  Key \n Findings ", 14, false, 1),
        ];
        let p = profile(&blocks).unwrap();
        let outline = build_outline(&blocks, &p);
        assert_eq!(outline[0].text, "Key Findings");
    }

    /// Source whose second page always fails.
    struct FlakySource;

    impl LayoutSource for FlakySource {
        fn page_count(&self) -> u32 {
            2
        }

        fn metadata_title(&self) -> Option<String> {
            None
        }

        fn page(&self, page_num: u32) -> Result<LayoutPage> {
            if page_num == 2 {
                return Err(Error::TextExtract("Page 2: bad stream".to_string()));
            }
            Ok(LayoutPage::new(page_num).with_block(LayoutBlock::from_spans(vec![
                TextSpan::new("Hello world", 10.0, "Helvetica"),
            ])))
        }

        fn native_toc(&self) -> Result<Vec<TocEntry>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_collect_lenient_skips_bad_page() {
        let blocks = collect_blocks(&FlakySource, ErrorMode::Lenient).unwrap();
        assert_eq!(blocks, vec![block("Hello world", 10, false, 1)]);
    }

    #[test]
    fn test_collect_strict_propagates() {
        let result = collect_blocks(&FlakySource, ErrorMode::Strict);
        assert!(matches!(result, Err(Error::TextExtract(_))));
    }
}
