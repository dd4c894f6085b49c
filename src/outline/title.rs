//! Document title resolution.

use indexmap::IndexMap;

use crate::parser::LayoutSource;

use super::normalize::collapse_whitespace;

/// Title used when nothing better can be found.
pub const UNTITLED: &str = "Untitled Document";

/// Titles this short are treated as missing.
const MIN_TITLE_CHARS: usize = 5;

/// Resolve a document title.
///
/// The metadata title wins when it is non-blank. Otherwise the lines set in
/// the largest font on the first page are joined in reading order. Never
/// returns an empty string.
pub fn resolve_title<S: LayoutSource + ?Sized>(source: &S) -> String {
    if let Some(title) = source.metadata_title() {
        let title = collapse_whitespace(&title);
        if !title.is_empty() {
            return title;
        }
    }

    match largest_font_text(source) {
        Some(title) if title.chars().count() >= MIN_TITLE_CHARS => title,
        _ => UNTITLED.to_string(),
    }
}

/// Text of the first-page lines sharing the largest font size.
fn largest_font_text<S: LayoutSource + ?Sized>(source: &S) -> Option<String> {
    if source.page_count() == 0 {
        log::debug!("No pages, no title candidate");
        return None;
    }

    let page = match source.page(1) {
        Ok(page) => page,
        Err(e) => {
            log::debug!("Title lookup skipped first page: {}", e);
            return None;
        }
    };

    let mut by_size: IndexMap<i32, Vec<String>> = IndexMap::new();
    for line in page.blocks.iter().flat_map(|b| &b.lines) {
        if let Some(size) = line.font_size() {
            by_size.entry(size).or_default().push(line.text());
        }
    }

    let largest = by_size.keys().copied().max()?;
    let lines = by_size.get(&largest)?;
    log::debug!("Title candidate at size {}: {} line(s)", largest, lines.len());

    Some(collapse_whitespace(&lines.join(" ")))
}
