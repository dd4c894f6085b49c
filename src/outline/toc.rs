//! Native table of contents to outline conversion.

use crate::model::{HeadingLevel, OutlineEntry, TocEntry};

/// Convert bookmark entries into outline entries.
///
/// Depths 1 to 3 map to H1 to H3; deeper entries are dropped. Returns `None`
/// when nothing usable remains, so the caller can fall back to heuristics.
pub fn from_native_toc(entries: &[TocEntry]) -> Option<Vec<OutlineEntry>> {
    let outline: Vec<OutlineEntry> = entries
        .iter()
        .filter_map(|entry| {
            HeadingLevel::from_depth(entry.depth)
                .map(|level| OutlineEntry::new(level, entry.title.trim(), entry.page))
        })
        .collect();

    if outline.is_empty() {
        None
    } else {
        Some(outline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_maps_to_level() {
        let toc = vec![
            TocEntry::new(1, "Intro", 1),
            TocEntry::new(2, "Details", 2),
            TocEntry::new(4, "Deep", 5),
        ];
        assert_eq!(
            from_native_toc(&toc).unwrap(),
            vec![
                OutlineEntry::new(HeadingLevel::H1, "Intro", 1),
                OutlineEntry::new(HeadingLevel::H2, "Details", 2),
            ]
        );
    }

    #[test]
    fn test_titles_trimmed() {
        let toc = vec![TocEntry::new(3, "  Scope \n", 7)];
        let outline = from_native_toc(&toc).unwrap();
        assert_eq!(outline[0].text, "Scope");
        assert_eq!(outline[0].level, HeadingLevel::H3);
        assert_eq!(outline[0].page, 7);
    }

    #[test]
    fn test_unusable_toc() {
        assert!(from_native_toc(&[]).is_none());
        assert!(from_native_toc(&[TocEntry::new(5, "Too deep", 1)]).is_none());
        assert!(from_native_toc(&[TocEntry::new(0, "Root", 1)]).is_none());
    }
}
