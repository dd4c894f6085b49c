//! Heading classification.
//!
//! A block is judged in three stages. Rejection patterns discard amounts,
//! page stamps and letterless text outright. Structural patterns ("Chapter
//! 3", "1.1 Scope", runs of letter-only words, "Abstract") accept regardless
//! of font. Failing both, font signals decide: size relative to body text,
//! boldness and capitalisation, with a second negative list for bold numeric
//! refs and dates that are common in financial documents.

use lazy_static::lazy_static;
use regex::Regex;

use super::normalize::clean;
use super::profile::FontProfile;

lazy_static! {
    static ref STRICT_NON_HEADING: Vec<Regex> = compile(&[
        r"^\$[\d,]+(\.\d{2})?\s*$",
        r"^Page\s+\d+\s*$",
        r"^[^a-zA-Z]*$",
        r"^[^\w\s]*$",
    ]);
    static ref STRONG_HEADING: Vec<Regex> = compile(&[
        r"^(Chapter|Section|Part|Appendix|Summary|Background|Introduction|Conclusion|References?|Bibliography)\s*[A-Z0-9]*",
        r"^\d+(\.\d+)*\s+[A-Za-z]",
        r"^[A-Z]{2,}(\s+[A-Z]{2,})*\s*$",
        r"^(Abstract|Executive Summary|Table of Contents|Acknowledgments?)",
    ]);
    static ref LOOSE_NON_HEADING: Vec<Regex> = compile(&[
        r"^\d+\.\d+\s*$",
        r"^[A-Z]\.\d+\s*$",
        r"^\d{4}[\s-]\d{4}\s*$",
        r"^\(\s*[^)]*\s*\)\s*$",
        r"^(January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}\s*$",
    ]);
    static ref DOT_LEADER: Regex = Regex::new(r"[.]{2,}").unwrap();
}

/// Compile case-insensitive patterns.
fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", p)).unwrap())
        .collect()
}

const MAX_WORDS: usize = 25;
const MAX_CHARS: usize = 200;

/// Size ratio over body text that alone makes a heading.
const SIGNIFICANT_RATIO: f64 = 1.2;

/// Size ratio over body text that counts as moderately larger.
const MODERATE_RATIO: f64 = 1.05;

/// Word limit for unlabeled, moderately larger headings.
const MAX_TITLE_WORDS: usize = 8;

/// Decide whether a block of text is a heading.
pub fn is_heading(text: &str, font_size: i32, is_bold: bool, profile: &FontProfile) -> bool {
    if text.trim().chars().count() < 2 {
        return false;
    }

    let clean = clean(text);
    if clean.is_empty() {
        return false;
    }

    let word_count = clean.split_whitespace().count();
    if word_count > MAX_WORDS || clean.chars().count() > MAX_CHARS {
        return false;
    }

    if STRICT_NON_HEADING.iter().any(|re| re.is_match(&clean)) {
        return false;
    }

    if STRONG_HEADING.iter().any(|re| re.is_match(&clean)) {
        return true;
    }

    let size = f64::from(font_size);
    let body = f64::from(profile.body_size);
    let significantly_larger = size > body * SIGNIFICANT_RATIO;
    let moderately_larger = size > body * MODERATE_RATIO;
    let starts_upper = clean.chars().next().is_some_and(char::is_uppercase);

    if significantly_larger {
        return true;
    }

    if is_bold && moderately_larger {
        return true;
    }

    if is_bold && font_size >= profile.body_size && (starts_upper || is_title_case(&clean)) {
        return !LOOSE_NON_HEADING.iter().any(|re| re.is_match(&clean));
    }

    moderately_larger
        && starts_upper
        && word_count <= MAX_TITLE_WORDS
        && !DOT_LEADER.is_match(&clean)
}

/// Title case: uppercase letters only begin words, lowercase letters only
/// continue them, and at least one cased letter exists.
fn is_title_case(text: &str) -> bool {
    let mut cased = false;
    let mut prev_cased = false;

    for c in text.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            prev_cased = true;
            cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            prev_cased = true;
            cased = true;
        } else {
            prev_cased = false;
        }
    }

    cased
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::profile::LevelMap;

    fn body(size: i32) -> FontProfile {
        FontProfile {
            body_size: size,
            heading_sizes: vec![],
            levels: LevelMap::default(),
        }
    }

    #[test]
    fn test_rejects_noise() {
        let p = body(10);
        assert!(!is_heading("", 30, true, &p));
        assert!(!is_heading("A", 30, true, &p));
        assert!(!is_heading("$5,000.00", 30, true, &p));
        assert!(!is_heading("Page 12", 30, true, &p));
        assert!(!is_heading("2024 - 2025", 30, true, &p));
        assert!(!is_heading("*** ###", 30, true, &p));
    }

    #[test]
    fn test_rejects_long_text() {
        let p = body(10);
        let long: Vec<String> = (0..26).map(|i| format!("w{}", i)).collect();
        assert!(!is_heading(&long.join(" "), 30, true, &p));
        let wide: Vec<String> = (0..12)
            .map(|i| format!("Segment{:02}abcdefghij", i))
            .collect();
        assert!(!is_heading(&wide.join(" "), 30, true, &p));
    }

    #[test]
    fn test_structural_patterns_ignore_font() {
        let p = body(10);
        assert!(is_heading("Chapter 3", 8, false, &p));
        assert!(is_heading("appendix b: tables", 8, false, &p));
        assert!(is_heading("1.1 Overview", 10, false, &p));
        assert!(is_heading("3 Methods", 9, false, &p));
        assert!(is_heading("TERMS AND CONDITIONS", 10, false, &p));
        assert!(is_heading("terms and conditions", 10, false, &p));
        assert!(is_heading("key findings", 8, false, &p));
        assert!(is_heading("Executive Summary of Findings", 10, false, &p));
        assert!(is_heading("Acknowledgment", 10, false, &p));
    }

    #[test]
    fn test_font_size_alone() {
        let p = body(10);
        assert!(is_heading("what we learned in 2024", 13, false, &p));
        assert!(!is_heading("what we learned in 2024", 12, false, &p));
    }

    #[test]
    fn test_bold_moderately_larger() {
        let p = body(10);
        assert!(is_heading("what we learned in 2024", 11, true, &p));
        assert!(!is_heading("what we learned in 2024", 10, true, &p));
    }

    #[test]
    fn test_bold_at_body_size_needs_capital() {
        let p = body(10);
        assert!(is_heading("Key findings for 2024", 10, true, &p));
        assert!(!is_heading("key findings for 2024", 10, true, &p));
        assert!(!is_heading("Key findings for 2024", 10, false, &p));
        assert!(!is_heading("Key findings for 2024", 9, true, &p));
    }

    #[test]
    fn test_bold_negative_list() {
        let p = body(10);
        assert!(!is_heading("(See Note 4)", 10, true, &p));
        assert!(!is_heading("March 3, 2024", 10, true, &p));
        assert!(!is_heading("B.12", 10, true, &p));
    }

    #[test]
    fn test_moderately_larger_title() {
        let p = body(10);
        assert!(is_heading("Our approach to risk in 2024", 11, false, &p));
        assert!(!is_heading("our approach to risk in 2024", 11, false, &p));
        assert!(!is_heading("Contents .... 4", 11, false, &p));
        assert!(!is_heading(
            "One two three four five six seven eight 9",
            11,
            false,
            &p
        ));
    }

    #[test]
    fn test_title_case() {
        assert!(is_title_case("Annual Report"));
        assert!(is_title_case("1 Scope Of Work"));
        assert!(!is_title_case("Annual report"));
        assert!(!is_title_case("ANNUAL"));
        assert!(!is_title_case("123"));
    }
}
