//! Text cleanup and noise rejection.
//!
//! Extracted block text is frequently polluted by layout artifacts: spans
//! emitted twice, watermark glyph runs, symbol soup from undecodable fonts.
//! [`clean`] collapses whitespace and returns an empty string for text that
//! looks like such noise.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref SPECIAL_CHAR: Regex = Regex::new(r#"[^\w\s\-.,;:()"]"#).unwrap();
}

/// Minimum length before the repeated-word check applies.
const REPEAT_CHECK_MIN_CHARS: usize = 30;

/// Minimum word count before the repeated-word check applies.
const REPEAT_CHECK_MIN_WORDS: usize = 5;

/// Run length of a single character treated as garbage.
const GARBAGE_RUN: usize = 7;

/// Maximum share of characters outside word/punctuation classes.
const MAX_SPECIAL_RATIO: f64 = 0.6;

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Clean block text, returning an empty string when it should be rejected.
pub fn clean(text: &str) -> String {
    let text = collapse_whitespace(text);
    if text.is_empty() {
        return text;
    }

    if has_duplicated_words(&text) || has_garbage_run(&text) || is_symbol_soup(&text) {
        return String::new();
    }

    text
}

/// More than half of the distinct words occur more than once.
fn has_duplicated_words(text: &str) -> bool {
    if text.chars().count() <= REPEAT_CHECK_MIN_CHARS {
        return false;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= REPEAT_CHECK_MIN_WORDS {
        return false;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &word in &words {
        *counts.entry(word).or_insert(0) += 1;
    }

    let repeated = counts.values().filter(|&&n| n > 1).count();
    repeated as f64 / counts.len() as f64 > 0.5
}

/// Some character repeats [`GARBAGE_RUN`] or more times in a row.
fn has_garbage_run(text: &str) -> bool {
    let mut prev: Option<char> = None;
    let mut run = 0;

    for c in text.chars() {
        if Some(c) == prev {
            run += 1;
        } else {
            prev = Some(c);
            run = 1;
        }
        if run >= GARBAGE_RUN {
            return true;
        }
    }

    false
}

fn is_symbol_soup(text: &str) -> bool {
    let special = SPECIAL_CHAR.find_iter(text).count();
    special as f64 / text.chars().count() as f64 > MAX_SPECIAL_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean("  1.1 \t Scope\n of   work "), "1.1 Scope of work");
        assert_eq!(collapse_whitespace("\n\n"), "");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("   \n\t"), "");
    }

    #[test]
    fn test_rejects_character_runs() {
        assert_eq!(clean("AAAAAAAAAAAAAAAAAAAA pricing $5,000.00"), "");
        assert_eq!(clean("Total ......."), "");
        // Six in a row is tolerated
        assert_eq!(clean("Total ......"), "Total ......");
    }

    #[test]
    fn test_rejects_duplicated_words() {
        // 3 distinct words, all repeated
        assert_eq!(clean("Draft Copy Only Draft Copy Only Draft Copy Only"), "");
    }

    #[test]
    fn test_keeps_natural_repetition() {
        let text = "The Role of the Board and the Committee in Governance";
        assert_eq!(clean(text), text);
    }

    #[test]
    fn test_short_text_skips_duplicate_check() {
        // Under 30 characters
        assert_eq!(clean("go go go go go go"), "go go go go go go");
    }

    #[test]
    fn test_rejects_symbol_soup() {
        assert_eq!(clean("★☆★ ☆★☆"), "");
        assert_eq!(clean("§ 4 Results"), "§ 4 Results");
    }

    #[test]
    fn test_result_is_normalized_input_or_empty() {
        let inputs = [
            "  Executive   Summary ",
            "=====",
            "Chapter\n2",
            "!!!!!!!!!!",
            "References and further reading on the topic at hand",
        ];
        for input in inputs {
            let out = clean(input);
            assert!(out.is_empty() || out == collapse_whitespace(input));
            assert!(!has_garbage_run(&out));
        }
    }
}
