//! Merges overlapping extraction passes into a duplicate-free batch.
//!
//! Two extractions are the same comment iff their text values are
//! equal; the relative time and author are not part of the key. Known
//! approximation: two distinct comments with identical text from
//! different authors collapse into one.

use std::collections::HashSet;

use tracing::info;

use crate::scraper::extract::RawBatch;

/// Remove duplicate comments, preserving first-seen order.
///
/// Returns the deduplicated batch and the number of entries removed.
pub fn dedupe(batch: RawBatch) -> (RawBatch, usize) {
    let input_len = batch.len();

    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = RawBatch::default();

    let rows = batch
        .texts
        .into_iter()
        .zip(batch.times)
        .zip(batch.authors)
        .map(|((text, time), author)| (text, time, author));

    for (text, time, author) in rows {
        if seen.insert(text.clone()) {
            unique.texts.push(text);
            unique.times.push(time);
            unique.authors.push(author);
        }
    }

    let removed = input_len - unique.len();
    info!(removed, "Removed duplicates");

    (unique, removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(rows: &[(&str, &str, &str)]) -> RawBatch {
        RawBatch {
            texts: rows.iter().map(|r| r.0.to_string()).collect(),
            times: rows.iter().map(|r| r.1.to_string()).collect(),
            authors: rows.iter().map(|r| r.2.to_string()).collect(),
        }
    }

    #[test]
    fn test_dedupe_no_duplicates() {
        let input = batch(&[("a", "1d", "x"), ("b", "2d", "y")]);
        let (out, removed) = dedupe(input);
        assert_eq!(out.len(), 2);
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_dedupe_removes_repeated_text() {
        let input = batch(&[("a", "1d", "x"), ("b", "2d", "y"), ("a", "3d", "z")]);
        let (out, removed) = dedupe(input);
        assert_eq!(out.texts, vec!["a", "b"]);
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let input = batch(&[("a", "1d", "x"), ("a", "9d", "other")]);
        let (out, _) = dedupe(input);
        assert_eq!(out.times, vec!["1d"]);
        assert_eq!(out.authors, vec!["x"]);
    }

    #[test]
    fn test_dedupe_preserves_relative_order() {
        let input = batch(&[
            ("c", "", ""),
            ("a", "", ""),
            ("c", "", ""),
            ("b", "", ""),
            ("a", "", ""),
        ]);
        let (out, removed) = dedupe(input);
        assert_eq!(out.texts, vec!["c", "a", "b"]);
        assert_eq!(removed, 2);
    }

    #[test]
    fn test_dedupe_length_arithmetic() {
        let input = batch(&[("a", "", ""), ("a", "", ""), ("a", "", ""), ("b", "", "")]);
        let input_len = input.len();
        let (out, removed) = dedupe(input);
        assert_eq!(out.len(), input_len - removed);
    }

    #[test]
    fn test_dedupe_same_text_different_author_collapses() {
        // Known limitation of the text-only key.
        let input = batch(&[("nice video", "1d", "alice"), ("nice video", "2d", "bob")]);
        let (out, removed) = dedupe(input);
        assert_eq!(out.len(), 1);
        assert_eq!(removed, 1);
        assert_eq!(out.authors, vec!["alice"]);
    }

    #[test]
    fn test_dedupe_empty_batch() {
        let (out, removed) = dedupe(RawBatch::default());
        assert!(out.is_empty());
        assert_eq!(removed, 0);
    }
}
