//! Column-aware reading order.
//!
//! Gazettes are printed two columns per page. Reading each page top to bottom
//! interleaves rows of unrelated columns, so each page is split at its
//! horizontal midpoint and the left half is read before the right half.

use crate::extraction::{LineSpan, PageContent, WordSpan};

/// Produce a single ordered line stream from extracted pages.
///
/// Per page: words whose horizontal centre lies left of the midpoint form the
/// left column, the rest the right column; each column keeps its own line
/// order. Pages are emitted in order, never reordered. Pages without
/// geometry contribute their plain lines as-is.
pub fn linearize(pages: &[PageContent]) -> Vec<String> {
    let mut out = Vec::new();

    for page in pages {
        if page.has_geometry() {
            let (left, right) = split_columns(&page.line_spans, page.width / 2.0);
            log::debug!(
                "page {}: {} left-column line(s), {} right-column line(s)",
                page.page_number,
                left.len(),
                right.len()
            );
            out.extend(left);
            out.extend(right);
        } else {
            out.extend(
                page.lines
                    .iter()
                    .filter(|l| !l.trim().is_empty())
                    .cloned(),
            );
        }
    }

    out
}

fn split_columns(spans: &[LineSpan], midpoint: f32) -> (Vec<String>, Vec<String>) {
    let mut left = Vec::new();
    let mut right = Vec::new();

    for span in spans {
        let (l, r): (Vec<&WordSpan>, Vec<&WordSpan>) = span
            .words
            .iter()
            .partition(|w| w.bbox.center_x() < midpoint);

        if !l.is_empty() {
            left.push(join_words(&l));
        }
        if !r.is_empty() {
            right.push(join_words(&r));
        }
    }

    (left, right)
}

fn join_words(words: &[&WordSpan]) -> String {
    words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
