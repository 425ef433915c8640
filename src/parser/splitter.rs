//! Document splitter: divides a full hymnal document into raw per-hymn
//! blocks at boundary-pattern matches.
//!
//! The boundary regex is anchored at line start (optionally preceded by a
//! form-feed page break) so it never fires mid-line inside lyrics. Every
//! yielded block except possibly the first begins exactly at a boundary
//! match, and concatenating all slices between boundaries reconstructs the
//! document; whitespace-only slices are dropped.

use regex::{Matches, Regex};

/// Lazy, finite, non-restartable iterator of raw hymn blocks.
///
/// Created by [`split_blocks`]; yields subslices of the original document.
pub struct Blocks<'r, 'a> {
    document: &'a str,
    matches: Matches<'r, 'a>,
    pos: usize,
    finished: bool,
}

impl<'a> Iterator for Blocks<'_, 'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while !self.finished {
            let end = match self.matches.next() {
                Some(m) => m.start(),
                None => {
                    self.finished = true;
                    self.document.len()
                }
            };
            // A boundary at the cursor closes a zero-width slice; skip it.
            if end <= self.pos {
                continue;
            }
            let block = &self.document[self.pos..end];
            self.pos = end;
            if !block.trim().is_empty() {
                return Some(block);
            }
        }
        None
    }
}

/// Split a document into raw hymn blocks at matches of `boundary`.
pub fn split_blocks<'r, 'a>(document: &'a str, boundary: &'r Regex) -> Blocks<'r, 'a> {
    Blocks {
        document,
        matches: boundary.find_iter(document),
        pos: 0,
        finished: false,
    }
}
