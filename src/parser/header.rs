//! Header extraction for raw hymn blocks.
//!
//! A header carries the hymn number and title. Two concrete families exist
//! in the source documents: `Hino 123 – Título` (cantado export, matched
//! anywhere in the line) and `123 Título` (casteliano export, matched only
//! at the physical start of a line so indented verse numbers never count).

use std::sync::LazyLock;

use regex::Regex;

use super::segments::{RE_CHORUS, RE_VERSE};

/// Regex matching `Hino 123 – Título` headers (en dash or hyphen).
#[allow(clippy::expect_used)]
static RE_HEADER_LABELED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)hino\s+(\d+)\s+[–-]\s+(.+)").expect("valid regex: RE_HEADER_LABELED")
});

/// Regex matching `123 Título` headers at line start, optional form feed.
#[allow(clippy::expect_used)]
static RE_HEADER_PREFIXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\f?(\d+)\s+(.+)").expect("valid regex: RE_HEADER_PREFIXED")
});

/// Which header family to look for in a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPattern {
    /// `Hino <number> <dash> <title>` anywhere in a line, case-insensitive.
    Labeled,
    /// `<number> <title>` at the physical start of a line.
    Prefixed,
}

impl HeaderPattern {
    /// Match one raw line against this pattern, returning (number, title).
    fn capture(self, line: &str) -> Option<(u32, String)> {
        let caps = match self {
            Self::Labeled => RE_HEADER_LABELED.captures(line)?,
            Self::Prefixed => RE_HEADER_PREFIXED.captures(line)?,
        };
        let number = caps.get(1)?.as_str().parse::<u32>().ok()?;
        let title = caps.get(2)?.as_str().trim().to_string();
        Some((number, title))
    }
}

/// A matched block header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Hymn number from the header line.
    pub number: u32,
    /// Raw title (post-processing happens at record emission).
    pub title: String,
    /// Index of the first body line within the block's lines.
    pub body_start: usize,
}

/// Scan block lines in order for the first header match.
///
/// Returns `None` for headerless blocks (front matter, index pages, noise);
/// callers skip those entirely. If the line immediately after the header is
/// non-empty, does not begin with a verse number or chorus keyword, and is
/// itself followed by a blank line, it is merged into the title as a
/// continuation line and the body starts after it.
pub fn extract_header(lines: &[&str], pattern: HeaderPattern) -> Option<Header> {
    let (index, number, mut title) = lines.iter().enumerate().find_map(|(i, line)| {
        pattern.capture(line).map(|(number, title)| (i, number, title))
    })?;

    let mut body_start = index + 1;

    if let Some(next) = lines.get(body_start) {
        let next = next.trim();
        let followed_by_blank = lines
            .get(body_start + 1)
            .is_some_and(|l| l.trim().is_empty());
        if !next.is_empty()
            && !RE_VERSE.is_match(next)
            && !RE_CHORUS.is_match(next)
            && followed_by_blank
        {
            title.push(' ');
            title.push_str(next);
            body_start += 1;
        }
    }

    Some(Header { number, title, body_start })
}
