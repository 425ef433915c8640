//! Hymn block parsing: splitter, header extraction and line classification
//! behind one configurable format description.
//!
//! The near-duplicate layouts of the source hymnals (cantado and casteliano
//! exports of the same collection) differ only in boundary pattern, header
//! family and whether a hanging indent marks the chorus, so a single core
//! parameterized by [`HymnFormat`] covers both.

pub mod header;
pub mod segments;
pub mod splitter;

pub use header::{extract_header, Header, HeaderPattern};
pub use segments::{Label, Segment, SegmentBuilder};
pub use splitter::{split_blocks, Blocks};

use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;

/// Boundary for `Hino 123 – Título` headers at line start.
#[allow(clippy::expect_used)]
static RE_BOUNDARY_LABELED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^\f?hino\s+\d+\s+[–-]").expect("valid regex: RE_BOUNDARY_LABELED")
});

/// Boundary for `123 Título` headers at line start.
#[allow(clippy::expect_used)]
static RE_BOUNDARY_PREFIXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\f?\d+\s+").expect("valid regex: RE_BOUNDARY_PREFIXED")
});

/// Format-specific parameters for one hymnal layout.
///
/// Cloning is cheap; the boundary regex is internally shared.
#[derive(Debug, Clone)]
pub struct HymnFormat {
    /// Regex locating the start of each hymn block within a document.
    /// Anchored at line start, optional leading form feed.
    pub boundary: Regex,
    /// Header family to extract number and title with.
    pub header: HeaderPattern,
    /// Hanging-indent chorus detection threshold, `None` to disable.
    pub indent_chorus_threshold: Option<usize>,
    /// Marker text that ends useful content (the back-of-book index);
    /// the block containing it is truncated and processing stops there.
    pub stop_marker: Option<&'static str>,
}

impl HymnFormat {
    /// Layout of the "Hinário Cantado" export: `Hino N – Título` headers,
    /// no indentation heuristics.
    #[must_use]
    pub fn cantado() -> Self {
        Self {
            boundary: RE_BOUNDARY_LABELED.clone(),
            header: HeaderPattern::Labeled,
            indent_chorus_threshold: None,
            stop_marker: None,
        }
    }

    /// Layout of the "Hinário Casteliano" export: bare `N Título` headers,
    /// chorus marked by a hanging indent of five or more columns, and an
    /// `Índice` section closing the document.
    #[must_use]
    pub fn casteliano() -> Self {
        Self {
            boundary: RE_BOUNDARY_PREFIXED.clone(),
            header: HeaderPattern::Prefixed,
            indent_chorus_threshold: Some(5),
            stop_marker: Some("Índice"),
        }
    }
}

/// One successfully parsed hymn block, ready for record emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHymn {
    /// Hymn number from the block header.
    pub number: u32,
    /// Raw header title (cleanup happens at record emission).
    pub title: String,
    /// Labeled segments in order of appearance.
    pub segments: Vec<Segment>,
}

/// Parse one raw block into a hymn.
///
/// Returns `None` when no header is found or when classification produces
/// no segments; both mean non-hymn content (front matter, index pages) and
/// the block is skipped.
pub fn parse_block(block: &str, format: &HymnFormat) -> Option<ParsedHymn> {
    let lines: Vec<&str> = block.lines().collect();
    let header = extract_header(&lines, format.header)?;

    let mut builder = SegmentBuilder::new(format.indent_chorus_threshold);
    for line in &lines[header.body_start..] {
        builder.push_line(line);
    }
    let segments = builder.finish();

    if segments.is_empty() {
        tracing::debug!("Skipping block for hymn {}: no lyric segments", header.number);
        return None;
    }

    Some(ParsedHymn {
        number: header.number,
        title: header.title,
        segments,
    })
}

/// Split a document and parse every block.
///
/// Blocks are independent, so they are parsed in parallel; output order
/// follows document order. Headerless and empty blocks are dropped.
pub fn parse_document(document: &str, format: &HymnFormat) -> Vec<ParsedHymn> {
    let mut blocks: Vec<&str> = Vec::new();
    for block in split_blocks(document, &format.boundary) {
        if let Some(marker) = format.stop_marker {
            if let Some(at) = block.find(marker) {
                blocks.push(&block[..at]);
                break;
            }
        }
        blocks.push(block);
    }

    blocks
        .par_iter()
        .filter_map(|block| parse_block(block, format))
        .collect()
}
