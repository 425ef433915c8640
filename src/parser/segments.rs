//! Line classification state machine that groups hymn body lines into
//! labeled verse and chorus segments.
//!
//! Hymnals are typeset with numbered verses and an optional refrain that
//! recurs between verses, but the source documents give only weak cues for
//! where one unit ends and the next begins: explicit numbers, a literal
//! "Coro" label, or pure indentation. The classifier encodes a priority
//! order among these cues - explicit markers always override positional
//! heuristics, and a blank line is a soft boundary that only takes effect
//! if the next non-blank line is not already labeled by a stronger cue.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Regex matching a verse marker line like `1. Texto` or `1 Texto`.
#[allow(clippy::expect_used)]
pub(crate) static RE_VERSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s*\.?(.*)").expect("valid regex: RE_VERSE")
});

/// Regex matching a chorus marker line like `Coro`, `CORO:` or `Coro: Texto`.
#[allow(clippy::expect_used)]
pub(crate) static RE_CHORUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^coro(?:\s*:)?\s*(.*)").expect("valid regex: RE_CHORUS")
});

/// Label of one lyrical segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// A numbered verse.
    Verse(u32),
    /// The (possibly recurring) refrain.
    Chorus,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verse(n) => write!(f, "Verse {n}"),
            Self::Chorus => write!(f, "Chorus"),
        }
    }
}

/// One labeled run of lyric lines.
///
/// Segments are ordered by appearance; a label may recur (reused verse
/// numbers are not deduplicated, later occurrences simply append another
/// segment with the same label).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Segment label, rendered as `Verse N` or `Chorus`.
    pub label: Label,
    /// Trimmed lyric lines belonging to this segment, in order.
    pub lines: Vec<String>,
}

impl Segment {
    /// Render the segment as `[label]` followed by its lines.
    #[must_use]
    pub fn render(&self) -> String {
        format!("[{}]\n{}", self.label, self.lines.join("\n"))
    }
}

/// Per-line classifier for one hymn body.
///
/// Feed raw (untrimmed) body lines in order via [`push_line`], then call
/// [`finish`] to flush the trailing segment. The builder holds no state
/// across hymn blocks.
///
/// [`push_line`]: SegmentBuilder::push_line
/// [`finish`]: SegmentBuilder::finish
#[derive(Debug)]
pub struct SegmentBuilder {
    /// Leading-whitespace width (in characters) at or beyond which an
    /// unlabeled line is treated as chorus content. `None` disables the
    /// indentation heuristic entirely.
    indent_chorus_threshold: Option<usize>,
    label: Option<Label>,
    buffer: Vec<String>,
    next_verse: u32,
    pending_boundary: bool,
    segments: Vec<Segment>,
}

impl SegmentBuilder {
    /// Create a classifier, optionally enabling hanging-indent chorus
    /// detection at the given column width.
    #[must_use]
    pub fn new(indent_chorus_threshold: Option<usize>) -> Self {
        Self {
            indent_chorus_threshold,
            label: None,
            buffer: Vec::new(),
            next_verse: 1,
            pending_boundary: false,
            segments: Vec::new(),
        }
    }

    /// Classify one raw body line.
    pub fn push_line(&mut self, raw: &str) {
        let trimmed = raw.trim();

        // Blank lines are never segment content; one (or a run of several)
        // arms a soft boundary that the next plain line acts on.
        if trimmed.is_empty() {
            if !self.buffer.is_empty() {
                self.pending_boundary = true;
            }
            return;
        }

        // Explicit verse marker, e.g. "2." or "2 Texto"
        if let Some(caps) = RE_VERSE.captures(trimmed) {
            if let Ok(number) = caps[1].parse::<u32>() {
                self.flush();
                self.label = Some(Label::Verse(number));
                self.next_verse = number.saturating_add(1);
                let rest = caps.get(2).map_or("", |m| m.as_str()).trim();
                if !rest.is_empty() {
                    self.buffer.push(rest.to_string());
                }
                self.pending_boundary = false;
                return;
            }
        }

        // Explicit chorus marker, e.g. "Coro", "CORO:" or "Coro: Texto"
        if let Some(caps) = RE_CHORUS.captures(trimmed) {
            self.flush();
            self.label = Some(Label::Chorus);
            let rest = caps.get(1).map_or("", |m| m.as_str()).trim();
            if !rest.is_empty() {
                self.buffer.push(rest.to_string());
            }
            self.pending_boundary = false;
            return;
        }

        // Hanging-indent implicit chorus (casteliano layout)
        if let Some(threshold) = self.indent_chorus_threshold {
            let indent = raw.chars().take_while(|c| c.is_whitespace()).count();
            if indent >= threshold {
                if self.label != Some(Label::Chorus) {
                    self.flush();
                    self.label = Some(Label::Chorus);
                }
                self.buffer.push(trimmed.to_string());
                self.pending_boundary = false;
                return;
            }
        }

        // Plain continuation line
        if self.pending_boundary {
            self.start_implicit_verse(trimmed);
        } else if self.indent_chorus_threshold.is_some() && self.label == Some(Label::Chorus) {
            // Indentation dropped below the chorus threshold with no marker:
            // roll over to the next expected verse number instead of reusing
            // the chorus label.
            self.start_implicit_verse(trimmed);
        } else if self.label.is_some() {
            self.buffer.push(trimmed.to_string());
        } else {
            // Very first content line of an unnumbered block
            self.label = Some(Label::Verse(1));
            self.next_verse = 2;
            self.buffer.push(trimmed.to_string());
        }
    }

    /// Flush the trailing segment and return all segments in order.
    #[must_use]
    pub fn finish(mut self) -> Vec<Segment> {
        self.flush();
        self.segments
    }

    fn start_implicit_verse(&mut self, line: &str) {
        self.flush();
        self.label = Some(Label::Verse(self.next_verse));
        self.next_verse = self.next_verse.saturating_add(1);
        self.buffer.push(line.to_string());
        self.pending_boundary = false;
    }

    /// Emit the buffered lines as a segment if both a label and content are
    /// present; the active label survives the flush.
    fn flush(&mut self) {
        match self.label {
            Some(label) if !self.buffer.is_empty() => {
                self.segments.push(Segment {
                    label,
                    lines: std::mem::take(&mut self.buffer),
                });
            }
            _ => self.buffer.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn classify(lines: &[&str], indent_threshold: Option<usize>) -> Vec<Segment> {
        let mut builder = SegmentBuilder::new(indent_threshold);
        for line in lines {
            builder.push_line(line);
        }
        builder.finish()
    }

    #[test]
    fn explicit_verse_markers_in_order() {
        let segments = classify(
            &["1. um", "dois", "", "2. tres", "", "3. quatro"],
            None,
        );
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].label, Label::Verse(1));
        assert_eq!(segments[0].lines, vec!["um", "dois"]);
        assert_eq!(segments[1].label, Label::Verse(2));
        assert_eq!(segments[1].lines, vec!["tres"]);
        assert_eq!(segments[2].label, Label::Verse(3));
        assert_eq!(segments[2].lines, vec!["quatro"]);
    }

    #[test]
    fn chorus_marker_strips_colon_and_collects_lines() {
        let segments = classify(
            &["Coro: Glória a Deus", "nas alturas", "nas alturas"],
            None,
        );
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].label, Label::Chorus);
        assert_eq!(
            segments[0].lines,
            vec!["Glória a Deus", "nas alturas", "nas alturas"]
        );
    }

    #[test]
    fn uppercase_chorus_marker_is_recognized() {
        let segments = classify(&["CORO", "linha"], None);
        assert_eq!(segments[0].label, Label::Chorus);
        assert_eq!(segments[0].lines, vec!["linha"]);
    }

    #[test]
    fn first_content_line_without_marker_starts_verse_one() {
        let segments = classify(&["sem numeração", "segunda linha"], None);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].label, Label::Verse(1));
    }

    #[test]
    fn blank_line_starts_implicit_next_verse() {
        let segments = classify(&["linha um", "", "linha dois"], None);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].label, Label::Verse(1));
        assert_eq!(segments[1].label, Label::Verse(2));
    }

    #[test]
    fn consecutive_blank_lines_collapse_to_one_boundary() {
        let segments = classify(&["1. um", "", "", "", "dois"], None);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].label, Label::Verse(2));
        assert_eq!(segments[1].lines, vec!["dois"]);
    }

    #[test]
    fn implicit_verse_after_chorus_rolls_over_numbering() {
        // Verse 2, chorus, then an unnumbered stanza: the new stanza takes
        // number 3, not a reused label.
        let segments = classify(
            &["2. verso dois", "", "Coro", "refrão", "", "estrofe solta"],
            None,
        );
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].label, Label::Chorus);
        assert_eq!(segments[2].label, Label::Verse(3));
    }

    #[test]
    fn indented_lines_become_chorus_when_enabled() {
        let segments = classify(
            &["1. verso", "      refrão indentado", "      segue indentado"],
            Some(5),
        );
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].label, Label::Verse(1));
        assert_eq!(segments[1].label, Label::Chorus);
        assert_eq!(segments[1].lines, vec!["refrão indentado", "segue indentado"]);
    }

    #[test]
    fn indentation_ignored_when_disabled() {
        let segments = classify(&["1. verso", "      ainda o verso"], None);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].lines, vec!["verso", "ainda o verso"]);
    }

    #[test]
    fn dropped_indentation_starts_new_verse() {
        // Existing behavior of the casteliano layout: once the chorus
        // indentation drops without any marker, the line opens verse
        // next_verse rather than extending the chorus.
        let segments = classify(
            &["1. verso", "      refrão", "volta à margem"],
            Some(5),
        );
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[1].label, Label::Chorus);
        assert_eq!(segments[2].label, Label::Verse(2));
        assert_eq!(segments[2].lines, vec!["volta à margem"]);
    }

    #[test]
    fn blank_lines_are_never_appended() {
        let segments = classify(&["1. um", "", "dois", ""], None);
        for segment in &segments {
            assert!(segment.lines.iter().all(|l| !l.trim().is_empty()));
        }
    }

    #[test]
    fn verse_marker_with_trailing_text_keeps_text() {
        let segments = classify(&["3 Deus é amor"], None);
        assert_eq!(segments[0].label, Label::Verse(3));
        assert_eq!(segments[0].lines, vec!["Deus é amor"]);
    }

    #[test]
    fn empty_body_yields_no_segments() {
        let segments = classify(&["", "   ", ""], None);
        assert!(segments.is_empty());
    }
}
