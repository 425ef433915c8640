//! Record emission: the terminal `{number, title, lyrics}` entity and its
//! JSON / Markdown renderings.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::Result;
use crate::parser::{ParsedHymn, Segment};

/// Regex matching parenthetical annotations in titles.
#[allow(clippy::expect_used)]
static RE_PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\([^)]*\)\s*").expect("valid regex: RE_PARENTHETICAL")
});

/// Regex matching internal whitespace runs.
#[allow(clippy::expect_used)]
static RE_WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("valid regex: RE_WHITESPACE_RUN")
});

/// Field naming for serialized records.
///
/// The legacy collection used `id`/`titulo`; it is the same record shape
/// under different names, not a different entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldNames {
    /// `no` / `title` / `lyrics`
    #[default]
    Standard,
    /// `id` / `titulo` / `lyrics`
    Legacy,
}

#[derive(Serialize)]
struct StandardFields<'a> {
    no: u32,
    title: &'a str,
    lyrics: &'a str,
}

#[derive(Serialize)]
struct LegacyFields<'a> {
    id: u32,
    titulo: &'a str,
    lyrics: &'a str,
}

/// The persisted hymn entity. Written once, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HymnRecord {
    /// Hymn number (always positive; uniqueness is the writer's concern).
    pub no: u32,
    /// Cleaned display title.
    pub title: String,
    /// Rendered lyrics: `[label]` headed segments separated by blank lines.
    pub lyrics: String,
}

impl HymnRecord {
    /// Build a record from a parsed hymn, cleaning the title and rendering
    /// the segments.
    #[must_use]
    pub fn from_parsed(hymn: &ParsedHymn) -> Self {
        let lyrics = hymn
            .segments
            .iter()
            .map(Segment::render)
            .collect::<Vec<_>>()
            .join("\n\n");
        Self {
            no: hymn.number,
            title: clean_title(&hymn.title),
            lyrics,
        }
    }

    /// Serialize as pretty-printed JSON with stable key order.
    pub fn to_json(&self, names: FieldNames) -> Result<String> {
        let json = match names {
            FieldNames::Standard => serde_json::to_string_pretty(&StandardFields {
                no: self.no,
                title: &self.title,
                lyrics: &self.lyrics,
            })?,
            FieldNames::Legacy => serde_json::to_string_pretty(&LegacyFields {
                id: self.no,
                titulo: &self.title,
                lyrics: &self.lyrics,
            })?,
        };
        Ok(json)
    }

    /// Render as Markdown: front-matter block, blank line, lyrics verbatim.
    #[must_use]
    pub fn to_markdown(&self, names: FieldNames) -> String {
        let (number_key, title_key) = match names {
            FieldNames::Standard => ("no", "title"),
            FieldNames::Legacy => ("id", "titulo"),
        };
        format!(
            "---\n{number_key}: {}\n{title_key}: {}\n---\n\n{}\n",
            self.no, self.title, self.lyrics
        )
    }
}

/// Clean a header title: drop parenthetical annotations, trim trailing
/// dashes, collapse whitespace runs to single spaces.
fn clean_title(raw: &str) -> String {
    let title = RE_PARENTHETICAL.replace_all(raw, "");
    let title = title.trim().trim_end_matches([' ', '–']);
    RE_WHITESPACE_RUN.replace_all(title, " ").into_owned()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::parser::{Label, Segment};

    fn sample_hymn() -> ParsedHymn {
        ParsedHymn {
            number: 5,
            title: "Título Bonito".to_string(),
            segments: vec![
                Segment {
                    label: Label::Verse(1),
                    lines: vec!["Primeira linha".to_string(), "Segunda linha".to_string()],
                },
                Segment {
                    label: Label::Chorus,
                    lines: vec!["Linha do coro".to_string()],
                },
                Segment {
                    label: Label::Verse(2),
                    lines: vec!["Outra estrofe".to_string()],
                },
            ],
        }
    }

    #[test]
    fn lyrics_render_with_labels_and_blank_separators() {
        let record = HymnRecord::from_parsed(&sample_hymn());
        assert_eq!(record.no, 5);
        assert_eq!(record.title, "Título Bonito");
        assert_eq!(
            record.lyrics,
            "[Verse 1]\nPrimeira linha\nSegunda linha\n\n[Chorus]\nLinha do coro\n\n[Verse 2]\nOutra estrofe"
        );
    }

    #[test]
    fn json_uses_stable_key_order() {
        let record = HymnRecord::from_parsed(&sample_hymn());
        let json = record.to_json(FieldNames::Standard).unwrap();
        let no_pos = json.find("\"no\"").unwrap();
        let title_pos = json.find("\"title\"").unwrap();
        let lyrics_pos = json.find("\"lyrics\"").unwrap();
        assert!(no_pos < title_pos && title_pos < lyrics_pos);
    }

    #[test]
    fn json_preserves_accented_characters() {
        let record = HymnRecord::from_parsed(&sample_hymn());
        let json = record.to_json(FieldNames::Standard).unwrap();
        assert!(json.contains("Título Bonito"));
    }

    #[test]
    fn legacy_names_rename_fields_only() {
        let record = HymnRecord::from_parsed(&sample_hymn());
        let json = record.to_json(FieldNames::Legacy).unwrap();
        assert!(json.contains("\"id\": 5"));
        assert!(json.contains("\"titulo\": \"Título Bonito\""));
        assert!(!json.contains("\"no\""));
    }

    #[test]
    fn markdown_has_front_matter_then_lyrics() {
        let record = HymnRecord::from_parsed(&sample_hymn());
        let md = record.to_markdown(FieldNames::Standard);
        assert!(md.starts_with("---\nno: 5\ntitle: Título Bonito\n---\n\n[Verse 1]\n"));
        assert!(md.ends_with("Outra estrofe\n"));
    }

    #[test]
    fn markdown_legacy_front_matter_keys() {
        let record = HymnRecord::from_parsed(&sample_hymn());
        let md = record.to_markdown(FieldNames::Legacy);
        assert!(md.starts_with("---\nid: 5\ntitulo: Título Bonito\n---\n"));
    }

    #[test]
    fn clean_title_strips_parentheticals() {
        assert_eq!(clean_title("Saudai o Nome (Coroai)"), "Saudai o Nome");
    }

    #[test]
    fn clean_title_trims_trailing_dash_and_spaces() {
        assert_eq!(clean_title("Vencendo Vem Jesus – "), "Vencendo Vem Jesus");
    }

    #[test]
    fn clean_title_collapses_whitespace_runs() {
        assert_eq!(clean_title("Cristo,  M aestro   Divino"), "Cristo, M aestro Divino");
    }
}
