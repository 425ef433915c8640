//! On-disk record emission: one JSON and one Markdown file per hymn,
//! named by hymn number, with deterministic collision suffixes when the
//! same number recurs across source documents.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::record::{FieldNames, HymnRecord};

/// Writes hymn records under `json/` and `markdown/` output directories.
///
/// Tracks numbers seen during the run; the second record with number 7 is
/// written as `7-2.json` / `7-2.md`, the third as `7-3`, and so on.
#[derive(Debug)]
pub struct RecordWriter {
    json_dir: PathBuf,
    markdown_dir: PathBuf,
    names: FieldNames,
    seen: HashMap<u32, u32>,
    written: usize,
}

impl RecordWriter {
    /// Create a writer, creating both output directories if needed.
    pub fn new(
        json_dir: impl Into<PathBuf>,
        markdown_dir: impl Into<PathBuf>,
        names: FieldNames,
    ) -> Result<Self> {
        let json_dir = json_dir.into();
        let markdown_dir = markdown_dir.into();
        fs_err::create_dir_all(&json_dir).map_err(|e| Error::io(e, json_dir.clone()))?;
        fs_err::create_dir_all(&markdown_dir).map_err(|e| Error::io(e, markdown_dir.clone()))?;
        Ok(Self {
            json_dir,
            markdown_dir,
            names,
            seen: HashMap::new(),
            written: 0,
        })
    }

    /// Persist one record, returning the JSON path it was written to.
    pub fn write(&mut self, record: &HymnRecord) -> Result<PathBuf> {
        let stem = self.next_stem(record.no);

        let json_path = self.json_dir.join(format!("{stem}.json"));
        write_file(&json_path, &record.to_json(self.names)?)?;

        let md_path = self.markdown_dir.join(format!("{stem}.md"));
        write_file(&md_path, &record.to_markdown(self.names))?;

        self.written += 1;
        Ok(json_path)
    }

    /// Number of records written so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    /// File stem for the next occurrence of `number`: the bare number the
    /// first time, `number-2`, `number-3`, ... afterwards.
    fn next_stem(&mut self, number: u32) -> String {
        let count = self.seen.entry(number).or_insert(0);
        *count += 1;
        if *count == 1 {
            number.to_string()
        } else {
            format!("{number}-{count}")
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs_err::write(path, content).map_err(|e| Error::io(e, path.to_path_buf()))
}
