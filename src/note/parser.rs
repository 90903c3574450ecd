//! Metadata-header parser for exported note files.
//!
//! The export format puts a header block at the top of every note:
//!
//! ```text
//! date: 2021-03-14 09:26:53
//! created: 2021-03-01 18:00:00
//! categories:
//! - Matura / Physik
//! - Matura / Physik / Mechanik Grundlagen
//!
//! body starts here...
//! ```
//!
//! The block may optionally be fenced with `---` lines (frontmatter style).
//! Later category entries are more specific; insertion order is preserved.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::{ConvertError, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A parsed input note. Immutable after parsing; reprocessing a file
/// re-derives a fresh instance.
#[derive(Debug, Clone)]
pub struct Note {
    /// Path of the source file this note was parsed from
    pub source: PathBuf,
    /// Display name (source filename without extension)
    pub name: String,
    /// Nominal date from the header
    pub date: NaiveDateTime,
    /// Creation date from the header
    pub created: NaiveDateTime,
    /// Category paths in header order; later entries are more specific
    pub categories: Vec<String>,
    /// Raw body text (everything after the header)
    pub content: String,
}

impl Note {
    /// The category path used for placement: the last (most specific) entry.
    pub fn placement_category(&self) -> &str {
        // Parsing guarantees at least one entry.
        self.categories.last().map(String::as_str).unwrap_or("")
    }
}

/// Read and parse a note file from disk.
pub fn read_note(path: &Path) -> Result<Note> {
    let text = fs::read_to_string(path)?;
    parse_note(path, &text)
}

/// Parse note text into a [`Note`].
///
/// Fails if the header is missing `date`, `created`, or `categories`, if a
/// timestamp does not match `YYYY-MM-DD HH:MM:SS`, or if the categories
/// block is empty.
pub fn parse_note(path: &Path, text: &str) -> Result<Note> {
    let mut date: Option<NaiveDateTime> = None;
    let mut created: Option<NaiveDateTime> = None;
    let mut categories: Vec<String> = Vec::new();
    let mut in_categories = false;

    let mut body_offset = 0usize;
    let mut fenced = false;
    let mut first = true;

    // Iterate raw line chunks so the body offset counts real bytes,
    // including `\r\n` terminators that `str::lines` would strip.
    for raw in text.split_inclusive('\n') {
        let consumed = raw.len();
        let trimmed = raw.trim();

        if first {
            first = false;
            if trimmed == "---" {
                fenced = true;
                body_offset += consumed;
                continue;
            }
        }

        // Header ends at the closing fence or the first blank line.
        if (fenced && trimmed == "---") || (!fenced && trimmed.is_empty()) {
            body_offset += consumed;
            break;
        }
        body_offset += consumed;

        if let Some(rest) = strip_bullet(trimmed) {
            if in_categories && !rest.is_empty() {
                categories.push(rest.to_string());
            }
            continue;
        }
        in_categories = false;

        let Some((key, value)) = trimmed.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_lowercase().as_str() {
            "date" => date = Some(parse_timestamp(path, value)?),
            "created" => created = Some(parse_timestamp(path, value)?),
            "categories" => {
                in_categories = true;
                if !value.is_empty() {
                    categories.push(value.to_string());
                }
            }
            _ => {}
        }
    }

    let date = date.ok_or(ConvertError::MissingField {
        file: path.to_path_buf(),
        field: "date",
    })?;
    let created = created.ok_or(ConvertError::MissingField {
        file: path.to_path_buf(),
        field: "created",
    })?;
    if categories.is_empty() {
        return Err(ConvertError::NoCategories(path.to_path_buf()));
    }

    let content = text
        .get(body_offset.min(text.len())..)
        .unwrap_or("")
        .trim_start_matches('\n')
        .to_string();

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Untitled".to_string());

    Ok(Note {
        source: path.to_path_buf(),
        name,
        date,
        created,
        categories,
        content,
    })
}

/// `"- Matura / Physik"` -> `Some("Matura / Physik")`
fn strip_bullet(line: &str) -> Option<&str> {
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .map(str::trim)
}

fn parse_timestamp(path: &Path, value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| {
        ConvertError::InvalidTimestamp {
            file: path.to_path_buf(),
            value: value.to_string(),
        }
    })
}
