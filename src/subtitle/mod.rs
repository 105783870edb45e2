//! Subtitle files as sequences of editable text lines.
//!
//! Timing and styling stay opaque: the pipeline reads and rewrites `text`
//! and everything else is written back exactly as it was loaded.

mod ass;
mod srt;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::SubtitleError;
use crate::fs::atomic_write;

/// Placeholder for a line the translation never produced.
pub const MISSING_TRANSLATION: &str = "⚠️[translation missing]";

/// Placeholder for a document line beyond the expected count.
pub const INDEX_OUT_OF_RANGE: &str = "⚠️[index out of range]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    Ass,
}

impl SubtitleFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "srt" => Some(Self::Srt),
            "ass" | "ssa" => Some(Self::Ass),
            _ => None,
        }
    }
}

/// One timed line: opaque metadata plus its editable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleLine {
    metadata: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Row {
    Verbatim(String),
    Line(usize),
}

/// A loaded subtitle file.
#[derive(Debug, Clone)]
pub struct SubtitleDocument {
    format: SubtitleFormat,
    lines: Vec<SubtitleLine>,
    layout: Vec<Row>,
}

impl SubtitleDocument {
    pub fn parse(content: &str, format: SubtitleFormat) -> Result<Self, String> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        match format {
            SubtitleFormat::Srt => Ok(Self {
                format,
                lines: srt::parse(content)?,
                layout: Vec::new(),
            }),
            SubtitleFormat::Ass => {
                let (lines, layout) = ass::parse(content)?;
                Ok(Self {
                    format,
                    lines,
                    layout,
                })
            }
        }
    }

    pub const fn format(&self) -> SubtitleFormat {
        self.format
    }

    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[SubtitleLine] {
        &self.lines
    }

    /// Text of every line, in order.
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(|line| line.text.clone()).collect()
    }

    /// Assigns `translated[i]` to line `i`; lines past the end of
    /// `translated` keep their current text.
    pub fn apply(&mut self, translated: &[String]) {
        for (line, text) in self.lines.iter_mut().zip(translated) {
            line.text.clone_from(text);
        }
    }

    pub fn render(&self) -> String {
        match self.format {
            SubtitleFormat::Srt => srt::render(&self.lines),
            SubtitleFormat::Ass => ass::render(&self.lines, &self.layout),
        }
    }

    /// Writes the document to `path` atomically.
    pub fn write(&self, path: &Path) -> Result<(), SubtitleError> {
        atomic_write(path, &self.render()).map_err(|source| SubtitleError::Save {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), lines = self.len(), "subtitles saved");
        Ok(())
    }
}

/// Loads a subtitle file, choosing the format from its extension.
pub fn load(path: &Path) -> Result<SubtitleDocument, SubtitleError> {
    if !path.exists() {
        return Err(SubtitleError::NotFound(path.to_path_buf()));
    }

    let format = SubtitleFormat::from_path(path)
        .ok_or_else(|| SubtitleError::UnsupportedFormat(path.to_path_buf()))?;

    let content = fs::read_to_string(path).map_err(|e| load_error(path, e.to_string()))?;
    let document = SubtitleDocument::parse(&content, format).map_err(|m| load_error(path, m))?;

    info!(path = %path.display(), lines = document.len(), "subtitles loaded");
    Ok(document)
}

fn load_error(path: &Path, message: String) -> SubtitleError {
    SubtitleError::Load {
        path: PathBuf::from(path),
        message,
    }
}

/// Pads with [`MISSING_TRANSLATION`] or truncates so exactly `expected`
/// lines remain.
pub fn reconcile(mut translated: Vec<String>, expected: usize) -> Vec<String> {
    if translated.len() < expected {
        warn!(
            got = translated.len(),
            expected, "fewer translated lines than source lines, padding"
        );
        translated.resize(expected, MISSING_TRANSLATION.to_string());
    } else if translated.len() > expected {
        warn!(
            got = translated.len(),
            expected, "more translated lines than source lines, truncating"
        );
        translated.truncate(expected);
    }
    translated
}

/// Writes `translated` over the document's lines and saves it to `path`.
///
/// The translation is reconciled to `expected` lines first; document lines
/// beyond that count are marked with [`INDEX_OUT_OF_RANGE`].
pub fn save(
    document: &mut SubtitleDocument,
    path: &Path,
    translated: Vec<String>,
    expected: usize,
) -> Result<(), SubtitleError> {
    let mut texts = reconcile(translated, expected);
    if document.len() > texts.len() {
        texts.resize(document.len(), INDEX_OUT_OF_RANGE.to_string());
    }
    document.apply(&texts);
    document.write(path)
}
