//! Advanced SubStation Alpha (`.ass` / `.ssa`) scripts.
//!
//! Only the text field of `Dialogue:` rows in `[Events]` is editable;
//! every other line is carried through byte for byte.

use super::{Row, SubtitleLine};

/// Field count of the standard v4+ events format.
const DEFAULT_EVENT_FIELDS: usize = 10;

pub(super) fn parse(content: &str) -> Result<(Vec<SubtitleLine>, Vec<Row>), String> {
    let mut lines = Vec::new();
    let mut layout = Vec::new();
    let mut in_events = false;
    let mut fields = DEFAULT_EVENT_FIELDS;

    for (number, raw) in content.lines().enumerate() {
        let trimmed = raw.trim_start();

        if trimmed.starts_with('[') {
            in_events = trimmed.trim_end().eq_ignore_ascii_case("[events]");
        } else if in_events {
            if let Some(format) = strip_key(trimmed, "Format:") {
                fields = format.split(',').count().max(1);
            } else if strip_key(trimmed, "Dialogue:").is_some() {
                let split = text_offset(raw, fields).ok_or_else(|| {
                    format!("line {}: dialogue has fewer than {fields} fields", number + 1)
                })?;
                layout.push(Row::Line(lines.len()));
                lines.push(SubtitleLine {
                    metadata: raw[..split].to_string(),
                    text: raw[split..].to_string(),
                });
                continue;
            }
        }

        layout.push(Row::Verbatim(raw.to_string()));
    }

    Ok((lines, layout))
}

fn strip_key<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.get(..key.len())
        .filter(|head| head.eq_ignore_ascii_case(key))
        .map(|_| &line[key.len()..])
}

/// Byte offset where the text field starts: just past the comma that
/// closes field `fields - 1`.
fn text_offset(line: &str, fields: usize) -> Option<usize> {
    let separators = fields - 1;
    if separators == 0 {
        return line.find(':').map(|i| i + 1);
    }
    line.match_indices(',')
        .nth(separators - 1)
        .map(|(i, _)| i + 1)
}

pub(super) fn render(lines: &[SubtitleLine], layout: &[Row]) -> String {
    let mut out = String::new();
    for row in layout {
        match row {
            Row::Verbatim(text) => out.push_str(text),
            Row::Line(index) => {
                if let Some(line) = lines.get(*index) {
                    out.push_str(&line.metadata);
                    out.push_str(&line.text);
                }
            }
        }
        out.push('\n');
    }
    out
}
