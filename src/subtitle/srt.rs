//! SubRip (`.srt`) cues.
//!
//! A cue is an optional counter, a timing line and one or more text lines.
//! Text lines are exposed joined by `\N`, the same escape ASS uses, so the
//! pipeline sees one string per cue regardless of format.

use super::SubtitleLine;

const TIMING_ARROW: &str = "-->";

pub(super) fn parse(content: &str) -> Result<Vec<SubtitleLine>, String> {
    let mut cues = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for raw in content.lines().chain(std::iter::once("")) {
        if raw.trim().is_empty() {
            if !block.is_empty() {
                cues.push(parse_cue(&block, cues.len() + 1)?);
                block.clear();
            }
        } else {
            block.push(raw);
        }
    }

    Ok(cues)
}

fn parse_cue(block: &[&str], position: usize) -> Result<SubtitleLine, String> {
    let timing_at = block
        .iter()
        .position(|line| line.contains(TIMING_ARROW))
        .filter(|&i| i <= 1)
        .ok_or_else(|| format!("cue {position} has no timing line"))?;

    if timing_at == 1 && block[0].trim().parse::<u64>().is_err() {
        return Err(format!(
            "cue {position} has an invalid counter '{}'",
            block[0].trim()
        ));
    }

    Ok(SubtitleLine {
        metadata: block[timing_at].trim().to_string(),
        text: block[timing_at + 1..].join(r"\N"),
    })
}

pub(super) fn render(lines: &[SubtitleLine]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{}\n{}\n\n",
            i + 1,
            line.metadata,
            line.text.replace(r"\N", "\n")
        ));
    }
    out
}
