//! Language names offered by the CLI and the output-file suffix rule.
//!
//! Languages are free text: the model is told the name verbatim, so any
//! value is accepted. The list below only feeds prompts and `subtl languages`.

use crate::ui::Style;

/// Commonly used language names, in the form the prompts expect.
pub const COMMON_LANGUAGES: &[&str] = &[
    "Arabic",
    "Bengali",
    "Czech",
    "Danish",
    "Dutch",
    "English",
    "Finnish",
    "French",
    "German",
    "Greek",
    "Hebrew",
    "Hindi",
    "Hungarian",
    "Indonesian",
    "Italian",
    "Japanese",
    "Korean",
    "Malay",
    "Norwegian",
    "Persian",
    "Polish",
    "Portuguese",
    "Romanian",
    "Russian",
    "Simplified Chinese",
    "Spanish",
    "Swedish",
    "Thai",
    "Traditional Chinese",
    "Turkish",
    "Ukrainian",
    "Vietnamese",
];

const SIMPLIFIED_CHINESE_ALIASES: &[&str] = &["simplified chinese", "简体中文", "zh", "zh-cn", "zh-hans"];

/// Prints the common language names to stdout.
pub fn print_languages() {
    println!("{}", Style::header("Common languages"));
    for name in COMMON_LANGUAGES {
        println!("  {}", Style::value(name));
    }
    println!();
    println!(
        "{}",
        Style::hint("Any other language name is passed to the model as written.")
    );
}

/// Suffix inserted before the extension of a derived output file.
///
/// Simplified Chinese maps to `_cn`; anything else becomes a lowercase tag
/// with whitespace and path-unsafe characters removed.
pub fn output_suffix(target_language: &str) -> String {
    let trimmed = target_language.trim();
    if SIMPLIFIED_CHINESE_ALIASES
        .iter()
        .any(|alias| trimmed.eq_ignore_ascii_case(alias))
    {
        return "_cn".to_string();
    }

    let tag: String = trimmed
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .flat_map(char::to_lowercase)
        .collect();

    if tag.is_empty() {
        "_translated".to_string()
    } else {
        format!("_{tag}")
    }
}
