pub const SYSTEM_PROMPT_TEMPLATE: &str = "Translate the following {context}{source_language} subtitles \
     into {target_language}, line by line. Each line has the form [number] content. \
     Keep the number of lines identical and translate only the content; do not change the numbering or the format. \
     For example, given '[1] Hello world' and French as the target language, output only '[1] Bonjour le monde'. \
     Follow this format strictly and do not add any explanations or notes.";

pub const SYSTEM_PROMPT_WITH_SUMMARY_TEMPLATE: &str = "You are translating {source_language} subtitles \
     into {target_language}, line by line.\n\n\
     To capture the context more accurately, here is a short summary of the complete subtitles:\n\
     {summary}\n\n\
     Translate each line with this in mind. Each line has the form [number] content. \
     Keep the number of lines identical and translate only the content; do not change the numbering or the format. \
     For example, given '[1] Hello world' and French as the target language, output only '[1] Bonjour le monde'. \
     Follow this format strictly and do not add any explanations or notes.";

pub const SUMMARY_PROMPT_TEMPLATE: &str = "You are a subtitle analysis assistant. \
     Concisely summarize the main content and style of the following subtitles, \
     in {target_language}, using no more than about 200 characters. \
     Do not add your own commentary.";

/// Prefix marking a batch that could not be fully translated.
pub const WARNING_MARKER: &str = "⚠️";

/// Tag placed before source text kept in place of a missing translation.
pub const FALLBACK_TAG: &str = "[untranslated]";

/// Subtitle line-break escape understood by both SRT and ASS renderers.
pub const LINE_BREAK: &str = r"\N";

const GENERIC_SOURCE: &str = "source-language";
const GENERIC_TARGET: &str = "the requested language";

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_system_prompt(
    source_language: &str,
    target_language: &str,
    context_hint: Option<&str>,
) -> String {
    // {..} are placeholders for string replacement, not format arguments
    let context = context_hint
        .map(str::trim)
        .filter(|hint| !hint.is_empty())
        .map(|hint| format!("{hint}-themed "))
        .unwrap_or_default();

    SYSTEM_PROMPT_TEMPLATE
        .replace("{context}", &context)
        .replace("{source_language}", source_language)
        .replace("{target_language}", target_language)
}

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_summary_system_prompt(
    source_language: &str,
    target_language: &str,
    summary: &str,
) -> String {
    SYSTEM_PROMPT_WITH_SUMMARY_TEMPLATE
        .replace("{source_language}", source_language)
        .replace("{target_language}", target_language)
        .replace("{summary}", summary)
}

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_summary_instruction(target_language: &str) -> String {
    SUMMARY_PROMPT_TEMPLATE.replace("{target_language}", target_language)
}

/// Prompt used when the caller passes a blank system prompt.
pub fn default_system_prompt() -> String {
    build_system_prompt(GENERIC_SOURCE, GENERIC_TARGET, None)
}

/// Wraps untranslated source text so it stays visible in the output.
pub fn fallback_line(original: &str) -> String {
    format!("{FALLBACK_TAG} {original}")
}
