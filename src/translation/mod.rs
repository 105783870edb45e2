mod batch;
mod client;
pub mod codec;
mod language;
pub mod mock;
pub mod prompt;
mod summary;

pub use batch::{BatchOutcome, BatchTranslator, DEFAULT_RETRY_DELAY, failure_output};
pub use client::{ChatBackend, ChatRequest, OpenAiClient};
pub use language::{COMMON_LANGUAGES, output_suffix, print_languages};
pub use summary::{MAX_SUMMARY_INPUT_CHARS, SUMMARY_TEMPERATURE, summarize};
