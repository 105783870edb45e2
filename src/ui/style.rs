//! Color helpers for terminal output, built on owo-colors.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Styles for the semantic pieces of CLI output.
pub struct Style;

impl Style {
    /// Section headers such as "Configuration".
    pub fn header<T: Display>(text: T) -> String {
        format!("{}", text.bold())
    }

    /// Setting names and other keys.
    pub fn label<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Primary values: models, languages, paths.
    pub fn value<T: Display>(text: T) -> String {
        format!("{}", text.cyan())
    }

    pub fn secondary<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    pub fn success<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    pub fn error<T: Display>(text: T) -> String {
        format!("{}", text.red().bold())
    }

    pub fn warning<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    /// Hints and help text.
    pub fn hint<T: Display>(text: T) -> String {
        format!("{}", text.dimmed().italic())
    }

    /// Source side of a translation preview.
    pub fn source<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Translated side of a translation preview.
    pub fn translated<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }
}
