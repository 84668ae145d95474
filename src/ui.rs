use console::style;
use std::fmt::Display;

/// Bright blue — startup banner lines
pub fn banner<D: Display>(text: D) -> String {
    style(text).blue().bright().to_string()
}

/// Green — user input prompt
pub fn prompt<D: Display>(text: D) -> String {
    style(text).green().to_string()
}

/// Cyan — assistant reply prefix
pub fn assistant<D: Display>(text: D) -> String {
    style(text).cyan().to_string()
}

/// Bright yellow — tool execution progress
pub fn tool_run<D: Display>(text: D) -> String {
    style(text).yellow().bright().to_string()
}

/// Red — inline errors
pub fn error<D: Display>(text: D) -> String {
    style(text).red().to_string()
}

/// Dim — goodbye line, secondary text
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}
