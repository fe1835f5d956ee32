//! Colored status tags

use crossterm::style::Stylize;

/// `[label]` in green, for completed or informational steps
pub fn success(label: &str) -> String {
    format!("[{}]", label.green())
}

/// `[label]` in red, for errors and cancellations
pub fn failure(label: &str) -> String {
    format!("[{}]", label.red())
}

/// Environment name as shown in headers
pub fn environment(name: &str) -> String {
    name.green().to_string()
}
