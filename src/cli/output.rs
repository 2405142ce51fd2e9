//! Output formatting utilities for CLI

use serde::Serialize;

use crate::state::StateEvent;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print a serializable value as JSON or use custom text formatter
pub fn print_formatted<T, F>(value: &T, format: OutputFormat, text_formatter: F)
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Text => println!("{}", text_formatter(value)),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

/// Print a success message (suppressed in quiet mode)
pub fn print_success(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", message);
    }
}

/// Print an error message (never suppressed)
pub fn print_error(message: &str) {
    eprintln!("Error: {}", message);
}

/// Print a status line with a check mark or X
pub fn print_status(ok: bool, message: &str) {
    if ok {
        println!("[OK] {}", message);
    } else {
        println!("[  ] {}", message);
    }
}

/// First blocking message among session events
pub fn first_modal(events: &[StateEvent]) -> Option<&str> {
    events.iter().find_map(|e| match e {
        StateEvent::Modal(message) => Some(message.as_str()),
        _ => None,
    })
}
