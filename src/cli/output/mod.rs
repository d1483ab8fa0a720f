//! CLI output formatting module
//!
//! Provides various output formatters for terminal display.

pub mod progress;
pub mod table;

pub use progress::{create_spinner_with_message, ProgressBarExt};
pub use table::TableFormatter;
