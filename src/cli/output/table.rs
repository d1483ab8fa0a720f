//! Table output formatting for CLI commands
//!
//! Provides formatted table output for query results, ingestion reports and
//! collection statistics using comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{IngestionReport, QueryResult};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format ranked query results
    pub fn format_results(&self, results: &[QueryResult]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            header("#"),
            header("Score"),
            header("Source"),
            header("Chunk"),
            header("Text"),
        ]);

        for (rank, result) in results.iter().enumerate() {
            let score = result
                .score()
                .map_or_else(|| "-".to_string(), |s| format!("{s:.3}"));

            let score_cell = match result.score() {
                Some(s) if self.use_colors => Cell::new(score).fg(score_color(s)),
                _ => Cell::new(score),
            };

            table.add_row(vec![
                Cell::new(rank + 1),
                score_cell,
                Cell::new(truncate_text(&result.metadata.source, 30)),
                Cell::new(result.metadata.sequence_index),
                Cell::new(result.preview(120)),
            ]);
        }

        table.to_string()
    }

    /// Format an ingestion report
    pub fn format_report(&self, report: &IngestionReport) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![header("Documents"), header("Chunks written"), header("Blank documents")]);

        let blank = if report.documents_without_chunks.is_empty() {
            "-".to_string()
        } else {
            report.documents_without_chunks.join(", ")
        };

        table.add_row(vec![
            Cell::new(report.documents_processed),
            Cell::new(report.chunks_added),
            Cell::new(truncate_text(&blank, 60)),
        ]);

        table.to_string()
    }

    /// Format key/value pairs as a two-column table
    pub fn format_properties(&self, rows: &[(&str, String)]) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![header("Property"), header("Value")]);

        for (key, value) in rows {
            let key_cell = if self.use_colors {
                Cell::new(key).fg(Color::Cyan)
            } else {
                Cell::new(key)
            };
            table.add_row(vec![key_cell, Cell::new(value)]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(title: &str) -> Cell {
    Cell::new(title).add_attribute(Attribute::Bold)
}

/// Check if color output is supported
fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

fn score_color(score: f32) -> Color {
    if score >= 0.75 {
        Color::Green
    } else if score >= 0.6 {
        Color::Yellow
    } else {
        Color::DarkGrey
    }
}

/// Truncate to `max_chars` characters, never splitting a character
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
