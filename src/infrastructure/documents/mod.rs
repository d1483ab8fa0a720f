//! Document sources
//!
//! Reads the scraper's output store: a flat directory of `.txt` files.

pub mod text_directory;

pub use text_directory::TextDirectorySource;
