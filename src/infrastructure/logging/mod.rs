//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Pretty or JSON events on stderr
//! - Optional rolling JSON log file

pub mod logger;

pub use logger::LoggerImpl;
