//! Configuration loading
//!
//! Layered with figment: built-in defaults, `.codebridge/config.yaml`,
//! `.codebridge/local.yaml`, then `CODEBRIDGE_*` environment variables.
//! Values are validated after extraction.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
