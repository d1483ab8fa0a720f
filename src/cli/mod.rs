//! Command-line driver
//!
//! Thin glue over [`RagService`](crate::services::RagService): `ingest`,
//! `query` and `stats`. Command output goes to stdout, logs and progress to
//! stderr.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use crate::domain::errors::DomainError;

/// Print an error (text or JSON) and exit with status 1
pub fn handle_error(err: &anyhow::Error, json: bool) -> ! {
    let stage = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<DomainError>())
        .map(DomainError::stage);

    if json {
        let causes: Vec<String> = err.chain().map(ToString::to_string).collect();
        let body = serde_json::json!({
            "error": err.to_string(),
            "stage": stage,
            "causes": causes,
        });
        println!("{body}");
    } else {
        eprintln!("Error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
    }

    std::process::exit(1);
}
