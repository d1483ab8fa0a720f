//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "codebridge")]
#[command(about = "Codebridge - documentation retrieval for a local coding assistant", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this YAML file instead of .codebridge/
    #[arg(short, long, global = true, env = "CODEBRIDGE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chunk, embed and index the documentation directory
    Ingest {
        /// Directory of .txt files (defaults to ingestion.docs_dir)
        #[arg(short, long)]
        docs_dir: Option<PathBuf>,
    },

    /// Retrieve the chunks most relevant to a question
    ///
    /// Without TEXT, reads questions from stdin until `exit` or `quit`.
    Query {
        /// Question text
        text: Option<String>,

        /// Number of results (defaults to query.default_k)
        #[arg(short)]
        k: Option<usize>,
    },

    /// Show collection statistics
    Stats,
}
