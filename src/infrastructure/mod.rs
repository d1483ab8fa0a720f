//! Infrastructure layer module
//!
//! This module contains the infrastructure adapters behind the domain ports:
//! - `SQLite` connection management (sqlx)
//! - Paragraph chunking, local embeddings and the vector store
//! - Reading `.txt` documents from disk
//! - Configuration loading
//! - Logging
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod database;
pub mod documents;
pub mod logging;
pub mod vector;
