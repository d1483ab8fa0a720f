//! Database infrastructure

pub mod connection;

pub use connection::DatabaseConnection;
