//! Shared test utilities
#![allow(dead_code)]

pub mod embedders;
pub mod fixtures;
