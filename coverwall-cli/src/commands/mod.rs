//! CLI command implementations.

pub mod cache;
pub mod common;
pub mod compose;
pub mod config;
