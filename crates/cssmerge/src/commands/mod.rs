//! Command implementations for the cssmerge CLI
//!
//! Each command module handles the CLI interface and delegates to
//! cssmerge-core for the actual work.

pub mod bundle;
pub mod plugins;
