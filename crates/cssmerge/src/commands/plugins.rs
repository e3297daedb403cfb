/*
 * plugins.rs
 * Copyright (c) 2025 Posit, PBC
 */

use std::process::ExitCode;

use anyhow::Result;

use cssmerge_core::PluginRegistry;

/// Print the identifiers accepted in the `plugins` configuration.
pub fn execute() -> Result<ExitCode> {
    for name in PluginRegistry::with_builtins().names() {
        println!("{name}");
    }
    Ok(ExitCode::SUCCESS)
}
