/*
 * filter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Selection of the files that take part in the merge.
//!
//! Import partials (`*.import.css`, anything under an `imports/`
//! directory) are only meant to be pulled in by other stylesheets, and
//! `*.less.css` files are the output of the LESS compiler, which bundles
//! them itself. Neither is merged.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::file::SourceFile;

static IMPORT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.import\.css$").expect("valid regex"));

static IMPORTS_DIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|/)imports/").expect("valid regex"));

static LESS_OUTPUT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.less\.css$").expect("valid regex"));

/// Whether `path` names an import-only partial.
pub fn is_import_partial(path: &str) -> bool {
    IMPORT_SUFFIX.is_match(path) || IMPORTS_DIR.is_match(path)
}

/// Whether `path` names the output of another stylesheet compiler.
pub fn is_compiler_output(path: &str) -> bool {
    LESS_OUTPUT.is_match(path)
}

/// Keep the files that should be merged, in their original order.
pub fn select(files: Vec<SourceFile>) -> Vec<SourceFile> {
    files
        .into_iter()
        .filter(|file| {
            let keep = !is_import_partial(&file.path) && !is_compiler_output(&file.path);
            if !keep {
                tracing::debug!(path = %file.path, "Skipping stylesheet");
            }
            keep
        })
        .collect()
}
