/*
 * builder.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Structural parsing of transformed stylesheets.
//!
//! Parsing never fails from the caller's point of view: a stylesheet the
//! parser rejects is replaced by an empty one tagged with the same
//! filename, and the failure is returned alongside it as a [`BuildError`].

use cssmerge_css::Stylesheet;

use crate::report::{BuildError, BuildErrorKind};

/// The outcome of transforming and parsing one file.
#[derive(Debug)]
pub struct ParsedFile {
    /// The parsed stylesheet, or an empty placeholder.
    pub ast: Stylesheet,
    pub error: Option<BuildError>,
    /// The text the error position refers to.
    pub text: String,
}

impl ParsedFile {
    /// An empty placeholder for a file that failed before parsing.
    pub fn failed(path: &str, error: BuildError, text: String) -> Self {
        ParsedFile {
            ast: Stylesheet::empty(path),
            error: Some(error),
            text,
        }
    }
}

/// Parse `text`, the transformed content of the file at `path`.
pub fn build_ast(text: String, path: &str) -> ParsedFile {
    match cssmerge_css::parse(&text, path) {
        Ok(ast) => ParsedFile {
            ast,
            error: None,
            text,
        },
        Err(err) => {
            tracing::debug!(path, error = %err, "Failed to parse stylesheet");
            let mut error = BuildError::new(path, BuildErrorKind::Parse, err.message);
            error.location = err.location;
            ParsedFile::failed(path, error, text)
        }
    }
}
