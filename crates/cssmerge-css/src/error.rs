/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for stylesheet parsing.

use cssmerge_source_map::Location;
use thiserror::Error;

/// The parser rejected a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CssParseError {
    /// Short description, e.g. "Unclosed block".
    pub message: String,
    /// Where the problem starts in the parsed text, when known.
    pub location: Option<Location>,
}

impl CssParseError {
    pub fn at(message: impl Into<String>, location: Location) -> Self {
        CssParseError {
            message: message.into(),
            location: Some(location),
        }
    }

    /// 1-based (line, column), as shown to users.
    pub fn line_column(&self) -> Option<(usize, usize)> {
        self.location.map(|l| (l.row + 1, l.column + 1))
    }
}

/// Result type for parsing.
pub type CssResult<T> = Result<T, CssParseError>;
