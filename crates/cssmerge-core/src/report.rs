/*
 * report.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-file errors and the result of one bundler run.
 */

use std::fmt;

use cssmerge_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, SourceSpan};
use cssmerge_source_map::{FileId, Location, Range, SourceContext};

use crate::merge::MergeWarning;
use crate::output::StylesheetArtifact;

/// Which step rejected a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildErrorKind {
    /// A plugin or the syntax converter.
    Transform,
    /// The structural parser.
    Parse,
}

/// A failure attached to one input file.
///
/// The file still takes part in the merge, as an empty stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildError {
    pub path: String,
    pub kind: BuildErrorKind,
    pub message: String,
    /// 0-based position in the text that was rejected.
    pub location: Option<Location>,
    /// The rejected text, when it is registered in [`BuildReport::sources`].
    pub file: Option<FileId>,
}

impl BuildError {
    pub fn new(path: impl Into<String>, kind: BuildErrorKind, message: impl Into<String>) -> Self {
        BuildError {
            path: path.into(),
            kind,
            message: message.into(),
            location: None,
            file: None,
        }
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// 1-based line.
    pub fn line(&self) -> Option<usize> {
        self.location.map(|l| l.row + 1)
    }

    /// 1-based column.
    pub fn column(&self) -> Option<usize> {
        self.location.map(|l| l.column + 1)
    }

    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let builder = match self.kind {
            BuildErrorKind::Transform => {
                DiagnosticMessageBuilder::error("Stylesheet Transform Failed").with_code("M-1-2")
            }
            BuildErrorKind::Parse => {
                DiagnosticMessageBuilder::error("CSS Syntax Error").with_code("M-1-1")
            }
        };
        let builder = builder
            .problem(self.message.clone())
            .add_note(format!("In {}", self.path));

        match (self.file, self.location) {
            (Some(file), Some(location)) => builder
                .with_location(SourceSpan::new(file, Range::point(location)))
                .build(),
            _ => builder.build(),
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line(), self.column()) {
            (Some(line), Some(column)) => {
                write!(f, "{}:{}:{}: {}", self.path, line, column, self.message)
            }
            _ => write!(f, "{}: {}", self.path, self.message),
        }
    }
}

/// Everything a bundler run produced.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub artifacts: Vec<StylesheetArtifact>,
    pub errors: Vec<BuildError>,
    pub warnings: Vec<MergeWarning>,
    /// Texts referenced by [`BuildError::file`], for rendering excerpts.
    pub sources: SourceContext,
}

impl BuildReport {
    /// The build failed iff some file failed to transform or parse.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors then warnings, as diagnostics.
    pub fn diagnostics(&self) -> Vec<DiagnosticMessage> {
        self.errors
            .iter()
            .map(BuildError::to_diagnostic)
            .chain(self.warnings.iter().map(MergeWarning::to_diagnostic))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(row: usize, column: usize) -> Location {
        Location {
            offset: 0,
            row,
            column,
        }
    }

    #[test]
    fn test_positions_are_one_based() {
        let err =
            BuildError::new("a.css", BuildErrorKind::Parse, "Unclosed block").at(location(2, 4));
        assert_eq!(err.line(), Some(3));
        assert_eq!(err.column(), Some(5));
        assert_eq!(err.to_string(), "a.css:3:5: Unclosed block");
    }

    #[test]
    fn test_message_only() {
        let err = BuildError::new("a.scss", BuildErrorKind::Transform, "Undefined variable.");
        assert_eq!(err.line(), None);
        assert_eq!(err.to_string(), "a.scss: Undefined variable.");

        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.code.as_deref(), Some("M-1-2"));
        assert!(diagnostic.location.is_none());
    }

    #[test]
    fn test_diagnostic_excerpt() {
        let mut report = BuildReport::default();
        let file = report.sources.add_file("a.css", ".x{color:red}\n.y{");
        let mut err =
            BuildError::new("a.css", BuildErrorKind::Parse, "Unclosed block").at(Location {
                offset: 16,
                row: 1,
                column: 2,
            });
        err.file = Some(file);
        report.errors.push(err);

        assert!(!report.is_success());
        let text = report.diagnostics()[0].to_text(Some(&report.sources));
        assert!(text.contains("M-1-1"));
        assert!(text.contains("Unclosed block"));
        assert!(text.contains("In a.css"));
    }
}
