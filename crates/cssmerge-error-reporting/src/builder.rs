//! Builder API for diagnostic messages.

use crate::diagnostic::{DiagnosticKind, DiagnosticMessage, SourceSpan};

/// Builds a [`DiagnosticMessage`] one part at a time.
///
/// # Example
///
/// ```
/// use cssmerge_error_reporting::DiagnosticMessageBuilder;
///
/// let msg = DiagnosticMessageBuilder::error("Unknown plugin")
///     .with_code("M-3-1")
///     .problem("`autoprefix` is not a registered plugin")
///     .add_hint("Run `cssmerge plugins` to list the available ones?")
///     .build();
/// assert_eq!(msg.code.as_deref(), Some("M-3-1"));
/// ```
#[derive(Debug, Clone)]
pub struct DiagnosticMessageBuilder {
    message: DiagnosticMessage,
}

impl DiagnosticMessageBuilder {
    fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        DiagnosticMessageBuilder {
            message: DiagnosticMessage::new(kind, title),
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.message.code = Some(code.into());
        self
    }

    pub fn problem(mut self, problem: impl Into<String>) -> Self {
        self.message.problem = Some(problem.into());
        self
    }

    pub fn add_note(mut self, note: impl Into<String>) -> Self {
        self.message.notes.push(note.into());
        self
    }

    pub fn add_hint(mut self, hint: impl Into<String>) -> Self {
        self.message.hints.push(hint.into());
        self
    }

    pub fn with_location(mut self, location: SourceSpan) -> Self {
        self.message.location = Some(location);
        self
    }

    pub fn build(self) -> DiagnosticMessage {
        self.message
    }
}
