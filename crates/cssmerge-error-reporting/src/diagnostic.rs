//! Core diagnostic message types.
//!
//! A diagnostic follows the tidyverse structure: a title, an optional
//! problem statement, a few bulleted notes and optional hints. When it has
//! a location and the file is registered in a [`SourceContext`], the text
//! rendering includes an ariadne excerpt of the offending source.

use cssmerge_source_map::{FileId, Range, SourceContext};

use crate::catalog::get_error_info;

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// An error that fails the build
    Error,
    /// A problem that does not fail the build
    Warning,
}

impl DiagnosticKind {
    fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "Error",
            DiagnosticKind::Warning => "Warning",
        }
    }
}

/// A range inside a file registered in a [`SourceContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    pub file: FileId,
    pub range: Range,
}

impl SourceSpan {
    pub fn new(file: FileId, range: Range) -> Self {
        SourceSpan { file, range }
    }
}

/// A diagnostic message following tidyverse-style structure.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticMessage {
    /// Optional error code from the catalog (e.g., "M-1-1")
    pub code: Option<String>,

    /// Brief title
    pub title: String,

    pub kind: DiagnosticKind,

    /// What went wrong
    pub problem: Option<String>,

    /// Bulleted notes, e.g. which file was being processed
    pub notes: Vec<String>,

    pub hints: Vec<String>,

    /// Where the issue occurred
    pub location: Option<SourceSpan>,
}

impl DiagnosticMessage {
    pub fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            notes: Vec::new(),
            hints: Vec::new(),
            location: None,
        }
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    /// Set the error code.
    ///
    /// # Example
    ///
    /// ```
    /// use cssmerge_error_reporting::DiagnosticMessage;
    ///
    /// let msg = DiagnosticMessage::error("CSS Syntax Error").with_code("M-1-1");
    /// assert_eq!(
    ///     msg.to_text(None),
    ///     "Error [M-1-1]: CSS Syntax Error\nℹ The stylesheet could not be parsed."
    /// );
    /// ```
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Render as plain text.
    ///
    /// With a location that resolves in `ctx`, the title, problem and
    /// location are shown as an ariadne excerpt, followed by the notes and
    /// hints. Otherwise the header line is followed by the problem, an
    /// `at line:column` line when a location is known, notes and hints.
    /// A code known to the catalog ends the message with its description.
    ///
    /// # Example
    ///
    /// ```
    /// use cssmerge_error_reporting::DiagnosticMessageBuilder;
    ///
    /// let msg = DiagnosticMessageBuilder::error("Invalid input")
    ///     .problem("Values must be numeric")
    ///     .add_hint("Convert to numbers first?")
    ///     .build();
    /// let text = msg.to_text(None);
    /// assert!(text.starts_with("Error: Invalid input"));
    /// assert!(text.contains("? Convert to numbers first?"));
    /// ```
    pub fn to_text(&self, ctx: Option<&SourceContext>) -> String {
        self.render(ctx, false)
    }

    /// Like [`to_text`](Self::to_text), with terminal colors in the excerpt.
    pub fn to_ansi_text(&self, ctx: Option<&SourceContext>) -> String {
        self.render(ctx, true)
    }

    /// Just the uncolored ariadne excerpt for this diagnostic's location.
    pub fn source_excerpt(&self, ctx: &SourceContext) -> Option<String> {
        self.render_ariadne_source_context(self.location.as_ref()?, ctx, false)
    }

    fn header(&self) -> String {
        match &self.code {
            Some(code) => format!("{} [{}]: {}", self.kind.label(), code, self.title),
            None => format!("{}: {}", self.kind.label(), self.title),
        }
    }

    fn render(&self, ctx: Option<&SourceContext>, color: bool) -> String {
        let mut lines: Vec<String> = Vec::new();

        let excerpt = match (ctx, &self.location) {
            (Some(ctx), Some(location)) => {
                self.render_ariadne_source_context(location, ctx, color)
            }
            _ => None,
        };

        match excerpt {
            Some(excerpt) => lines.push(excerpt.trim_end().to_string()),
            None => {
                lines.push(self.header());
                if let Some(problem) = &self.problem {
                    lines.push(problem.clone());
                }
                if let Some(location) = &self.location {
                    let start = location.range.start;
                    lines.push(format!("at {}:{}", start.row + 1, start.column + 1));
                }
            }
        }

        for note in &self.notes {
            lines.push(format!("• {note}"));
        }
        for hint in &self.hints {
            lines.push(format!("? {hint}"));
        }
        if let Some(info) = self.code.as_deref().and_then(get_error_info) {
            lines.push(format!("ℹ {}", info.message_template));
        }

        lines.join("\n")
    }

    fn render_ariadne_source_context(
        &self,
        location: &SourceSpan,
        ctx: &SourceContext,
        color: bool,
    ) -> Option<String> {
        use ariadne::{Color, Config, Label, Report, ReportKind, Source};

        let file = ctx.get_file(location.file)?;
        let content = file.content.as_str();

        // ariadne spans count chars, locations count bytes
        let char_offset = |byte: usize| content.get(..byte).map(|s| s.chars().count());
        let start = char_offset(location.range.start.offset)?;
        let end = char_offset(location.range.end.offset)?;
        let end = if end > start {
            end
        } else {
            (start + 1).min(content.chars().count())
        };

        let (report_kind, main_color) = match self.kind {
            DiagnosticKind::Error => (ReportKind::Error, Color::Red),
            DiagnosticKind::Warning => (ReportKind::Warning, Color::Yellow),
        };

        let mut report = Report::build(report_kind, file.path.clone(), start)
            .with_config(Config::default().with_color(color));

        if let Some(code) = &self.code {
            report = report.with_message(format!("[{}] {}", code, self.title));
        } else {
            report = report.with_message(&self.title);
        }

        let label_message = self.problem.as_deref().unwrap_or(&self.title);
        report = report.with_label(
            Label::new((file.path.clone(), start..end))
                .with_message(label_message)
                .with_color(main_color),
        );

        let mut output = Vec::new();
        report
            .finish()
            .write((file.path.clone(), Source::from(content)), &mut output)
            .ok()?;

        String::from_utf8(output).ok()
    }
}
