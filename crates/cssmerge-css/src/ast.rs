/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Stylesheet AST types.
//!
//! The tree is structural rather than semantic: selectors, preludes and
//! declaration values are kept as trimmed source text. Every node carries
//! the span it was parsed from, including the name of the file, so rules
//! from several stylesheets can be mixed in one tree and still be traced
//! back to where they came from.

use std::sync::Arc;

use cssmerge_source_map::{Location, Range};

/// Where a node was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Name of the file the node came from.
    pub source: Arc<str>,
    pub range: Range,
}

impl Span {
    pub fn new(source: Arc<str>, start: Location, end: Location) -> Self {
        Span {
            source,
            range: Range { start, end },
        }
    }

    pub fn start(&self) -> Location {
        self.range.start
    }
}

/// A parsed stylesheet tagged with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    pub filename: Arc<str>,
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    /// A stylesheet with no rules.
    pub fn empty(filename: impl Into<Arc<str>>) -> Self {
        Stylesheet {
            filename: filename.into(),
            rules: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// A top-level or nested statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub kind: RuleKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// `selector { ... }`
    Style { selector: String, body: Vec<BlockItem> },

    /// `@name prelude;` when `body` is None, `@name prelude { ... }` otherwise.
    AtRule {
        name: String,
        prelude: String,
        body: Option<Vec<BlockItem>>,
    },

    /// `/* text */`, with `text` being everything between the delimiters.
    Comment { text: String },
}

/// An entry inside a `{ ... }` block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockItem {
    Declaration(Declaration),
    Rule(Rule),
}

/// `property: value`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    /// Value text, including any `!important`.
    pub value: String,
    pub span: Span,
}

impl Rule {
    /// Whether this is an `@import` statement.
    pub fn is_import(&self) -> bool {
        matches!(&self.kind, RuleKind::AtRule { name, .. } if name.eq_ignore_ascii_case("import"))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, RuleKind::Comment { .. })
    }

    /// The at-rule name, lowercased, if this is an at-rule.
    pub fn at_rule_name(&self) -> Option<String> {
        match &self.kind {
            RuleKind::AtRule { name, .. } => Some(name.to_ascii_lowercase()),
            _ => None,
        }
    }

    /// Whether this at-rule is a statement (`;`-terminated, without a block).
    pub fn is_statement(&self) -> bool {
        matches!(self.kind, RuleKind::AtRule { body: None, .. })
    }

    /// A one-line label for messages, e.g. `.x`, `@media screen` or `@import 'a.css'`.
    pub fn describe(&self) -> String {
        match &self.kind {
            RuleKind::Style { selector, .. } => selector.clone(),
            RuleKind::AtRule { name, prelude, .. } if prelude.is_empty() => format!("@{name}"),
            RuleKind::AtRule { name, prelude, .. } => format!("@{name} {prelude}"),
            RuleKind::Comment { .. } => "a comment".to_string(),
        }
    }

    /// Number of selectors this rule contributes, counting nested rules.
    pub fn selector_count(&self) -> usize {
        match &self.kind {
            RuleKind::Style { selector, body } => {
                split_top_level(selector, ',').len() + body_selector_count(body)
            }
            RuleKind::AtRule {
                body: Some(body), ..
            } => body_selector_count(body),
            _ => 0,
        }
    }
}

fn body_selector_count(body: &[BlockItem]) -> usize {
    body.iter()
        .map(|item| match item {
            BlockItem::Rule(rule) => rule.selector_count(),
            BlockItem::Declaration(_) => 0,
        })
        .sum()
}

/// Split on `separator` where it is not inside quotes, parentheses or brackets.
pub fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, c) if c == separator && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}
