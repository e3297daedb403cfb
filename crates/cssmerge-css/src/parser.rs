/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Stylesheet parser.
//!
//! A single-pass scanner that builds the structural AST. It understands
//! blocks, at-rules, comments, strings, escapes and bracket nesting, which
//! is all that is needed to find rule boundaries; selectors and values are
//! not interpreted.

use std::sync::Arc;

use cssmerge_source_map::Location;

use crate::ast::{BlockItem, Declaration, Rule, RuleKind, Span, Stylesheet};
use crate::error::{CssParseError, CssResult};

/// Parse `text` into a stylesheet tagged with `filename`.
///
/// # Example
///
/// ```
/// use cssmerge_css::parse;
///
/// let sheet = parse("@import 'y.css';\n.y { color: blue }", "b.css").unwrap();
/// assert_eq!(sheet.rules.len(), 2);
/// assert!(sheet.rules[0].is_import());
///
/// let err = parse(".a {", "a.css").unwrap_err();
/// assert_eq!(err.message, "Unclosed block");
/// assert_eq!(err.line_column(), Some((1, 4)));
/// ```
pub fn parse(text: &str, filename: impl Into<Arc<str>>) -> CssResult<Stylesheet> {
    let filename = filename.into();
    let rules = Parser::new(text, filename.clone()).parse_stylesheet()?;
    Ok(Stylesheet { filename, rules })
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    row: usize,
    column: usize,
    source: Arc<str>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, source: Arc<str>) -> Self {
        let pos = if src.starts_with('\u{feff}') { 3 } else { 0 };
        Parser {
            src,
            pos,
            row: 0,
            column: 0,
            source,
        }
    }

    fn location(&self) -> Location {
        Location {
            offset: self.pos,
            row: self.row,
            column: self.column,
        }
    }

    fn span_from(&self, start: Location) -> Span {
        Span::new(self.source.clone(), start, self.location())
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.row += 1;
            self.column = 0;
        } else {
            self.column += c.len_utf16();
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn parse_stylesheet(mut self) -> CssResult<Vec<Rule>> {
        let mut rules = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Ok(rules),
                Some('}') => return Err(CssParseError::at("Unexpected }", self.location())),
                Some(';') => {
                    self.bump();
                }
                Some(_) => rules.push(self.parse_rule()?),
            }
        }
    }

    fn parse_rule(&mut self) -> CssResult<Rule> {
        if self.starts_with("/*") {
            return self.parse_comment();
        }
        if self.peek() == Some('@') {
            return self.parse_at_rule();
        }

        let start = self.location();
        match self.scan_until(&['{', ';', '}'])? {
            Some('{') => {
                let selector = self.src[start.offset..self.pos].trim().to_string();
                let body = self.parse_block()?;
                Ok(Rule {
                    kind: RuleKind::Style { selector, body },
                    span: self.span_from(start),
                })
            }
            _ => Err(CssParseError::at("Unknown word", start)),
        }
    }

    fn parse_comment(&mut self) -> CssResult<Rule> {
        let start = self.location();
        self.skip_comment()?;
        let text = self.src[start.offset + 2..self.pos - 2].to_string();
        Ok(Rule {
            kind: RuleKind::Comment { text },
            span: self.span_from(start),
        })
    }

    fn parse_at_rule(&mut self) -> CssResult<Rule> {
        let start = self.location();
        self.bump();

        let name_start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            self.bump();
        }
        let name = self.src[name_start..self.pos].to_string();
        if name.is_empty() {
            return Err(CssParseError::at("At-rule without name", start));
        }

        let prelude_start = self.pos;
        let stop = self.scan_until(&['{', ';', '}'])?;
        let prelude = self.src[prelude_start..self.pos].trim().to_string();

        let body = match stop {
            Some('{') => Some(self.parse_block()?),
            Some(';') => {
                self.bump();
                None
            }
            // A closing brace ends the enclosing block and is left for it
            _ => None,
        };

        Ok(Rule {
            kind: RuleKind::AtRule {
                name,
                prelude,
                body,
            },
            span: self.span_from(start),
        })
    }

    /// Parse `{ ... }`, starting at the opening brace.
    fn parse_block(&mut self) -> CssResult<Vec<BlockItem>> {
        let open = self.location();
        self.bump();

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(CssParseError::at("Unclosed block", open)),
                Some('}') => {
                    self.bump();
                    return Ok(items);
                }
                Some(';') => {
                    self.bump();
                }
                Some('@') => items.push(BlockItem::Rule(self.parse_at_rule()?)),
                Some('/') if self.starts_with("/*") => {
                    items.push(BlockItem::Rule(self.parse_comment()?));
                }
                Some(_) => items.push(self.parse_block_item()?),
            }
        }
    }

    fn parse_block_item(&mut self) -> CssResult<BlockItem> {
        let start = self.location();
        let stop = self.scan_until(&['{', ';', '}'])?;
        let text = &self.src[start.offset..self.pos];

        if stop == Some('{') {
            let selector = text.trim().to_string();
            let body = self.parse_block()?;
            return Ok(BlockItem::Rule(Rule {
                kind: RuleKind::Style { selector, body },
                span: self.span_from(start),
            }));
        }

        let span = self.span_from(start);
        if stop == Some(';') {
            self.bump();
        }

        let (property, value) = text
            .split_once(':')
            .map(|(p, v)| (p.trim(), v.trim()))
            .filter(|(p, _)| !p.is_empty())
            .ok_or_else(|| CssParseError::at("Unknown word", start))?;

        Ok(BlockItem::Declaration(Declaration {
            property: property.to_string(),
            value: value.to_string(),
            span,
        }))
    }

    /// Advance to the next character in `stops` that is outside strings,
    /// comments and brackets, without consuming it. Returns None at the end
    /// of input.
    fn scan_until(&mut self, stops: &[char]) -> CssResult<Option<char>> {
        let mut brackets: Vec<(char, Location)> = Vec::new();

        while let Some(c) = self.peek() {
            if brackets.is_empty() && stops.contains(&c) {
                return Ok(Some(c));
            }
            match c {
                '\\' => {
                    self.bump();
                    self.bump();
                }
                '"' | '\'' => self.skip_string()?,
                '/' if self.starts_with("/*") => self.skip_comment()?,
                '(' => {
                    brackets.push((')', self.location()));
                    self.bump();
                }
                '[' => {
                    brackets.push((']', self.location()));
                    self.bump();
                }
                ')' | ']' => {
                    if brackets.last().map(|(close, _)| *close) == Some(c) {
                        brackets.pop();
                    }
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
        }

        match brackets.first() {
            Some((_, open)) => Err(CssParseError::at("Unclosed bracket", *open)),
            None => Ok(None),
        }
    }

    fn skip_string(&mut self) -> CssResult<()> {
        let start = self.location();
        let quote = self.bump();
        loop {
            match self.bump() {
                None => return Err(CssParseError::at("Unclosed string", start)),
                Some('\\') => {
                    self.bump();
                }
                c if c == quote => return Ok(()),
                Some(_) => {}
            }
        }
    }

    fn skip_comment(&mut self) -> CssResult<()> {
        let start = self.location();
        self.bump();
        self.bump();
        loop {
            if self.starts_with("*/") {
                self.bump();
                self.bump();
                return Ok(());
            }
            if self.bump().is_none() {
                return Err(CssParseError::at("Unclosed comment", start));
            }
        }
    }
}
