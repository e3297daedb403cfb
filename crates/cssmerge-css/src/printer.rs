/*
 * printer.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Stylesheet printers.
//!
//! The expanded printer produces readable output and can record a source
//! map entry at the start of every rule and declaration. The compressed
//! printer produces the smallest output it can without interpreting values.

use cssmerge_source_map::{LineColumn, OriginalLocation, SourceMapBuilder};

use crate::ast::{BlockItem, Rule, RuleKind, Span, Stylesheet};

const INDENT: &str = "  ";

/// Print `sheet` in expanded form.
pub fn to_css(sheet: &Stylesheet) -> String {
    let mut printer = ExpandedPrinter::new(None);
    printer.stylesheet(sheet);
    printer.out
}

/// Print `sheet` in expanded form, recording mappings into `map`.
///
/// Each rule and declaration maps to the start of the span it was parsed
/// from, in the file named by that span.
///
/// # Example
///
/// ```
/// use cssmerge_css::{parse, to_css_with_map};
/// use cssmerge_source_map::{LineColumn, SourceMapBuilder};
///
/// let sheet = parse("\n\n.a{color:red}", "a.css").unwrap();
/// let mut builder = SourceMapBuilder::new(None);
/// let css = to_css_with_map(&sheet, &mut builder);
/// assert_eq!(css, ".a {\n  color: red;\n}\n");
///
/// let map = builder.build();
/// let pos = map.original_position_for(LineColumn::new(1, 2)).unwrap();
/// assert_eq!(pos.source, "a.css");
/// assert_eq!(pos.position, LineColumn::new(2, 3));
/// ```
pub fn to_css_with_map(sheet: &Stylesheet, map: &mut SourceMapBuilder) -> String {
    let mut printer = ExpandedPrinter::new(Some(map));
    printer.stylesheet(sheet);
    printer.out
}

struct ExpandedPrinter<'m> {
    out: String,
    line: u32,
    column: u32,
    map: Option<&'m mut SourceMapBuilder>,
}

impl<'m> ExpandedPrinter<'m> {
    fn new(map: Option<&'m mut SourceMapBuilder>) -> Self {
        ExpandedPrinter {
            out: String::new(),
            line: 0,
            column: 0,
            map,
        }
    }

    fn push(&mut self, text: &str) {
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += c.len_utf16() as u32;
            }
        }
        self.out.push_str(text);
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.push(INDENT);
        }
    }

    fn mark(&mut self, span: &Span) {
        let generated = LineColumn::new(self.line, self.column);
        if let Some(map) = self.map.as_deref_mut() {
            let source = map.add_source(&span.source);
            map.add_mapping(
                generated,
                Some(OriginalLocation {
                    source,
                    position: span.start().line_column(),
                    name: None,
                }),
            );
        }
    }

    fn stylesheet(&mut self, sheet: &Stylesheet) {
        for (i, rule) in sheet.rules.iter().enumerate() {
            if i > 0 {
                self.push("\n\n");
            }
            self.rule(rule, 0);
        }
        if !sheet.rules.is_empty() {
            self.push("\n");
        }
    }

    fn rule(&mut self, rule: &Rule, depth: usize) {
        self.indent(depth);
        self.mark(&rule.span);
        match &rule.kind {
            RuleKind::Style { selector, body } => {
                self.push(selector);
                self.push(" ");
                self.block(body, depth);
            }
            RuleKind::AtRule {
                name,
                prelude,
                body,
            } => {
                self.push("@");
                self.push(name);
                if !prelude.is_empty() {
                    self.push(" ");
                    self.push(prelude);
                }
                match body {
                    Some(body) => {
                        self.push(" ");
                        self.block(body, depth);
                    }
                    None => self.push(";"),
                }
            }
            RuleKind::Comment { text } => {
                self.push("/*");
                self.push(text);
                self.push("*/");
            }
        }
    }

    fn block(&mut self, items: &[BlockItem], depth: usize) {
        if items.is_empty() {
            self.push("{}");
            return;
        }

        self.push("{\n");
        for item in items {
            match item {
                BlockItem::Declaration(decl) => {
                    self.indent(depth + 1);
                    self.mark(&decl.span);
                    self.push(&decl.property);
                    self.push(": ");
                    self.push(&decl.value);
                    self.push(";\n");
                }
                BlockItem::Rule(rule) => {
                    self.rule(rule, depth + 1);
                    self.push("\n");
                }
            }
        }
        self.indent(depth);
        self.push("}");
    }
}

/// Print `sheet` with insignificant whitespace and comments removed.
///
/// Comments starting with `!` are kept.
///
/// # Example
///
/// ```
/// use cssmerge_css::{parse, to_compressed_css};
///
/// let sheet = parse("/* x */\na > b ,\n c { color : red ; margin: 0  auto }", "a.css").unwrap();
/// assert_eq!(to_compressed_css(&sheet), "a>b,c{color:red;margin:0 auto}");
/// ```
pub fn to_compressed_css(sheet: &Stylesheet) -> String {
    let mut out = String::new();
    for rule in &sheet.rules {
        compressed_rule(&mut out, rule);
    }
    out
}

/// Print a single rule the way [`to_compressed_css`] would.
pub fn rule_to_compressed_css(rule: &Rule) -> String {
    let mut out = String::new();
    compressed_rule(&mut out, rule);
    out
}

fn compressed_rule(out: &mut String, rule: &Rule) {
    match &rule.kind {
        RuleKind::Style { selector, body } => {
            out.push_str(&collapse_whitespace(selector, &[',', '>', '+', '~']));
            out.push('{');
            compressed_block(out, body);
            out.push('}');
        }
        RuleKind::AtRule {
            name,
            prelude,
            body,
        } => {
            out.push('@');
            out.push_str(name);
            if !prelude.is_empty() {
                out.push(' ');
                out.push_str(&collapse_whitespace(prelude, &[',']));
            }
            match body {
                Some(body) => {
                    out.push('{');
                    compressed_block(out, body);
                    out.push('}');
                }
                None => out.push(';'),
            }
        }
        RuleKind::Comment { text } => {
            if text.starts_with('!') {
                out.push_str("/*");
                out.push_str(text);
                out.push_str("*/");
            }
        }
    }
}

fn compressed_block(out: &mut String, items: &[BlockItem]) {
    let mut needs_semicolon = false;
    for item in items {
        match item {
            BlockItem::Declaration(decl) => {
                if needs_semicolon {
                    out.push(';');
                }
                out.push_str(decl.property.trim());
                out.push(':');
                out.push_str(&collapse_whitespace(&decl.value, &[',']));
                needs_semicolon = true;
            }
            BlockItem::Rule(rule) => {
                let printed = rule_to_compressed_css(rule);
                if printed.is_empty() {
                    continue;
                }
                if needs_semicolon {
                    out.push(';');
                    needs_semicolon = false;
                }
                out.push_str(&printed);
            }
        }
    }
}

/// Collapse whitespace runs outside quotes to one space, and drop the space
/// next to any character in `tight`.
fn collapse_whitespace(text: &str, tight: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut pending_space = false;

    for c in text.trim().chars() {
        if quote.is_some() || escaped {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if Some(c) == quote {
                quote = None;
            }
            continue;
        }

        if c.is_whitespace() {
            pending_space = true;
            continue;
        }

        if pending_space {
            let after_tight = out.chars().last().is_some_and(|last| tight.contains(&last));
            if !after_tight && !tight.contains(&c) {
                out.push(' ');
            }
            pending_space = false;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '\\' => escaped = true,
            _ => {}
        }
        out.push(c);
    }

    out
}
