/*
 * merge.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Merging per-file stylesheets into one.
 */

//! The merge step.
//!
//! Rules are concatenated in file order, then every `@import` is moved to
//! the front (keeping imports in their original relative order), since an
//! `@import` anywhere but at the top of a stylesheet is ignored by browsers.
//!
//! Moving an import past a rule changes what the stylesheet means, so each
//! import that has to jump over a rule produces a [`MergeWarning`].
//! Comments and `@layer` statements do not count: imports may legitimately
//! follow them.
//!
//! `@charset` rules are dropped. One is only honoured as the very first
//! statement of a file, and the merged stylesheet is always UTF-8, which
//! needs no declaration. A charset naming another encoding produces a
//! warning, since that file's text is now read as UTF-8.

use std::sync::Arc;

use cssmerge_css::{Rule, RuleKind, Stylesheet};
use cssmerge_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};

use crate::error::MergeError;
use crate::output::MERGED_PATH;

/// An advisory produced while merging. Never fails the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeWarning {
    pub filename: String,
    pub message: String,
}

impl MergeWarning {
    fn new(filename: &str, message: String) -> Self {
        MergeWarning {
            filename: filename.to_string(),
            message,
        }
    }

    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        DiagnosticMessageBuilder::warning("Import Hoisted")
            .with_code("M-2-1")
            .problem(self.message.clone())
            .add_note(format!("In {}", self.filename))
            .build()
    }
}

/// Merge stylesheets, given in the order they should appear.
///
/// The result is tagged with the name of the merged output file; every
/// rule still carries the span of the file it came from.
///
/// # Example
///
/// ```
/// use cssmerge_core::merge::merge;
///
/// let a = cssmerge_css::parse(".x{color:red}", "a.css").unwrap();
/// let b = cssmerge_css::parse("@import 'y.css'; .y{color:blue}", "b.css").unwrap();
///
/// let (merged, warnings) = merge(vec![a, b]).unwrap();
/// assert!(merged.rules[0].is_import());
/// assert_eq!(warnings.len(), 1);
/// ```
pub fn merge(sheets: Vec<Stylesheet>) -> Result<(Stylesheet, Vec<MergeWarning>), MergeError> {
    if sheets.is_empty() {
        return Err(MergeError::Empty);
    }

    let mut imports = Vec::new();
    let mut rules = Vec::new();
    let mut warnings = Vec::new();
    // First rule an import may not move past, with its file.
    let mut blocker: Option<(String, Arc<str>)> = None;

    for sheet in sheets {
        for rule in sheet.rules {
            if is_charset(&rule) {
                warnings.extend(check_charset(&rule));
                continue;
            }

            if rule.is_import() {
                if let Some((label, file)) = &blocker {
                    warnings.push(MergeWarning::new(
                        &rule.span.source,
                        format!(
                            "{} was hoisted above {} ({}); @import rules must precede all other rules",
                            rule.describe(),
                            label,
                            file
                        ),
                    ));
                }
                imports.push(rule);
                continue;
            }

            if blocker.is_none() && !is_neutral(&rule) {
                blocker = Some((rule.describe(), rule.span.source.clone()));
            }
            rules.push(rule);
        }
    }

    imports.extend(rules);
    Ok((
        Stylesheet {
            filename: Arc::from(MERGED_PATH),
            rules: imports,
        },
        warnings,
    ))
}

/// Rules an `@import` may follow without changing meaning.
fn is_neutral(rule: &Rule) -> bool {
    if rule.is_comment() {
        return true;
    }
    rule.at_rule_name().as_deref() == Some("layer") && rule.is_statement()
}

fn is_charset(rule: &Rule) -> bool {
    rule.at_rule_name().as_deref() == Some("charset")
}

/// Warn about a dropped charset that declared something other than UTF-8.
fn check_charset(rule: &Rule) -> Option<MergeWarning> {
    let RuleKind::AtRule { prelude, .. } = &rule.kind else {
        return None;
    };
    let encoding = prelude.trim_matches(|c| c == '"' || c == '\'');
    if encoding.eq_ignore_ascii_case("utf-8") {
        return None;
    }
    Some(MergeWarning::new(
        &rule.span.source,
        format!("@charset {prelude} was dropped; the merged stylesheet is always UTF-8"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cssmerge_css::parse;

    fn sheet(css: &str, filename: &str) -> Stylesheet {
        parse(css, filename).unwrap()
    }

    fn labels(sheet: &Stylesheet) -> Vec<String> {
        sheet.rules.iter().map(Rule::describe).collect()
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert_eq!(merge(Vec::new()).unwrap_err(), MergeError::Empty);
    }

    #[test]
    fn test_rules_keep_file_order() {
        let (merged, warnings) = merge(vec![
            sheet(".a{} .b{}", "1.css"),
            sheet(".c{}", "2.css"),
            sheet(".d{} .e{}", "3.css"),
        ])
        .unwrap();
        assert_eq!(labels(&merged), [".a", ".b", ".c", ".d", ".e"]);
        assert_eq!(&*merged.filename, MERGED_PATH);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_imports_are_hoisted_in_order() {
        let (merged, warnings) = merge(vec![
            sheet("@import 'a.css'; .a{}", "1.css"),
            sheet(".b{} @import 'b.css'; .c{} @import 'c.css';", "2.css"),
        ])
        .unwrap();
        assert_eq!(
            labels(&merged),
            ["@import 'a.css'", "@import 'b.css'", "@import 'c.css'", ".a", ".b", ".c"]
        );
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.filename == "2.css"));
    }

    #[test]
    fn test_hoist_warning_names_the_rule() {
        let (merged, warnings) = merge(vec![
            sheet(".x{color:red}", "a.css"),
            sheet("@import 'y.css'; .y{color:blue}", "b.css"),
        ])
        .unwrap();
        assert_eq!(labels(&merged), ["@import 'y.css'", ".x", ".y"]);
        assert_eq!(
            warnings,
            [MergeWarning {
                filename: "b.css".to_string(),
                message: "@import 'y.css' was hoisted above .x (a.css); \
                          @import rules must precede all other rules"
                    .to_string(),
            }]
        );
    }

    #[test]
    fn test_neutral_rules_do_not_warn() {
        let (merged, warnings) = merge(vec![
            sheet("@charset \"utf-8\";\n/* theme */\n@layer base, theme;", "1.css"),
            sheet("@import 'b.css';", "2.css"),
        ])
        .unwrap();
        assert!(merged.rules[0].is_import());
        assert_eq!(merged.rules.len(), 3);
        assert!(merged.rules[1].is_comment());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_layer_block_is_not_neutral() {
        let (_, warnings) =
            merge(vec![sheet("@layer base { .a{} } @import 'x.css';", "1.css")]).unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_charset_is_dropped() {
        let (merged, warnings) = merge(vec![
            sheet(".a{}", "1.css"),
            sheet("@charset \"UTF-8\";\n@import 'y.css';\n.b{}", "2.css"),
        ])
        .unwrap();
        assert_eq!(labels(&merged), ["@import 'y.css'", ".a", ".b"]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.starts_with("@import 'y.css' was hoisted"));
    }

    #[test]
    fn test_non_utf8_charset_warns() {
        let (merged, warnings) =
            merge(vec![sheet("@charset \"iso-8859-1\";\n.a{}", "1.css")]).unwrap();
        assert_eq!(labels(&merged), [".a"]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("iso-8859-1"));
    }
}
