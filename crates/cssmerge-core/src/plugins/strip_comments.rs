/*
 * plugins/strip_comments.rs
 * Copyright (c) 2025 Posit, PBC
 */

use cssmerge_source_map::FileInformation;
use serde::Deserialize;
use serde_json::Value;

use super::{CssPlugin, options_or_default};
use crate::error::{ConfigError, PluginError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct Options {
    #[serde(default)]
    preserve_important: bool,
}

/// Removes `/* ... */` comments.
///
/// Comments inside strings are left alone. With `preserveImportant`,
/// `/*! ... */` comments (licence headers, usually) are kept.
#[derive(Debug, Default)]
pub struct StripCommentsPlugin {
    preserve_important: bool,
}

impl StripCommentsPlugin {
    pub const ID: &'static str = "strip-comments";

    pub fn new(preserve_important: bool) -> Self {
        StripCommentsPlugin { preserve_important }
    }

    pub fn from_options(options: &Value) -> Result<Self, ConfigError> {
        let options: Options = options_or_default(Self::ID, options)?;
        Ok(Self::new(options.preserve_important))
    }
}

impl CssPlugin for StripCommentsPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn transform(&self, css: &str, _path: &str) -> Result<String, PluginError> {
        let mut out = String::with_capacity(css.len());
        let mut rest = css;
        let mut quote: Option<char> = None;

        while let Some(c) = rest.chars().next() {
            match quote {
                Some(q) => {
                    if c == '\\' {
                        let escaped: String = rest.chars().take(2).collect();
                        out.push_str(&escaped);
                        rest = &rest[escaped.len()..];
                        continue;
                    }
                    if c == q || c == '\n' {
                        quote = None;
                    }
                }
                None if c == '"' || c == '\'' => quote = Some(c),
                None if rest.starts_with("/*") => {
                    let offset = css.len() - rest.len();
                    let Some(end) = rest[2..].find("*/") else {
                        let info = FileInformation::new(css);
                        let location = info
                            .offset_to_location(offset, css)
                            .unwrap_or(cssmerge_source_map::Location::START);
                        return Err(PluginError::Syntax {
                            message: "Unclosed comment".to_string(),
                            location,
                        });
                    };
                    let comment = &rest[..end + 4];
                    if self.preserve_important && comment.starts_with("/*!") {
                        out.push_str(comment);
                    }
                    rest = &rest[comment.len()..];
                    continue;
                }
                None => {}
            }
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_comments() {
        let plugin = StripCommentsPlugin::default();
        let out = plugin
            .transform("/* a */.x{color:red/* b */}", "a.css")
            .unwrap();
        assert_eq!(out, ".x{color:red}");
    }

    #[test]
    fn test_keeps_comment_markers_in_strings() {
        let plugin = StripCommentsPlugin::default();
        let css = ".x{content:\"/* not a comment */\"}";
        assert_eq!(plugin.transform(css, "a.css").unwrap(), css);
    }

    #[test]
    fn test_preserve_important() {
        let plugin =
            StripCommentsPlugin::from_options(&json!({"preserveImportant": true})).unwrap();
        let out = plugin
            .transform("/*! licence */\n/* drop */.x{}", "a.css")
            .unwrap();
        assert_eq!(out, "/*! licence */\n.x{}");
    }

    #[test]
    fn test_unclosed_comment_is_positioned() {
        let plugin = StripCommentsPlugin::default();
        let err = plugin.transform(".x{}\n  /* open", "a.css").unwrap_err();
        match err {
            PluginError::Syntax { message, location } => {
                assert_eq!(message, "Unclosed comment");
                assert_eq!((location.row, location.column), (1, 2));
            }
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_options() {
        let err = StripCommentsPlugin::from_options(&json!({"keep": true})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPluginOptions { .. }));
    }
}
