/*
 * plugins/replace.rs
 * Copyright (c) 2025 Posit, PBC
 */

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::{CssPlugin, options_or_default};
use crate::error::{ConfigError, PluginError};

/// One `{search, replace}` entry of the `replace` plugin's options.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplaceRule {
    /// Regular expression.
    pub search: String,
    /// Replacement text; `$1`, `${name}` refer to capture groups.
    pub replace: String,
}

/// Applies regex rewrites, in order, to the whole stylesheet text.
#[derive(Debug)]
pub struct ReplacePlugin {
    rules: Vec<(Regex, String)>,
}

impl ReplacePlugin {
    pub const ID: &'static str = "replace";

    pub fn new(rules: Vec<ReplaceRule>) -> Result<Self, ConfigError> {
        let rules = rules
            .into_iter()
            .map(|rule| {
                Regex::new(&rule.search)
                    .map(|re| (re, rule.replace))
                    .map_err(|err| ConfigError::invalid_options(Self::ID, err))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReplacePlugin { rules })
    }

    pub fn from_options(options: &Value) -> Result<Self, ConfigError> {
        let rules: Vec<ReplaceRule> = options_or_default(Self::ID, options)?;
        Self::new(rules)
    }
}

impl CssPlugin for ReplacePlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn transform(&self, css: &str, _path: &str) -> Result<String, PluginError> {
        let mut text = css.to_string();
        for (re, replacement) in &self.rules {
            text = re.replace_all(&text, replacement.as_str()).into_owned();
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rules_apply_in_order() {
        let plugin = ReplacePlugin::from_options(&json!([
            {"search": "#f00", "replace": "red"},
            {"search": "red", "replace": "crimson"}
        ]))
        .unwrap();
        assert_eq!(
            plugin.transform(".x{color:#f00}", "a.css").unwrap(),
            ".x{color:crimson}"
        );
    }

    #[test]
    fn test_capture_groups() {
        let plugin = ReplacePlugin::from_options(&json!([
            {"search": r"url\((\w+)\.png\)", "replace": "url($1.webp)"}
        ]))
        .unwrap();
        assert_eq!(
            plugin.transform("a{b:url(bg.png)}", "a.css").unwrap(),
            "a{b:url(bg.webp)}"
        );
    }

    #[test]
    fn test_invalid_regex_is_a_config_error() {
        let err =
            ReplacePlugin::from_options(&json!([{"search": "(", "replace": ""}])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidPluginOptions { plugin, .. } if plugin == "replace"
        ));
    }

    #[test]
    fn test_null_options_mean_no_rules() {
        let plugin = ReplacePlugin::from_options(&Value::Null).unwrap();
        assert_eq!(plugin.transform(".x{}", "a.css").unwrap(), ".x{}");
    }
}
