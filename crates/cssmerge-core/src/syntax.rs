/*
 * syntax.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Alternate stylesheet syntaxes accepted by the `parser` option.
 */

use grass::{Options, OutputStyle};

use crate::error::{ConfigError, PluginError};

/// The syntax input stylesheets are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Syntax {
    /// Plain CSS; passed through unchanged.
    #[default]
    Css,
    /// SCSS, compiled to CSS before parsing.
    Scss,
}

impl Syntax {
    /// Resolve the `parser` configuration option.
    pub fn from_id(id: Option<&str>) -> Result<Self, ConfigError> {
        match id {
            None | Some("css" | "postcss") => Ok(Syntax::Css),
            Some("scss" | "postcss-scss") => Ok(Syntax::Scss),
            Some(other) => Err(ConfigError::UnknownParser(other.to_string())),
        }
    }

    /// Convert `text` to plain CSS.
    pub fn convert(self, text: &str) -> Result<String, PluginError> {
        match self {
            Syntax::Css => Ok(text.to_string()),
            Syntax::Scss => {
                let options = Options::default().style(OutputStyle::Expanded);
                grass::from_string(text, &options).map_err(|e| PluginError::Generic(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id() {
        assert_eq!(Syntax::from_id(None).unwrap(), Syntax::Css);
        assert_eq!(Syntax::from_id(Some("postcss")).unwrap(), Syntax::Css);
        assert_eq!(Syntax::from_id(Some("postcss-scss")).unwrap(), Syntax::Scss);
        assert!(matches!(
            Syntax::from_id(Some("sugarss")),
            Err(ConfigError::UnknownParser(id)) if id == "sugarss"
        ));
    }

    #[test]
    fn test_css_is_identity() {
        assert_eq!(Syntax::Css.convert("$x: 1").unwrap(), "$x: 1");
    }

    #[test]
    fn test_scss_is_compiled() {
        let css = Syntax::Scss
            .convert("$c: red;\n.a { .b { color: $c; } }")
            .unwrap();
        assert!(css.contains(".a .b"));
        assert!(css.contains("color: red;"));
    }

    #[test]
    fn test_scss_errors_are_generic() {
        let err = Syntax::Scss.convert(".a { color: $missing; }").unwrap_err();
        assert!(matches!(err, PluginError::Generic(_)));
    }
}
