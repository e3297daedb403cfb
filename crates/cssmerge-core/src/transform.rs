/*
 * transform.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-file content rewriting before the structural parse.
 */

//! The transform stage.
//!
//! A [`TransformStage`] is resolved once from the configuration and then
//! applied to each file independently (it is `Send + Sync`, so files can be
//! transformed on worker threads). Files from excluded packages bypass it.

use cssmerge_error_reporting::{DiagnosticMessageBuilder, SourceSpan};
use cssmerge_source_map::{Location, Range, SourceContext};

use crate::config::BundlerConfig;
use crate::error::{ConfigError, PluginError};
use crate::file::SourceFile;
use crate::plugins::{CssPlugin, PluginRegistry};
use crate::report::{BuildError, BuildErrorKind};
use crate::syntax::Syntax;

/// The configured plugins and syntax, ready to run.
pub struct TransformStage {
    syntax: Syntax,
    plugins: Vec<Box<dyn CssPlugin>>,
    /// `packages/<name>` needles of excluded packages.
    excluded: Vec<String>,
}

impl std::fmt::Debug for TransformStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plugins: Vec<_> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("TransformStage")
            .field("syntax", &self.syntax)
            .field("plugins", &plugins)
            .field("excluded", &self.excluded)
            .finish()
    }
}

impl TransformStage {
    /// Resolve every configured plugin and the parser.
    ///
    /// Any identifier the registry does not know fails the whole build.
    pub fn new(config: &BundlerConfig, registry: &PluginRegistry) -> Result<Self, ConfigError> {
        let syntax = Syntax::from_id(config.parser.as_deref())?;
        let plugins = config
            .plugins
            .iter()
            .map(|(id, options)| registry.create(id, options))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TransformStage {
            syntax,
            plugins,
            excluded: config
                .excluded_packages
                .iter()
                .map(|name| package_path(name))
                .collect(),
        })
    }

    /// Whether `path` belongs to an excluded package and bypasses this stage.
    ///
    /// Package names use `:` where bundle paths use `_`, so `acme:theme`
    /// matches any path containing `packages/acme_theme`.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded.iter().any(|needle| path.contains(needle.as_str()))
    }

    /// Transform one file's text.
    pub fn apply(&self, file: &SourceFile) -> Result<String, BuildError> {
        if self.is_excluded(&file.path) {
            tracing::debug!(path = %file.path, "File is in an excluded package, not transforming");
            return Ok(file.content.clone());
        }

        let mut text = self
            .syntax
            .convert(&file.content)
            .map_err(|err| to_build_error(&file.path, &file.content, err))?;

        for plugin in &self.plugins {
            tracing::debug!(plugin = plugin.name(), path = %file.path, "Running plugin");
            text = plugin
                .transform(&text, &file.path)
                .map_err(|err| to_build_error(&file.path, &text, err))?;
        }

        Ok(text)
    }
}

/// Bundle path prefix of a package: `acme:theme` lives under `packages/acme_theme`.
fn package_path(name: &str) -> String {
    format!("packages/{}", name.replacen(':', "_", 1))
}

fn to_build_error(path: &str, input: &str, err: PluginError) -> BuildError {
    match err {
        PluginError::Generic(message) => BuildError::new(path, BuildErrorKind::Transform, message),
        PluginError::Syntax { message, location } => {
            let excerpt = render_excerpt(path, input, &message, location);
            let message = match excerpt {
                Some(excerpt) => {
                    format!("{message}\n\nCSS syntax error.\n\n{}", excerpt.trim_end())
                }
                None => format!("{message}\n\nCSS syntax error."),
            };
            BuildError::new(path, BuildErrorKind::Transform, message).at(location)
        }
    }
}

fn render_excerpt(path: &str, input: &str, message: &str, location: Location) -> Option<String> {
    let mut ctx = SourceContext::new();
    let file = ctx.add_file(path, input);
    DiagnosticMessageBuilder::error(message.to_string())
        .problem(message.to_string())
        .with_location(SourceSpan::new(file, Range::point(location)))
        .build()
        .source_excerpt(&ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: serde_json::Value) -> BundlerConfig {
        serde_json::from_value(value).unwrap()
    }

    fn stage(value: serde_json::Value) -> TransformStage {
        TransformStage::new(&config(value), &PluginRegistry::with_builtins()).unwrap()
    }

    #[test]
    fn test_plugins_run_in_configured_order() {
        let stage = stage(json!({
            "plugins": {
                "replace": [{"search": "red", "replace": "blue"}],
                "banner": {"text": "red"}
            }
        }));
        let out = stage.apply(&SourceFile::new("a.css", ".x{color:red}")).unwrap();
        assert_eq!(out, "/* red */\n.x{color:blue}");
    }

    #[test]
    fn test_excluded_package_is_untouched() {
        let stage = stage(json!({
            "plugins": {"banner": {"text": "hi"}},
            "excludedPackages": ["acme:theme"]
        }));
        let css = "/* keep */.x{}";
        let out = stage
            .apply(&SourceFile::new("packages/acme_theme/a.css", css))
            .unwrap();
        assert_eq!(out, css);
    }

    #[test]
    fn test_excluded_package_paths() {
        let stage = stage(json!({"excludedPackages": ["acme:theme"]}));
        assert!(stage.is_excluded("packages/acme_theme/client/main.css"));
        assert!(stage.is_excluded("node_modules/packages/acme_theme/x.css"));
        assert!(!stage.is_excluded("packages/acme/theme.css"));
        assert!(!stage.is_excluded("client/main.css"));
    }

    #[test]
    fn test_syntax_error_is_positioned() {
        let stage = stage(json!({"plugins": {"strip-comments": {}}}));
        let err = stage
            .apply(&SourceFile::new("a.css", ".x{}\n/* open"))
            .unwrap_err();

        assert_eq!(err.kind, BuildErrorKind::Transform);
        assert_eq!((err.line(), err.column()), (Some(2), Some(1)));
        assert!(err.message.starts_with("Unclosed comment\n\nCSS syntax error.\n\n"));
        assert!(err.message.contains("a.css"));
    }

    #[test]
    fn test_unknown_plugin_fails_resolution() {
        let err = TransformStage::new(
            &config(json!({"plugins": {"cssnano": {}}})),
            &PluginRegistry::with_builtins(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPlugin(id) if id == "cssnano"));
    }

    #[test]
    fn test_unknown_parser_fails_resolution() {
        let err = TransformStage::new(
            &config(json!({"parser": "less"})),
            &PluginRegistry::with_builtins(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownParser(_)));
    }
}
