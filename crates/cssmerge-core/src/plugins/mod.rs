/*
 * plugins/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Content-rewrite plugins and their registry.
 */

//! Content-rewrite plugins.
//!
//! A plugin rewrites the text of one stylesheet before it is parsed. Plugins
//! are named in the `plugins` section of the configuration and created
//! through a [`PluginRegistry`], which maps each identifier to a factory
//! that turns the configured options into a plugin instance.

mod banner;
mod replace;
mod strip_comments;

pub use banner::BannerPlugin;
pub use replace::{ReplacePlugin, ReplaceRule};
pub use strip_comments::StripCommentsPlugin;

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{ConfigError, PluginError};

/// A content-rewrite step applied to a single stylesheet.
///
/// Plugins must be `Send + Sync`: files are transformed on worker threads.
pub trait CssPlugin: Send + Sync {
    /// Identifier used for logging.
    fn name(&self) -> &str;

    /// Rewrite `css`, the current text of the stylesheet at `path`.
    fn transform(&self, css: &str, path: &str) -> Result<String, PluginError>;
}

/// Creates a plugin from its configured options.
pub type PluginFactory =
    Arc<dyn Fn(&Value) -> Result<Box<dyn CssPlugin>, ConfigError> + Send + Sync>;

/// Maps plugin identifiers to factories.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    factories: HashMap<String, PluginFactory>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.names())
            .finish()
    }
}

impl PluginRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in plugins.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(StripCommentsPlugin::ID, |options| {
            Ok(Box::new(StripCommentsPlugin::from_options(options)?))
        });
        registry.register(ReplacePlugin::ID, |options| {
            Ok(Box::new(ReplacePlugin::from_options(options)?))
        });
        registry.register(BannerPlugin::ID, |options| {
            Ok(Box::new(BannerPlugin::from_options(options)?))
        });
        registry
    }

    /// Register a factory, replacing any previous one for `id`.
    pub fn register<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn(&Value) -> Result<Box<dyn CssPlugin>, ConfigError> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Arc::new(factory));
    }

    /// Instantiate the plugin registered as `id`.
    pub fn create(&self, id: &str, options: &Value) -> Result<Box<dyn CssPlugin>, ConfigError> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| ConfigError::UnknownPlugin(id.to_string()))?;
        factory(options)
    }

    /// Registered identifiers, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Treat `null` options as an empty object.
pub(crate) fn options_or_default<T>(plugin: &str, options: &Value) -> Result<T, ConfigError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if options.is_null() {
        return Ok(T::default());
    }
    T::deserialize(options).map_err(|err| ConfigError::invalid_options(plugin, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Upper;

    impl CssPlugin for Upper {
        fn name(&self) -> &str {
            "upper"
        }

        fn transform(&self, css: &str, _path: &str) -> Result<String, PluginError> {
            Ok(css.to_uppercase())
        }
    }

    #[test]
    fn test_builtins_are_registered() {
        let registry = PluginRegistry::with_builtins();
        assert_eq!(registry.names(), ["banner", "replace", "strip-comments"]);
    }

    #[test]
    fn test_unknown_plugin() {
        let registry = PluginRegistry::with_builtins();
        let err = registry
            .create("autoprefixer", &json!({}))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::UnknownPlugin(id) if id == "autoprefixer"));
    }

    #[test]
    fn test_custom_factory() {
        let mut registry = PluginRegistry::new();
        registry.register("upper", |_| Ok(Box::new(Upper)));

        let plugin = registry.create("upper", &Value::Null).unwrap();
        assert_eq!(plugin.transform(".a{}", "a.css").unwrap(), ".A{}");
    }
}
