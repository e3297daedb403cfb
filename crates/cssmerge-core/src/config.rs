/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Bundler configuration.
 */

//! Bundler configuration.
//!
//! The configuration lives under the `postcss` key of a project's
//! `package.json`:
//!
//! ```json
//! {
//!   "postcss": {
//!     "plugins": { "strip-comments": { "preserveImportant": true } },
//!     "parser": "scss",
//!     "excludedPackages": ["acme:legacy-theme"]
//!   }
//! }
//! ```
//!
//! It is read once by the caller and handed to [`crate::CssBundler::new`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Key of the bundler section in `package.json`.
pub const PACKAGE_JSON_KEY: &str = "postcss";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundlerConfig {
    /// Plugin identifiers mapped to their options, in the order they run.
    pub plugins: Map<String, Value>,

    /// Alternate syntax parser identifier.
    pub parser: Option<String>,

    /// Packages whose files skip the transform stage.
    pub excluded_packages: Vec<String>,
}

impl BundlerConfig {
    /// Parse the bundler section on its own.
    ///
    /// # Example
    ///
    /// ```
    /// use cssmerge_core::BundlerConfig;
    ///
    /// let config = BundlerConfig::from_json_str(
    ///     r#"{"plugins": {"banner": {"text": "hi"}}, "excludedPackages": ["a:b"]}"#,
    /// ).unwrap();
    /// assert_eq!(config.plugins.len(), 1);
    /// assert_eq!(config.excluded_packages, ["a:b"]);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Invalid)
    }

    /// Read the bundler section of a `package.json`.
    ///
    /// A missing file or a file without the section yields the default
    /// configuration. A file that exists but cannot be read or parsed is an
    /// error.
    pub fn from_package_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    path = %path_str,
                    "No package.json, using default bundler configuration"
                );
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path_str,
                    source,
                });
            }
        };

        let package: Value = serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path_str.clone(),
            source,
        })?;

        match package.get(PACKAGE_JSON_KEY) {
            Some(section) => Self::deserialize(section).map_err(ConfigError::Invalid),
            None => Ok(Self::default()),
        }
    }
}
