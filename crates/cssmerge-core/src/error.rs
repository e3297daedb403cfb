/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for cssmerge-core
//!
//! Per-file failures are not errors of the bundler itself; they are
//! collected as [`crate::report::BuildError`] values. The types here are
//! what the configuration, the plugins and the bundle as a whole can fail
//! with.

use cssmerge_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder};
use cssmerge_source_map::Location;
use thiserror::Error;

/// The bundler configuration cannot be used. Fails the whole build.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path} as JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid bundler configuration: {0}")]
    Invalid(#[source] serde_json::Error),

    #[error("Unknown plugin '{0}'")]
    UnknownPlugin(String),

    #[error("Invalid options for plugin '{plugin}': {message}")]
    InvalidPluginOptions { plugin: String, message: String },

    #[error("Unknown parser '{0}'")]
    UnknownParser(String),
}

impl ConfigError {
    pub fn invalid_options(plugin: impl Into<String>, message: impl ToString) -> Self {
        ConfigError::InvalidPluginOptions {
            plugin: plugin.into(),
            message: message.to_string(),
        }
    }

    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let builder = DiagnosticMessageBuilder::error("Invalid Bundler Configuration")
            .with_code("M-3-1")
            .problem(self.to_string());
        match self {
            ConfigError::UnknownPlugin(_) => builder
                .add_hint("Run `cssmerge plugins` to list the available plugins?")
                .build(),
            ConfigError::UnknownParser(_) => builder
                .add_hint("Supported parsers are `css`, `postcss`, `scss` and `postcss-scss`.")
                .build(),
            _ => builder.build(),
        }
    }
}

/// A plugin or syntax converter rejected a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
    /// The input is not valid for the plugin, at a known position.
    #[error("{message}")]
    Syntax { message: String, location: Location },

    #[error("{0}")]
    Generic(String),
}

/// The merge step was called without any stylesheets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("Cannot merge an empty set of stylesheets")]
    Empty,
}

/// The minifier could not process the merged stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Minification failed: {message}")]
pub struct MinifyError {
    pub message: String,
}

/// Build-level failures.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Minify(#[from] MinifyError),
}

impl BundleError {
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        match self {
            BundleError::Config(err) => err.to_diagnostic(),
            BundleError::Merge(err) => DiagnosticMessageBuilder::error("Internal Error")
                .with_code("M-0-1")
                .problem(err.to_string())
                .build(),
            BundleError::Minify(err) => DiagnosticMessageBuilder::error("Minification Failed")
                .with_code("M-4-1")
                .problem(err.message.clone())
                .build(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BundleError>;
