/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Stylesheet merging for application bundles.
//!
//! `cssmerge-core` takes the stylesheets of an application, in order, and
//! produces one merged stylesheet:
//!
//! 1. import partials and compiler byproducts are filtered out ([`filter`]);
//! 2. each file is rewritten by the configured plugins ([`transform`]) and
//!    parsed ([`builder`]), concurrently, with failures isolated per file;
//! 3. the per-file trees are merged, hoisting `@import` rules ([`merge`]);
//! 4. the result is printed with a source map that is composed with each
//!    file's own upstream map ([`compose`]);
//! 5. development builds emit it as is, production builds minify it
//!    ([`output`]).
//!
//! [`CssBundler`] runs the whole pipeline.

pub mod builder;
pub mod bundler;
pub mod compose;
pub mod config;
pub mod error;
pub mod file;
pub mod filter;
pub mod merge;
pub mod output;
pub mod plugins;
pub mod report;
pub mod syntax;
pub mod transform;

pub use bundler::CssBundler;
pub use config::BundlerConfig;
pub use error::{BundleError, ConfigError, MergeError, MinifyError, PluginError};
pub use file::{BuildMode, SourceFile};
pub use merge::MergeWarning;
pub use output::{CompressingMinifier, MERGED_PATH, Minifier, StylesheetArtifact};
pub use plugins::{CssPlugin, PluginRegistry};
pub use report::{BuildError, BuildErrorKind, BuildReport};
