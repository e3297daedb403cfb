/*
 * bundler.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The stylesheet bundling pipeline.
 */

//! Pipeline entry point.
//!
//! ```text
//! files -> filter -> transform + parse (per file, concurrent) -> merge
//!       -> compose source maps -> output
//! ```
//!
//! Per-file failures are isolated: the failing file contributes an empty
//! stylesheet and an entry in [`BuildReport::errors`], and every other file
//! is merged as usual. Only configuration problems and minifier failures
//! abort a build.

use std::sync::Arc;

use crate::builder::{ParsedFile, build_ast};
use crate::compose::compose;
use crate::config::BundlerConfig;
use crate::error::{ConfigError, Result};
use crate::file::{BuildMode, SourceFile};
use crate::filter;
use crate::merge::merge;
use crate::output::{CompressingMinifier, Minifier, emit};
use crate::plugins::PluginRegistry;
use crate::report::{BuildError, BuildErrorKind, BuildReport};
use crate::transform::TransformStage;

/// Merges stylesheets according to one configuration.
///
/// Construct once per configuration; [`bundle`](Self::bundle) can be called
/// any number of times and keeps no state between calls.
pub struct CssBundler {
    stage: Arc<TransformStage>,
    minifier: Arc<dyn Minifier>,
}

impl std::fmt::Debug for CssBundler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CssBundler")
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl CssBundler {
    /// Resolve `config` against the built-in plugins.
    pub fn new(config: &BundlerConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_registry(config, &PluginRegistry::with_builtins())
    }

    /// Resolve `config` against `registry`.
    pub fn with_registry(
        config: &BundlerConfig,
        registry: &PluginRegistry,
    ) -> std::result::Result<Self, ConfigError> {
        Ok(CssBundler {
            stage: Arc::new(TransformStage::new(config, registry)?),
            minifier: Arc::new(CompressingMinifier::new()),
        })
    }

    /// Use `minifier` for production builds.
    pub fn with_minifier(mut self, minifier: impl Minifier + 'static) -> Self {
        self.minifier = Arc::new(minifier);
        self
    }

    /// Merge `files`, in order, into the artifacts for `mode`.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Example
    ///
    /// ```
    /// use cssmerge_core::{BuildMode, BundlerConfig, CssBundler, SourceFile};
    ///
    /// # tokio::runtime::Builder::new_multi_thread().build().unwrap().block_on(async {
    /// let bundler = CssBundler::new(&BundlerConfig::default()).unwrap();
    /// let report = bundler
    ///     .bundle(
    ///         vec![
    ///             SourceFile::new("a.css", ".x{color:red}"),
    ///             SourceFile::new("b.css", "@import 'y.css'; .y{color:blue}"),
    ///         ],
    ///         BuildMode::Development,
    ///     )
    ///     .await
    ///     .unwrap();
    ///
    /// assert!(report.is_success());
    /// assert!(report.artifacts[0].code.starts_with("@import 'y.css';"));
    /// assert_eq!(report.warnings.len(), 1);
    /// # });
    /// ```
    pub async fn bundle(&self, files: Vec<SourceFile>, mode: BuildMode) -> Result<BuildReport> {
        let files: Vec<Arc<SourceFile>> =
            filter::select(files).into_iter().map(Arc::new).collect();
        let mut report = BuildReport::default();

        if files.is_empty() {
            tracing::debug!("No stylesheets to merge");
            return Ok(report);
        }

        let handles: Vec<_> = files
            .iter()
            .map(|file| {
                let stage = Arc::clone(&self.stage);
                let file = Arc::clone(file);
                tokio::task::spawn_blocking(move || process_file(&stage, &file))
            })
            .collect();

        let mut sheets = Vec::with_capacity(files.len());
        for (file, handle) in files.iter().zip(handles) {
            let parsed = handle.await.unwrap_or_else(|err| {
                tracing::error!(path = %file.path, error = %err, "Stylesheet task failed");
                let error = BuildError::new(
                    &file.path,
                    BuildErrorKind::Transform,
                    format!("Internal error while processing stylesheet: {err}"),
                );
                ParsedFile::failed(&file.path, error, file.content.clone())
            });

            if let Some(mut error) = parsed.error {
                if error.kind == BuildErrorKind::Parse && error.location.is_some() {
                    error.file = Some(report.sources.add_file(&file.path, parsed.text));
                }
                report.errors.push(error);
            }
            sheets.push(parsed.ast);
        }

        let (merged, warnings) = merge(sheets)?;
        tracing::debug!(warnings = warnings.len(), "Merged stylesheets");
        report.warnings = warnings;

        let composed = compose(&merged, files.iter().map(Arc::as_ref));
        report.artifacts = emit(
            composed.code,
            composed.source_map.as_ref(),
            mode,
            self.minifier.as_ref(),
        )?;

        for artifact in &report.artifacts {
            tracing::debug!(
                path = %artifact.path,
                bytes = artifact.code.len(),
                "Emitted stylesheet"
            );
        }
        Ok(report)
    }
}

fn process_file(stage: &TransformStage, file: &SourceFile) -> ParsedFile {
    tracing::debug!(path = %file.path, "Processing stylesheet");
    match stage.apply(file) {
        Ok(text) => build_ast(text, &file.path),
        Err(error) => ParsedFile::failed(&file.path, error, file.content.clone()),
    }
}
