/*
 * bundle.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Bundle command implementation
 */

//! Bundle command implementation.
//!
//! Reads the given stylesheets (and any `<file>.map` upstream maps next to
//! them), runs them through the bundler and writes the artifacts to the
//! output directory. Per-file errors are printed with source excerpts,
//! followed by merge warnings. Any error makes the command exit non-zero.

use std::io::IsTerminal;
use std::path::{Component, Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{debug, info};

use cssmerge_core::{BuildMode, BundlerConfig, CompressingMinifier, CssBundler, SourceFile};
use cssmerge_error_reporting::DiagnosticMessage;
use cssmerge_source_map::SourceContext;

/// Arguments for the bundle command
#[derive(Debug)]
pub struct BundleArgs {
    pub files: Vec<PathBuf>,
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub mode: BuildMode,
    pub out_dir: PathBuf,
    pub max_selectors: Option<usize>,
}

/// Execute the bundle command
pub async fn execute(args: BundleArgs) -> Result<ExitCode> {
    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let config_path = args.config.unwrap_or_else(|| root.join("package.json"));

    let config = match BundlerConfig::from_package_json(&config_path) {
        Ok(config) => config,
        Err(err) => {
            print_diagnostic(&err.to_diagnostic(), None);
            return Ok(ExitCode::FAILURE);
        }
    };
    let bundler = match CssBundler::new(&config) {
        Ok(bundler) => bundler,
        Err(err) => {
            print_diagnostic(&err.to_diagnostic(), None);
            return Ok(ExitCode::FAILURE);
        }
    };
    let bundler = match args.max_selectors {
        Some(n) => bundler.with_minifier(CompressingMinifier::with_max_selectors(n)),
        None => bundler,
    };

    let files = args
        .files
        .iter()
        .map(|path| read_source_file(path, &root))
        .collect::<Result<Vec<_>>>()?;

    let report = match bundler.bundle(files, args.mode).await {
        Ok(report) => report,
        Err(err) => {
            print_diagnostic(&err.to_diagnostic(), None);
            return Ok(ExitCode::FAILURE);
        }
    };

    for diagnostic in report.diagnostics() {
        print_diagnostic(&diagnostic, Some(&report.sources));
    }

    if report.artifacts.is_empty() {
        info!("No stylesheets to merge");
    } else {
        std::fs::create_dir_all(&args.out_dir).with_context(|| {
            format!("Failed to create output directory {}", args.out_dir.display())
        })?;
    }

    for artifact in &report.artifacts {
        let path = args.out_dir.join(&artifact.path);
        write_file(&path, &artifact.code)?;
        if let Some(map) = &artifact.source_map {
            write_file(&map_path(&path), map)?;
        }
        info!(path = %path.display(), "Wrote stylesheet");
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn read_source_file(path: &Path, root: &Path) -> Result<SourceFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file = SourceFile::new(path_in_bundle(path, root), content);

    let map = map_path(path);
    if !map.is_file() {
        return Ok(file);
    }
    debug!(path = %map.display(), "Reading upstream source map");
    let source_map = std::fs::read_to_string(&map)
        .with_context(|| format!("Failed to read {}", map.display()))?;
    Ok(file.with_source_map(source_map))
}

/// `path` relative to `root`, with `/` separators.
fn path_in_bundle(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_) | Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn map_path(path: &Path) -> PathBuf {
    let mut map = path.as_os_str().to_owned();
    map.push(".map");
    PathBuf::from(map)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn print_diagnostic(diagnostic: &DiagnosticMessage, sources: Option<&SourceContext>) {
    let text = if std::io::stderr().is_terminal() {
        diagnostic.to_ansi_text(sources)
    } else {
        diagnostic.to_text(sources)
    };
    eprintln!("{text}\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_in_bundle() {
        let root = Path::new("/app");
        assert_eq!(
            path_in_bundle(Path::new("/app/client/main.css"), root),
            "client/main.css"
        );
        assert_eq!(
            path_in_bundle(Path::new("/elsewhere/a.css"), root),
            "elsewhere/a.css"
        );
        assert_eq!(path_in_bundle(Path::new("a.css"), Path::new(".")), "a.css");
    }

    #[test]
    fn test_map_path() {
        assert_eq!(
            map_path(Path::new("out/merged-stylesheets.css")),
            PathBuf::from("out/merged-stylesheets.css.map")
        );
    }
}
