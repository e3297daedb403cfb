/*
 * output.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Turning the merged stylesheet into artifacts.
 */

//! The output stage.
//!
//! Development builds get the merged text and its composed source map as
//! a single artifact. Production builds hand the merged text to a
//! [`Minifier`] and get one artifact per stylesheet it returns, without
//! source maps.

use cssmerge_css::{Rule, Stylesheet, rule_to_compressed_css};
use cssmerge_source_map::SourceMap;

use crate::error::MinifyError;
use crate::file::BuildMode;

/// Path of the merged development stylesheet.
pub const MERGED_PATH: &str = "merged-stylesheets.css";

/// One output stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetArtifact {
    /// Suggested file name.
    pub path: String,
    pub code: String,
    /// Serialized Source Map v3, development builds only.
    pub source_map: Option<String>,
}

impl StylesheetArtifact {
    pub fn new(path: impl Into<String>, code: impl Into<String>) -> Self {
        StylesheetArtifact {
            path: path.into(),
            code: code.into(),
            source_map: None,
        }
    }

    pub fn with_source_map(mut self, source_map: impl Into<String>) -> Self {
        self.source_map = Some(source_map.into());
        self
    }
}

/// Minifies merged stylesheet text for production builds.
pub trait Minifier: Send + Sync {
    /// Minify `code`, possibly splitting it into several stylesheets.
    fn minify(&self, code: &str) -> Result<Vec<String>, MinifyError>;
}

/// Reparses the merged text and prints it compressed.
///
/// With a selector budget, output is split into several stylesheets so no
/// one of them has more selectors than the budget (old browsers ignore
/// rules past a fixed selector count). Imports and `@charset` always stay
/// in the first stylesheet.
#[derive(Debug, Clone, Default)]
pub struct CompressingMinifier {
    pub max_selectors: Option<usize>,
}

impl CompressingMinifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_selectors(max_selectors: usize) -> Self {
        CompressingMinifier {
            max_selectors: Some(max_selectors),
        }
    }
}

impl Minifier for CompressingMinifier {
    fn minify(&self, code: &str) -> Result<Vec<String>, MinifyError> {
        let sheet = cssmerge_css::parse(code, MERGED_PATH).map_err(|err| MinifyError {
            message: match err.line_column() {
                Some((line, column)) => format!("{err} at {line}:{column}"),
                None => err.to_string(),
            },
        })?;

        let Some(budget) = self.max_selectors else {
            return Ok(vec![cssmerge_css::to_compressed_css(&sheet)]);
        };

        Ok(split_by_selectors(&sheet, budget.max(1))
            .into_iter()
            .map(|chunk| chunk.into_iter().map(rule_to_compressed_css).collect::<String>())
            .collect())
    }
}

fn split_by_selectors(sheet: &Stylesheet, budget: usize) -> Vec<Vec<&Rule>> {
    let mut chunks: Vec<Vec<&Rule>> = vec![Vec::new()];
    let mut count = 0;

    for rule in &sheet.rules {
        let pinned = rule.is_import() || rule.at_rule_name().as_deref() == Some("charset");
        if pinned {
            chunks[0].push(rule);
            continue;
        }

        let selectors = rule.selector_count();
        if count > 0 && count + selectors > budget {
            chunks.push(Vec::new());
            count = 0;
        }
        count += selectors;
        if let Some(chunk) = chunks.last_mut() {
            chunk.push(rule);
        }
    }

    chunks
}

/// Produce the artifacts for a merged stylesheet.
///
/// `source_map` is only used in development mode.
pub fn emit(
    code: String,
    source_map: Option<&SourceMap>,
    mode: BuildMode,
    minifier: &dyn Minifier,
) -> Result<Vec<StylesheetArtifact>, MinifyError> {
    match mode {
        BuildMode::Development => {
            let artifact = StylesheetArtifact::new(MERGED_PATH, code);
            Ok(vec![match source_map {
                Some(map) if !artifact.code.is_empty() => artifact.with_source_map(map.to_json()),
                _ => artifact,
            }])
        }
        BuildMode::Production => {
            let chunks = minifier.minify(&code)?;
            let single = chunks.len() == 1;
            Ok(chunks
                .into_iter()
                .enumerate()
                .map(|(i, code)| {
                    let path = if single {
                        "merged-stylesheets.min.css".to_string()
                    } else {
                        format!("merged-stylesheets.{}.min.css", i + 1)
                    };
                    StylesheetArtifact::new(path, code)
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cssmerge_source_map::SourceMapBuilder;

    #[test]
    fn test_development_keeps_map() {
        let map = SourceMapBuilder::new(Some(MERGED_PATH)).build();
        let artifacts = emit(
            ".x {\n}\n".to_string(),
            Some(&map),
            BuildMode::Development,
            &CompressingMinifier::new(),
        )
        .unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].path, MERGED_PATH);
        assert!(artifacts[0].source_map.is_some());
    }

    #[test]
    fn test_empty_code_has_no_map() {
        let map = SourceMapBuilder::new(Some(MERGED_PATH)).build();
        let artifacts = emit(
            String::new(),
            Some(&map),
            BuildMode::Development,
            &CompressingMinifier::new(),
        )
        .unwrap();
        assert_eq!(artifacts, [StylesheetArtifact::new(MERGED_PATH, "")]);
    }

    #[test]
    fn test_production_is_compressed() {
        let artifacts = emit(
            "@import 'y.css';\n\n.x {\n  color: red;\n}\n".to_string(),
            None,
            BuildMode::Production,
            &CompressingMinifier::new(),
        )
        .unwrap();
        assert_eq!(
            artifacts,
            [StylesheetArtifact::new(
                "merged-stylesheets.min.css",
                "@import 'y.css';.x{color:red}"
            )]
        );
    }

    #[test]
    fn test_split_keeps_imports_first() {
        let minifier = CompressingMinifier::with_max_selectors(2);
        let chunks = minifier
            .minify("@import 'y.css'; .a, .b {} .c {} .d {} @charset \"utf-8\";")
            .unwrap();
        insta::assert_debug_snapshot!(chunks, @r#"
        [
            "@import 'y.css';.a,.b{}@charset \"utf-8\";",
            ".c{}.d{}",
        ]
        "#);
    }

    #[test]
    fn test_unparsable_input() {
        let err = CompressingMinifier::new().minify(".a {").unwrap_err();
        assert_eq!(err.message, "Unclosed block at 1:4");
    }
}
