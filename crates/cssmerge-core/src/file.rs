/*
 * file.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Input stylesheets and build modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One input stylesheet, as handed over by the build tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path in bundle; unique within one build.
    pub path: String,
    pub content: String,
    /// Serialized map from an earlier transformation of this file, if any.
    pub source_map: Option<String>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        SourceFile {
            path: path.into(),
            content: content.into(),
            source_map: None,
        }
    }

    pub fn with_source_map(mut self, source_map: impl Into<String>) -> Self {
        self.source_map = Some(source_map.into());
        self
    }
}

/// Whether the bundle is for development or production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// One readable stylesheet with a source map.
    #[default]
    Development,
    /// Minified stylesheets without maps.
    Production,
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Development => write!(f, "development"),
            BuildMode::Production => write!(f, "production"),
        }
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(BuildMode::Development),
            "production" => Ok(BuildMode::Production),
            other => Err(format!(
                "unknown build mode '{other}', expected 'development' or 'production'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_mode_round_trips_through_strings() {
        for mode in [BuildMode::Development, BuildMode::Production] {
            assert_eq!(mode.to_string().parse::<BuildMode>(), Ok(mode));
        }
        assert!("staging".parse::<BuildMode>().is_err());
    }
}
