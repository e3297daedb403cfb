/*
 * plugins/banner.rs
 * Copyright (c) 2025 Posit, PBC
 */

use serde::Deserialize;
use serde_json::Value;

use super::CssPlugin;
use crate::error::{ConfigError, PluginError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Options {
    text: String,
}

/// Prepends a `/* text */` line to every stylesheet.
#[derive(Debug)]
pub struct BannerPlugin {
    banner: String,
}

impl BannerPlugin {
    pub const ID: &'static str = "banner";

    pub fn new(text: &str) -> Result<Self, ConfigError> {
        if text.contains("*/") {
            return Err(ConfigError::invalid_options(
                Self::ID,
                "banner text must not contain '*/'",
            ));
        }
        Ok(BannerPlugin {
            banner: format!("/* {text} */\n"),
        })
    }

    pub fn from_options(options: &Value) -> Result<Self, ConfigError> {
        let options = Options::deserialize(options)
            .map_err(|err| ConfigError::invalid_options(Self::ID, err))?;
        Self::new(&options.text)
    }
}

impl CssPlugin for BannerPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn transform(&self, css: &str, _path: &str) -> Result<String, PluginError> {
        Ok(format!("{}{css}", self.banner))
    }
}
