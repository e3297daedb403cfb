//! Error code catalog and lookup.
//!
//! Maps error codes (like "M-1-1") to their metadata. The catalog is embedded
//! from `error_catalog.json` at compile time.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

/// Metadata for an error code.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ErrorCodeInfo {
    /// Subsystem name (e.g., "css", "merge", "config")
    pub subsystem: String,

    /// Short title for the error
    pub title: String,

    /// One-line description, printed under diagnostics carrying the code
    pub message_template: String,

    /// When this error was introduced (version)
    pub since_version: String,
}

/// Global error catalog, parsed on first use.
///
/// A malformed embedded catalog yields an empty map; the catalog tests
/// catch that before release.
pub static ERROR_CATALOG: Lazy<HashMap<String, ErrorCodeInfo>> = Lazy::new(|| {
    let json_data = include_str!("../error_catalog.json");
    serde_json::from_str(json_data).unwrap_or_default()
});

/// Look up error code information.
///
/// # Example
///
/// ```
/// use cssmerge_error_reporting::catalog::get_error_info;
///
/// let info = get_error_info("M-1-1").unwrap();
/// assert_eq!(info.title, "CSS Syntax Error");
/// ```
pub fn get_error_info(code: &str) -> Option<&ErrorCodeInfo> {
    ERROR_CATALOG.get(code)
}
