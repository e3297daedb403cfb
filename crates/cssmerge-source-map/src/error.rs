//! Error types for source map decoding.

use thiserror::Error;

/// Reasons a serialized source map could not be decoded.
#[derive(Debug, Error)]
pub enum SourceMapError {
    #[error("invalid source map JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported source map version {0}, only version 3 is supported")]
    UnsupportedVersion(u32),

    #[error("invalid base64 character {0:?} in mappings")]
    InvalidBase64(char),

    #[error("unterminated VLQ value in mappings")]
    UnterminatedVlq,

    #[error("VLQ value in mappings does not fit in 32 bits")]
    VlqOverflow,

    #[error("mapping segment has {0} fields, expected 1, 4 or 5")]
    InvalidSegment(usize),

    #[error("negative {0} in mappings")]
    Negative(&'static str),

    #[error("{0} in mappings does not fit in 32 bits")]
    TooLarge(&'static str),

    #[error("mapping refers to source #{index}, but the map lists {count} sources")]
    SourceOutOfRange { index: i64, count: usize },

    #[error("mapping refers to name #{index}, but the map lists {count} names")]
    NameOutOfRange { index: i64, count: usize },
}
