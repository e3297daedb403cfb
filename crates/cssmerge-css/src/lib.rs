/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Structural CSS for the stylesheet bundler.
//!
//! This crate parses stylesheets into a tree of rules, at-rules, comments
//! and declarations, and prints such trees back out, either expanded (with
//! an optional source map) or compressed. It does not interpret selectors or
//! values; it only needs to know where statements begin and end.
//!
//! # Example
//!
//! ```
//! use cssmerge_css::{parse, to_css};
//!
//! let sheet = parse(".x{color:red}", "a.css").unwrap();
//! assert_eq!(to_css(&sheet), ".x {\n  color: red;\n}\n");
//! ```

pub mod ast;
pub mod error;
pub mod parser;
pub mod printer;

pub use ast::{BlockItem, Declaration, Rule, RuleKind, Span, Stylesheet, split_top_level};
pub use error::{CssParseError, CssResult};
pub use parser::parse;
pub use printer::{rule_to_compressed_css, to_compressed_css, to_css, to_css_with_map};
