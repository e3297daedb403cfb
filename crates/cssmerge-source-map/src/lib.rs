//! Source positions and source maps for cssmerge
//!
//! This crate tracks where text lives in the files of a build and produces,
//! reads and composes Source Map v3 documents. It is what lets a position in
//! the merged stylesheet be traced back through the merge, and through any
//! preprocessor that ran before it, to the text an author wrote.
//!
//! # Overview
//!
//! The core types are:
//! - [`SourceContext`]: Registers files and turns byte offsets into locations
//! - [`SourceMapBuilder`]: Collects mappings while output is printed
//! - [`SourceMap`]: A decoded map with lookup and composition
//!
//! # Example
//!
//! ```rust
//! use cssmerge_source_map::*;
//!
//! let mut builder = SourceMapBuilder::new(Some("merged.css"));
//! let a = builder.add_source("a.css");
//! builder.add_mapping(
//!     LineColumn::new(0, 0),
//!     Some(OriginalLocation { source: a, position: LineColumn::new(0, 0), name: None }),
//! );
//! let mut map = builder.build();
//!
//! // a.css was itself produced from a.less
//! let upstream = SourceMap::from_json(
//!     r#"{"version":3,"sources":["a.less"],"mappings":"AAGA"}"#,
//! ).unwrap();
//! map.apply_source_map(&upstream, "a.css");
//!
//! let pos = map.original_position_for(LineColumn::new(0, 0)).unwrap();
//! assert_eq!(pos.source, "a.less");
//! assert_eq!(pos.position.line, 3);
//! ```

pub mod builder;
pub mod compose;
pub mod context;
pub mod error;
pub mod file_info;
pub mod source_map;
pub mod types;
pub mod vlq;

// Re-export main types
pub use builder::SourceMapBuilder;
pub use context::{SourceContext, SourceFile};
pub use error::SourceMapError;
pub use file_info::FileInformation;
pub use source_map::{Mapping, OriginalLocation, OriginalPosition, RawSourceMap, SourceMap};
pub use types::{FileId, LineColumn, Location, Range};
