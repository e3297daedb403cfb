//! Error reporting and diagnostic messages for cssmerge.
//!
//! Diagnostics follow the tidyverse message structure (title, problem,
//! notes, hints) and carry an optional error code from the embedded
//! catalog. They render as text with an ariadne excerpt of the source they
//! point at, followed by the catalog's description of the code.
//!
//! # Example
//!
//! ```
//! use cssmerge_error_reporting::DiagnosticMessageBuilder;
//! use cssmerge_source_map::{Location, Range, SourceContext};
//! use cssmerge_error_reporting::SourceSpan;
//!
//! let mut ctx = SourceContext::new();
//! let file = ctx.add_file("a.css", ".a {");
//! let brace = Location { offset: 3, row: 0, column: 3 };
//!
//! let error = DiagnosticMessageBuilder::error("Unclosed block")
//!     .with_code("M-1-1")
//!     .with_location(SourceSpan::new(file, Range { start: brace, end: brace }))
//!     .build();
//!
//! assert!(error.to_text(Some(&ctx)).contains("a.css"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info};
pub use diagnostic::{DiagnosticKind, DiagnosticMessage, SourceSpan};
