//! Core types for source positions

use serde::{Deserialize, Serialize};

/// A unique identifier for a file registered in a [`crate::SourceContext`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub usize);

/// A location in source text (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Byte offset from start of source
    pub offset: usize,
    /// Row number (0-indexed)
    pub row: usize,
    /// Column number (0-indexed, in UTF-16 code units as source maps count them)
    pub column: usize,
}

impl Location {
    /// The start of a document.
    pub const START: Location = Location {
        offset: 0,
        row: 0,
        column: 0,
    };

    /// Drop the byte offset, keeping the coordinates a source map stores.
    pub fn line_column(&self) -> LineColumn {
        LineColumn {
            line: self.row as u32,
            column: self.column as u32,
        }
    }
}

/// A range in source text from start to end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    /// Start location (inclusive)
    pub start: Location,
    /// End location (exclusive)
    pub end: Location,
}

impl Range {
    /// A zero-width range at `location`.
    pub fn point(location: Location) -> Self {
        Range {
            start: location,
            end: location,
        }
    }
}

/// A (line, column) pair as stored in a source map (both 0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineColumn {
    pub line: u32,
    pub column: u32,
}

impl LineColumn {
    pub fn new(line: u32, column: u32) -> Self {
        LineColumn { line, column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_ordering() {
        let loc1 = Location {
            offset: 0,
            row: 0,
            column: 0,
        };
        let loc2 = Location {
            offset: 5,
            row: 0,
            column: 5,
        };
        let loc3 = Location {
            offset: 10,
            row: 1,
            column: 0,
        };

        assert!(loc1 < loc2);
        assert!(loc2 < loc3);
    }

    #[test]
    fn test_line_column_ordering_is_line_major() {
        assert!(LineColumn::new(0, 40) < LineColumn::new(1, 0));
        assert!(LineColumn::new(2, 3) < LineColumn::new(2, 4));
    }

    #[test]
    fn test_location_to_line_column() {
        let loc = Location {
            offset: 17,
            row: 2,
            column: 4,
        };
        assert_eq!(loc.line_column(), LineColumn::new(2, 4));
    }

    #[test]
    fn test_serialization_range() {
        let range = Range {
            start: Location::START,
            end: Location {
                offset: 50,
                row: 2,
                column: 10,
            },
        };
        let json = serde_json::to_string(&range).unwrap();
        let deserialized: Range = serde_json::from_str(&json).unwrap();
        assert_eq!(range, deserialized);
    }
}
