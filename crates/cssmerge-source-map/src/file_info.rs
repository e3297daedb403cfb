//! Efficient file information for location lookups

use crate::types::Location;
use serde::{Deserialize, Serialize};

/// Line index over a file's content.
///
/// Stores the byte offset of every newline so that a byte offset can be
/// turned into a (row, column) pair with a binary search instead of a scan
/// from the start of the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInformation {
    /// Byte offsets of each newline character in the file
    line_breaks: Vec<usize>,

    /// Total length of the file in bytes
    total_length: usize,
}

impl FileInformation {
    /// Create file information by analyzing content
    ///
    /// # Example
    ///
    /// ```
    /// use cssmerge_source_map::FileInformation;
    ///
    /// let info = FileInformation::new("a {}\nb {}");
    /// assert_eq!(info.line_count(), 2);
    /// ```
    pub fn new(content: &str) -> Self {
        let line_breaks: Vec<usize> = content
            .bytes()
            .enumerate()
            .filter_map(|(idx, b)| if b == b'\n' { Some(idx) } else { None })
            .collect();

        FileInformation {
            line_breaks,
            total_length: content.len(),
        }
    }

    /// Convert a byte offset to a Location with row and column.
    ///
    /// `content` must be the text this index was built from; it is needed
    /// to count the column in UTF-16 code units.
    ///
    /// Returns None if the offset is out of bounds or not on a char boundary.
    ///
    /// # Example
    ///
    /// ```
    /// use cssmerge_source_map::FileInformation;
    ///
    /// let content = ".a{}\n.b{}";
    /// let info = FileInformation::new(content);
    /// let loc = info.offset_to_location(7, content).unwrap();
    /// assert_eq!(loc.row, 1);
    /// assert_eq!(loc.column, 2);
    /// ```
    pub fn offset_to_location(&self, offset: usize, content: &str) -> Option<Location> {
        if offset > self.total_length {
            return None;
        }

        // A newline belongs to the line it terminates, so an exact hit on
        // line_breaks[i] is still row i.
        let row = match self.line_breaks.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx,
        };

        let line_start = if row == 0 {
            0
        } else {
            self.line_breaks[row - 1] + 1
        };

        let column = content
            .get(line_start..offset)?
            .chars()
            .map(char::len_utf16)
            .sum();

        Some(Location {
            offset,
            row,
            column,
        })
    }

    /// Get the total length of the file in bytes
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// Get the number of lines in the file
    pub fn line_count(&self) -> usize {
        self.line_breaks.len() + 1
    }
}
