//! Source context for managing files

use crate::file_info::FileInformation;
use crate::types::FileId;

/// Registry of the files a build has seen, used to render diagnostics
/// against the text they refer to.
#[derive(Debug, Clone, Default)]
pub struct SourceContext {
    files: Vec<SourceFile>,
}

/// A source file with content and its line index
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path in bundle
    pub path: String,
    /// Full text of the file
    pub content: String,
    /// Line index for offset lookups
    pub file_info: FileInformation,
}

impl SourceContext {
    /// Create a new empty source context
    pub fn new() -> Self {
        SourceContext { files: Vec::new() }
    }

    /// Add a file to the context and return its ID
    pub fn add_file(&mut self, path: impl Into<String>, content: impl Into<String>) -> FileId {
        let id = FileId(self.files.len());
        let content = content.into();
        let file_info = FileInformation::new(&content);
        self.files.push(SourceFile {
            path: path.into(),
            content,
            file_info,
        });
        id
    }

    /// Get a file by ID
    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
