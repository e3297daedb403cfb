//! Incremental construction of a source map.

use std::collections::HashMap;

use crate::source_map::{Mapping, OriginalLocation, SourceMap};
use crate::types::LineColumn;

/// Collects sources and mappings while output is being generated.
///
/// # Example
///
/// ```
/// use cssmerge_source_map::{LineColumn, OriginalLocation, SourceMapBuilder};
///
/// let mut builder = SourceMapBuilder::new(Some("out.css"));
/// let a = builder.add_source("a.css");
/// builder.add_mapping(
///     LineColumn::new(0, 0),
///     Some(OriginalLocation { source: a, position: LineColumn::new(3, 2), name: None }),
/// );
/// let map = builder.build();
/// assert_eq!(map.sources(), ["a.css"]);
/// ```
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    file: Option<String>,
    sources: Vec<String>,
    source_ids: HashMap<String, u32>,
    sources_content: Vec<Option<String>>,
    mappings: Vec<Mapping>,
}

impl SourceMapBuilder {
    pub fn new(file: Option<&str>) -> Self {
        SourceMapBuilder {
            file: file.map(String::from),
            ..Default::default()
        }
    }

    /// Register a source, returning its index. Registering twice is a no-op.
    pub fn add_source(&mut self, source: &str) -> u32 {
        if let Some(&id) = self.source_ids.get(source) {
            return id;
        }
        let id = self.sources.len() as u32;
        self.sources.push(source.to_string());
        self.sources_content.push(None);
        self.source_ids.insert(source.to_string(), id);
        id
    }

    /// Embed the full text of a registered source.
    pub fn set_source_content(&mut self, source: u32, content: impl Into<String>) {
        if let Some(slot) = self.sources_content.get_mut(source as usize) {
            *slot = Some(content.into());
        }
    }

    pub fn add_mapping(&mut self, generated: LineColumn, original: Option<OriginalLocation>) {
        self.mappings.push(Mapping {
            generated,
            original,
        });
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn build(self) -> SourceMap {
        SourceMap::from_parts(
            self.file,
            self.sources,
            self.sources_content,
            Vec::new(),
            self.mappings,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_are_interned_in_first_use_order() {
        let mut builder = SourceMapBuilder::new(None);
        assert_eq!(builder.add_source("b.css"), 0);
        assert_eq!(builder.add_source("a.css"), 1);
        assert_eq!(builder.add_source("b.css"), 0);
        assert_eq!(builder.sources(), ["b.css", "a.css"]);
    }

    #[test]
    fn test_build_encodes_mappings() {
        let mut builder = SourceMapBuilder::new(Some("out.css"));
        let a = builder.add_source("a.css");
        builder.set_source_content(a, ".x{}");
        builder.add_mapping(
            LineColumn::new(0, 0),
            Some(OriginalLocation {
                source: a,
                position: LineColumn::new(0, 0),
                name: None,
            }),
        );
        builder.add_mapping(
            LineColumn::new(1, 2),
            Some(OriginalLocation {
                source: a,
                position: LineColumn::new(0, 3),
                name: None,
            }),
        );

        let raw = builder.build().to_raw();
        assert_eq!(raw.mappings, "AAAA;EAAG");
        assert_eq!(raw.file.as_deref(), Some("out.css"));
        assert_eq!(raw.sources_content, Some(vec![Some(".x{}".to_string())]));
    }
}
