//! Composition of a generated map with a map produced one step earlier.

use std::collections::HashMap;

use crate::source_map::{Mapping, OriginalLocation, SourceMap};

/// Interns strings in first-use order.
#[derive(Default)]
struct Interner {
    values: Vec<String>,
    ids: HashMap<String, u32>,
}

impl Interner {
    fn intern(&mut self, value: &str) -> u32 {
        if let Some(&id) = self.ids.get(value) {
            return id;
        }
        let id = self.values.len() as u32;
        self.values.push(value.to_string());
        self.ids.insert(value.to_string(), id);
        id
    }
}

impl SourceMap {
    /// Rewrite the mappings that point into `source_file` so they point
    /// where `upstream` says that text came from.
    ///
    /// `upstream` must describe how `source_file` was generated. Mappings
    /// whose position `upstream` cannot resolve are kept as they are, and
    /// mappings into other sources are untouched. Embedded content of
    /// `upstream`'s sources is carried over.
    ///
    /// # Example
    ///
    /// ```
    /// use cssmerge_source_map::{LineColumn, SourceMap};
    ///
    /// let mut merged = SourceMap::from_json(
    ///     r#"{"version":3,"sources":["a.css"],"mappings":"AAAA"}"#,
    /// ).unwrap();
    /// let upstream = SourceMap::from_json(
    ///     r#"{"version":3,"sources":["a.less"],"mappings":"AAEA"}"#,
    /// ).unwrap();
    ///
    /// merged.apply_source_map(&upstream, "a.css");
    ///
    /// let pos = merged.original_position_for(LineColumn::new(0, 0)).unwrap();
    /// assert_eq!(pos.source, "a.less");
    /// assert_eq!(pos.position, LineColumn::new(2, 0));
    /// ```
    pub fn apply_source_map(&mut self, upstream: &SourceMap, source_file: &str) {
        let mut sources = Interner::default();
        let mut names = Interner::default();

        let mappings: Vec<Mapping> = self
            .mappings()
            .iter()
            .map(|mapping| {
                let Some(original) = mapping.original else {
                    return *mapping;
                };

                let mut source = self
                    .sources()
                    .get(original.source as usize)
                    .cloned()
                    .unwrap_or_default();
                let mut position = original.position;
                let mut name = original
                    .name
                    .and_then(|n| self.names().get(n as usize))
                    .cloned();

                if source == source_file {
                    let traced = upstream
                        .mapping_for(position)
                        .and_then(|m| m.original)
                        .and_then(|up| Some((upstream.resolved_source(up.source)?, up)));
                    if let Some((upstream_source, up)) = traced {
                        source = upstream_source;
                        position = up.position;
                        if let Some(up_name) =
                            up.name.and_then(|n| upstream.names().get(n as usize))
                        {
                            name = Some(up_name.clone());
                        }
                    }
                }

                Mapping {
                    generated: mapping.generated,
                    original: Some(OriginalLocation {
                        source: sources.intern(&source),
                        position,
                        name: name.as_deref().map(|n| names.intern(n)),
                    }),
                }
            })
            .collect();

        let upstream_contents = upstream.contents_by_source();
        let sources_content = sources
            .values
            .iter()
            .map(|source| {
                upstream_contents
                    .get(source)
                    .cloned()
                    .or_else(|| self.source_content(source).map(String::from))
            })
            .collect();

        self.replace_contents(sources.values, sources_content, names.values, mappings);
    }
}
