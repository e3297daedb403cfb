//! Source Map v3 model, JSON form and `mappings` codec.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SourceMapError;
use crate::types::LineColumn;
use crate::vlq;

/// Serialized (JSON) shape of a version 3 source map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceMap {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub names: Vec<String>,
    pub mappings: String,
}

/// Where a generated position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalLocation {
    /// Index into [`SourceMap::sources`]
    pub source: u32,
    pub position: LineColumn,
    /// Index into [`SourceMap::names`]
    pub name: Option<u32>,
}

/// One decoded mapping segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub generated: LineColumn,
    pub original: Option<OriginalLocation>,
}

/// A result of [`SourceMap::original_position_for`], with indices resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition<'a> {
    pub source: &'a str,
    pub position: LineColumn,
    pub name: Option<&'a str>,
}

/// A decoded source map.
///
/// Mappings are kept sorted by generated position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceMap {
    file: Option<String>,
    source_root: Option<String>,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    mappings: Vec<Mapping>,
}

impl SourceMap {
    pub(crate) fn from_parts(
        file: Option<String>,
        sources: Vec<String>,
        sources_content: Vec<Option<String>>,
        names: Vec<String>,
        mut mappings: Vec<Mapping>,
    ) -> Self {
        mappings.sort_by_key(|m| m.generated);
        SourceMap {
            file,
            source_root: None,
            sources,
            sources_content,
            names,
            mappings,
        }
    }

    /// Parse a JSON source map.
    ///
    /// # Example
    ///
    /// ```
    /// use cssmerge_source_map::SourceMap;
    ///
    /// let map = SourceMap::from_json(
    ///     r#"{"version":3,"sources":["a.less"],"names":[],"mappings":"AAAA"}"#,
    /// ).unwrap();
    /// assert_eq!(map.sources(), ["a.less"]);
    /// assert_eq!(map.mappings().len(), 1);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, SourceMapError> {
        let raw: RawSourceMap = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Decode an already-deserialized map.
    pub fn from_raw(raw: RawSourceMap) -> Result<Self, SourceMapError> {
        if raw.version != 3 {
            return Err(SourceMapError::UnsupportedVersion(raw.version));
        }

        let mut mappings = decode_mappings(&raw.mappings, raw.sources.len(), raw.names.len())?;
        mappings.sort_by_key(|m| m.generated);

        let mut sources_content = raw.sources_content.unwrap_or_default();
        sources_content.resize(raw.sources.len(), None);

        Ok(SourceMap {
            file: raw.file,
            source_root: raw.source_root.filter(|root| !root.is_empty()),
            sources: raw.sources,
            sources_content,
            names: raw.names,
            mappings,
        })
    }

    /// Encode back to the serialized shape.
    pub fn to_raw(&self) -> RawSourceMap {
        let sources_content = if self.sources_content.iter().any(Option::is_some) {
            Some(self.sources_content.clone())
        } else {
            None
        };

        RawSourceMap {
            version: 3,
            file: self.file.clone(),
            source_root: self.source_root.clone(),
            sources: self.sources.clone(),
            sources_content,
            names: self.names.clone(),
            mappings: encode_mappings(&self.mappings),
        }
    }

    /// Serialize as a JSON string.
    pub fn to_json(&self) -> String {
        // RawSourceMap only holds strings and numbers
        serde_json::to_string(&self.to_raw()).unwrap_or_default()
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// A source name with the map's `sourceRoot` applied.
    pub fn resolved_source(&self, index: u32) -> Option<String> {
        let source = self.sources.get(index as usize)?;
        Some(match &self.source_root {
            Some(root) if !source.starts_with('/') && !source.contains("://") => {
                format!("{}/{}", root.trim_end_matches('/'), source)
            }
            _ => source.clone(),
        })
    }

    /// Embedded content of a source, looked up by its listed name.
    pub fn source_content(&self, source: &str) -> Option<&str> {
        let index = self.sources.iter().position(|s| s == source)?;
        self.sources_content.get(index)?.as_deref()
    }

    /// Embedded content keyed by resolved source name.
    pub(crate) fn contents_by_source(&self) -> HashMap<String, String> {
        (0..self.sources.len() as u32)
            .filter_map(|i| {
                let content = self.sources_content.get(i as usize)?.clone()?;
                Some((self.resolved_source(i)?, content))
            })
            .collect()
    }

    /// Find where a generated position came from.
    ///
    /// Picks the closest mapping at or before `generated` on the same
    /// generated line. Returns None when that line has no such mapping or
    /// the mapping carries no original position.
    pub fn original_position_for(&self, generated: LineColumn) -> Option<OriginalPosition<'_>> {
        let original = self.mapping_for(generated)?.original?;
        Some(OriginalPosition {
            source: self.sources.get(original.source as usize)?,
            position: original.position,
            name: original
                .name
                .and_then(|n| self.names.get(n as usize))
                .map(String::as_str),
        })
    }

    /// The mapping that covers `generated`, if any.
    pub(crate) fn mapping_for(&self, generated: LineColumn) -> Option<&Mapping> {
        let idx = self.mappings.partition_point(|m| m.generated <= generated);
        let mapping = self.mappings[..idx].last()?;
        (mapping.generated.line == generated.line).then_some(mapping)
    }

    pub(crate) fn replace_contents(
        &mut self,
        sources: Vec<String>,
        sources_content: Vec<Option<String>>,
        names: Vec<String>,
        mappings: Vec<Mapping>,
    ) {
        self.sources = sources;
        self.sources_content = sources_content;
        self.names = names;
        self.mappings = mappings;
    }
}

fn decode_mappings(
    encoded: &str,
    source_count: usize,
    name_count: usize,
) -> Result<Vec<Mapping>, SourceMapError> {
    let mut mappings = Vec::new();

    let mut source: i64 = 0;
    let mut original_line: i64 = 0;
    let mut original_column: i64 = 0;
    let mut name: i64 = 0;

    for (line, line_text) in encoded.split(';').enumerate() {
        let mut generated_column: i64 = 0;

        for segment in line_text.split(',').filter(|s| !s.is_empty()) {
            let fields = vlq::decode_segment(segment)?;

            generated_column += fields[0];
            let generated = LineColumn::new(
                to_u32(line as i64, "generated line")?,
                to_u32(generated_column, "generated column")?,
            );

            let original = match fields.len() {
                1 => None,
                4 | 5 => {
                    source += fields[1];
                    original_line += fields[2];
                    original_column += fields[3];

                    if source < 0 || source as usize >= source_count {
                        return Err(SourceMapError::SourceOutOfRange {
                            index: source,
                            count: source_count,
                        });
                    }
                    let position = LineColumn::new(
                        to_u32(original_line, "original line")?,
                        to_u32(original_column, "original column")?,
                    );

                    let name_index = if fields.len() == 5 {
                        name += fields[4];
                        if name < 0 || name as usize >= name_count {
                            return Err(SourceMapError::NameOutOfRange {
                                index: name,
                                count: name_count,
                            });
                        }
                        Some(name as u32)
                    } else {
                        None
                    };

                    Some(OriginalLocation {
                        source: source as u32,
                        position,
                        name: name_index,
                    })
                }
                n => return Err(SourceMapError::InvalidSegment(n)),
            };

            mappings.push(Mapping {
                generated,
                original,
            });
        }
    }

    Ok(mappings)
}

/// A decoded position, which must be non-negative and fit in 32 bits.
fn to_u32(value: i64, what: &'static str) -> Result<u32, SourceMapError> {
    if value < 0 {
        return Err(SourceMapError::Negative(what));
    }
    u32::try_from(value).map_err(|_| SourceMapError::TooLarge(what))
}

fn encode_mappings(mappings: &[Mapping]) -> String {
    let mut out = String::new();

    let mut line: u32 = 0;
    let mut previous_generated_column: i64 = 0;
    let mut previous_source: i64 = 0;
    let mut previous_original_line: i64 = 0;
    let mut previous_original_column: i64 = 0;
    let mut previous_name: i64 = 0;
    let mut first_in_line = true;

    for mapping in mappings {
        while line < mapping.generated.line {
            out.push(';');
            line += 1;
            previous_generated_column = 0;
            first_in_line = true;
        }
        if !first_in_line {
            out.push(',');
        }
        first_in_line = false;

        let column = mapping.generated.column as i64;
        vlq::encode(column - previous_generated_column, &mut out);
        previous_generated_column = column;

        if let Some(original) = mapping.original {
            let source = original.source as i64;
            let original_line = original.position.line as i64;
            let original_column = original.position.column as i64;

            vlq::encode(source - previous_source, &mut out);
            vlq::encode(original_line - previous_original_line, &mut out);
            vlq::encode(original_column - previous_original_column, &mut out);
            previous_source = source;
            previous_original_line = original_line;
            previous_original_column = original_column;

            if let Some(name) = original.name {
                let name = name as i64;
                vlq::encode(name - previous_name, &mut out);
                previous_name = name;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const LESS_MAP: &str = r#"{
        "version": 3,
        "file": "style.css",
        "sources": ["style.less"],
        "sourcesContent": ["@c: red;\n.a { color: @c; }\n"],
        "names": [],
        "mappings": "AACA;EAAI,UAAA"
    }"#;

    #[test]
    fn test_decode_mappings() {
        let map = SourceMap::from_json(LESS_MAP).unwrap();
        let mappings = map.mappings();

        assert_eq!(mappings.len(), 3);
        assert_eq!(mappings[0].generated, LineColumn::new(0, 0));
        assert_eq!(
            mappings[0].original.unwrap().position,
            LineColumn::new(1, 0)
        );
        assert_eq!(mappings[1].generated, LineColumn::new(1, 2));
        assert_eq!(
            mappings[1].original.unwrap().position,
            LineColumn::new(1, 4)
        );
        assert_eq!(mappings[2].generated, LineColumn::new(1, 12));
        assert_eq!(
            mappings[2].original.unwrap().position,
            LineColumn::new(1, 4)
        );
    }

    #[test]
    fn test_json_keeps_fields() {
        let map = SourceMap::from_json(LESS_MAP).unwrap();
        let reparsed = SourceMap::from_json(&map.to_json()).unwrap();

        assert_eq!(reparsed, map);
        assert_eq!(reparsed.file(), Some("style.css"));
        assert_eq!(
            reparsed.source_content("style.less"),
            Some("@c: red;\n.a { color: @c; }\n")
        );
    }

    #[test]
    fn test_original_position_uses_greatest_lower_bound() {
        let map = SourceMap::from_json(LESS_MAP).unwrap();

        let pos = map.original_position_for(LineColumn::new(1, 7)).unwrap();
        assert_eq!(pos.source, "style.less");
        assert_eq!(pos.position, LineColumn::new(1, 4));

        // Before the first mapping on the line
        assert!(map.original_position_for(LineColumn::new(1, 0)).is_none());
        // A line without mappings
        assert!(map.original_position_for(LineColumn::new(5, 0)).is_none());
    }

    #[test]
    fn test_unmapped_segment() {
        let map = SourceMap::from_json(
            r#"{"version":3,"sources":["a.css"],"names":[],"mappings":"AAAA,E"}"#,
        )
        .unwrap();
        assert_eq!(map.mappings()[1].original, None);
        assert!(map.original_position_for(LineColumn::new(0, 3)).is_none());
    }

    #[test]
    fn test_rejects_malformed_maps() {
        assert!(matches!(
            SourceMap::from_json("not json"),
            Err(SourceMapError::Json(_))
        ));
        assert!(matches!(
            SourceMap::from_json(r#"{"version":2,"sources":[],"mappings":""}"#),
            Err(SourceMapError::UnsupportedVersion(2))
        ));
        assert!(matches!(
            SourceMap::from_json(r#"{"version":3,"sources":[],"mappings":"AAAA"}"#),
            Err(SourceMapError::SourceOutOfRange { index: 0, count: 0 })
        ));
        assert!(matches!(
            SourceMap::from_json(r#"{"version":3,"sources":["a"],"mappings":"AA"}"#),
            Err(SourceMapError::InvalidSegment(2))
        ));
    }

    #[test]
    fn test_rejects_positions_past_u32() {
        let mut big = String::new();
        vlq::encode(i64::from(i32::MAX), &mut big);

        let columns = format!(r#"{{"version":3,"sources":[],"mappings":"{big},{big},{big}"}}"#);
        assert!(matches!(
            SourceMap::from_json(&columns),
            Err(SourceMapError::TooLarge("generated column"))
        ));

        let lines = format!(
            r#"{{"version":3,"sources":["a"],"mappings":"AA{big}A,AA{big}A,AA{big}A"}}"#
        );
        assert!(matches!(
            SourceMap::from_json(&lines),
            Err(SourceMapError::TooLarge("original line"))
        ));
    }

    #[test]
    fn test_source_root_is_applied() {
        let map = SourceMap::from_json(
            r#"{"version":3,"sourceRoot":"src/","sources":["a.less","/abs.less"],"mappings":""}"#,
        )
        .unwrap();
        assert_eq!(map.resolved_source(0).as_deref(), Some("src/a.less"));
        assert_eq!(map.resolved_source(1).as_deref(), Some("/abs.less"));
    }
}
