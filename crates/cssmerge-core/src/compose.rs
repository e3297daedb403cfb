/*
 * compose.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Printing the merged stylesheet with an end-to-end source map.
 */

//! Source map composition.
//!
//! Printing the merged tree yields a map from the merged output back into
//! each input file. Files that were themselves generated (from LESS, say)
//! carry an upstream map; composing it in makes the final map point at the
//! true original. An upstream map that cannot be decoded is dropped, and
//! that file's positions stay as printed.

use std::collections::HashMap;

use cssmerge_css::{Stylesheet, to_css_with_map};
use cssmerge_source_map::{SourceMap, SourceMapBuilder};

use crate::file::SourceFile;
use crate::output::MERGED_PATH;

/// Merged text and its map. The map is absent when the text is empty.
#[derive(Debug)]
pub struct Composed {
    pub code: String,
    pub source_map: Option<SourceMap>,
}

/// Print `merged` and compose its map with the inputs' upstream maps.
///
/// `originals` are the input files, by path in bundle; their raw content
/// is embedded in the map.
pub fn compose<'a>(
    merged: &Stylesheet,
    originals: impl IntoIterator<Item = &'a SourceFile>,
) -> Composed {
    let originals: HashMap<&str, &SourceFile> = originals
        .into_iter()
        .map(|file| (file.path.as_str(), file))
        .collect();

    let mut builder = SourceMapBuilder::new(Some(MERGED_PATH));
    let code = to_css_with_map(merged, &mut builder);
    if code.is_empty() {
        return Composed {
            code,
            source_map: None,
        };
    }

    let contents: Vec<(u32, String)> = builder
        .sources()
        .iter()
        .enumerate()
        .filter_map(|(i, source)| {
            originals
                .get(source.as_str())
                .map(|file| (i as u32, file.content.clone()))
        })
        .collect();
    for (id, content) in contents {
        builder.set_source_content(id, content);
    }

    let mut map = builder.build();

    for source in map.sources().to_vec() {
        let Some(upstream) = originals.get(source.as_str()).and_then(|f| f.source_map.as_deref())
        else {
            continue;
        };
        match SourceMap::from_json(upstream) {
            Ok(upstream) => map.apply_source_map(&upstream, &source),
            Err(err) => {
                tracing::debug!(
                    path = %source,
                    error = %err,
                    "Dropping unreadable upstream source map"
                );
            }
        }
    }

    Composed {
        code,
        source_map: Some(map),
    }
}
