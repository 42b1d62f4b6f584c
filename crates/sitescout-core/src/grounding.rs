//! Source extraction from grounding metadata.

use crate::analysis::Source;
use crate::generation::GroundingMetadata;
use std::collections::HashSet;

/// Title used when a chunk carries none.
pub const DEFAULT_SOURCE_TITLE: &str = "Source";

/// Maps grounding chunks to citations.
///
/// Chunks without a web URI are dropped. The remaining ones keep their
/// relative order and are deduplicated by URI, first occurrence wins. Titles
/// may repeat.
pub fn extract_sources(metadata: &GroundingMetadata) -> Vec<Source> {
    let mut seen = HashSet::new();

    metadata
        .grounding_chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| {
            let uri = web.uri.as_deref().map(str::trim).filter(|uri| !uri.is_empty())?;
            let title = web
                .title
                .as_deref()
                .filter(|title| !title.trim().is_empty())
                .unwrap_or(DEFAULT_SOURCE_TITLE);
            Some(Source {
                title: title.to_string(),
                uri: uri.to_string(),
            })
        })
        .filter(|source| seen.insert(source.uri.clone()))
        .collect()
}

/// Sources of a follow-up answer plus whether the model appears to have searched.
///
/// The deep-dive flag is a heuristic: a search entry point or any surviving
/// citation counts as a lookup.
pub fn extract_follow_up(metadata: &GroundingMetadata) -> (Vec<Source>, bool) {
    let sources = extract_sources(metadata);
    let is_deep_dive = metadata.search_entry_point.is_some() || !sources.is_empty();
    (sources, is_deep_dive)
}
