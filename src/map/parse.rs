use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::model::{MapData, TopicLink, TopicNode};

/// Parses a map document.
///
/// The top level must be an object with a `nodes` array. Individual node or
/// link entries that fail to deserialize are skipped so a partially broken
/// document still yields a usable map.
pub fn parse_map_document(raw: &str) -> Result<MapData> {
    let parsed: Value = serde_json::from_str(raw.trim_start_matches('\u{feff}'))
        .context("invalid JSON in map document")?;
    let object = parsed
        .as_object()
        .ok_or_else(|| anyhow!("map document must be a JSON object"))?;

    let raw_nodes = object
        .get("nodes")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("map document has no `nodes` array"))?;

    let mut nodes = Vec::with_capacity(raw_nodes.len());
    for (position, value) in raw_nodes.iter().enumerate() {
        match TopicNode::deserialize(value) {
            Ok(node) => nodes.push(node),
            Err(error) => tracing::warn!(position, %error, "skipping malformed node entry"),
        }
    }

    let mut links = Vec::new();
    if let Some(raw_links) = object.get("links").and_then(Value::as_array) {
        links.reserve(raw_links.len());
        for (position, value) in raw_links.iter().enumerate() {
            match TopicLink::deserialize(value) {
                Ok(link) => links.push(link),
                Err(error) => tracing::warn!(position, %error, "skipping malformed link entry"),
            }
        }
    }

    Ok(MapData { nodes, links })
}

pub fn read_map_file(path: &Path) -> Result<MapData> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read map document {}", path.display()))?;
    parse_map_document(&raw)
        .with_context(|| format!("failed to parse map document {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_document() {
        let raw = r#"{
            "nodes": [
                {"id": "web", "label": "Web", "description": "d", "resources": [], "level": "Beginner", "isRoot": true},
                {"id": "html", "label": "HTML", "description": "d", "resources": [
                    {"title": "MDN", "url": "https://developer.mozilla.org", "type": "website"}
                ], "level": "Beginner", "isRoot": false}
            ],
            "links": [{"source": "web", "target": "html"}]
        }"#;

        let data = parse_map_document(raw).expect("parse document");
        assert_eq!(data.node_count(), 2);
        assert_eq!(data.link_count(), 1);
        assert_eq!(data.nodes[1].resources.len(), 1);
    }

    #[test]
    fn skips_malformed_entries() {
        let raw = r#"{
            "nodes": [{"id": "a", "label": "A"}, {"label": "missing id"}],
            "links": [{"source": "a"}, {"source": "a", "target": "a"}]
        }"#;

        let data = parse_map_document(raw).expect("parse document");
        assert_eq!(data.node_count(), 1);
        assert_eq!(data.link_count(), 1);
    }

    #[test]
    fn missing_links_array_is_empty() {
        let data = parse_map_document(r#"{"nodes": []}"#).expect("parse document");
        assert!(data.nodes.is_empty());
        assert!(data.links.is_empty());
    }

    #[test]
    fn rejects_non_object_and_missing_nodes() {
        assert!(parse_map_document("[]").is_err());
        assert!(parse_map_document(r#"{"links": []}"#).is_err());
        assert!(parse_map_document("not json").is_err());
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("map.json");
        fs::write(&path, r#"{"nodes":[{"id":"a","label":"A"}],"links":[]}"#).expect("write map");

        let data = read_map_file(&path).expect("read map");
        assert_eq!(data.nodes[0].id, "a");
        assert!(read_map_file(&dir.path().join("missing.json")).is_err());
    }
}
