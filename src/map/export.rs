use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::model::MapData;

pub fn export_file_name(title: &str) -> String {
    let sanitized = title
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect::<String>();
    format!("learning_map_{sanitized}.json")
}

/// Writes `data` as pretty JSON into `dir` and returns the written path.
pub fn export_map(data: &MapData, title: &str, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(export_file_name(title));
    let encoded = serde_json::to_string_pretty(data).context("failed to encode map as JSON")?;
    fs::write(&path, encoded)
        .with_context(|| format!("failed to write map export {}", path.display()))?;
    tracing::info!(path = %path.display(), nodes = data.node_count(), links = data.link_count(), "exported map");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::super::model::fixtures::small_tree;
    use super::super::parse::read_map_file;
    use super::*;

    #[test]
    fn file_name_is_sanitized_and_lowercased() {
        assert_eq!(
            export_file_name("Web Development"),
            "learning_map_web_development.json"
        );
        assert_eq!(export_file_name("C++ & Rust!"), "learning_map_c_____rust_.json");
        assert_eq!(export_file_name("Über"), "learning_map__ber.json");
    }

    #[test]
    fn export_round_trips_through_parser() {
        let dir = tempfile::tempdir().expect("tempdir");
        let data = small_tree();

        let path = export_map(&data, "Tree", dir.path()).expect("export map");
        assert!(path.ends_with("learning_map_tree.json"));

        let loaded = read_map_file(&path).expect("read export");
        assert_eq!(loaded, data);
    }
}
