use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub link_distance: f32,
    pub root_link_distance: f32,
    pub charge_strength: f32,
    pub charge_distance_min: f32,
    pub barnes_hut_theta: f32,
    pub axis_strength: f32,
    pub velocity_decay: f32,
    pub alpha_min: f32,
    pub reheat_alpha: f32,
    pub drag_alpha_target: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            link_distance: 60.0,
            root_link_distance: 120.0,
            charge_strength: -300.0,
            charge_distance_min: 1.0,
            barnes_hut_theta: 0.9,
            axis_strength: 0.05,
            velocity_decay: 0.4,
            alpha_min: 0.001,
            reheat_alpha: 0.3,
            drag_alpha_target: 0.3,
        }
    }
}

impl LayoutConfig {
    /// Per-tick decay that takes alpha from 1 to `alpha_min` in about 300 ticks.
    pub fn alpha_decay(&self) -> f32 {
        1.0 - self.alpha_min.clamp(1e-6, 0.999).powf(1.0 / 300.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub zoom_in_factor: f32,
    pub zoom_out_factor: f32,
    pub double_click_factor: f32,
    pub transition_ms: u64,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub wheel_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom_in_factor: 1.2,
            zoom_out_factor: 0.8,
            double_click_factor: 2.0,
            transition_ms: 250,
            min_zoom: 0.1,
            max_zoom: 8.0,
            wheel_sensitivity: 0.002,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub tooltip_offset: f32,
    pub highlight_fade_ms: u64,
    pub show_grid: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            tooltip_offset: 15.0,
            highlight_fade_ms: 200,
            show_grid: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub layout: LayoutConfig,
    pub camera: CameraConfig,
    pub style: StyleConfig,
}

fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "learning-map")?;
    Some(proj.config_dir().join("config.toml"))
}

/// Loads the config named on the command line, or the per-user config file.
///
/// An explicit path must exist and parse. The per-user file is optional and
/// falls back to defaults when missing or invalid.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<MapConfig> {
    if let Some(path) = explicit {
        return load_from_path(path);
    }

    let Some(path) = config_file_path() else {
        return Ok(MapConfig::default());
    };
    if !path.exists() {
        return Ok(MapConfig::default());
    }

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(error) => {
            tracing::warn!(path = %path.display(), "ignoring user config: {error:#}");
            Ok(MapConfig::default())
        }
    }
}

fn load_from_path(path: &Path) -> anyhow::Result<MapConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("failed to parse config {}", path.display()))
}

#[cfg(test)]
fn save_to_path(cfg: &MapConfig, path: &Path) -> anyhow::Result<()> {
    let data = toml::to_string_pretty(cfg).context("failed to serialize map config")?;
    fs::write(path, data).with_context(|| format!("failed to write config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn config_roundtrip_save_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let mut cfg = MapConfig::default();
        cfg.layout.link_distance = 75.0;
        cfg.camera.transition_ms = 400;

        save_to_path(&cfg, &path).expect("save config");
        let loaded = load(Some(&path)).expect("load config");

        assert_eq!(cfg, loaded);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[camera]\nmax_zoom = 4.0\n").expect("write config");

        let loaded = load(Some(&path)).expect("load config");
        assert_eq!(loaded.camera.max_zoom, 4.0);
        assert_eq!(loaded.camera.zoom_in_factor, 1.2);
        assert_eq!(loaded.layout, LayoutConfig::default());
    }

    #[test]
    fn explicit_missing_or_invalid_config_is_an_error() {
        let dir = tempdir().expect("tempdir");
        assert!(load(Some(&dir.path().join("missing.toml"))).is_err());

        let path = dir.path().join("bad.toml");
        fs::write(&path, "[layout]\nlink_distance = \"far\"\n").expect("write config");
        assert!(load(Some(&path)).is_err());
    }

    #[test]
    fn alpha_decay_matches_three_hundred_ticks() {
        let layout = LayoutConfig::default();
        let decay = layout.alpha_decay();
        assert!((decay - 0.0228).abs() < 0.001);

        let alpha_after = (1.0 - decay).powi(300);
        assert!((alpha_after - layout.alpha_min).abs() < 1e-4);
    }
}
