use crate::errors::EditorResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "storefront.config.json";

/// Editor tuning knobs
///
/// Intervals and pixel bands are tuning constants, not contracts. They live
/// here so the drag resolver and history never hard-code them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Delay before a drag-hover change becomes visible
    #[serde(default = "default_hover_debounce_ms")]
    pub hover_debounce_ms: u64,

    /// Distance from the container edge that triggers auto-scroll
    #[serde(default = "default_auto_scroll_band_px")]
    pub auto_scroll_band_px: f64,

    /// Scroll offset applied per auto-scroll tick
    #[serde(default = "default_auto_scroll_step_px")]
    pub auto_scroll_step_px: f64,

    #[serde(default = "default_auto_scroll_interval_ms")]
    pub auto_scroll_interval_ms: u64,

    /// Maximum undo levels (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_hover_debounce_ms() -> u64 {
    10
}

fn default_auto_scroll_band_px() -> f64 {
    50.0
}

fn default_auto_scroll_step_px() -> f64 {
    10.0
}

fn default_auto_scroll_interval_ms() -> u64 {
    16
}

fn default_history_limit() -> usize {
    100
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults
    pub fn load(dir: impl AsRef<Path>) -> EditorResult<Self> {
        let config_path = Self::path_in(dir);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: EditorConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(EditorConfig::default())
        }
    }

    pub fn path_in(dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(DEFAULT_CONFIG_NAME)
    }

    pub fn hover_debounce(&self) -> Duration {
        Duration::from_millis(self.hover_debounce_ms)
    }

    pub fn auto_scroll_interval(&self) -> Duration {
        Duration::from_millis(self.auto_scroll_interval_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            hover_debounce_ms: default_hover_debounce_ms(),
            auto_scroll_band_px: default_auto_scroll_band_px(),
            auto_scroll_step_px: default_auto_scroll_step_px(),
            auto_scroll_interval_ms: default_auto_scroll_interval_ms(),
            history_limit: default_history_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "hoverDebounceMs": 25,
            "autoScrollBandPx": 80,
            "historyLimit": 0
        }"#;

        let config: EditorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.hover_debounce(), Duration::from_millis(25));
        assert_eq!(config.auto_scroll_band_px, 80.0);
        assert_eq!(config.history_limit, 0);
        assert_eq!(config.auto_scroll_step_px, 10.0);
    }

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.hover_debounce_ms, 10);
        assert_eq!(config.auto_scroll_interval(), Duration::from_millis(16));
        assert_eq!(config.history_limit, 100);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::load(dir.path()).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(EditorConfig::path_in(dir.path()), r#"{ "autoScrollStepPx": 4 }"#).unwrap();

        let config = EditorConfig::load(dir.path()).unwrap();
        assert_eq!(config.auto_scroll_step_px, 4.0);
        assert_eq!(config.hover_debounce_ms, 10);
    }
}
