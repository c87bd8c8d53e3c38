//! User preferences read from a hand-edited `settings.toml` in the platform
//! config directory. A missing file is not an error: defaults are used instead.

use crate::config::config::{
    CONFIG_DIR_NAME, CONFIG_FILE, DEFAULT_CACHE_CAPACITY, DEFAULT_SWIPE_THRESHOLD,
};
use crate::error::{GalleryError, Result};
use crate::i18n::Language;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub language: Language,
    pub swipe_threshold: f32,
    pub cache_capacity: usize,
    /// Manifest loaded when no gallery is given on the command line.
    pub manifest: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            manifest: None,
        }
    }
}

fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(CONFIG_DIR_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Settings> {
    match default_settings_path() {
        Some(path) if path.exists() => load_from_path(&path),
        _ => Ok(Settings::default()),
    }
}

pub fn load_from_path(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| GalleryError::io(path, e))?;
    let settings: Settings =
        toml::from_str(&content).map_err(|e| GalleryError::Config(e.to_string()))?;
    check_swipe_threshold(settings.swipe_threshold).map_err(GalleryError::Config)?;
    Ok(settings)
}

pub fn check_swipe_threshold(threshold: f32) -> std::result::Result<f32, String> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(threshold)
    } else {
        Err(format!("swipe threshold must be a non-negative number, got {threshold}"))
    }
}
