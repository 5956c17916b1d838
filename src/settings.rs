use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::geometry::MOVE_OVERLAP_THRESHOLD_PERCENT;
use crate::interaction::{DeletePolicy, EditorConfig, Mode, RandomRects};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Directory holding the saved diagram.
    pub storage_dir: String,
    pub default_mode: Mode,
    pub delete_policy: DeletePolicy,
    pub overlap_threshold_percent: f32,
    /// Initial value of the "add random rectangles" field.
    pub random_count: usize,
    pub random_rect_size: f32,
    pub random_area_width: f32,
    pub random_area_height: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            storage_dir: "boxnest-data".to_string(),
            default_mode: Mode::Select,
            delete_policy: DeletePolicy::Orphan,
            overlap_threshold_percent: MOVE_OVERLAP_THRESHOLD_PERCENT,
            random_count: 10,
            random_rect_size: 100.0,
            random_area_width: 700.0,
            random_area_height: 500.0,
        }
    }
}

impl AppSettings {
    pub fn editor_config(&self) -> EditorConfig {
        EditorConfig {
            delete_policy: self.delete_policy,
            overlap_threshold_percent: self.overlap_threshold_percent.clamp(0.0, 100.0),
            random: RandomRects {
                size: self.random_rect_size.max(0.0),
                area_width: self.random_area_width.max(0.0),
                area_height: self.random_area_height.max(0.0),
            },
        }
    }
}

/// `$HOME/.config/boxnest.toml` if present, else `./settings.toml` if present.
pub fn config_path() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config").join("boxnest.toml");
        if path.exists() {
            return Some(path);
        }
    }
    let local = PathBuf::from("settings.toml");
    local.exists().then_some(local)
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

/// Reads settings as TOML or JSON depending on the extension, trying the
/// other format when the first one does not parse.
pub fn load_settings(path: &Path) -> Option<AppSettings> {
    let s = std::fs::read_to_string(path).ok()?;
    let settings = if is_toml(path) {
        toml::from_str::<AppSettings>(&s)
            .ok()
            .or_else(|| serde_json::from_str::<AppSettings>(&s).ok())
    } else {
        serde_json::from_str::<AppSettings>(&s)
            .ok()
            .or_else(|| toml::from_str::<AppSettings>(&s).ok())
    };
    debug!(path:? = path, parsed = settings.is_some(); "Loaded settings");
    settings
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> Result<(), SettingsError> {
    let text = if is_toml(path) {
        toml::to_string_pretty(settings)?
    } else {
        serde_json::to_string_pretty(settings)?
    };
    std::fs::write(path, text)?;
    Ok(())
}
