use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use maskguard_core::capture::infrastructure::ffmpeg_camera::default_device;
use maskguard_core::shared::constants::{APP_DIR_NAME, DEFAULT_MODEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    System,
    Dark,
    Light,
}

impl Appearance {
    pub const ALL: &[Appearance] = &[Appearance::System, Appearance::Dark, Appearance::Light];
}

impl std::fmt::Display for Appearance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Appearance::System => write!(f, "System"),
            Appearance::Dark => write!(f, "Dark"),
            Appearance::Light => write!(f, "Light"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Camera device, video file or image folder. `None` uses the system camera.
    #[serde(default)]
    pub camera: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    pub appearance: Appearance,
    pub high_contrast: bool,
    pub font_scale: f32,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera: None,
            model: default_model(),
            appearance: Appearance::Dark,
            high_contrast: false,
            font_scale: 1.0,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .map(|json| Self::from_json(&json))
            .unwrap_or_default()
    }

    /// Parses stored settings, falling back to defaults when unreadable.
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable settings: {e}");
            Self::default()
        })
    }

    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(&path, json) {
                    log::warn!("Could not save settings to {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("Could not serialize settings: {e}"),
        }
    }

    /// The camera source handed to the camera factory.
    pub fn camera_source(&self) -> String {
        self.camera
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| default_device().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        assert_eq!(Settings::from_json("{not json"), Settings::default());
    }

    #[test]
    fn test_older_file_without_camera_or_model_loads() {
        let settings = Settings::from_json(
            r#"{"appearance":"light","high_contrast":true,"font_scale":1.2}"#,
        );
        assert_eq!(settings.appearance, Appearance::Light);
        assert!(settings.high_contrast);
        assert_eq!(settings.camera, None);
        assert_eq!(settings.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_blank_camera_uses_system_default() {
        let settings = Settings {
            camera: Some("  ".into()),
            ..Settings::default()
        };
        assert!(!settings.camera_source().trim().is_empty());
    }

    #[test]
    fn test_configured_camera_is_used() {
        let settings = Settings {
            camera: Some("/tmp/frames".into()),
            ..Settings::default()
        };
        assert_eq!(settings.camera_source(), "/tmp/frames");
    }
}
