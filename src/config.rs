use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::AppColorState;
use crate::raster::FontSpec;
use crate::tool::descriptor::BRUSH;
use crate::tool::{ShapeSettings, StampSettings};

/// Errors that can occur while loading or saving the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to access configuration file: {0}")]
    Io(#[from] io::Error),
}

/// Editor settings that survive restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // older files get defaults for newer fields
pub struct EditorConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub brush: StampSettings,
    pub eraser: StampSettings,
    pub shape: ShapeSettings,
    pub font: FontSpec,
    pub colors: AppColorState,
    /// Tool active at startup
    pub initial_tool: String,
    /// Decode undo/redo snapshots on a background thread
    pub threaded_decode: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            brush: StampSettings::default(),
            eraser: StampSettings {
                size: 20.0,
                ..StampSettings::default()
            },
            shape: ShapeSettings::default(),
            font: FontSpec::default(),
            colors: AppColorState::default(),
            initial_tool: BRUSH.id.to_owned(),
            threaded_decode: false,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a JSON config file; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded configuration from {}", path.display());
                Self::from_json(&json)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ShapeKind, StampShape};

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(
            r#"{ "canvas_width": 320, "brush": { "shape": "triangle" }, "shape": { "kind": "circle" } }"#,
        )
        .unwrap();
        assert_eq!(config.canvas_width, 320);
        assert_eq!(config.canvas_height, 600);
        assert_eq!(config.brush.shape, StampShape::Triangle);
        assert_eq!(config.brush.size, 10.0);
        assert_eq!(config.shape.kind, ShapeKind::Circle);
        assert_eq!(config.initial_tool, "brush-tool");
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("eframe_canvas_{}.json", uuid::Uuid::new_v4()));
        let mut config = EditorConfig::default();
        config.canvas_height = 123;
        config.save(&path).unwrap();
        let loaded = EditorConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("eframe_canvas_does_not_exist.json");
        assert_eq!(EditorConfig::load(path).unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(EditorConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }
}
