use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::DEFAULT_VOICES_PER_SOUND;
use crate::display::{DisplayOptions, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::{Error, Result};
use crate::geometry::Position;

pub const DEFAULT_CONFIG_PATH: &str = "framekit.json";

/// Settings for the bouncing-sprite demo. Every field has a default, so a
/// config file only needs the keys it wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub zoom: f32,
    pub fullscreen: bool,
    pub vsync: bool,
    pub sprite: PathBuf,
    pub music: Option<PathBuf>,
    pub explosion: Option<PathBuf>,
    /// Pixels moved per frame while a direction is held
    pub speed: i32,
    pub background: (u8, u8, u8),
    pub start: Position,
    pub voices_per_sound: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Example".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            zoom: 1.0,
            fullscreen: false,
            vsync: true,
            sprite: PathBuf::from("A.png"),
            music: Some(PathBuf::from("music.wav")),
            explosion: Some(PathBuf::from("explosion.wav")),
            speed: 1,
            background: (0, 0, 255),
            start: Position::new(300, 300),
            voices_per_sound: DEFAULT_VOICES_PER_SOUND,
        }
    }
}

impl Config {
    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| config_error(path, e))?;
        serde_json::from_str(&json).map_err(|e| config_error(path, e))
    }

    /// Save to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|e| config_error(path, e))?;
        fs::write(path, json).map_err(|e| config_error(path, e))
    }

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            zoom: self.zoom,
            fullscreen: self.fullscreen,
            vsync: self.vsync,
        }
    }
}

fn config_error(path: &Path, reason: impl ToString) -> Error {
    Error::Config {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
