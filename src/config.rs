//! Game configuration.
//!
//! Values come from the built-in defaults, then an optional `snake.toml`,
//! then command line flags, each layer overriding the previous one.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE: &str = "snake.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("a snake of length {length} does not fit on a row {width} cells wide")]
    SnakeTooLong { length: u16, width: u16 },
    #[error("a {width}x{height} grid has no room for food next to a snake of length {length}")]
    NoRoomForFood { width: u16, height: u16, length: u16 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grid width in cells
    pub width: u16,
    /// Grid height in cells
    pub height: u16,
    /// Length of the snake at the start of every game
    pub initial_length: u16,
    /// Milliseconds between two ticks
    pub tick_ms: u64,
    /// Terminal columns used to draw one cell
    pub cell_width: u16,
    /// Fixed RNG seed for food placement
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 20,
            height: 20,
            initial_length: 5,
            tick_ms: 250,
            cell_width: 2,
            seed: None,
        }
    }
}

impl Config {
    /// Loads `path` if given, otherwise `snake.toml` from the working
    /// directory when it exists, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(CONFIG_FILE).exists() => Self::from_file(Path::new(CONFIG_FILE)),
            None => {
                log::debug!("No {} found, using default config", CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config = Self::from_toml(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Rejects settings the game cannot start with: empty grids or snakes,
    /// a snake longer than the first row, or a snake that leaves no free
    /// cell for food.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("width", self.width as u64),
            ("height", self.height as u64),
            ("initial_length", self.initial_length as u64),
            ("tick_ms", self.tick_ms),
            ("cell_width", self.cell_width as u64),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }

        if self.initial_length > self.width {
            return Err(ConfigError::SnakeTooLong { length: self.initial_length, width: self.width });
        }

        if self.width as u32 * self.height as u32 <= self.initial_length as u32 {
            return Err(ConfigError::NoRoomForFood {
                width: self.width,
                height: self.height,
                length: self.initial_length,
            });
        }

        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
