//! Cabinet settings, read from an optional JSON file.
//!
//! Every field has a default so a partial file such as
//! `{"periods": {"tetris_ms": 500}}` is valid.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;
use crate::games::GameKind;

/// Tick period of each game, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickPeriods {
    pub snake_ms: u64,
    pub pong_ms: u64,
    pub memory_ms: u64,
    pub tetris_ms: u64,
    pub platformer_ms: u64,
    pub invaders_ms: u64,
}

impl Default for TickPeriods {
    fn default() -> Self {
        Self {
            snake_ms: 150,
            pong_ms: 16,
            memory_ms: 100,
            tetris_ms: 800,
            platformer_ms: 16,
            invaders_ms: 50,
        }
    }
}

impl TickPeriods {
    pub fn for_game(&self, kind: GameKind) -> Duration {
        let ms = match kind {
            GameKind::Snake => self.snake_ms,
            GameKind::Pong => self.pong_ms,
            GameKind::Memory => self.memory_ms,
            GameKind::Tetris => self.tetris_ms,
            GameKind::Platformer => self.platformer_ms,
            GameKind::Invaders => self.invaders_ms,
        };
        Duration::from_millis(ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub periods: TickPeriods,
    /// Input poll / redraw frame of the front-end loop.
    pub frame_ms: u64,
    /// Frames a key stays held after its last press or repeat event, for
    /// terminals that never report releases.
    pub hold_window_frames: u64,
    /// Fixed RNG seed; a fresh random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Show the control hint line under the canvas.
    pub show_hints: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            periods: TickPeriods::default(),
            frame_ms: 16,
            hold_window_frames: 8,
            seed: None,
            show_hints: true,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file
    /// does not exist. A file that exists but cannot be read or parsed is
    /// an error.
    pub fn load(path: &Path) -> Result<Self, ArcadeError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("settings file {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ArcadeError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let settings = Self::from_json(&text).map_err(|source| ArcadeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}
