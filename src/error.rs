//! Infrastructure errors. Losing a game is not an error; see `TickOutcome`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArcadeError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not read settings from {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown game '{0}' (expected snake, pong, memory, tetris, platformer or invaders)")]
    UnknownGame(String),

    #[error("could not open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
