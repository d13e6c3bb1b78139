//! A terminal arcade cabinet: Snake, Pong, Memory, Tetris, Platformer and
//! Space Invaders, each a small tick-driven simulation drawn onto a fixed
//! pixel canvas.
//!
//! - `games`: the simulations and the shared `Game` trait
//! - `canvas`: pixel surface rasterised onto terminal cells
//! - `display`: terminal I/O (crossterm)
//! - `scheduler`: cancellable periodic tasks keyed by game
//! - `input`: key latch
//! - `config`: JSON settings

pub mod canvas;
pub mod config;
pub mod display;
pub mod error;
pub mod games;
pub mod geometry;
pub mod input;
pub mod scheduler;

pub use config::Settings;
pub use error::ArcadeError;
pub use games::{Game, GameKind, Hud, Phase, TickOutcome};
