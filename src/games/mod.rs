//! The games and the lifecycle they share.
//!
//! Each game owns its entity state and is driven through [`Game`]: `start`
//! re-initialises everything, the scheduler calls `tick` once per period,
//! `draw` repaints the whole canvas afterwards. Games never share state.

pub mod invaders;
pub mod memory;
pub mod platformer;
pub mod pong;
pub mod snake;
pub mod tetris;

use std::fmt;
use std::str::FromStr;

use rand::RngCore;

use crate::canvas::{Canvas, Surface};
use crate::error::ArcadeError;
use crate::input::{HoldTracker, Key};

pub use invaders::Invaders;
pub use memory::Memory;
pub use platformer::Platformer;
pub use pong::Pong;
pub use snake::Snake;
pub use tetris::Tetris;

/// Message shown when a run ends by collision or lost lives.
pub fn game_over_message(score: u32) -> String {
    format!("ゲームオーバー！ スコア: {}", score)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameKind {
    Snake,
    Pong,
    Memory,
    Tetris,
    Platformer,
    Invaders,
}

impl GameKind {
    /// Menu order.
    pub const ALL: [GameKind; 6] = [
        GameKind::Snake,
        GameKind::Pong,
        GameKind::Memory,
        GameKind::Tetris,
        GameKind::Platformer,
        GameKind::Invaders,
    ];

    pub fn title(self) -> &'static str {
        match self {
            GameKind::Snake => "スネークゲーム",
            GameKind::Pong => "ポンゲーム",
            GameKind::Memory => "記憶ゲーム",
            GameKind::Tetris => "ブロックパズル",
            GameKind::Platformer => "プラットフォーマー",
            GameKind::Invaders => "スペースシューター",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameKind::Snake => "snake",
            GameKind::Pong => "pong",
            GameKind::Memory => "memory",
            GameKind::Tetris => "tetris",
            GameKind::Platformer => "platformer",
            GameKind::Invaders => "invaders",
        }
    }

    pub fn controls(self) -> &'static str {
        match self {
            GameKind::Snake => "矢印キーで操作",
            GameKind::Pong => "W/Sキーで左側、↑/↓で右側",
            GameKind::Memory => "W/A/S/Dで選択、Spaceでめくる",
            GameKind::Tetris => "A/D/S/Wキーで操作",
            GameKind::Platformer => "A/D移動、Wジャンプ",
            GameKind::Invaders => "A/D移動、Spaceで射撃",
        }
    }

    pub fn surface(self) -> Surface {
        match self {
            GameKind::Tetris => Surface::TALL,
            _ => Surface::WIDE,
        }
    }

    /// A fresh game of this kind in the `Idle` phase.
    pub fn create(self) -> Box<dyn Game> {
        match self {
            GameKind::Snake => Box::new(Snake::new()),
            GameKind::Pong => Box::new(Pong::new()),
            GameKind::Memory => Box::new(Memory::new()),
            GameKind::Tetris => Box::new(Tetris::new()),
            GameKind::Platformer => Box::new(Platformer::new()),
            GameKind::Invaders => Box::new(Invaders::new()),
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameKind {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        GameKind::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| ArcadeError::UnknownGame(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Terminal,
}

/// Result of one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// The run ended; the message is shown to the player before the game
    /// returns to `Idle`.
    Terminal(String),
}

/// One counter of the live readout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HudItem {
    Score(u32),
    Versus { left: u32, right: u32 },
    Lives(u32),
    Level(u32),
    Wave(u32),
    Coins { collected: u32, total: u32 },
    Matches(u32),
}

/// Snapshot of a game's counters, published after every tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hud {
    pub items: Vec<HudItem>,
}

impl Hud {
    pub fn new(items: Vec<HudItem>) -> Self {
        Hud { items }
    }
}

pub trait Game {
    fn kind(&self) -> GameKind;

    fn phase(&self) -> Phase;

    /// Re-initialise every entity to its spawn value and enter `Running`.
    fn start(&mut self, rng: &mut dyn RngCore);

    /// Leave `Running` without a result. A no-op in any other phase.
    fn stop(&mut self);

    /// Called once the terminal notice has been shown: `Terminal` → `Idle`.
    fn acknowledge(&mut self);

    fn key_down(&mut self, key: Key);

    fn key_up(&mut self, key: Key);

    /// Advance one step. Does nothing unless `Running`.
    fn tick(&mut self, rng: &mut dyn RngCore) -> TickOutcome;

    /// Repaint the whole scene.
    fn draw(&self, canvas: &mut Canvas);

    fn hud(&self) -> Hud;

    /// Whether the player may stop a running game by hand.
    fn supports_manual_stop(&self) -> bool {
        true
    }

    /// Whether the game polls held keys from a latch each tick. Such games
    /// see a repeated press of a still-held key as nothing new.
    fn latches_held_keys(&self) -> bool {
        false
    }
}

/// Hand a terminal key press to `game`. A press of a key `keys` still holds
/// is auto-repeat: it refreshes the key and reaches only games that act on
/// every press, so latch-driven games do not re-fire while a key is held.
pub fn deliver_press(game: &mut dyn Game, keys: &mut HoldTracker, key: Key, frame: u64) {
    let fresh = keys.press(key, frame);
    if fresh || !game.latches_held_keys() {
        game.key_down(key);
    }
}

/// Shared `stop`/`acknowledge` transitions.
pub(crate) fn stopped(phase: Phase) -> Phase {
    match phase {
        Phase::Running => Phase::Idle,
        other => other,
    }
}

pub(crate) fn acknowledged(phase: Phase) -> Phase {
    match phase {
        Phase::Terminal => Phase::Idle,
        other => other,
    }
}
