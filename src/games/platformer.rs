//! Side-view platformer: run with A/D, jump with W, collect every coin.
//!
//! Falling off the bottom puts the player back at the spawn point; there is
//! no losing state, and collecting every coin only adds a celebration banner.

use crossterm::style::Color;
use rand::RngCore;

use super::{acknowledged, stopped, Game, GameKind, Hud, HudItem, Phase, TickOutcome};
use crate::canvas::{Canvas, Paint};
use crate::geometry::Rect;
use crate::input::{InputLatch, Key};

pub const WIDTH: f32 = 300.0;
pub const HEIGHT: f32 = 200.0;

pub const PLAYER_W: f32 = 15.0;
pub const PLAYER_H: f32 = 20.0;
pub const SPAWN_X: f32 = 20.0;
pub const SPAWN_Y: f32 = 140.0;

pub const RUN_SPEED: f32 = 3.0;
pub const FRICTION: f32 = 0.8;
pub const GRAVITY: f32 = 0.5;
pub const JUMP_IMPULSE: f32 = -10.0;
/// Coin hit box edge, larger than the drawn coin.
pub const COIN_HITBOX: f32 = 15.0;

const C_PLAYER: Color = Color::Red;
const C_PLATFORM: Color = Color::DarkGreen;
const C_COIN: Color = Color::Yellow;

/// Static level geometry: two ground slabs with a gap and three ledges.
pub const PLATFORMS: [Rect; 5] = [
    Rect::new(0.0, 180.0, 120.0, 20.0),
    Rect::new(160.0, 180.0, 140.0, 20.0),
    Rect::new(60.0, 130.0, 60.0, 10.0),
    Rect::new(150.0, 100.0, 60.0, 10.0),
    Rect::new(230.0, 60.0, 50.0, 10.0),
];

const COIN_SPAWNS: [(f32, f32); 5] = [
    (85.0, 110.0),
    (175.0, 80.0),
    (250.0, 40.0),
    (270.0, 160.0),
    (95.0, 160.0),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
    pub grounded: bool,
}

impl Player {
    pub fn spawn() -> Self {
        Player {
            rect: Rect::new(SPAWN_X, SPAWN_Y, PLAYER_W, PLAYER_H),
            vx: 0.0,
            vy: 0.0,
            grounded: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coin {
    pub x: f32,
    pub y: f32,
    pub collected: bool,
}

impl Coin {
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, COIN_HITBOX, COIN_HITBOX)
    }
}

#[derive(Clone, Debug)]
pub struct Platformer {
    phase: Phase,
    keys: InputLatch,
    pub player: Player,
    pub coins: Vec<Coin>,
    collected: u32,
}

impl Default for Platformer {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_coins() -> Vec<Coin> {
    COIN_SPAWNS
        .iter()
        .map(|&(x, y)| Coin {
            x,
            y,
            collected: false,
        })
        .collect()
}

impl Platformer {
    pub fn new() -> Self {
        Platformer {
            phase: Phase::Idle,
            keys: InputLatch::new(),
            player: Player::spawn(),
            coins: spawn_coins(),
            collected: 0,
        }
    }

    pub fn collected(&self) -> u32 {
        self.collected
    }

    pub fn all_collected(&self) -> bool {
        self.coins.iter().all(|c| c.collected)
    }

    fn apply_input(&mut self) {
        let p = &mut self.player;
        let left = self.keys.is_held(Key::A);
        let right = self.keys.is_held(Key::D);
        if left && !right {
            p.vx = -RUN_SPEED;
        } else if right && !left {
            p.vx = RUN_SPEED;
        } else {
            p.vx *= FRICTION;
        }
        if self.keys.is_held(Key::W) && p.grounded {
            p.vy = JUMP_IMPULSE;
            p.grounded = false;
        }
        p.vy += GRAVITY;
    }

    /// Correct the player against every overlapping platform in turn. The
    /// position before this tick's move tells a landing from a head bump;
    /// anything else is a side hit.
    fn resolve_platforms(&mut self) {
        let p = &mut self.player;
        p.grounded = false;
        for platform in PLATFORMS.iter() {
            if !p.rect.overlaps(platform) {
                continue;
            }
            let prev_bottom = p.rect.bottom() - p.vy;
            let prev_top = p.rect.y - p.vy;
            if p.vy > 0.0 && prev_bottom <= platform.y {
                p.rect.y = platform.y - p.rect.h;
                p.vy = 0.0;
                p.grounded = true;
            } else if p.vy < 0.0 && prev_top >= platform.bottom() {
                p.rect.y = platform.bottom();
                p.vy = 0.0;
            } else {
                if p.vx > 0.0 {
                    p.rect.x = platform.x - p.rect.w;
                } else if p.vx < 0.0 {
                    p.rect.x = platform.right();
                }
                p.vx = 0.0;
            }
        }
    }

    /// One physics step; public so tests can drive it without the phase.
    pub fn step(&mut self) {
        self.apply_input();
        let p = &mut self.player;
        p.rect.x += p.vx;
        p.rect.y += p.vy;
        self.resolve_platforms();

        let p = &mut self.player;
        p.rect.x = p.rect.x.clamp(0.0, WIDTH - p.rect.w);

        if p.rect.y > HEIGHT {
            log::debug!("platformer fall, respawning");
            *p = Player::spawn();
        }

        let body = self.player.rect;
        for coin in self.coins.iter_mut().filter(|c| !c.collected) {
            if body.overlaps(&coin.hitbox()) {
                coin.collected = true;
                self.collected += 1;
                log::debug!("coin {} of {}", self.collected, COIN_SPAWNS.len());
            }
        }
    }
}

impl Game for Platformer {
    fn kind(&self) -> GameKind {
        GameKind::Platformer
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn start(&mut self, _rng: &mut dyn RngCore) {
        let keys = std::mem::take(&mut self.keys);
        *self = Platformer::new();
        self.keys = keys;
        self.phase = Phase::Running;
        log::info!("platformer started");
    }

    fn stop(&mut self) {
        self.phase = stopped(self.phase);
        log::info!("platformer stopped with {} coins", self.collected);
    }

    fn acknowledge(&mut self) {
        self.phase = acknowledged(self.phase);
    }

    fn key_down(&mut self, key: Key) {
        self.keys.press(key);
    }

    fn key_up(&mut self, key: Key) {
        self.keys.release(key);
    }

    fn tick(&mut self, _rng: &mut dyn RngCore) -> TickOutcome {
        if self.phase == Phase::Running {
            self.step();
        }
        TickOutcome::Continue
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.clear();
        for r in PLATFORMS.iter() {
            canvas.fill_rect(r.x, r.y, r.w, r.h, Paint::new('▀', C_PLATFORM));
        }
        for coin in self.coins.iter().filter(|c| !c.collected) {
            canvas.fill_rect(coin.x + 2.5, coin.y + 2.5, 10.0, 10.0, Paint::new('◎', C_COIN));
        }
        let r = self.player.rect;
        canvas.fill_rect(r.x, r.y, r.w, r.h, Paint::solid(C_PLAYER));
        if self.all_collected() {
            canvas.label_centered(HEIGHT / 2.0 - 40.0, "全コイン獲得！", C_COIN);
        }
    }

    fn hud(&self) -> Hud {
        Hud::new(vec![HudItem::Coins {
            collected: self.collected,
            total: self.coins.len() as u32,
        }])
    }

    fn latches_held_keys(&self) -> bool {
        true
    }
}
