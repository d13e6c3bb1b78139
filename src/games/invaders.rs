//! Space shooter: a marching formation, a ship with three lives, endless
//! waves.
//!
//! Per tick: ship moves, fire is consumed, bullets fly, the formation marches
//! (flipping and dropping as one when any member touches a side), bullets hit
//! enemies, then enemies that reach the ship or the bottom cost a life.

use crossterm::style::Color;
use rand::RngCore;

use super::{
    acknowledged, game_over_message, stopped, Game, GameKind, Hud, HudItem, Phase, TickOutcome,
};
use crate::canvas::{Canvas, Paint};
use crate::geometry::Rect;
use crate::input::{InputLatch, Key};

pub const WIDTH: f32 = 300.0;
pub const HEIGHT: f32 = 200.0;

pub const SHIP_W: f32 = 20.0;
pub const SHIP_H: f32 = 10.0;
pub const SHIP_STEP: f32 = 5.0;
pub const START_LIVES: u32 = 3;

pub const MAX_BULLETS: usize = 3;
pub const BULLET_W: f32 = 2.0;
pub const BULLET_H: f32 = 6.0;
pub const BULLET_SPEED: f32 = -6.0;

pub const ENEMY_ROWS: usize = 3;
pub const ENEMY_COLS: usize = 8;
pub const ENEMY_W: f32 = 20.0;
pub const ENEMY_H: f32 = 12.0;
/// Formation drop when it bounces off a side.
pub const ENEMY_DROP: f32 = 10.0;
pub const BASE_ENEMY_STEP: f32 = 2.0;
pub const MAX_ENEMY_STEP: f32 = 6.0;

pub const KILL_SCORE: u32 = 10;
pub const WAVE_BONUS: u32 = 100;

const C_SHIP: Color = Color::White;
const C_BULLET: Color = Color::Cyan;
const C_ENEMY: Color = Color::Green;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ship {
    pub rect: Rect,
}

impl Ship {
    pub fn spawn() -> Self {
        Ship {
            rect: Rect::new(140.0, 180.0, SHIP_W, SHIP_H),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
    pub dx: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bullet {
    pub rect: Rect,
    pub dy: f32,
}

/// Horizontal step for a given wave (1-based).
pub fn enemy_step(wave: u32) -> f32 {
    (BASE_ENEMY_STEP + wave.saturating_sub(1) as f32).min(MAX_ENEMY_STEP)
}

/// A full formation in its spawn grid, marching right.
pub fn spawn_formation(wave: u32) -> Vec<Enemy> {
    let step = enemy_step(wave);
    let mut enemies = Vec::with_capacity(ENEMY_ROWS * ENEMY_COLS);
    for row in 0..ENEMY_ROWS {
        for col in 0..ENEMY_COLS {
            enemies.push(Enemy {
                rect: Rect::new(
                    30.0 + 30.0 * col as f32,
                    20.0 + 20.0 * row as f32,
                    ENEMY_W,
                    ENEMY_H,
                ),
                dx: step,
            });
        }
    }
    enemies
}

#[derive(Clone, Debug)]
pub struct Invaders {
    phase: Phase,
    keys: InputLatch,
    pub ship: Ship,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    score: u32,
    lives: u32,
    wave: u32,
}

impl Default for Invaders {
    fn default() -> Self {
        Self::new()
    }
}

impl Invaders {
    pub fn new() -> Self {
        Invaders {
            phase: Phase::Idle,
            keys: InputLatch::new(),
            ship: Ship::spawn(),
            enemies: spawn_formation(1),
            bullets: Vec::new(),
            score: 0,
            lives: START_LIVES,
            wave: 1,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Spawn a bullet above the ship unless the cap is reached.
    pub fn fire(&mut self) -> bool {
        if self.bullets.len() >= MAX_BULLETS {
            return false;
        }
        let ship = self.ship.rect;
        self.bullets.push(Bullet {
            rect: Rect::new(
                ship.center_x() - BULLET_W / 2.0,
                ship.y - BULLET_H,
                BULLET_W,
                BULLET_H,
            ),
            dy: BULLET_SPEED,
        });
        true
    }

    fn move_ship(&mut self) {
        let r = &mut self.ship.rect;
        if self.keys.is_held(Key::A) {
            r.x -= SHIP_STEP;
        }
        if self.keys.is_held(Key::D) {
            r.x += SHIP_STEP;
        }
        r.x = r.x.clamp(0.0, WIDTH - r.w);
    }

    fn move_bullets(&mut self) {
        for b in &mut self.bullets {
            b.rect.y += b.dy;
        }
        self.bullets.retain(|b| b.rect.bottom() > 0.0);
    }

    /// March every enemy; if any touches a side the whole formation turns
    /// and drops on this same tick.
    fn march(&mut self) {
        for e in &mut self.enemies {
            e.rect.x += e.dx;
        }
        let at_side = self
            .enemies
            .iter()
            .any(|e| e.rect.x <= 0.0 || e.rect.right() >= WIDTH);
        if at_side {
            for e in &mut self.enemies {
                e.dx = -e.dx;
                e.rect.y += ENEMY_DROP;
            }
        }
    }

    /// First enemy hit by a bullet dies with it.
    fn resolve_hits(&mut self) {
        let mut spent = Vec::new();
        for (bi, bullet) in self.bullets.iter().enumerate() {
            if let Some(ei) = self.enemies.iter().position(|e| e.rect.overlaps(&bullet.rect)) {
                self.enemies.remove(ei);
                spent.push(bi);
                self.score += KILL_SCORE;
            }
        }
        let mut index = 0;
        self.bullets.retain(|_| {
            let keep = !spent.contains(&index);
            index += 1;
            keep
        });
    }

    fn invaded(&self) -> bool {
        self.enemies
            .iter()
            .any(|e| e.rect.overlaps(&self.ship.rect) || e.rect.bottom() >= HEIGHT)
    }

    fn lose_life(&mut self) -> TickOutcome {
        self.lives = self.lives.saturating_sub(1);
        log::debug!("invaders life lost, {} left", self.lives);
        if self.lives == 0 {
            self.phase = Phase::Terminal;
            log::info!("invaders run over, score {} wave {}", self.score, self.wave);
            return TickOutcome::Terminal(game_over_message(self.score));
        }
        self.enemies = spawn_formation(self.wave);
        self.bullets.clear();
        TickOutcome::Continue
    }

    fn next_wave(&mut self) {
        self.score += WAVE_BONUS;
        self.wave += 1;
        self.enemies = spawn_formation(self.wave);
        log::info!("invaders wave {} cleared, score {}", self.wave - 1, self.score);
    }
}

impl Game for Invaders {
    fn kind(&self) -> GameKind {
        GameKind::Invaders
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn start(&mut self, _rng: &mut dyn RngCore) {
        let mut keys = std::mem::take(&mut self.keys);
        // A press left over from before the start must not fire.
        keys.release(Key::Space);
        *self = Invaders::new();
        self.keys = keys;
        self.phase = Phase::Running;
        log::info!("invaders started");
    }

    fn stop(&mut self) {
        self.phase = stopped(self.phase);
        log::info!("invaders stopped, score {}", self.score);
    }

    fn acknowledge(&mut self) {
        self.phase = acknowledged(self.phase);
    }

    fn key_down(&mut self, key: Key) {
        self.keys.press(key);
    }

    fn key_up(&mut self, key: Key) {
        // Fire is cleared on consumption, not on release, so a tap shorter
        // than one tick still fires.
        if key != Key::Space {
            self.keys.release(key);
        }
    }

    fn tick(&mut self, _rng: &mut dyn RngCore) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Continue;
        }
        self.move_ship();
        if self.keys.consume(Key::Space) {
            self.fire();
        }
        self.move_bullets();
        self.march();
        self.resolve_hits();

        if self.invaded() {
            return self.lose_life();
        }
        if self.enemies.is_empty() {
            self.next_wave();
        }
        TickOutcome::Continue
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.clear();
        for e in &self.enemies {
            let r = e.rect;
            canvas.fill_rect(r.x, r.y, r.w, r.h, Paint::new('▼', C_ENEMY));
        }
        for b in &self.bullets {
            let r = b.rect;
            canvas.fill_rect(r.x, r.y, r.w, r.h, Paint::new('║', C_BULLET));
        }
        let r = self.ship.rect;
        canvas.fill_rect(r.x, r.y, r.w, r.h, Paint::new('▲', C_SHIP));
    }

    fn hud(&self) -> Hud {
        Hud::new(vec![
            HudItem::Score(self.score),
            HudItem::Lives(self.lives),
            HudItem::Wave(self.wave),
        ])
    }

    fn latches_held_keys(&self) -> bool {
        true
    }
}
