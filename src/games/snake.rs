//! Snake on a 10 px grid.
//!
//! Arrow keys set a pending direction that takes effect on the next tick.
//! The run ends when the head leaves the canvas or lands on the body.

use std::collections::VecDeque;

use crossterm::style::Color;
use rand::RngCore;

use super::{acknowledged, game_over_message, Game, GameKind, Hud, HudItem, Phase, TickOutcome};
use crate::canvas::{Canvas, Paint};
use crate::geometry::{random_grid_position, Point};
use crate::input::Key;

pub const WIDTH: i32 = 300;
pub const HEIGHT: i32 = 200;
pub const GRID: i32 = 10;
pub const FOOD_SCORE: u32 = 10;

pub const SPAWN: Point = Point::new(150, 100);
pub const FIRST_FOOD: Point = Point::new(100, 100);

const C_SNAKE: Color = Color::Green;
const C_FOOD: Color = Color::Red;

#[derive(Clone, Debug)]
pub struct Snake {
    phase: Phase,
    /// Front is the head.
    body: VecDeque<Point>,
    direction: Point,
    /// Direction chosen since the last tick; applied at the start of the next.
    pending: Option<Point>,
    food: Point,
    score: u32,
}

impl Default for Snake {
    fn default() -> Self {
        Self::new()
    }
}

impl Snake {
    pub fn new() -> Self {
        Snake {
            phase: Phase::Idle,
            body: VecDeque::from([SPAWN]),
            direction: Point::ZERO,
            pending: None,
            food: FIRST_FOOD,
            score: 0,
        }
    }

    pub fn body(&self) -> &VecDeque<Point> {
        &self.body
    }

    pub fn head(&self) -> Point {
        self.body.front().copied().unwrap_or(SPAWN)
    }

    pub fn food(&self) -> Point {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn direction(&self) -> Point {
        self.direction
    }

    /// Queue a direction change for the next tick.
    pub fn steer(&mut self, direction: Point) {
        if self.phase == Phase::Running {
            self.pending = Some(direction);
        }
    }

    /// Place the food explicitly (tests and scripted demos).
    pub fn set_food(&mut self, food: Point) {
        self.food = food;
    }

    fn in_bounds(p: Point) -> bool {
        (0..WIDTH).contains(&p.x) && (0..HEIGHT).contains(&p.y)
    }

    fn end(&mut self) -> TickOutcome {
        self.phase = Phase::Terminal;
        self.pending = None;
        log::info!("snake run over, score {}", self.score);
        TickOutcome::Terminal(game_over_message(self.score))
    }
}

impl Game for Snake {
    fn kind(&self) -> GameKind {
        GameKind::Snake
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn start(&mut self, _rng: &mut dyn RngCore) {
        *self = Snake::new();
        self.phase = Phase::Running;
        log::info!("snake started");
    }

    /// Snake has no stop control; a run only ends by collision.
    fn stop(&mut self) {}

    fn acknowledge(&mut self) {
        self.phase = acknowledged(self.phase);
    }

    fn key_down(&mut self, key: Key) {
        let dir = match key {
            Key::ArrowUp => Point::new(0, -GRID),
            Key::ArrowDown => Point::new(0, GRID),
            Key::ArrowLeft => Point::new(-GRID, 0),
            Key::ArrowRight => Point::new(GRID, 0),
            _ => return,
        };
        self.steer(dir);
    }

    fn key_up(&mut self, _key: Key) {}

    fn tick(&mut self, rng: &mut dyn RngCore) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Continue;
        }
        if let Some(dir) = self.pending.take() {
            self.direction = dir;
        }
        // Not moving yet: nothing to move and nothing to collide with.
        if self.direction.is_zero() {
            return TickOutcome::Continue;
        }

        let head = self.head().offset(self.direction);
        if !Self::in_bounds(head) || self.body.contains(&head) {
            return self.end();
        }

        self.body.push_front(head);
        if head == self.food {
            self.score += FOOD_SCORE;
            self.food = random_grid_position(rng, WIDTH, HEIGHT, GRID);
            log::debug!("snake ate at {:?}, length {}", head, self.body.len());
        } else {
            self.body.pop_back();
        }
        TickOutcome::Continue
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.clear();
        let g = GRID as f32;
        for seg in &self.body {
            canvas.fill_rect(seg.x as f32, seg.y as f32, g, g, Paint::solid(C_SNAKE));
        }
        canvas.fill_rect(self.food.x as f32, self.food.y as f32, g, g, Paint::new('●', C_FOOD));
    }

    fn hud(&self) -> Hud {
        Hud::new(vec![HudItem::Score(self.score)])
    }

    fn supports_manual_stop(&self) -> bool {
        false
    }
}
