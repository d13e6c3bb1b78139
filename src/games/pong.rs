//! Two-player Pong. W/S drive the left paddle, the up/down arrows the right.
//! There is no end state; the game runs until stopped.

use crossterm::style::Color;
use rand::RngCore;

use super::{acknowledged, stopped, Game, GameKind, Hud, HudItem, Phase, TickOutcome};
use crate::canvas::{Canvas, Paint};
use crate::geometry::Rect;
use crate::input::{InputLatch, Key};

pub const WIDTH: f32 = 300.0;
pub const HEIGHT: f32 = 200.0;
pub const BALL_SIZE: f32 = 8.0;
pub const PADDLE_W: f32 = 10.0;
pub const PADDLE_H: f32 = 40.0;
pub const PADDLE_STEP: f32 = 5.0;

const C_FG: Color = Color::White;
const C_NET: Color = Color::DarkGrey;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Ball {
    /// Serve toward the right (start of game, after a right-side point).
    pub const SERVE_RIGHT: Ball = Ball {
        x: 150.0,
        y: 100.0,
        dx: 3.0,
        dy: 2.0,
    };
    /// Serve toward the left (after a left-side point).
    pub const SERVE_LEFT: Ball = Ball {
        x: 150.0,
        y: 100.0,
        dx: -3.0,
        dy: 2.0,
    };

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, BALL_SIZE, BALL_SIZE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paddle {
    pub rect: Rect,
}

impl Paddle {
    pub fn left() -> Self {
        Paddle {
            rect: Rect::new(10.0, 80.0, PADDLE_W, PADDLE_H),
        }
    }

    pub fn right() -> Self {
        Paddle {
            rect: Rect::new(280.0, 80.0, PADDLE_W, PADDLE_H),
        }
    }

    fn nudge(&mut self, dy: f32) {
        self.rect.y = (self.rect.y + dy).clamp(0.0, HEIGHT - self.rect.h);
    }
}

#[derive(Clone, Debug)]
pub struct Pong {
    phase: Phase,
    keys: InputLatch,
    pub ball: Ball,
    pub left: Paddle,
    pub right: Paddle,
    left_score: u32,
    right_score: u32,
}

impl Default for Pong {
    fn default() -> Self {
        Self::new()
    }
}

impl Pong {
    pub fn new() -> Self {
        Pong {
            phase: Phase::Idle,
            keys: InputLatch::new(),
            ball: Ball::SERVE_RIGHT,
            left: Paddle::left(),
            right: Paddle::right(),
            left_score: 0,
            right_score: 0,
        }
    }

    pub fn left_score(&self) -> u32 {
        self.left_score
    }

    pub fn right_score(&self) -> u32 {
        self.right_score
    }

    fn move_paddles(&mut self) {
        if self.keys.is_held(Key::W) {
            self.left.nudge(-PADDLE_STEP);
        }
        if self.keys.is_held(Key::S) {
            self.left.nudge(PADDLE_STEP);
        }
        if self.keys.is_held(Key::ArrowUp) {
            self.right.nudge(-PADDLE_STEP);
        }
        if self.keys.is_held(Key::ArrowDown) {
            self.right.nudge(PADDLE_STEP);
        }
    }

    fn move_ball(&mut self) {
        let ball = &mut self.ball;
        ball.x += ball.dx;
        ball.y += ball.dy;

        if ball.y <= 0.0 {
            ball.dy = ball.dy.abs();
        } else if ball.y + BALL_SIZE >= HEIGHT {
            ball.dy = -ball.dy.abs();
        }

        // A hit only counts while the ball travels toward the paddle, so a
        // ball still overlapping on the next tick is not flipped back.
        let rect = ball.rect();
        if ball.dx < 0.0 && rect.overlaps(&self.left.rect) {
            ball.dx = -ball.dx;
        }
        if ball.dx > 0.0 && rect.overlaps(&self.right.rect) {
            ball.dx = -ball.dx;
        }
    }

    fn score_points(&mut self) {
        if self.ball.x < 0.0 {
            self.right_score += 1;
            self.ball = Ball::SERVE_RIGHT;
            log::debug!("pong point right, {}-{}", self.left_score, self.right_score);
        } else if self.ball.x > WIDTH {
            self.left_score += 1;
            self.ball = Ball::SERVE_LEFT;
            log::debug!("pong point left, {}-{}", self.left_score, self.right_score);
        }
    }
}

impl Game for Pong {
    fn kind(&self) -> GameKind {
        GameKind::Pong
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn start(&mut self, _rng: &mut dyn RngCore) {
        let keys = std::mem::take(&mut self.keys);
        *self = Pong::new();
        self.keys = keys;
        self.phase = Phase::Running;
        log::info!("pong started");
    }

    fn stop(&mut self) {
        self.phase = stopped(self.phase);
        log::info!("pong stopped at {}-{}", self.left_score, self.right_score);
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
        if self.phase != Phase::Running {
            return TickOutcome::Continue;
        }
        self.move_paddles();
        self.move_ball();
        self.score_points();
        TickOutcome::Continue
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.clear();
        let mut y = 0.0;
        while y < HEIGHT {
            canvas.fill_rect(WIDTH / 2.0, y, 1.0, 5.0, Paint::new('┊', C_NET));
            y += 20.0;
        }
        for paddle in [&self.left, &self.right] {
            let r = paddle.rect;
            canvas.fill_rect(r.x, r.y, r.w, r.h, Paint::solid(C_FG));
        }
        let b = self.ball.rect();
        canvas.fill_rect(b.x, b.y, b.w, b.h, Paint::new('●', C_FG));
    }

    fn hud(&self) -> Hud {
        Hud::new(vec![HudItem::Versus {
            left: self.left_score,
            right: self.right_score,
        }])
    }

    fn latches_held_keys(&self) -> bool {
        true
    }
}
