//! Block puzzle on a 10×20 well.
//!
//! Gravity moves the active piece down once per tick; when it cannot move it
//! is locked into the board, full rows are cleared and a new piece spawns.
//! Player input (A/D/S/W) is applied immediately on key-down rather than
//! waiting for the next tick.
//!
//! The run ends when a freshly spawned piece does not fit, or when a piece
//! locks with any cell still above the top row.

use crossterm::style::Color;
use rand::{Rng, RngCore};

use super::{
    acknowledged, game_over_message, stopped, Game, GameKind, Hud, HudItem, Phase, TickOutcome,
};
use crate::canvas::{Canvas, Paint};
use crate::input::Key;

pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;
/// Pixel size of one cell on the 150×300 canvas.
pub const CELL: f32 = 15.0;
pub const LINE_SCORE: u32 = 100;
pub const LINES_PER_LEVEL: u32 = 10;

pub type Row = [Option<Tetromino>; BOARD_WIDTH];
pub type Shape = Vec<Vec<bool>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tetromino {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl Tetromino {
    pub const ALL: [Tetromino; 7] = [
        Tetromino::I,
        Tetromino::O,
        Tetromino::T,
        Tetromino::S,
        Tetromino::Z,
        Tetromino::J,
        Tetromino::L,
    ];

    pub fn shape(self) -> Shape {
        let rows: &[&[u8]] = match self {
            Tetromino::I => &[&[1, 1, 1, 1]],
            Tetromino::O => &[&[1, 1], &[1, 1]],
            Tetromino::T => &[&[0, 1, 0], &[1, 1, 1]],
            Tetromino::S => &[&[0, 1, 1], &[1, 1, 0]],
            Tetromino::Z => &[&[1, 1, 0], &[0, 1, 1]],
            Tetromino::J => &[&[1, 0, 0], &[1, 1, 1]],
            Tetromino::L => &[&[0, 0, 1], &[1, 1, 1]],
        };
        rows.iter()
            .map(|row| row.iter().map(|&c| c == 1).collect())
            .collect()
    }

    pub fn color(self) -> Color {
        match self {
            Tetromino::I => Color::Cyan,
            Tetromino::O => Color::Yellow,
            Tetromino::T => Color::Magenta,
            Tetromino::S => Color::Green,
            Tetromino::Z => Color::Red,
            Tetromino::J => Color::Blue,
            Tetromino::L => Color::DarkYellow,
        }
    }

    pub fn random(rng: &mut dyn RngCore) -> Tetromino {
        Tetromino::ALL[rng.gen_range(0..Tetromino::ALL.len())]
    }
}

/// 90° clockwise: transpose, then reverse every row.
pub fn rotate_clockwise(shape: &Shape) -> Shape {
    let rows = shape.len();
    let cols = shape.first().map_or(0, Vec::len);
    (0..cols)
        .map(|c| (0..rows).rev().map(|r| shape[r][c]).collect())
        .collect()
}

/// Board coordinates of every filled cell of `shape` placed at `(x, y)`.
fn cells(shape: &Shape, x: i32, y: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
    shape.iter().enumerate().flat_map(move |(r, row)| {
        row.iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(move |(c, _)| (x + c as i32, y + r as i32))
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    pub kind: Tetromino,
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
}

impl Piece {
    /// A new piece centred at the top of the well.
    pub fn spawn(kind: Tetromino) -> Self {
        let shape = kind.shape();
        let width = shape.first().map_or(0, Vec::len) as i32;
        Piece {
            kind,
            shape,
            x: (BOARD_WIDTH as i32 - width) / 2,
            y: 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Tetris {
    phase: Phase,
    board: Vec<Row>,
    piece: Piece,
    score: u32,
    lines: u32,
}

impl Default for Tetris {
    fn default() -> Self {
        Self::new()
    }
}

impl Tetris {
    pub fn new() -> Self {
        Tetris {
            phase: Phase::Idle,
            board: vec![[None; BOARD_WIDTH]; BOARD_HEIGHT],
            piece: Piece::spawn(Tetromino::T),
            score: 0,
            lines: 0,
        }
    }

    pub fn board(&self) -> &[Row] {
        &self.board
    }

    /// Overwrite one board row (tests and puzzles).
    pub fn set_row(&mut self, y: usize, row: Row) {
        if let Some(slot) = self.board.get_mut(y) {
            *slot = row;
        }
    }

    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    pub fn set_piece(&mut self, piece: Piece) {
        self.piece = piece;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        1 + self.lines / LINES_PER_LEVEL
    }

    /// Whether `shape` fits at `(x, y)`: inside the walls and floor, and not
    /// over a filled cell. Cells above the top row are allowed.
    pub fn is_valid(&self, shape: &Shape, x: i32, y: i32) -> bool {
        cells(shape, x, y).all(|(cx, cy)| {
            if cx < 0 || cx >= BOARD_WIDTH as i32 || cy >= BOARD_HEIGHT as i32 {
                return false;
            }
            cy < 0 || self.board[cy as usize][cx as usize].is_none()
        })
    }

    fn try_shift(&mut self, dx: i32, dy: i32) -> bool {
        let (x, y) = (self.piece.x + dx, self.piece.y + dy);
        if self.is_valid(&self.piece.shape, x, y) {
            self.piece.x = x;
            self.piece.y = y;
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.try_shift(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_shift(1, 0)
    }

    pub fn move_down(&mut self) -> bool {
        self.try_shift(0, 1)
    }

    /// Rotate clockwise in place. No wall kicks: a rotation that does not
    /// fit leaves the piece untouched.
    pub fn rotate(&mut self) -> bool {
        let rotated = rotate_clockwise(&self.piece.shape);
        if self.is_valid(&rotated, self.piece.x, self.piece.y) {
            self.piece.shape = rotated;
            true
        } else {
            false
        }
    }

    /// Write the piece into the board. Returns false if any cell was still
    /// above the top row.
    fn lock_piece(&mut self) -> bool {
        let mut fits = true;
        let kind = self.piece.kind;
        for (x, y) in cells(&self.piece.shape, self.piece.x, self.piece.y) {
            if y < 0 {
                fits = false;
                continue;
            }
            self.board[y as usize][x as usize] = Some(kind);
        }
        fits
    }

    /// Remove full rows, refill from the top, and score them. Returns the
    /// number of rows cleared.
    fn clear_lines(&mut self) -> u32 {
        let before = self.board.len();
        self.board.retain(|row| row.iter().any(Option::is_none));
        let cleared = before - self.board.len();
        for _ in 0..cleared {
            self.board.insert(0, [None; BOARD_WIDTH]);
        }
        let cleared = cleared as u32;
        if cleared > 0 {
            self.score += LINE_SCORE * cleared * self.level();
            self.lines += cleared;
            log::debug!("cleared {} lines, score {}", cleared, self.score);
        }
        cleared
    }

    fn end(&mut self) -> TickOutcome {
        self.phase = Phase::Terminal;
        log::info!("tetris run over, score {} lines {}", self.score, self.lines);
        TickOutcome::Terminal(game_over_message(self.score))
    }
}

impl Game for Tetris {
    fn kind(&self) -> GameKind {
        GameKind::Tetris
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn start(&mut self, rng: &mut dyn RngCore) {
        *self = Tetris::new();
        self.piece = Piece::spawn(Tetromino::random(rng));
        self.phase = Phase::Running;
        log::info!("tetris started");
    }

    fn stop(&mut self) {
        self.phase = stopped(self.phase);
        log::info!("tetris stopped, score {}", self.score);
    }

    fn acknowledge(&mut self) {
        self.phase = acknowledged(self.phase);
    }

    fn key_down(&mut self, key: Key) {
        if self.phase != Phase::Running {
            return;
        }
        match key {
            Key::A => {
                self.move_left();
            }
            Key::D => {
                self.move_right();
            }
            Key::S => {
                self.move_down();
            }
            Key::W => {
                self.rotate();
            }
            _ => {}
        }
    }

    fn key_up(&mut self, _key: Key) {}

    fn tick(&mut self, rng: &mut dyn RngCore) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Continue;
        }
        if self.move_down() {
            return TickOutcome::Continue;
        }

        if !self.lock_piece() {
            return self.end();
        }
        self.clear_lines();

        self.piece = Piece::spawn(Tetromino::random(rng));
        if !self.is_valid(&self.piece.shape, self.piece.x, self.piece.y) {
            return self.end();
        }
        TickOutcome::Continue
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.clear();
        for (y, row) in self.board.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Some(kind) = cell {
                    canvas.fill_rect(
                        x as f32 * CELL,
                        y as f32 * CELL,
                        CELL,
                        CELL,
                        Paint::solid(kind.color()),
                    );
                }
            }
        }
        let color = self.piece.kind.color();
        for (x, y) in cells(&self.piece.shape, self.piece.x, self.piece.y) {
            canvas.fill_rect(x as f32 * CELL, y as f32 * CELL, CELL, CELL, Paint::new('▓', color));
        }
    }

    fn hud(&self) -> Hud {
        Hud::new(vec![
            HudItem::Score(self.score),
            HudItem::Level(self.level()),
        ])
    }
}
