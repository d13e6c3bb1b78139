//! Card-matching memory game on a 4×4 grid.
//!
//! The cursor moves with W/A/S/D and Space turns the card under it. Once two
//! cards are face up they stay visible for `REVEAL_TICKS` ticks, then either
//! match or turn back over. Matching all eight pairs ends the run.

use crossterm::style::Color;
use rand::seq::SliceRandom;
use rand::RngCore;

use super::{acknowledged, stopped, Game, GameKind, Hud, HudItem, Phase, TickOutcome};
use crate::canvas::{Canvas, Paint};
use crate::input::Key;

pub const GRID: usize = 4;
pub const PAIRS: usize = 8;
/// Ticks both face-up cards stay visible (10 × 100 ms).
pub const REVEAL_TICKS: u32 = 10;

pub const CLEAR_MESSAGE: &str = "おめでとうございます！全てクリア！";

const PALETTE: [Color; PAIRS] = [
    Color::Red,
    Color::Cyan,
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::DarkBlue,
    Color::DarkMagenta,
];

const CARD_W: f32 = 50.0;
const CARD_H: f32 = 40.0;
const ORIGIN_X: f32 = 45.0;
const ORIGIN_Y: f32 = 10.0;
const GAP: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Card {
    pub id: usize,
    /// Index into the palette; two cards share each value.
    pub color: usize,
    pub flipped: bool,
    pub matched: bool,
}

#[derive(Clone, Debug)]
pub struct Memory {
    phase: Phase,
    pub cards: Vec<Card>,
    cursor: usize,
    /// Indices of the face-up, unmatched cards (at most two).
    face_up: Vec<usize>,
    reveal: u32,
    matches: u32,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

fn ordered_deck() -> Vec<Card> {
    (0..PAIRS * 2)
        .map(|id| Card {
            id,
            color: id / 2,
            flipped: false,
            matched: false,
        })
        .collect()
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            phase: Phase::Idle,
            cards: ordered_deck(),
            cursor: 0,
            face_up: Vec::with_capacity(2),
            reveal: 0,
            matches: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn matches(&self) -> u32 {
        self.matches
    }

    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let col = (self.cursor % GRID) as i32 + dx;
        let row = (self.cursor / GRID) as i32 + dy;
        let col = col.clamp(0, GRID as i32 - 1) as usize;
        let row = row.clamp(0, GRID as i32 - 1) as usize;
        self.cursor = row * GRID + col;
    }

    /// Turn the card at `index` face up. Refused while two cards are already
    /// showing or when the card is already face up or matched.
    pub fn flip(&mut self, index: usize) -> bool {
        if self.phase != Phase::Running || self.face_up.len() >= 2 {
            return false;
        }
        let Some(card) = self.cards.get_mut(index) else {
            return false;
        };
        if card.flipped || card.matched {
            return false;
        }
        card.flipped = true;
        self.face_up.push(index);
        if self.face_up.len() == 2 {
            self.reveal = REVEAL_TICKS;
        }
        true
    }

    fn settle_pair(&mut self) {
        let (a, b) = (self.face_up[0], self.face_up[1]);
        if self.cards[a].color == self.cards[b].color {
            self.cards[a].matched = true;
            self.cards[b].matched = true;
            self.matches += 1;
            log::debug!("memory match {} of {}", self.matches, PAIRS);
        } else {
            self.cards[a].flipped = false;
            self.cards[b].flipped = false;
        }
        self.face_up.clear();
    }
}

impl Game for Memory {
    fn kind(&self) -> GameKind {
        GameKind::Memory
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn start(&mut self, rng: &mut dyn RngCore) {
        *self = Memory::new();
        self.cards.shuffle(rng);
        self.phase = Phase::Running;
        log::info!("memory started");
    }

    fn stop(&mut self) {
        self.phase = stopped(self.phase);
        log::info!("memory stopped with {} matches", self.matches);
    }

    fn acknowledge(&mut self) {
        self.phase = acknowledged(self.phase);
    }

    fn key_down(&mut self, key: Key) {
        if self.phase != Phase::Running {
            return;
        }
        match key {
            Key::W | Key::ArrowUp => self.move_cursor(0, -1),
            Key::S | Key::ArrowDown => self.move_cursor(0, 1),
            Key::A | Key::ArrowLeft => self.move_cursor(-1, 0),
            Key::D | Key::ArrowRight => self.move_cursor(1, 0),
            Key::Space => {
                self.flip(self.cursor);
            }
        }
    }

    fn key_up(&mut self, _key: Key) {}

    fn tick(&mut self, _rng: &mut dyn RngCore) -> TickOutcome {
        if self.phase != Phase::Running || self.face_up.len() < 2 {
            return TickOutcome::Continue;
        }
        self.reveal = self.reveal.saturating_sub(1);
        if self.reveal > 0 {
            return TickOutcome::Continue;
        }
        self.settle_pair();
        if self.matches as usize == PAIRS {
            self.phase = Phase::Terminal;
            log::info!("memory cleared");
            return TickOutcome::Terminal(CLEAR_MESSAGE.to_string());
        }
        TickOutcome::Continue
    }

    fn draw(&self, canvas: &mut Canvas) {
        canvas.clear();
        for (i, card) in self.cards.iter().enumerate() {
            let x = ORIGIN_X + (i % GRID) as f32 * (CARD_W + GAP);
            let y = ORIGIN_Y + (i / GRID) as f32 * (CARD_H + GAP);
            let paint = if card.matched {
                Paint::new('░', PALETTE[card.color])
            } else if card.flipped {
                Paint::solid(PALETTE[card.color])
            } else {
                Paint::new('?', Color::DarkGrey)
            };
            canvas.fill_rect(x, y, CARD_W, CARD_H, paint);
            if i == self.cursor {
                canvas.fill_rect(x, y + CARD_H - 10.0, CARD_W, 10.0, Paint::new('▔', Color::White));
            }
        }
    }

    fn hud(&self) -> Hud {
        Hud::new(vec![HudItem::Matches(self.matches)])
    }
}
