//! Rendering layer: all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of what to
//! show. No game logic is performed; this module only translates canvases,
//! HUD snapshots and notices into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::canvas::Canvas;
use crate::games::{GameKind, Hud, HudItem, Phase};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_TITLE: Color = Color::Cyan;
const C_HUD: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;
const C_NOTICE: Color = Color::Red;
const C_SELECTED: Color = Color::White;

/// Shown under a result notice. Any key press closes it.
pub const NOTICE_HINT: &str = "キーを押して閉じる";

/// Everything needed to draw one game frame.
pub struct GameView<'a> {
    pub kind: GameKind,
    pub canvas: &'a Canvas,
    pub hud: &'a Hud,
    pub phase: Phase,
    /// Result message awaiting acknowledgement.
    pub notice: Option<&'a str>,
    pub manual_stop: bool,
    pub show_hints: bool,
}

// ── Text helpers ──────────────────────────────────────────────────────────────

/// Terminal columns taken by `text`. Kana, CJK ideographs and full-width
/// forms take two columns.
pub fn display_width(text: &str) -> u16 {
    text.chars()
        .map(|ch| match ch as u32 {
            0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF => 2,
            0xFE30..=0xFE4F | 0xFF00..=0xFF60 | 0xFFE0..=0xFFE6 => 2,
            _ => 1,
        })
        .sum()
}

fn hud_item_text(item: &HudItem) -> String {
    match item {
        HudItem::Score(s) => format!("スコア: {}", s),
        HudItem::Versus { left, right } => format!("スコア: {}-{}", left, right),
        HudItem::Lives(n) => format!("ライフ: {}", "♥".repeat(*n as usize)),
        HudItem::Level(n) => format!("レベル: {}", n),
        HudItem::Wave(n) => format!("ウェーブ: {}", n),
        HudItem::Coins { collected, total } => format!("コイン: {}/{}", collected, total),
        HudItem::Matches(n) => format!("マッチ: {}", n),
    }
}

/// The live readout line, e.g. `スコア: 30  ライフ: ♥♥`.
pub fn hud_text(hud: &Hud) -> String {
    hud.items
        .iter()
        .map(hud_item_text)
        .collect::<Vec<_>>()
        .join("  ")
}

/// Control line under the canvas; depends on phase and on whether the game
/// may be stopped by hand.
pub fn controls_hint(kind: GameKind, phase: Phase, manual_stop: bool) -> String {
    let toggle = match phase {
        Phase::Running if manual_stop => "Enter: 停止",
        Phase::Running => "",
        _ => "Enter: 開始",
    };
    let mut parts = vec![kind.controls()];
    if !toggle.is_empty() {
        parts.push(toggle);
    }
    parts.push("Esc: メニュー");
    parts.push("Q: 終了");
    parts.join("   ")
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete game frame, centred in the terminal.
pub fn render_game<W: Write>(out: &mut W, view: &GameView<'_>) -> std::io::Result<()> {
    let (term_w, term_h) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let surface = view.canvas.surface();
    let inner_w = surface.screen_cols();
    let inner_h = surface.rows();
    let left = (term_w.saturating_sub(inner_w + 2)) / 2;
    let top = (term_h.saturating_sub(inner_h + 4)) / 2;

    draw_header(out, view, left, top, inner_w + 2)?;
    draw_border(out, left, top + 1, inner_w, inner_h)?;
    draw_canvas(out, view.canvas, left + 1, top + 2)?;

    if view.show_hints {
        out.queue(cursor::MoveTo(left, top + inner_h + 3))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(controls_hint(view.kind, view.phase, view.manual_stop)))?;
    }

    if let Some(message) = view.notice {
        draw_notice(out, message, term_w, term_h)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, term_h.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// The game selection menu.
pub fn render_menu<W: Write>(out: &mut W, selected: usize, show_hints: bool) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let cx = width / 2;
    let cy = height / 2;

    let title = "★  ミニゲーム  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(display_width(title) / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(C_TITLE))?;
    out.queue(Print(title))?;

    for (i, kind) in GameKind::ALL.iter().enumerate() {
        let row = cy.saturating_sub(3) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(12), row))?;
        if i == selected {
            out.queue(style::SetForegroundColor(C_SELECTED))?;
            out.queue(Print(format!("▶ [{}] {}", i + 1, kind.title())))?;
        } else {
            out.queue(style::SetForegroundColor(C_HINT))?;
            out.queue(Print(format!("  [{}] {}", i + 1, kind.title())))?;
        }
    }

    if show_hints {
        let hint = "↑ ↓ / 1-6 : 選択   Enter : 決定   Q : 終了";
        out.queue(cursor::MoveTo(cx.saturating_sub(display_width(hint) / 2), cy + 5))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(hint))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Header (title + HUD) ──────────────────────────────────────────────────────

fn draw_header<W: Write>(
    out: &mut W,
    view: &GameView<'_>,
    left: u16,
    row: u16,
    width: u16,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(left, row))?;
    out.queue(style::SetForegroundColor(C_TITLE))?;
    out.queue(Print(view.kind.title()))?;

    let hud = hud_text(view.hud);
    let hx = (left + width).saturating_sub(display_width(&hud));
    out.queue(cursor::MoveTo(hx, row))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(&hud))?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(
    out: &mut W,
    left: u16,
    top: u16,
    inner_w: u16,
    inner_h: u16,
) -> std::io::Result<()> {
    let bar = "─".repeat(inner_w as usize);
    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(left, top))?;
    out.queue(Print(format!("┌{}┐", bar)))?;

    out.queue(cursor::MoveTo(left, top + inner_h + 1))?;
    out.queue(Print(format!("└{}┘", bar)))?;

    for row in top + 1..=top + inner_h {
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(left + inner_w + 1, row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── Canvas ────────────────────────────────────────────────────────────────────

fn draw_canvas<W: Write>(out: &mut W, canvas: &Canvas, left: u16, top: u16) -> std::io::Result<()> {
    let surface = canvas.surface();
    let width = surface.chars_per_cell as usize;
    for row in 0..surface.rows() {
        out.queue(cursor::MoveTo(left, top + row))?;
        let mut current: Option<Color> = None;
        for cell in canvas.row(row) {
            match cell {
                Some(paint) => {
                    if current != Some(paint.color) {
                        out.queue(style::SetForegroundColor(paint.color))?;
                        current = Some(paint.color);
                    }
                    out.queue(Print(paint.glyph.to_string().repeat(width)))?;
                }
                None => {
                    out.queue(Print(" ".repeat(width)))?;
                }
            }
        }
    }
    Ok(())
}

// ── Terminal notice ───────────────────────────────────────────────────────────

fn draw_notice<W: Write>(out: &mut W, message: &str, width: u16, height: u16) -> std::io::Result<()> {
    let hint = NOTICE_HINT;
    let inner = display_width(message).max(display_width(hint)) + 4;
    let bar = "═".repeat(inner as usize);
    let cx = width / 2;
    let col = cx.saturating_sub((inner + 2) / 2);
    let row = (height / 2).saturating_sub(2);

    let pad = |text: &str| {
        let w = display_width(text);
        let left = (inner - w) / 2;
        let right = inner - w - left;
        format!("║{}{}{}║", " ".repeat(left as usize), text, " ".repeat(right as usize))
    };

    let lines = [
        (format!("╔{}╗", bar), C_NOTICE),
        (pad(message), Color::Yellow),
        (pad(hint), Color::White),
        (format!("╚{}╝", bar), C_NOTICE),
    ];
    for (i, (line, color)) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(col, row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(line))?;
    }
    Ok(())
}
