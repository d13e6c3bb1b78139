use mini_arcade::games::tetris::*;
use mini_arcade::games::HudItem;
use mini_arcade::input::Key;
use mini_arcade::{Game, Phase, TickOutcome};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn started() -> Tetris {
    let mut game = Tetris::new();
    game.start(&mut seeded_rng());
    game
}

/// A row filled everywhere except the listed columns.
fn row_with_gaps(gaps: &[usize]) -> Row {
    let mut row: Row = [Some(Tetromino::O); BOARD_WIDTH];
    for &x in gaps {
        row[x] = None;
    }
    row
}

fn shape(rows: &[&[u8]]) -> Shape {
    rows.iter()
        .map(|r| r.iter().map(|&c| c == 1).collect())
        .collect()
}

fn vertical_i(x: i32, y: i32) -> Piece {
    Piece {
        kind: Tetromino::I,
        shape: rotate_clockwise(&Tetromino::I.shape()),
        x,
        y,
    }
}

// ── shapes ────────────────────────────────────────────────────────────────────

#[test]
fn rotate_t_clockwise() {
    let rotated = rotate_clockwise(&Tetromino::T.shape());
    assert_eq!(rotated, shape(&[&[1, 0], &[1, 1], &[1, 0]]));
}

#[test]
fn four_rotations_are_identity() {
    for kind in Tetromino::ALL {
        let mut s = kind.shape();
        for _ in 0..4 {
            s = rotate_clockwise(&s);
        }
        assert_eq!(s, kind.shape(), "{:?}", kind);
    }
}

#[test]
fn spawn_is_centred_at_top() {
    assert_eq!(Piece::spawn(Tetromino::I).x, 3);
    assert_eq!(Piece::spawn(Tetromino::O).x, 4);
    assert_eq!(Piece::spawn(Tetromino::T).x, 3);
    assert_eq!(Piece::spawn(Tetromino::T).y, 0);
}

// ── movement ──────────────────────────────────────────────────────────────────

#[test]
fn walls_stop_horizontal_moves() {
    let mut t = started();
    t.set_piece(Piece::spawn(Tetromino::O));
    for _ in 0..4 {
        assert!(t.move_left());
    }
    assert!(!t.move_left());
    assert_eq!(t.piece().x, 0);
    for _ in 0..8 {
        assert!(t.move_right());
    }
    assert!(!t.move_right());
    assert_eq!(t.piece().x, 8);
}

#[test]
fn rotation_blocked_by_wall_leaves_piece_unchanged() {
    let mut t = started();
    let piece = vertical_i(8, 5);
    t.set_piece(piece.clone());
    assert!(!t.rotate());
    assert_eq!(t.piece(), &piece);
}

#[test]
fn rotation_blocked_by_stack_leaves_piece_unchanged() {
    let mut t = started();
    t.set_row(6, row_with_gaps(&[0]));
    let piece = vertical_i(0, 3);
    t.set_piece(piece.clone());
    assert!(t.rotate());
    t.set_piece(vertical_i(0, 6));
    assert!(!t.rotate());
    assert_eq!(t.piece(), &vertical_i(0, 6));
}

#[test]
fn keys_apply_immediately() {
    let mut t = started();
    t.set_piece(Piece::spawn(Tetromino::T));
    t.key_down(Key::A);
    assert_eq!(t.piece().x, 2);
    t.key_down(Key::D);
    t.key_down(Key::D);
    assert_eq!(t.piece().x, 4);
    t.key_down(Key::S);
    assert_eq!(t.piece().y, 1);
    t.key_down(Key::W);
    assert_eq!(t.piece().shape, shape(&[&[1, 0], &[1, 1], &[1, 0]]));
}

#[test]
fn keys_ignored_when_idle() {
    let mut t = Tetris::new();
    let before = t.piece().clone();
    t.key_down(Key::A);
    t.key_down(Key::S);
    assert_eq!(t.piece(), &before);
}

#[test]
fn gravity_moves_piece_down_one_row() {
    let mut t = started();
    let y = t.piece().y;
    assert_eq!(t.tick(&mut seeded_rng()), TickOutcome::Continue);
    assert_eq!(t.piece().y, y + 1);
}

// ── line clears ───────────────────────────────────────────────────────────────

#[test]
fn single_line_clear_scores_100() {
    let mut t = started();
    t.set_row(19, row_with_gaps(&[3, 4, 5, 6]));
    t.set_piece(Piece {
        kind: Tetromino::I,
        shape: Tetromino::I.shape(),
        x: 3,
        y: 18,
    });
    assert_eq!(t.tick(&mut seeded_rng()), TickOutcome::Continue);
    assert_eq!(t.piece().y, 19);
    assert_eq!(t.tick(&mut seeded_rng()), TickOutcome::Continue);

    assert_eq!(t.score(), LINE_SCORE);
    assert_eq!(t.lines(), 1);
    assert_eq!(t.board().len(), BOARD_HEIGHT);
    assert!(t.board().iter().all(|row| row.iter().all(Option::is_none)));
    assert_eq!(t.piece().y, 0);
}

#[test]
fn double_line_clear_scores_200() {
    let mut t = started();
    t.set_row(18, row_with_gaps(&[0, 1]));
    t.set_row(19, row_with_gaps(&[0, 1]));
    t.set_piece(Piece {
        x: 0,
        y: 17,
        ..Piece::spawn(Tetromino::O)
    });
    t.tick(&mut seeded_rng());
    t.tick(&mut seeded_rng());
    assert_eq!(t.score(), 2 * LINE_SCORE);
    assert_eq!(t.lines(), 2);
    assert_eq!(t.board().len(), BOARD_HEIGHT);
}

#[test]
fn rows_above_a_clear_shift_down() {
    let mut t = started();
    t.set_row(17, row_with_gaps(&[0, 1, 2, 3, 4, 5, 6, 7, 8]));
    t.set_row(19, row_with_gaps(&[3, 4, 5, 6]));
    t.set_piece(Piece {
        kind: Tetromino::I,
        shape: Tetromino::I.shape(),
        x: 3,
        y: 19,
    });
    t.tick(&mut seeded_rng());
    assert_eq!(t.lines(), 1);
    assert_eq!(t.board()[18][9], Some(Tetromino::O));
    assert!(t.board()[17].iter().all(Option::is_none));
}

#[test]
fn level_starts_at_one() {
    let t = started();
    assert_eq!(t.level(), 1);
    assert_eq!(t.hud().items, vec![HudItem::Score(0), HudItem::Level(1)]);
}

/// Drop a flat I into a bottom row with a four-wide gap: one tick locks it
/// and clears exactly that row.
fn clear_single(t: &mut Tetris) {
    t.set_row(19, row_with_gaps(&[3, 4, 5, 6]));
    t.set_piece(Piece {
        kind: Tetromino::I,
        shape: Tetromino::I.shape(),
        x: 3,
        y: 19,
    });
    t.tick(&mut seeded_rng());
}

#[test]
fn ten_lines_raise_the_level_and_its_multiplier() {
    let mut t = started();
    for _ in 0..10 {
        clear_single(&mut t);
    }
    assert_eq!(t.lines(), 10);
    assert_eq!(t.score(), 10 * LINE_SCORE);
    assert_eq!(t.level(), 2);

    clear_single(&mut t);
    assert_eq!(t.score(), 12 * LINE_SCORE);
    assert_eq!(t.hud().items, vec![HudItem::Score(1200), HudItem::Level(2)]);
}

#[test]
fn clear_crossing_a_level_scores_at_the_old_level() {
    let mut t = started();
    for _ in 0..9 {
        clear_single(&mut t);
    }
    assert_eq!(t.level(), 1);

    t.set_row(18, row_with_gaps(&[0]));
    t.set_row(19, row_with_gaps(&[0]));
    t.set_piece(vertical_i(0, 16));
    t.tick(&mut seeded_rng());

    assert_eq!(t.lines(), 11);
    assert_eq!(t.score(), 9 * LINE_SCORE + 2 * LINE_SCORE);
    assert_eq!(t.level(), 2);
}

// ── game over ─────────────────────────────────────────────────────────────────

#[test]
fn locking_above_the_top_ends_run() {
    let mut t = started();
    for y in 1..BOARD_HEIGHT {
        t.set_row(y, row_with_gaps(&[9]));
    }
    t.set_piece(Piece {
        x: 4,
        y: -1,
        ..Piece::spawn(Tetromino::O)
    });
    let outcome = t.tick(&mut seeded_rng());
    assert_eq!(outcome, TickOutcome::Terminal("ゲームオーバー！ スコア: 0".into()));
    assert_eq!(t.phase(), Phase::Terminal);
}

#[test]
fn blocked_spawn_ends_run() {
    let mut t = started();
    for y in 0..BOARD_HEIGHT {
        t.set_row(y, row_with_gaps(&[0, 1]));
    }
    t.set_piece(vertical_i(0, 16));
    let outcome = t.tick(&mut seeded_rng());
    assert!(matches!(outcome, TickOutcome::Terminal(_)));
    assert_eq!(t.phase(), Phase::Terminal);
}

// ── lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn stop_and_restart_clear_board() {
    let mut t = started();
    t.set_row(19, row_with_gaps(&[0]));
    t.stop();
    assert_eq!(t.phase(), Phase::Idle);
    let y = t.piece().y;
    t.tick(&mut seeded_rng());
    assert_eq!(t.piece().y, y);

    t.start(&mut seeded_rng());
    assert!(t.board()[19].iter().all(Option::is_none));
    assert_eq!(t.score(), 0);
}
