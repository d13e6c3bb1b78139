use mini_arcade::canvas::Canvas;
use mini_arcade::games::platformer::*;
use mini_arcade::games::HudItem;
use mini_arcade::geometry::Rect;
use mini_arcade::input::Key;
use mini_arcade::{Game, GameKind, Phase, TickOutcome};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn started() -> Platformer {
    let mut game = Platformer::new();
    game.start(&mut seeded_rng());
    game
}

fn landed() -> Platformer {
    let mut game = started();
    for _ in 0..60 {
        game.step();
    }
    game
}

fn place(game: &mut Platformer, x: f32, y: f32, vy: f32) {
    game.player.rect = Rect::new(x, y, PLAYER_W, PLAYER_H);
    game.player.vx = 0.0;
    game.player.vy = vy;
    game.player.grounded = false;
}

// ── gravity and landing ───────────────────────────────────────────────────────

#[test]
fn player_falls_onto_ground() {
    let g = landed();
    assert_eq!(g.player.rect.y, 180.0 - PLAYER_H);
    assert_eq!(g.player.rect.x, SPAWN_X);
    assert!(g.player.grounded);
    assert_eq!(g.player.vy, 0.0);
}

#[test]
fn gravity_accumulates_in_the_air() {
    let mut g = started();
    g.step();
    assert_eq!(g.player.vy, GRAVITY);
    g.step();
    assert_eq!(g.player.vy, 2.0 * GRAVITY);
    assert_eq!(g.player.rect.y, SPAWN_Y + 3.0 * GRAVITY);
}

// ── running ───────────────────────────────────────────────────────────────────

#[test]
fn held_direction_sets_run_speed() {
    let mut g = landed();
    g.key_down(Key::D);
    g.step();
    assert_eq!(g.player.vx, RUN_SPEED);
    g.key_up(Key::D);
    g.key_down(Key::A);
    g.step();
    assert_eq!(g.player.vx, -RUN_SPEED);
}

#[test]
fn friction_decays_horizontal_speed() {
    let mut g = landed();
    g.player.vx = 3.0;
    g.step();
    assert!((g.player.vx - 2.4).abs() < 1e-5);
}

#[test]
fn clamped_to_left_edge() {
    let mut g = landed();
    g.player.rect.x = 1.0;
    g.key_down(Key::A);
    g.step();
    assert_eq!(g.player.rect.x, 0.0);
}

// ── jumping ───────────────────────────────────────────────────────────────────

#[test]
fn jump_only_from_ground() {
    let mut g = landed();
    g.key_down(Key::W);
    g.step();
    assert_eq!(g.player.vy, JUMP_IMPULSE + GRAVITY);
    assert!(!g.player.grounded);

    // Still holding W in the air: no second impulse.
    g.step();
    assert_eq!(g.player.vy, JUMP_IMPULSE + 2.0 * GRAVITY);
}

#[test]
fn no_jump_before_landing() {
    let mut g = started();
    g.key_down(Key::W);
    g.step();
    assert_eq!(g.player.vy, GRAVITY);
}

// ── platform collisions ───────────────────────────────────────────────────────

#[test]
fn side_hit_stops_at_platform_edge() {
    let mut g = started();
    place(&mut g, 44.0, 120.0, 0.0);
    g.key_down(Key::D);
    g.step();
    assert_eq!(g.player.rect.x, 60.0 - PLAYER_W);
    assert_eq!(g.player.vx, 0.0);
}

#[test]
fn head_bump_stops_upward_motion() {
    let mut g = started();
    place(&mut g, 70.0, 141.0, -5.0);
    g.step();
    assert_eq!(g.player.rect.y, 140.0);
    assert_eq!(g.player.vy, 0.0);
    assert!(!g.player.grounded);
}

#[test]
fn lands_on_ledge_from_above() {
    let mut g = started();
    place(&mut g, 170.0, 79.0, 1.0);
    g.step();
    assert_eq!(g.player.rect.y, 100.0 - PLAYER_H);
    assert!(g.player.grounded);
}

// ── falling out ───────────────────────────────────────────────────────────────

#[test]
fn falling_through_the_gap_respawns() {
    for vy in [5.0, 50.0] {
        let mut g = started();
        place(&mut g, 130.0, 199.0, vy);
        g.step();
        assert_eq!(g.player, Player::spawn());
    }
}

// ── coins ─────────────────────────────────────────────────────────────────────

#[test]
fn coin_is_counted_once() {
    let mut g = started();
    place(&mut g, 90.0, 160.0, 0.0);
    g.step();
    assert_eq!(g.collected(), 1);
    g.step();
    g.step();
    assert_eq!(g.collected(), 1);
    assert_eq!(g.coins.iter().filter(|c| c.collected).count(), 1);
}

#[test]
fn all_coins_show_banner() {
    let mut g = started();
    for coin in &mut g.coins {
        coin.collected = true;
    }
    assert!(g.all_collected());
    let mut canvas = Canvas::new(GameKind::Platformer.surface());
    g.draw(&mut canvas);
    let banner_row = ((HEIGHT / 2.0 - 40.0) / 10.0) as u16;
    assert!(canvas
        .row(banner_row)
        .iter()
        .flatten()
        .any(|paint| paint.glyph == '全'));
}

#[test]
fn no_banner_while_coins_remain() {
    let g = started();
    let mut canvas = Canvas::new(GameKind::Platformer.surface());
    g.draw(&mut canvas);
    for row in 0..canvas.surface().rows() {
        assert!(!canvas.row(row).iter().flatten().any(|p| p.glyph == '全'));
    }
}

#[test]
fn hud_reports_coins() {
    let g = started();
    assert_eq!(
        g.hud().items,
        vec![HudItem::Coins {
            collected: 0,
            total: 5
        }]
    );
}

// ── lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn tick_steps_only_while_running() {
    let mut g = Platformer::new();
    assert_eq!(g.tick(&mut seeded_rng()), TickOutcome::Continue);
    assert_eq!(g.player, Player::spawn());

    g.start(&mut seeded_rng());
    g.tick(&mut seeded_rng());
    assert_eq!(g.player.vy, GRAVITY);

    g.stop();
    assert_eq!(g.phase(), Phase::Idle);
    let before = g.player;
    g.tick(&mut seeded_rng());
    assert_eq!(g.player, before);
}
