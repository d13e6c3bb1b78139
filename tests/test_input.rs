use mini_arcade::games::deliver_press;
use mini_arcade::games::invaders::Invaders;
use mini_arcade::games::tetris::Tetris;
use mini_arcade::input::{HoldTracker, InputLatch, Key};
use mini_arcade::{Game, GameKind};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── latch ─────────────────────────────────────────────────────────────────────

#[test]
fn latest_value_wins() {
    let mut latch = InputLatch::new();
    assert!(!latch.is_held(Key::A));
    latch.press(Key::A);
    latch.press(Key::A);
    assert!(latch.is_held(Key::A));
    latch.release(Key::A);
    assert!(!latch.is_held(Key::A));
}

#[test]
fn consume_reads_a_held_key_once() {
    let mut latch = InputLatch::new();
    latch.press(Key::Space);
    assert!(latch.consume(Key::Space));
    assert!(!latch.consume(Key::Space));
    assert!(!latch.is_held(Key::Space));
}

// ── hold tracker ──────────────────────────────────────────────────────────────

#[test]
fn second_press_of_a_held_key_is_not_fresh() {
    let mut keys = HoldTracker::new();
    assert!(keys.press(Key::Space, 0));
    assert!(!keys.press(Key::Space, 2));
    assert!(keys.press(Key::A, 2));
}

#[test]
fn release_makes_the_next_press_fresh() {
    let mut keys = HoldTracker::new();
    keys.press(Key::D, 0);
    keys.release(Key::D);
    assert!(!keys.is_held(Key::D));
    assert!(keys.press(Key::D, 1));
}

#[test]
fn keys_expire_only_after_the_window() {
    let mut keys = HoldTracker::new();
    keys.press(Key::A, 0);
    keys.press(Key::D, 5);
    assert!(keys.expire(8, 8).is_empty());

    assert_eq!(keys.expire(9, 8), vec![Key::A]);
    assert!(!keys.is_held(Key::A));
    assert!(keys.is_held(Key::D));
}

#[test]
fn refresh_keeps_a_key_alive() {
    let mut keys = HoldTracker::new();
    keys.press(Key::W, 0);
    keys.refresh(Key::W, 6);
    assert!(keys.expire(12, 8).is_empty());
    assert_eq!(keys.expire(15, 8), vec![Key::W]);
}

// ── press delivery ────────────────────────────────────────────────────────────

#[test]
fn latch_games_are_the_continuous_ones() {
    for kind in GameKind::ALL {
        let expected = matches!(kind, GameKind::Pong | GameKind::Platformer | GameKind::Invaders);
        assert_eq!(kind.create().latches_held_keys(), expected, "{}", kind);
    }
}

#[test]
fn auto_repeat_space_does_not_refire_in_invaders() {
    let mut rng = seeded_rng();
    let mut game = Invaders::new();
    game.start(&mut rng);
    let mut keys = HoldTracker::new();

    // Held Space: the terminal keeps sending presses every couple of frames.
    for frame in 0..6 {
        deliver_press(&mut game, &mut keys, Key::Space, frame * 2);
        game.tick(&mut rng);
    }
    assert_eq!(game.bullets.len(), 1);

    // Let go, then tap again.
    keys.release(Key::Space);
    game.key_up(Key::Space);
    deliver_press(&mut game, &mut keys, Key::Space, 20);
    game.tick(&mut rng);
    assert_eq!(game.bullets.len(), 2);
}

#[test]
fn expired_space_fires_again() {
    let mut rng = seeded_rng();
    let mut game = Invaders::new();
    game.start(&mut rng);
    let mut keys = HoldTracker::new();

    deliver_press(&mut game, &mut keys, Key::Space, 0);
    game.tick(&mut rng);
    for key in keys.expire(20, 8) {
        game.key_up(key);
    }
    deliver_press(&mut game, &mut keys, Key::Space, 20);
    game.tick(&mut rng);
    assert_eq!(game.bullets.len(), 2);
}

#[test]
fn auto_repeat_still_moves_tetris_pieces() {
    let mut game = Tetris::new();
    game.start(&mut seeded_rng());
    let mut keys = HoldTracker::new();
    let x = game.piece().x;

    deliver_press(&mut game, &mut keys, Key::A, 0);
    deliver_press(&mut game, &mut keys, Key::A, 1);
    assert_eq!(game.piece().x, x - 2);
}
