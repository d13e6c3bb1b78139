use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use mini_arcade::canvas::Canvas;
use mini_arcade::display::{self, GameView};
use mini_arcade::games;
use mini_arcade::input::{HoldTracker, Key};
use mini_arcade::scheduler::Scheduler;
use mini_arcade::{ArcadeError, Game, GameKind, Phase, Settings, TickOutcome};

#[derive(Parser)]
#[command(name = "mini_arcade")]
#[command(author, version, about = "Terminal arcade: Snake, Pong, Memory, Tetris, Platformer, Space Invaders")]
struct Args {
    /// Settings file (JSON); defaults are used when it does not exist
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Open this game directly (snake, pong, memory, tetris, platformer, invaders)
    #[arg(long, short = 'g')]
    game: Option<GameKind>,

    /// Fixed RNG seed, overriding the settings file
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal itself is in raw mode)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> Result<(), ArcadeError> {
    let mut builder = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| ArcadeError::LogFile {
                path: path.to_path_buf(),
                source,
            })?;
            let mut builder =
                env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            builder
        }
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")),
    };
    // A logger may already be installed when embedded; keep the existing one.
    let _ = builder.try_init();
    Ok(())
}

// ── Input mapping ─────────────────────────────────────────────────────────────

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Up => Some(Key::ArrowUp),
        KeyCode::Down => Some(Key::ArrowDown),
        KeyCode::Left => Some(Key::ArrowLeft),
        KeyCode::Right => Some(Key::ArrowRight),
        KeyCode::Char('w') | KeyCode::Char('W') => Some(Key::W),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::A),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Key::S),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::D),
        KeyCode::Char(' ') => Some(Key::Space),
        _ => None,
    }
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
}

// ── Sessions ──────────────────────────────────────────────────────────────────

/// One opened game plus what the front-end tracks around it.
struct Session {
    game: Box<dyn Game>,
    canvas: Canvas,
    /// Result message shown until the player dismisses it.
    notice: Option<String>,
    keys: HoldTracker,
}

impl Session {
    fn open(kind: GameKind) -> Self {
        Session {
            game: kind.create(),
            canvas: Canvas::new(kind.surface()),
            notice: None,
            keys: HoldTracker::new(),
        }
    }

    fn kind(&self) -> GameKind {
        self.game.kind()
    }

    fn start(&mut self, scheduler: &mut Scheduler, settings: &Settings, rng: &mut StdRng) {
        let kind = self.kind();
        self.game.start(rng);
        scheduler.arm(kind, settings.periods.for_game(kind), Instant::now());
    }

    fn stop(&mut self, scheduler: &mut Scheduler) {
        self.game.stop();
        scheduler.cancel(self.kind());
    }

    /// Release every key not refreshed within the hold window. Covers
    /// terminals that never send key-release events.
    fn expire_keys(&mut self, frame: u64, hold_window: u64) {
        for key in self.keys.expire(frame, hold_window) {
            self.game.key_up(key);
        }
    }

    fn press(&mut self, key: Key, frame: u64) {
        games::deliver_press(self.game.as_mut(), &mut self.keys, key, frame);
    }

    fn run_due_ticks(&mut self, scheduler: &mut Scheduler, rng: &mut StdRng) {
        let kind = self.kind();
        for _ in 0..scheduler.due(kind, Instant::now()) {
            if let TickOutcome::Terminal(message) = self.game.tick(rng) {
                scheduler.cancel(kind);
                self.notice = Some(message);
                break;
            }
        }
    }

    fn render<W: Write>(&mut self, out: &mut W, settings: &Settings) -> std::io::Result<()> {
        self.game.draw(&mut self.canvas);
        let hud = self.game.hud();
        let view = GameView {
            kind: self.kind(),
            canvas: &self.canvas,
            hud: &hud,
            phase: self.game.phase(),
            notice: self.notice.as_deref(),
            manual_stop: self.game.supports_manual_stop(),
            show_hints: settings.show_hints,
        };
        display::render_game(out, &view)
    }
}

enum Screen {
    Menu { selected: usize },
    Playing(Session),
}

// ── Main loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: key events are drained each frame and applied to the open
/// game at once (latch writes, or immediate moves for Tetris and Memory).
/// The scheduler then reports how many periods of the open game are due and
/// that many ticks run, each to completion, before the frame is drawn.
fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    settings: &Settings,
    first_game: Option<GameKind>,
    rng: &mut StdRng,
) -> Result<(), ArcadeError> {
    let mut scheduler = Scheduler::new();
    let mut screen = match first_game {
        Some(kind) => {
            let mut session = Session::open(kind);
            session.start(&mut scheduler, settings, rng);
            Screen::Playing(session)
        }
        None => Screen::Menu { selected: 0 },
    };
    let mut menu_dirty = true;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let (code, kind, modifiers) = match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => (code, kind, modifiers),
                Event::Resize(..) => {
                    menu_dirty = true;
                    continue;
                }
                _ => continue,
            };

            if kind == KeyEventKind::Press && is_quit(code, modifiers) {
                if let Screen::Playing(session) = &mut screen {
                    session.stop(&mut scheduler);
                }
                return Ok(());
            }

            match &mut screen {
                Screen::Menu { selected } => {
                    if kind != KeyEventKind::Press {
                        continue;
                    }
                    let count = GameKind::ALL.len();
                    match code {
                        KeyCode::Up | KeyCode::Char('w') => {
                            *selected = (*selected + count - 1) % count;
                            menu_dirty = true;
                        }
                        KeyCode::Down | KeyCode::Char('s') => {
                            *selected = (*selected + 1) % count;
                            menu_dirty = true;
                        }
                        KeyCode::Char(c @ '1'..='6') => {
                            *selected = c as usize - '1' as usize;
                            menu_dirty = true;
                        }
                        KeyCode::Enter => {
                            let kind = GameKind::ALL[*selected];
                            log::info!("opening {}", kind);
                            screen = Screen::Playing(Session::open(kind));
                        }
                        _ => {}
                    }
                }
                Screen::Playing(session) => {
                    // A pending notice swallows input until dismissed.
                    if session.notice.is_some() {
                        if kind == KeyEventKind::Press {
                            session.notice = None;
                            session.game.acknowledge();
                        }
                        continue;
                    }
                    match (code, kind) {
                        (KeyCode::Esc, KeyEventKind::Press) => {
                            let selected = GameKind::ALL
                                .iter()
                                .position(|k| *k == session.kind())
                                .unwrap_or(0);
                            session.stop(&mut scheduler);
                            screen = Screen::Menu { selected };
                            menu_dirty = true;
                        }
                        (KeyCode::Enter, KeyEventKind::Press) => match session.game.phase() {
                            Phase::Running => {
                                if session.game.supports_manual_stop() {
                                    session.stop(&mut scheduler);
                                }
                            }
                            Phase::Idle | Phase::Terminal => {
                                session.start(&mut scheduler, settings, rng);
                            }
                        },
                        _ => {
                            let Some(key) = map_key(code) else { continue };
                            match kind {
                                KeyEventKind::Press => session.press(key, frame),
                                // Repeat: refresh timestamp so key stays "held"
                                KeyEventKind::Repeat => session.keys.refresh(key, frame),
                                // Release: remove key immediately (keyboard-enhancement path)
                                KeyEventKind::Release => {
                                    session.keys.release(key);
                                    session.game.key_up(key);
                                }
                            }
                        }
                    }
                }
            }
        }

        // ── Advance and draw ──────────────────────────────────────────────────
        match &mut screen {
            Screen::Menu { selected } => {
                if menu_dirty {
                    display::render_menu(out, *selected, settings.show_hints)?;
                    menu_dirty = false;
                }
            }
            Screen::Playing(session) => {
                session.expire_keys(frame, settings.hold_window_frames);
                session.run_due_ticks(&mut scheduler, rng);
                session.render(out, settings)?;
            }
        }

        let elapsed = frame_start.elapsed();
        let budget = settings.frame();
        if elapsed < budget {
            thread::sleep(budget - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), ArcadeError> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("mini_arcade starting with seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &settings, args.game, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("{}", e);
    }
    log::info!("mini_arcade exiting");
    result
}
