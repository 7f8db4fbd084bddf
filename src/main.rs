mod config;
mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lane_dodger::entities::GameStatus;
use lane_dodger::game::Game;
use lane_dodger::input::{InputEvent, Key};

use crate::config::{load_config, resolve, save_config, AppConfig};
use crate::display::PlayArea;

const LOG_FILE: &str = "lane_dodger.log";

// ── Logging ───────────────────────────────────────────────────────────────────

/// Send all tracing output to a file; the terminal is owned by the game.
fn init_logging() -> Result<PathBuf> {
    let path = std::env::temp_dir().join(LOG_FILE);
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;
    Ok(path)
}

// ── Input translation ─────────────────────────────────────────────────────────

/// Translate a terminal event into a game input event. Anything the game does
/// not care about (resizes, releases, other buttons) is dropped.
fn translate(event: Event, area: &PlayArea) -> Option<InputEvent> {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(InputEvent::Quit)
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                Some(InputEvent::KeyDown(Key::Right))
            }
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                Some(InputEvent::KeyDown(Key::Left))
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                Some(InputEvent::KeyDown(Key::Escape))
            }
            KeyCode::Char('r') | KeyCode::Char('R') => Some(InputEvent::KeyDown(Key::Restart)),
            _ => None,
        },
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => {
            let (x, y) = area.to_logical(column, row);
            Some(InputEvent::MouseDown { x, y })
        }
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Run frames until the game asks to stop. A new best score is saved the
/// frame a run ends, unless `persist` is off.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &mut AppConfig,
    persist: bool,
) -> Result<()> {
    let mut rng = thread_rng();
    let frame_duration: Duration = config.frame_duration();
    let started = Instant::now();
    let mut game = Game::new(elapsed_ms(started));

    while game.is_running() {
        let frame_start = Instant::now();
        let now_ms = elapsed_ms(started);

        let (cols, rows) = terminal::size().context("failed to read terminal size")?;
        let area = PlayArea::new(cols, rows);

        let events: Vec<InputEvent> = rx.try_iter().filter_map(|ev| translate(ev, &area)).collect();
        game.frame(now_ms, events, &mut rng);

        if *game.status() == GameStatus::GameOver && config.record_score(game.score()) {
            info!(best_score = config.best_score, "new best score");
            if persist {
                if let Err(e) = save_config(config) {
                    warn!(error = %e, "failed to save best score");
                }
            }
        }

        display::render(out, &game, &area, config.best_score.max(game.score()))
            .context("failed to render frame")?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }
    Ok(())
}

// ── Terminal lifecycle ────────────────────────────────────────────────────────

fn setup_terminal<W: Write>(out: &mut W) -> Result<()> {
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;
    Ok(())
}

/// Undo `setup_terminal`. Each step is attempted regardless of the others.
fn restore_terminal<W: Write>(out: &mut W) {
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let log_path = init_logging()?;
    info!(log = %log_path.display(), "lane dodger starting");

    let stored = match load_config() {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(error = %e, "config unreadable, using defaults and not saving");
            None
        }
    };
    let startup = resolve(stored);
    if let Some(e) = &startup.warning {
        warn!(error = %e, fps = startup.config.fps, "invalid config value reset");
    }
    let mut config = startup.config;

    let mut out = BufWriter::new(stdout());

    let result = setup_terminal(&mut out).and_then(|()| {
        // Dedicate a thread to blocking event reads so the frame loop never
        // blocks on terminal I/O.
        let (tx, rx) = mpsc::channel::<Event>();
        thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });
        game_loop(&mut out, &rx, &mut config, startup.persist)
    });

    // Always restore the terminal, even if setup failed part-way
    restore_terminal(&mut out);

    info!("lane dodger exiting");
    result
}
