//! Terminal runner (default binary).
//!
//! Uses crossterm for input and the change-only renderer from
//! `blockfall::term`. Logs go to the file named in the config; the terminal
//! belongs to the renderer.

use std::fs::OpenOptions;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use log::{error, info, warn};

use blockfall::config::{config_path, Config};
use blockfall::core::{GameSession, PieceRng, SimpleRng};
use blockfall::input::Command;
use blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

type Session = GameSession<Box<dyn PieceRng>>;

fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("{}: {e}; using defaults", config_path().display());
            None
        }
    };
    let config_ok = config.is_some();
    let config = config.unwrap_or_default();

    init_logging(&config);
    info!("starting blockfall");
    if config_ok {
        info!("configuration loaded from {}", config_path().display());
    } else {
        warn!("configuration unavailable, running with defaults");
    }

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    if let Err(e) = term.exit() {
        error!("failed to restore terminal: {e}");
    }
    if let Err(ref e) = result {
        error!("exiting with error: {e:#}");
    }
    result
}

/// Install `env_logger` writing to the configured file.
///
/// `RUST_LOG` overrides the configured filter. If the file cannot be opened
/// logging stays disabled rather than corrupting the screen.
fn init_logging(config: &Config) {
    let file = match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&config.log.file)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("cannot open log file {}: {e}", config.log.file.display());
            return;
        }
    };

    let env = env_logger::Env::default().default_filter_or(config.log.level.as_str());
    let _ = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
}

fn new_session(config: &Config) -> Session {
    let rng: Box<dyn PieceRng> = match config.seed {
        Some(seed) => {
            info!("new game with seed {seed}");
            Box::new(SimpleRng::new(seed))
        }
        None => {
            info!("new game with entropy seed");
            Box::new(fastrand::Rng::new())
        }
    };
    GameSession::with_rng(rng)
}

fn run(term: &mut TerminalRenderer, config: &Config) -> Result<()> {
    let mut session = new_session(config);

    let view = GameView::default().with_ghost(config.show_ghost);
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(config.frame_ms as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&session.snapshot(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match Command::from_key(key) {
                    Some(Command::Quit) => {
                        info!(
                            "quit at score {} (level {}, {} lines)",
                            session.score(),
                            session.level(),
                            session.lines()
                        );
                        return Ok(());
                    }
                    Some(Command::Restart) if session.game_over() => {
                        session = new_session(config);
                        last_tick = Instant::now();
                    }
                    Some(Command::Restart) => {}
                    Some(Command::Action(action)) => {
                        session.apply_action(action);
                    }
                    None => {}
                },
                // A resize changes the framebuffer size, which repaints in full.
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            session.tick(config.frame_ms);
        }
    }
}
