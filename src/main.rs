//! pivotris - a falling block puzzle for the terminal
//!
//! Pieces rotate about a fixed pivot cell, with no wall kicks.

mod bag;
mod board;
mod game;
mod gravity;
mod input;
mod piece;
mod score;
mod settings;
mod store;
mod tetromino;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use game::{Action, Game};
use input::InputHandler;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};
use store::{FileScoreStore, TopScoreStore};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Get the pivotris temp directory, creating it if needed
fn pivotris_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("pivotris");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();

    let log_dir = pivotris_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // The terminal belongs to the UI, so logs go to a file
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pivotris=debug".parse().unwrap()),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "pivotris starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();
    if let Err(e) = settings.validate() {
        tracing::error!("Invalid settings: {}", e);
        if let Some(path) = Settings::settings_path() {
            eprintln!("pivotris: fix or remove {}", path.display());
        }
        return Err(io::Error::new(io::ErrorKind::InvalidInput, e));
    }

    // Write out the defaults once so there is a file to edit
    if Settings::settings_path().is_some_and(|path| !path.exists()) {
        if let Err(e) = settings.save() {
            tracing::warn!("Could not save default settings: {}", e);
        }
    }

    let mut game = Game::new(&settings, FileScoreStore::new());
    let mut input = InputHandler::from_settings(&settings);

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut game, &mut input);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = &result {
        tracing::error!("Terminal error: {}", e);
    }

    println!("\nThanks for playing pivotris!");
    println!("Final Score: {}", game.score.points);
    println!("Level: {} | Lines: {}", game.score.level, game.score.lines);
    println!("Best: {}", game.score.top_score);

    result
}

fn run_app<S: TopScoreStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game<S>,
    input: &mut InputHandler,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| ui::render_game(frame, game))?;

        if event::poll(FRAME_DURATION)? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input.key_down(key),
                Event::Mouse(mouse) => input.mouse(mouse),
                _ => None,
            };

            match action {
                Some(Action::Quit) => {
                    tracing::info!(points = game.score.points, "Quit");
                    return Ok(());
                }
                Some(action) => game.process_action(action),
                None => {}
            }
        }

        game.update(Instant::now());
    }
}
