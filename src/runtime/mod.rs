use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, warn};

use crate::app::App;
use crate::config::{self, Settings};
use crate::library::load_library;
use crate::quiz::{QuizCmd, QuizPlayer};

mod event_loop;
mod logging;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, fallback) = settings::load_settings();

    if let Some(log_path) = settings.log_path() {
        if let Err(e) = logging::init_file_logging(&log_path, &settings.logging.level) {
            eprintln!("rekordquiz: logging to {} disabled: {e}", log_path.display());
        }
    }
    info!(config = ?config::resolve_config_path(), "starting");
    if let Some(why) = fallback {
        warn!("{why}");
    }

    let path = library_path(env::args().nth(1), &settings);
    let library = match load_library(&path, &settings.library) {
        Ok(library) => Arc::new(library),
        Err(e) => {
            error!(path = %path.display(), error = %e, "library load failed");
            return Err(format!("could not load library from {}: {e}", path.display()).into());
        }
    };

    let player = QuizPlayer::spawn(Arc::clone(&library), &settings.quiz)?;
    let updates = player.subscribe();
    let mut app = App::new(Arc::clone(&library), library.source().to_string());
    let _ = player.send(QuizCmd::Next);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &player, &updates);
    player.quit();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}

/// Command line argument, then `library.path`, then the working directory.
fn library_path(arg: Option<String>, settings: &Settings) -> PathBuf {
    arg.or_else(|| settings.library.path.clone())
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
