use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

use crate::app::App;
use crate::broadcast::Subscription;
use crate::config;
use crate::quiz::{QuizCmd, QuizPlayer, QuizState};
use crate::ui;

/// What a key press asks the runtime to do.
#[derive(Debug, Clone, PartialEq, Eq)]
enum KeyOutcome {
    Nothing,
    Send(QuizCmd),
    Quit,
}

/// Main terminal event loop: mirrors quiz state, draws and forwards input
/// to the quiz thread. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &QuizPlayer,
    updates: &Subscription<QuizState>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if let Some(state) = updates.latest() {
            app.apply_state(state);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key_event(key, app) {
                    KeyOutcome::Nothing => {}
                    KeyOutcome::Send(cmd) => {
                        if player.send(cmd).is_err() {
                            warn!("quiz thread is gone, shutting down");
                            return Ok(());
                        }
                    }
                    KeyOutcome::Quit => return Ok(()),
                }
            }
        }
    }
}

fn handle_key_event(key: KeyEvent, app: &mut App) -> KeyOutcome {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyOutcome::Quit;
    }

    if let Some(picker) = app.picker.as_mut() {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => picker.next(),
            KeyCode::Char('k') | KeyCode::Up => picker.prev(),
            KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => app.close_picker(),
            KeyCode::Enter => {
                if let Some(path) = app.take_picker_choice() {
                    app.set_scope(path.clone());
                    return KeyOutcome::Send(QuizCmd::SetFilter(path));
                }
            }
            _ => {}
        }
        return KeyOutcome::Nothing;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => KeyOutcome::Quit,
        KeyCode::Char('n') | KeyCode::Char('l') => KeyOutcome::Send(QuizCmd::Next),
        KeyCode::Enter | KeyCode::Char('r') => KeyOutcome::Send(QuizCmd::Reveal),
        KeyCode::Char(' ') | KeyCode::Char('p') => KeyOutcome::Send(QuizCmd::TogglePlayback),
        KeyCode::Char('x') => KeyOutcome::Send(QuizCmd::Reset),
        KeyCode::Char('f') => {
            app.open_picker();
            KeyOutcome::Nothing
        }
        _ => KeyOutcome::Nothing,
    }
}
