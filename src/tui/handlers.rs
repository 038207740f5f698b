// File: src/tui/handlers.rs
// Handles keyboard input and loader events for the TUI.
use crate::model::TemporalMode;
use crate::timeline::{POSITION_MAX, POSITION_MIN};
use crate::tui::action::{Action, AppEvent};
use crate::tui::state::{AppState, InputMode, now};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_app_event(state: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::Status(s) => state.message = s,
        AppEvent::Error(s) => {
            state.message = format!("Error: {}", s);
            state.loading = false;
        }
        AppEvent::EventsLoaded(store) => {
            state.message = if store.rejected() > 0 {
                format!(
                    "Loaded {} events ({} skipped).",
                    store.len(),
                    store.rejected()
                )
            } else {
                format!("Loaded {} events.", store.len())
            };
            state.set_events(store, now());
        }
    }
}

pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match state.mode {
        InputMode::Searching => {
            match key.code {
                KeyCode::Enter => state.mode = InputMode::Normal,
                KeyCode::Esc => {
                    state.clear_search(now());
                    state.mode = InputMode::Normal;
                }
                KeyCode::Backspace => state.pop_search_char(now()),
                KeyCode::Char(c) => state.push_search_char(c, now()),
                _ => {}
            }
            None
        }
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('r') => {
                state.loading = true;
                Some(Action::Refresh)
            }
            KeyCode::Char('/') => {
                state.mode = InputMode::Searching;
                None
            }
            KeyCode::Esc => {
                if !state.input_buffer.is_empty() {
                    state.clear_search(now());
                }
                None
            }
            KeyCode::Tab => {
                state.cycle_temporal_mode(now());
                None
            }
            KeyCode::Char('1') => {
                state.set_temporal_mode(TemporalMode::All, now());
                None
            }
            KeyCode::Char('2') => {
                state.set_temporal_mode(TemporalMode::Past, now());
                None
            }
            KeyCode::Char('3') => {
                state.set_temporal_mode(TemporalMode::Upcoming, now());
                None
            }
            KeyCode::Char('h') | KeyCode::Left => {
                state.scrub_by(-state.scrub_step);
                None
            }
            KeyCode::Char('l') | KeyCode::Right => {
                state.scrub_by(state.scrub_step);
                None
            }
            KeyCode::Char('0') | KeyCode::Home => {
                state.scrub_to(POSITION_MIN);
                None
            }
            KeyCode::Char('$') | KeyCode::End => {
                state.scrub_to(POSITION_MAX);
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                state.next();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                state.previous();
                None
            }
            KeyCode::Char('?') => {
                state.show_full_help = !state.show_full_help;
                None
            }
            _ => None,
        },
    }
}
