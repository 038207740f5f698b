// Tests for the TUI state machine and slider rendering.
#![cfg(feature = "tui")]
use atelier::config::Config;
use atelier::model::{Event, EventCategory, TemporalMode, parse_instant};
use atelier::store::EventStore;
use atelier::timeline::TimelineView;
use atelier::tui::action::{Action, AppEvent};
use atelier::tui::handlers::{handle_app_event, handle_key_event};
use atelier::tui::state::{AppState, InputMode};
use atelier::tui::view::slider_line;
use chrono::NaiveDateTime;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn at(s: &str) -> NaiveDateTime {
    parse_instant(s).unwrap()
}

fn store() -> EventStore {
    EventStore::from_events(vec![
        Event::new("1", "Printmaking Techniques", EventCategory::Workshop, at("2025-03-19T13:00")),
        Event::new("2", "Guest Talk", EventCategory::Talk, at("2025-07-20T16:00")),
        Event::new("3", "Annual Art Exhibition", EventCategory::Exhibition, at("2025-09-05T18:00")),
        Event::new("4", "End-of-Year Art Gala", EventCategory::Exhibition, at("2025-12-12T19:00")),
    ])
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn loaded(mode: TemporalMode, now: &str) -> AppState {
    let cfg = Config {
        default_mode: mode,
        ..Config::default()
    };
    let mut state = AppState::new(&cfg);
    state.set_events(store(), at(now));
    state
}

fn selected_id(state: &AppState) -> Option<&str> {
    state.get_selected_event().map(|e| e.id.as_str())
}

#[test]
fn test_starts_loading_until_events_arrive() {
    let mut state = AppState::new(&Config::default());
    assert!(state.loading);
    handle_app_event(&mut state, AppEvent::EventsLoaded(store()));
    assert!(!state.loading);
    assert_eq!(state.message, "Loaded 4 events.");
}

#[test]
fn test_slider_syncs_list_selection() {
    let mut state = loaded(TemporalMode::All, "2025-01-01");
    assert_eq!(selected_id(&state), Some("1"));

    state.scrub_to(100.0);
    assert_eq!(selected_id(&state), Some("4"));

    state.scrub_to(f64::NAN);
    assert_eq!(state.position, 0.0);
    assert_eq!(selected_id(&state), Some("1"));

    state.scrub_by(250.0);
    assert_eq!(state.position, 100.0);
    state.scrub_to(-3.0);
    assert_eq!(state.position, 0.0);
}

#[test]
fn test_mode_change_resets_position() {
    let mut state = loaded(TemporalMode::All, "2025-01-01");
    state.scrub_to(80.0);
    state.set_temporal_mode(TemporalMode::Past, at("2025-08-01"));

    assert_eq!(state.position, 0.0);
    assert_eq!(state.view.len(), 2);
    // Past lists newest first; position 0 is still the earliest instant.
    assert_eq!(state.view.events()[0].id.as_str(), "2");
    assert_eq!(selected_id(&state), Some("1"));
}

#[test]
fn test_list_navigation_moves_slider() {
    let mut state = loaded(TemporalMode::All, "2025-01-01");
    state.next();
    assert_eq!(selected_id(&state), Some("2"));
    assert!(state.position > 0.0 && state.position < 100.0);
    state.next();
    state.next();
    state.next();
    assert_eq!(selected_id(&state), Some("4"));
    assert_eq!(state.position, 100.0);
}

#[test]
fn test_empty_view_clears_selection() {
    let mut state = loaded(TemporalMode::Upcoming, "2030-01-01");
    assert!(state.view.is_empty());
    assert_eq!(selected_id(&state), None);
    state.scrub_to(50.0);
    state.next();
    assert_eq!(selected_id(&state), None);
}

#[test]
fn test_keys_drive_mode_search_and_scrub() {
    let mut state = loaded(TemporalMode::All, "2025-01-01");

    assert!(handle_key_event(key(KeyCode::Char('1')), &mut state).is_none());
    assert_eq!(state.temporal_mode, TemporalMode::All);

    handle_key_event(key(KeyCode::Char('$')), &mut state);
    assert_eq!(state.position, 100.0);
    handle_key_event(key(KeyCode::Char('h')), &mut state);
    assert_eq!(state.position, 95.0);
    handle_key_event(key(KeyCode::Char('0')), &mut state);
    assert_eq!(state.position, 0.0);

    handle_key_event(key(KeyCode::Char('/')), &mut state);
    assert_eq!(state.mode, InputMode::Searching);
    for c in "gala".chars() {
        handle_key_event(key(KeyCode::Char(c)), &mut state);
    }
    assert_eq!(state.query(), "gala");
    assert_eq!(state.view.len(), 1);
    assert_eq!(selected_id(&state), Some("4"));

    handle_key_event(key(KeyCode::Esc), &mut state);
    assert_eq!(state.mode, InputMode::Normal);
    assert_eq!(state.view.len(), 4);

    assert!(matches!(
        handle_key_event(key(KeyCode::Char('r')), &mut state),
        Some(Action::Refresh)
    ));
    assert!(state.loading);
    assert!(matches!(
        handle_key_event(key(KeyCode::Char('q')), &mut state),
        Some(Action::Quit)
    ));
}

#[test]
fn test_q_is_text_while_searching() {
    let mut state = loaded(TemporalMode::All, "2025-01-01");
    handle_key_event(key(KeyCode::Char('/')), &mut state);
    assert!(handle_key_event(key(KeyCode::Char('q')), &mut state).is_none());
    assert_eq!(state.query(), "q");
}

#[test]
fn test_slider_line_marks_events_and_handle() {
    let events = vec![
        Event::new("1", "A", EventCategory::Talk, at("2025-01-01")),
        Event::new("2", "B", EventCategory::Talk, at("2025-01-11")),
    ];
    let view = TimelineView::compute(&events, "", TemporalMode::All, at("2024-01-01"));
    assert_eq!(slider_line(&view, 50.0, 11), "┼────●────┼");
    assert_eq!(slider_line(&view, 0.0, 11), "●─────────┼");
    assert_eq!(slider_line(&view, 50.0, 0), "");
}
