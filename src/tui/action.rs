// Defines actions and events for TUI interaction and state updates.
use crate::store::EventStore;

/// Requests sent from the UI loop to the loader actor.
#[derive(Debug)]
pub enum Action {
    Refresh,
    Quit,
}

/// Results sent back from the loader actor.
#[derive(Debug)]
pub enum AppEvent {
    EventsLoaded(EventStore),
    Error(String),
    Status(String),
}
