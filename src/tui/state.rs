// File: ./src/tui/state.rs
// Manages the application state for the TUI.
use crate::config::Config;
use crate::model::{Event, EventId, TemporalMode};
use crate::store::EventStore;
use crate::timeline::{self, POSITION_MIN, ScrollSink, TimelineView};
use chrono::NaiveDateTime;
use ratatui::widgets::ListState;

pub use crate::model::now;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InputMode {
    Normal,
    Searching,
}

/// Selects the scrubbed-to event in the list widget.
struct ListSink<'a> {
    events: &'a [Event],
    list_state: &'a mut ListState,
}

impl ScrollSink for ListSink<'_> {
    fn scroll_to(&mut self, id: &EventId) {
        if let Some(idx) = self.events.iter().position(|e| &e.id == id) {
            self.list_state.select(Some(idx));
        }
    }
}

pub struct AppState {
    // Data
    pub store: EventStore,
    pub view: TimelineView,

    // Timeline controls
    pub temporal_mode: TemporalMode,
    pub position: f64,
    pub scrub_step: f64,
    pub date_format: String,

    // UI State
    pub list_state: ListState,
    pub mode: InputMode,
    pub message: String,
    pub loading: bool,
    pub show_full_help: bool,

    // Search is applied while typing
    pub input_buffer: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            store: EventStore::new(),
            view: TimelineView::default(),
            temporal_mode: config.default_mode,
            position: POSITION_MIN,
            scrub_step: config.scrub_step,
            date_format: config.date_format.clone(),
            list_state: ListState::default(),
            mode: InputMode::Normal,
            message: String::new(),
            loading: true,
            show_full_help: false,
            input_buffer: String::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.input_buffer
    }

    /// Rebuilds the view and re-syncs the list to the slider.
    pub fn refresh_view(&mut self, now: NaiveDateTime) {
        self.view = self.store.view(&self.input_buffer, self.temporal_mode, now);
        if self.view.is_empty() {
            self.list_state.select(None);
            return;
        }
        self.sync_to_position();
    }

    fn sync_to_position(&mut self) {
        let mut sink = ListSink {
            events: self.view.events(),
            list_state: &mut self.list_state,
        };
        self.view.scrub(self.position, &mut sink);
    }

    pub fn set_events(&mut self, store: EventStore, now: NaiveDateTime) {
        self.store = store;
        self.loading = false;
        self.refresh_view(now);
    }

    /// Switching mode starts the slider over at the beginning.
    pub fn set_temporal_mode(&mut self, mode: TemporalMode, now: NaiveDateTime) {
        self.temporal_mode = mode;
        self.position = POSITION_MIN;
        self.refresh_view(now);
    }

    pub fn cycle_temporal_mode(&mut self, now: NaiveDateTime) {
        self.set_temporal_mode(self.temporal_mode.next(), now);
    }

    pub fn scrub_to(&mut self, position: f64) {
        self.position = timeline::clamp_position(position);
        if !self.view.is_empty() {
            self.sync_to_position();
        }
    }

    pub fn scrub_by(&mut self, delta: f64) {
        self.scrub_to(self.position + delta);
    }

    /// Moving through the list drags the slider along.
    fn select_index(&mut self, idx: usize) {
        self.list_state.select(Some(idx));
        if let Some(pos) = self.view.events().get(idx).and_then(|e| self.view.position_of(e)) {
            self.position = pos;
        }
    }

    pub fn next(&mut self) {
        let len = self.view.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.select_index(i);
    }

    pub fn previous(&mut self) {
        if self.view.is_empty() {
            return;
        }
        let i = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.select_index(i);
    }

    pub fn push_search_char(&mut self, c: char, now: NaiveDateTime) {
        self.input_buffer.push(c);
        self.refresh_view(now);
    }

    pub fn pop_search_char(&mut self, now: NaiveDateTime) {
        self.input_buffer.pop();
        self.refresh_view(now);
    }

    pub fn clear_search(&mut self, now: NaiveDateTime) {
        self.input_buffer.clear();
        self.refresh_view(now);
    }

    pub fn get_selected_event(&self) -> Option<&Event> {
        self.list_state
            .selected()
            .and_then(|i| self.view.events().get(i))
    }
}
