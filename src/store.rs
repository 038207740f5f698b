// File: src/store.rs
use crate::error::DataQualityError;
use crate::model::{Event, EventId, RawEvent, TemporalMode};
use crate::source::EventSource;
use crate::timeline::TimelineView;
use chrono::NaiveDateTime;
use std::collections::HashSet;

/// The club calendar as loaded from the backend.
///
/// Holds only well-formed events: records that fail validation are logged
/// and counted in [`EventStore::rejected`] instead.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
    rejected: usize,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from already-validated events, keeping the first of
    /// any duplicate ids.
    pub fn from_events(events: Vec<Event>) -> Self {
        let mut store = Self::new();
        let mut seen = HashSet::new();
        for event in events {
            store.push_unique(event, &mut seen);
        }
        store
    }

    /// Validates backend records. Bad ones are dropped with a warning.
    pub fn from_raw(raw: Vec<RawEvent>) -> Self {
        let mut store = Self::new();
        let mut seen = HashSet::new();
        for record in raw {
            match record.into_event() {
                Ok(event) => store.push_unique(event, &mut seen),
                Err(e) => {
                    log::warn!("Skipping event record: {}", e);
                    store.rejected += 1;
                }
            }
        }
        if store.rejected > 0 {
            log::info!(
                "Loaded {} events, rejected {}",
                store.events.len(),
                store.rejected
            );
        }
        store
    }

    fn push_unique(&mut self, event: Event, seen: &mut HashSet<EventId>) {
        if seen.insert(event.id.clone()) {
            self.events.push(event);
        } else {
            let err = DataQualityError::DuplicateId {
                id: event.id.to_string(),
            };
            log::warn!("Skipping event record: {}", err);
            self.rejected += 1;
        }
    }

    /// Fetches every event once. A failed fetch leaves the calendar empty;
    /// there is no retry.
    pub async fn load_from<S: EventSource>(source: &S) -> Self {
        match source.fetch_all_events().await {
            Ok(raw) => Self::from_raw(raw),
            Err(e) => {
                log::error!("Failed to fetch events: {:#}", e);
                Self::new()
            }
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.id == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of records dropped during ingestion.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn view(&self, query: &str, mode: TemporalMode, now: NaiveDateTime) -> TimelineView {
        TimelineView::compute(&self.events, query, mode, now)
    }
}
