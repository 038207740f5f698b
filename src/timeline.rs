//! Event timeline: search, time-window filtering, ordering and scrubbing.
//!
//! Everything in this module is synchronous and pure. The caller owns the
//! search text, the [`TemporalMode`], the scrub position and the clock, and
//! re-supplies all of them on every recomputation. Input is assumed to be
//! well formed: malformed records are dropped when the [`EventStore`] ingests
//! them, so nothing here can fail.
//!
//! [`EventStore`]: crate::store::EventStore

use crate::model::{Event, EventId, Searchable, TemporalMode};
use chrono::{Duration, NaiveDateTime};

pub const POSITION_MIN: f64 = 0.0;
pub const POSITION_MAX: f64 = 100.0;

/// Receives the event the timeline wants brought into view.
pub trait ScrollSink {
    fn scroll_to(&mut self, id: &EventId);
}

/// Events passing both the temporal predicate for `mode` and the text query.
/// Input order is preserved.
pub fn filter_events(
    events: &[Event],
    query: &str,
    mode: TemporalMode,
    now: NaiveDateTime,
) -> Vec<Event> {
    events
        .iter()
        .filter(|e| mode.includes(e.start, now) && e.matches_query(query))
        .cloned()
        .collect()
}

/// Orders by start time: descending for [`TemporalMode::Past`], ascending
/// otherwise. Stable, so events sharing a start time keep their input order.
pub fn sort_events(mut events: Vec<Event>, mode: TemporalMode) -> Vec<Event> {
    if mode.is_descending() {
        events.sort_by(|a, b| b.start.cmp(&a.start));
    } else {
        events.sort_by(|a, b| a.start.cmp(&b.start));
    }
    events
}

pub(crate) fn clamp_position(position: f64) -> f64 {
    if position.is_nan() {
        POSITION_MIN
    } else {
        position.clamp(POSITION_MIN, POSITION_MAX)
    }
}

/// Maps a scrub position in `[0, 100]` onto the span `min..=max`.
///
/// Out-of-range positions are clamped. A degenerate span (`min == max`)
/// resolves every position to `min`; a reversed span is treated the same way.
pub fn position_to_instant(min: NaiveDateTime, max: NaiveDateTime, position: f64) -> NaiveDateTime {
    if max <= min {
        return min;
    }
    let position = clamp_position(position);
    if position >= POSITION_MAX {
        return max;
    }
    let span_ms = (max - min).num_milliseconds() as f64;
    let offset_ms = (span_ms * position / POSITION_MAX).round() as i64;
    min + Duration::milliseconds(offset_ms)
}

/// Inverse of [`position_to_instant`], clamped to `[0, 100]`.
pub fn instant_to_position(min: NaiveDateTime, max: NaiveDateTime, instant: NaiveDateTime) -> f64 {
    if max <= min {
        return POSITION_MIN;
    }
    let span_ms = (max - min).num_milliseconds() as f64;
    let offset_ms = (instant - min).num_milliseconds() as f64;
    clamp_position(offset_ms / span_ms * POSITION_MAX)
}

/// Index of the event whose start is closest to `target`.
/// On a tie the earlier event in the sequence wins.
pub fn nearest_index(events: &[Event], target: NaiveDateTime) -> Option<usize> {
    let mut best: Option<(usize, Duration)> = None;
    for (idx, event) in events.iter().enumerate() {
        let diff = (event.start - target).abs();
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((idx, diff)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Id of the event whose start is closest to `target`, `None` when empty.
pub fn nearest_event(events: &[Event], target: NaiveDateTime) -> Option<EventId> {
    nearest_index(events, target).map(|idx| events[idx].id.clone())
}

/// A filtered, ordered snapshot of the calendar plus its time span.
///
/// Rebuilt from scratch whenever the source events, query, mode or clock
/// change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineView {
    mode: TemporalMode,
    events: Vec<Event>,
    span: Option<(NaiveDateTime, NaiveDateTime)>,
}

impl TimelineView {
    pub fn compute(events: &[Event], query: &str, mode: TemporalMode, now: NaiveDateTime) -> Self {
        let events = sort_events(filter_events(events, query, mode, now), mode);
        let min = events.iter().map(|e| e.start).min();
        let max = events.iter().map(|e| e.start).max();
        let span = min.zip(max);
        Self { mode, events, span }
    }

    pub fn mode(&self) -> TemporalMode {
        self.mode
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Earliest and latest start times, regardless of display order.
    pub fn span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.span
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self.span, Some((min, max)) if min == max)
    }

    pub fn instant_at(&self, position: f64) -> Option<NaiveDateTime> {
        self.span
            .map(|(min, max)| position_to_instant(min, max, position))
    }

    pub fn nearest_index(&self, position: f64) -> Option<usize> {
        let target = self.instant_at(position)?;
        nearest_index(&self.events, target)
    }

    pub fn nearest(&self, position: f64) -> Option<&Event> {
        self.nearest_index(position).map(|idx| &self.events[idx])
    }

    /// Where `event` sits on the slider.
    pub fn position_of(&self, event: &Event) -> Option<f64> {
        self.span
            .map(|(min, max)| instant_to_position(min, max, event.start))
    }

    /// Resolves `position` to the nearest event and asks `sink` to show it.
    /// An empty view scrolls nowhere.
    pub fn scrub(&self, position: f64, sink: &mut dyn ScrollSink) -> Option<EventId> {
        let event = self.nearest(position)?;
        sink.scroll_to(&event.id);
        Some(event.id.clone())
    }

    /// Caption under the slider, e.g. "Showing events around: August 2025".
    pub fn label_at(&self, position: f64) -> Option<String> {
        self.instant_at(position)
            .map(|at| format!("Showing events around: {}", at.format("%B %Y")))
    }

    pub fn empty_message(&self) -> String {
        self.mode.empty_message()
    }
}
