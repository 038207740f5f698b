// Tests for mapping scrub positions to instants and events.
use atelier::model::{Event, EventCategory, EventId, TemporalMode, parse_instant};
use atelier::timeline::{
    ScrollSink, TimelineView, nearest_event, position_to_instant,
};
use chrono::NaiveDateTime;

fn at(s: &str) -> NaiveDateTime {
    parse_instant(s).unwrap()
}

fn ev(id: &str, start: &str) -> Event {
    Event::new(id, &format!("Event {}", id), EventCategory::Workshop, at(start))
}

#[derive(Default)]
struct RecordingSink {
    scrolled: Vec<EventId>,
}

impl ScrollSink for RecordingSink {
    fn scroll_to(&mut self, id: &EventId) {
        self.scrolled.push(id.clone());
    }
}

#[test]
fn test_position_endpoints_map_to_span_ends() {
    let min = at("2025-08-15T14:00");
    let max = at("2025-09-05T18:00");
    assert_eq!(position_to_instant(min, max, 0.0), min);
    assert_eq!(position_to_instant(min, max, 100.0), max);
}

#[test]
fn test_position_mapping_is_monotonic() {
    let min = at("2025-02-28T12:00");
    let max = at("2026-02-04T18:00");
    let mut prev = position_to_instant(min, max, 0.0);
    for step in 1..=400 {
        let p = step as f64 * 0.25;
        let t = position_to_instant(min, max, p);
        assert!(t >= prev, "not monotonic at {}", p);
        prev = t;
    }
}

#[test]
fn test_out_of_range_positions_are_clamped() {
    let min = at("2025-01-01");
    let max = at("2025-12-31");
    assert_eq!(position_to_instant(min, max, -25.0), min);
    assert_eq!(position_to_instant(min, max, 250.0), max);
    assert_eq!(position_to_instant(min, max, f64::NAN), min);
}

#[test]
fn test_degenerate_span_always_resolves_to_min() {
    let t = at("2025-06-10T11:00");
    for p in [0.0, 12.5, 50.0, 99.9, 100.0] {
        assert_eq!(position_to_instant(t, t, p), t);
    }
}

#[test]
fn test_midpoint_tie_goes_to_first_event() {
    let events = vec![ev("1", "2025-08-15T14:00"), ev("2", "2025-09-05T18:00")];
    let mid = position_to_instant(events[0].start, events[1].start, 50.0);
    assert_eq!(mid, at("2025-08-26T04:00"));
    // Both events are exactly 254 hours away.
    assert_eq!(nearest_event(&events, mid), Some(EventId::from("1")));
}

#[test]
fn test_nearest_picks_smallest_distance() {
    let events = vec![
        ev("1", "2025-01-01"),
        ev("2", "2025-02-01"),
        ev("3", "2025-03-01"),
    ];
    assert_eq!(nearest_event(&events, at("2025-02-10")), Some(EventId::from("2")));
    assert_eq!(nearest_event(&events, at("2025-02-20")), Some(EventId::from("3")));
    assert_eq!(nearest_event(&events, at("2024-01-01")), Some(EventId::from("1")));
}

#[test]
fn test_nearest_on_empty_is_none() {
    assert_eq!(nearest_event(&[], at("2025-01-01")), None);
}

#[test]
fn test_exact_match_wins() {
    let events = vec![
        ev("1", "2025-05-14T15:00"),
        ev("2", "2025-05-14T16:00"),
        ev("3", "2025-05-14T17:00"),
    ];
    for e in &events {
        assert_eq!(nearest_event(&events, e.start), Some(e.id.clone()));
    }
}

#[test]
fn test_view_span_is_chronological_in_past_mode() {
    let events = vec![ev("1", "2025-03-01"), ev("2", "2025-05-01"), ev("3", "2025-04-01")];
    let view = TimelineView::compute(&events, "", TemporalMode::Past, at("2025-12-01"));

    let order: Vec<&str> = view.events().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(order, vec!["2", "3", "1"]);
    assert_eq!(view.span(), Some((at("2025-03-01"), at("2025-05-01"))));
    assert_eq!(view.instant_at(0.0), Some(at("2025-03-01")));
    assert_eq!(view.nearest(0.0).map(|e| e.id.as_str()), Some("1"));
}

#[test]
fn test_scrub_reports_nearest_to_sink() {
    let events = vec![ev("1", "2025-01-01"), ev("2", "2025-01-11")];
    let view = TimelineView::compute(&events, "", TemporalMode::All, at("2024-01-01"));
    let mut sink = RecordingSink::default();

    assert_eq!(view.scrub(10.0, &mut sink), Some(EventId::from("1")));
    assert_eq!(view.scrub(90.0, &mut sink), Some(EventId::from("2")));
    assert_eq!(sink.scrolled, vec![EventId::from("1"), EventId::from("2")]);
}

#[test]
fn test_scrub_on_empty_view_does_not_scroll() {
    let view = TimelineView::compute(&[], "", TemporalMode::Upcoming, at("2025-01-01"));
    let mut sink = RecordingSink::default();

    assert!(view.is_empty());
    assert_eq!(view.span(), None);
    assert_eq!(view.scrub(50.0, &mut sink), None);
    assert!(sink.scrolled.is_empty());
    assert_eq!(view.empty_message(), "No upcoming events found.");
}

#[test]
fn test_single_event_view_is_degenerate() {
    let events = vec![ev("only", "2025-06-10T11:00")];
    let view = TimelineView::compute(&events, "", TemporalMode::All, at("2025-01-01"));
    let mut sink = RecordingSink::default();

    assert!(view.is_degenerate());
    assert_eq!(view.instant_at(73.0), Some(at("2025-06-10T11:00")));
    assert_eq!(view.scrub(73.0, &mut sink), Some(EventId::from("only")));
    assert_eq!(view.position_of(&events[0]), Some(0.0));
}

#[test]
fn test_label_names_month_of_scrubbed_instant() {
    let events = vec![ev("1", "2025-08-15T14:00"), ev("2", "2025-09-05T18:00")];
    let view = TimelineView::compute(&events, "", TemporalMode::All, at("2025-01-01"));
    assert_eq!(
        view.label_at(0.0).as_deref(),
        Some("Showing events around: August 2025")
    );
    assert_eq!(
        view.label_at(100.0).as_deref(),
        Some("Showing events around: September 2025")
    );
}
