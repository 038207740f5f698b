// File: ./src/model/event.rs
use crate::error::DataQualityError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Formats accepted for event start times, tried in order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Format used when an event is written back to a document.
pub const STORAGE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Local wall-clock time, the reference point for past and upcoming.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parses a wall-clock instant.
///
/// Accepts RFC 3339 (the offset is dropped, the written wall-clock time is kept),
/// `datetime-local` style strings with or without seconds, and bare dates
/// (midnight).
pub fn parse_instant(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EventId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for EventId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum EventCategory {
    #[default]
    Workshop,
    Talk,
    Exhibition,
    Activity,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Workshop => "Workshop",
            EventCategory::Talk => "Talk",
            EventCategory::Exhibition => "Exhibition",
            EventCategory::Activity => "Activity",
        }
    }
}

/// Which slice of the calendar is shown, and in which order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum TemporalMode {
    All,
    Past,
    #[default]
    Upcoming,
}

impl TemporalMode {
    /// Inclusion predicate. Upcoming is inclusive of `now`.
    pub fn includes(&self, start: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self {
            TemporalMode::Upcoming => start >= now,
            TemporalMode::Past => start < now,
            TemporalMode::All => true,
        }
    }

    /// Past shows the most recent event first; the others read forward in time.
    pub fn is_descending(&self) -> bool {
        matches!(self, TemporalMode::Past)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TemporalMode::All => "All Events",
            TemporalMode::Past => "Past",
            TemporalMode::Upcoming => "Upcoming",
        }
    }

    pub fn empty_message(&self) -> String {
        let word = match self {
            TemporalMode::All => "all",
            TemporalMode::Past => "past",
            TemporalMode::Upcoming => "upcoming",
        };
        format!("No {} events found.", word)
    }

    /// Cycles in tab order: All -> Past -> Upcoming -> All.
    pub fn next(&self) -> Self {
        let modes: Vec<TemporalMode> = TemporalMode::iter().collect();
        let idx = modes.iter().position(|m| m == self).unwrap_or(0);
        modes[(idx + 1) % modes.len()]
    }
}

impl fmt::Display for TemporalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemporalMode::All => write!(f, "All"),
            TemporalMode::Past => write!(f, "Past"),
            TemporalMode::Upcoming => write!(f, "Upcoming"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub category: EventCategory,
    pub start: NaiveDateTime,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}

impl Event {
    pub fn new(
        id: impl Into<EventId>,
        title: &str,
        category: EventCategory,
        start: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.to_string(),
            category,
            start,
            location: String::new(),
            description: String::new(),
            image_url: String::new(),
        }
    }

    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.start < now
    }

    /// Button text on an event card.
    pub fn call_to_action(&self, now: NaiveDateTime) -> &'static str {
        if self.is_past(now) { "View" } else { "Register" }
    }
}

/// An event document as the backend delivers it. Nothing is trusted yet.
///
/// Deserializes from any JSON value so one odd record never fails the whole
/// document; [`RawEvent::into_event`] decides what is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "serde_json::Value")]
pub struct RawEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub title: Option<Value>,
    pub category: Option<Value>,
    pub date: Option<Value>,
    pub location: Option<Value>,
    pub description: Option<Value>,
    pub image_url: Option<Value>,
}

impl From<Value> for RawEvent {
    fn from(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };
        let mut take = |key: &str| map.remove(key).filter(|v| !v.is_null());
        let date = take("date");
        let start = take("start");
        Self {
            id: take("id"),
            title: take("title"),
            category: take("category"),
            date: date.or(start),
            location: take("location"),
            description: take("description"),
            image_url: take("imageUrl"),
        }
    }
}

fn text(value: &Option<Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) => Some(s.as_str()),
        _ => None,
    }
}

/// A stored timestamp object, `{seconds, nanoseconds}` with or without the
/// leading underscore, as local wall-clock time.
fn timestamp_object(value: &Value) -> Option<NaiveDateTime> {
    let field = |name: &str| value.get(name).or_else(|| value.get(format!("_{}", name)));
    let secs = field("seconds")?.as_i64()?;
    let nanos = match field("nanoseconds") {
        Some(n) => u32::try_from(n.as_u64()?).ok()?,
        None => 0,
    };
    DateTime::from_timestamp(secs, nanos).map(|utc| utc.with_timezone(&Local).naive_local())
}

impl RawEvent {
    fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn start(&self, id: &str) -> Result<NaiveDateTime, DataQualityError> {
        let invalid = |value: String| DataQualityError::InvalidStart {
            id: id.to_string(),
            value,
        };
        match &self.date {
            None => Err(DataQualityError::MissingStart { id: id.to_string() }),
            Some(Value::String(s)) if s.trim().is_empty() => {
                Err(DataQualityError::MissingStart { id: id.to_string() })
            }
            Some(Value::String(s)) => parse_instant(s).ok_or_else(|| invalid(s.clone())),
            Some(v @ Value::Object(_)) => timestamp_object(v).ok_or_else(|| invalid(v.to_string())),
            Some(v) => Err(invalid(v.to_string())),
        }
    }

    /// Validates the document into an [`Event`].
    pub fn into_event(self) -> Result<Event, DataQualityError> {
        let id = self.id_string().ok_or(DataQualityError::MissingId)?;

        let title = match text(&self.title) {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => return Err(DataQualityError::MissingTitle { id }),
        };

        let category = match &self.category {
            None => EventCategory::default(),
            Some(Value::String(c)) if c.trim().is_empty() => EventCategory::default(),
            Some(Value::String(c)) => c.trim().parse::<EventCategory>().map_err(|_| {
                DataQualityError::UnknownCategory {
                    id: id.clone(),
                    value: c.clone(),
                }
            })?,
            Some(other) => {
                return Err(DataQualityError::UnknownCategory {
                    id,
                    value: other.to_string(),
                });
            }
        };

        let start = self.start(&id)?;
        let optional = |value: &Option<Value>| text(value).unwrap_or_default().to_string();

        Ok(Event {
            id: EventId(id),
            title,
            category,
            start,
            location: optional(&self.location),
            description: optional(&self.description),
            image_url: optional(&self.image_url),
        })
    }
}

impl From<&Event> for RawEvent {
    fn from(event: &Event) -> Self {
        let string = |s: &str| Some(Value::String(s.to_string()));
        Self {
            id: string(event.id.as_str()),
            title: string(&event.title),
            category: string(&event.category.to_string()),
            date: string(&event.start.format(STORAGE_DATETIME_FORMAT).to_string()),
            location: string(&event.location),
            description: string(&event.description),
            image_url: string(&event.image_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_accepted_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 8, 15)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        assert_eq!(parse_instant("2025-08-15T14:00:00"), Some(expected));
        assert_eq!(parse_instant("2025-08-15T14:00"), Some(expected));
        assert_eq!(parse_instant("2025-08-15 14:00"), Some(expected));
        assert_eq!(parse_instant("2025-08-15T14:00:00+02:00"), Some(expected));
        assert_eq!(
            parse_instant("2025-08-15"),
            NaiveDate::from_ymd_opt(2025, 8, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_instant("next tuesday"), None);
        assert_eq!(parse_instant("   "), None);
    }

    #[test]
    fn mode_cycles_in_tab_order() {
        assert_eq!(TemporalMode::All.next(), TemporalMode::Past);
        assert_eq!(TemporalMode::Past.next(), TemporalMode::Upcoming);
        assert_eq!(TemporalMode::Upcoming.next(), TemporalMode::All);
    }

    #[test]
    fn numeric_ids_are_stringified() {
        let raw: RawEvent = serde_json::from_str(
            r#"{"id": 7, "title": "Watercolor Wednesdays", "category": "activity", "date": "2025-05-14T15:00:00"}"#,
        )
        .unwrap();
        let event = raw.into_event().unwrap();
        assert_eq!(event.id.as_str(), "7");
        assert_eq!(event.category, EventCategory::Activity);
    }

    #[test]
    fn timestamp_objects_become_local_time() {
        let raw: RawEvent = serde_json::from_str(
            r#"{"id": "t", "title": "Portfolio Review", "date": {"seconds": 1755266400, "nanoseconds": 0}}"#,
        )
        .unwrap();
        let expected = DateTime::from_timestamp(1755266400, 0)
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(raw.into_event().unwrap().start, expected);
    }

    #[test]
    fn non_string_fields_are_rejected_not_fatal() {
        let raw: RawEvent = serde_json::from_str(r#"{"id": 3, "title": "Clay", "date": 17}"#).unwrap();
        assert_eq!(
            raw.into_event(),
            Err(DataQualityError::InvalidStart {
                id: "3".to_string(),
                value: "17".to_string()
            })
        );

        let raw: RawEvent = serde_json::from_str(r#"{"id": 4, "title": ["x"], "date": "2025-01-01"}"#).unwrap();
        assert_eq!(raw.into_event(), Err(DataQualityError::MissingTitle { id: "4".to_string() }));

        let raw: RawEvent = serde_json::from_str("42").unwrap();
        assert_eq!(raw.into_event(), Err(DataQualityError::MissingId));
    }
}
