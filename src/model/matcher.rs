// Free-text matching shared by every searchable list.
//
// A query matches a record when any of the record's search fields contains
// the query as a case-insensitive substring. The empty query matches
// everything. Pages differ only in which fields they expose.

use crate::model::{Artist, Artwork, Event};

pub trait Searchable {
    /// The fields a free-text query is matched against.
    fn search_fields(&self) -> Vec<&str>;

    fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl Searchable for Event {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.category.as_str()]
    }
}

impl Searchable for Artist {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.domain.as_str(),
            self.designation.as_str(),
        ]
    }
}

impl Searchable for Artwork {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.artist_name.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventCategory;
    use chrono::NaiveDate;

    fn event(title: &str, category: EventCategory) -> Event {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Event::new("x", title, category, start)
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(event("Anything", EventCategory::Talk).matches_query(""));
    }

    #[test]
    fn matches_title_or_category_case_insensitively() {
        let e = event("Annual Art Exhibition", EventCategory::Exhibition);
        assert!(e.matches_query("ANNUAL"));
        assert!(e.matches_query("exhib"));

        let talk = event("Guest Lecture", EventCategory::Talk);
        assert!(talk.matches_query("talk"));
        assert!(!talk.matches_query("workshop"));
    }

    #[test]
    fn location_and_description_are_not_searched() {
        let mut e = event("Mixer", EventCategory::Activity);
        e.location = "Student Lounge".to_string();
        e.description = "Get to know your fellow artists.".to_string();
        assert!(!e.matches_query("lounge"));
        assert!(!e.matches_query("fellow"));
    }
}
