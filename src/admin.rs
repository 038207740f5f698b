// Content management forms. Each operation checks the session first,
// then validates its input, and returns the new records for the caller to persist.
use crate::error::FormError;
use crate::model::{Artist, Artwork, Designation, Event, EventCategory, EventId, Role, parse_instant};
use crate::session::Session;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Input of the "Add Event" form.
#[derive(Debug, Clone, Default)]
pub struct EventForm {
    pub title: String,
    /// `datetime-local` value, e.g. `2025-08-15T14:00`.
    pub date: String,
    /// Empty means Workshop.
    pub category: String,
    pub location: String,
    pub description: String,
    pub image_url: String,
}

pub fn create_event(session: &Session, form: EventForm) -> Result<Event, FormError> {
    session.require_admin()?;

    let title = form.title.trim();
    if title.is_empty() {
        return Err(FormError::MissingField("title"));
    }
    let date = form.date.trim();
    if date.is_empty() {
        return Err(FormError::MissingField("date"));
    }
    let start = parse_instant(date).ok_or_else(|| FormError::InvalidDate(date.to_string()))?;

    let category = match form.category.trim() {
        "" => EventCategory::default(),
        c => c
            .parse::<EventCategory>()
            .map_err(|_| FormError::InvalidCategory(c.to_string()))?,
    };

    let mut event = Event::new(
        EventId::new(uuid::Uuid::new_v4().to_string()),
        title,
        category,
        start,
    );
    event.location = form.location.trim().to_string();
    event.description = form.description.trim().to_string();
    event.image_url = form.image_url.trim().to_string();
    Ok(event)
}

/// One row of a bulk artist import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistRow {
    pub name: String,
    pub email: String,
    pub domain: String,
    pub graduation_year: String,
}

impl ArtistRow {
    /// Parses `name,email,domain,graduationYear`. A header row returns `None`.
    pub fn from_csv_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 4 || fields[1].eq_ignore_ascii_case("email") {
            return None;
        }
        Some(Self {
            name: fields[0].to_string(),
            email: fields[1].to_string(),
            domain: fields[2].to_string(),
            graduation_year: fields[3].to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkAddReport {
    pub success_count: usize,
    pub errors: Vec<String>,
    pub message: String,
    pub created: Vec<Artist>,
}

fn validate_row(row: &ArtistRow, taken: &HashSet<String>) -> Result<Artist, String> {
    let name = row.name.trim();
    if name.is_empty() {
        return Err("name is required".to_string());
    }
    let email = row.email.trim().to_lowercase();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err("invalid email address".to_string());
    }
    if taken.contains(&email) {
        return Err("email address is already in use".to_string());
    }
    let year = row.graduation_year.trim();
    let graduation_year = if year.is_empty() {
        None
    } else {
        Some(
            year.parse::<u16>()
                .map_err(|_| format!("invalid graduation year '{}'", year))?,
        )
    };

    let mut artist = Artist::new(&uuid::Uuid::new_v4().to_string(), name, row.domain.trim());
    artist.email = email;
    artist.graduation_year = graduation_year;
    artist.role = Role::Member;
    artist.designation = Designation::Member;
    Ok(artist)
}

/// Creates a member artist per valid row. Rows that fail are reported, not fatal.
pub fn bulk_add_artists(
    session: &Session,
    rows: &[ArtistRow],
    existing: &[Artist],
) -> Result<BulkAddReport, FormError> {
    session.require_admin()?;
    if rows.is_empty() {
        return Err(FormError::InvalidArgument(
            "expected at least one artist row".to_string(),
        ));
    }

    let mut taken: HashSet<String> = existing
        .iter()
        .filter(|a| !a.email.is_empty())
        .map(|a| a.email.to_lowercase())
        .collect();
    let mut report = BulkAddReport::default();

    for row in rows {
        match validate_row(row, &taken) {
            Ok(artist) => {
                taken.insert(artist.email.clone());
                report.created.push(artist);
            }
            Err(reason) => report
                .errors
                .push(format!("Failed for {}: {}", row.email.trim(), reason)),
        }
    }

    report.success_count = report.created.len();
    report.message = format!(
        "Successfully created {} of {} artists.",
        report.success_count,
        rows.len()
    );
    log::info!("{}", report.message);
    Ok(report)
}

/// Input of the "Upload Artwork" form.
#[derive(Debug, Clone, Default)]
pub struct ArtworkForm {
    pub title: String,
    pub description: String,
    pub for_sale: bool,
    pub price: f64,
    pub image_url: String,
}

/// Any signed-in user may upload; the artwork is attributed to them.
pub fn create_artwork(
    session: &Session,
    form: ArtworkForm,
    now: DateTime<Utc>,
) -> Result<Artwork, FormError> {
    let user = session.require_user()?;

    let title = form.title.trim();
    if title.is_empty() {
        return Err(FormError::MissingField("title"));
    }
    if !form.price.is_finite() || form.price < 0.0 {
        return Err(FormError::InvalidArgument(format!(
            "price must be a non-negative number, got {}",
            form.price
        )));
    }

    Ok(Artwork {
        id: uuid::Uuid::new_v4().to_string(),
        title: title.to_string(),
        description: form.description.trim().to_string(),
        for_sale: form.for_sale,
        price: form.price,
        image_url: form.image_url,
        artist_id: user.uid.clone(),
        artist_name: user.name.clone(),
        artist_avatar_url: user.profile_image_url.clone(),
        created_at: now,
    })
}
