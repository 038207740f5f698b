// Artists, artworks and user profiles.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Accepts ids stored either as JSON strings or numbers.
pub fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin", alias = "Admin")]
    Admin,
    #[default]
    #[serde(rename = "member", alias = "Member")]
    Member,
    #[serde(rename = "user", alias = "User")]
    User,
}

impl Role {
    /// Roles shown in the public artist directory.
    pub fn is_listed(&self) -> bool {
        matches!(self, Role::Admin | Role::Member)
    }
}

/// How an artist is presented on their card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Designation {
    #[default]
    #[serde(alias = "member")]
    Member,
    #[serde(alias = "alumni")]
    Alumni,
}

impl Designation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Designation::Member => "Member",
            Designation::Alumni => "Alumni",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub designation: Designation,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub graduation_year: Option<u16>,
    #[serde(default)]
    pub bio: String,
    #[serde(default, alias = "profileImageUrl")]
    pub image_url: String,
}

impl Artist {
    pub fn new(id: &str, name: &str, domain: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            designation: Designation::default(),
            role: Role::default(),
            domain: domain.to_string(),
            email: String::new(),
            graduation_year: None,
            bio: String::new(),
            image_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub for_sale: bool,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image_url: String,
    pub artist_id: String,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub artist_avatar_url: String,
    pub created_at: DateTime<Utc>,
}

/// A signed-up account that is not necessarily a listed artist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub graduation_year: Option<u16>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub profile_image_url: String,
}

impl UserProfile {
    pub fn new(uid: &str, name: &str, role: Role) -> Self {
        Self {
            uid: uid.to_string(),
            name: name.to_string(),
            email: String::new(),
            role,
            domain: String::new(),
            graduation_year: None,
            bio: String::new(),
            profile_image_url: String::new(),
        }
    }
}

impl From<&Artist> for UserProfile {
    fn from(artist: &Artist) -> Self {
        Self {
            uid: artist.id.clone(),
            name: artist.name.clone(),
            email: artist.email.clone(),
            role: artist.role,
            domain: artist.domain.clone(),
            graduation_year: artist.graduation_year,
            bio: artist.bio.clone(),
            profile_image_url: artist.image_url.clone(),
        }
    }
}
