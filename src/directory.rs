//! Member directory and exhibition queries.
//!
//! All functions take the fetched collections as slices, so they can be fed
//! from any [`DirectorySource`] or from test fixtures.

use crate::model::{Artist, Artwork, Searchable, UserProfile};
use crate::source::DirectorySource;

/// Artists shown in the public directory that match `query`.
/// Only admins and members are listed; plain users are not.
pub fn listed_artists(artists: &[Artist], query: &str) -> Vec<Artist> {
    artists
        .iter()
        .filter(|a| a.role.is_listed() && a.matches_query(query))
        .cloned()
        .collect()
}

/// Exhibition wall: artworks for sale matching `query` on title or artist.
pub fn artworks_for_sale(artworks: &[Artwork], query: &str) -> Vec<Artwork> {
    artworks
        .iter()
        .filter(|a| a.for_sale && a.matches_query(query))
        .cloned()
        .collect()
}

/// An artist's own portfolio, newest first.
pub fn artworks_for_user(artworks: &[Artwork], user_id: &str) -> Vec<Artwork> {
    if user_id.is_empty() {
        return vec![];
    }
    let mut owned: Vec<Artwork> = artworks
        .iter()
        .filter(|a| a.artist_id == user_id)
        .cloned()
        .collect();
    owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    owned
}

/// Result of a profile lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    User(UserProfile),
    Artist(Artist),
}

impl Profile {
    pub fn name(&self) -> &str {
        match self {
            Profile::User(u) => &u.name,
            Profile::Artist(a) => &a.name,
        }
    }
}

/// Looks `id` up among signed-up users first, then among artists.
pub fn find_profile(users: &[UserProfile], artists: &[Artist], id: &str) -> Option<Profile> {
    if let Some(user) = users.iter().find(|u| u.uid == id) {
        return Some(Profile::User(user.clone()));
    }
    artists
        .iter()
        .find(|a| a.id == id)
        .map(|a| Profile::Artist(a.clone()))
}

#[derive(Debug, Clone, Default)]
pub struct Directory {
    pub artists: Vec<Artist>,
    pub artworks: Vec<Artwork>,
    pub users: Vec<UserProfile>,
}

/// Fetches all three collections concurrently. A failed collection is
/// logged and left empty.
pub async fn load_directory<S: DirectorySource>(source: &S) -> Directory {
    let (artists, artworks, users) = futures::join!(
        source.fetch_artists(),
        source.fetch_artworks(),
        source.fetch_users()
    );

    Directory {
        artists: artists.unwrap_or_else(|e| {
            log::error!("Failed to fetch artists: {:#}", e);
            vec![]
        }),
        artworks: artworks.unwrap_or_else(|e| {
            log::error!("Failed to fetch artworks: {:#}", e);
            vec![]
        }),
        users: users.unwrap_or_else(|e| {
            log::error!("Failed to fetch users: {:#}", e);
            vec![]
        }),
    }
}

impl Directory {
    pub fn listed_artists(&self, query: &str) -> Vec<Artist> {
        listed_artists(&self.artists, query)
    }

    pub fn artworks_for_sale(&self, query: &str) -> Vec<Artwork> {
        artworks_for_sale(&self.artworks, query)
    }

    pub fn artworks_for_user(&self, user_id: &str) -> Vec<Artwork> {
        artworks_for_user(&self.artworks, user_id)
    }

    pub fn find_profile(&self, id: &str) -> Option<Profile> {
        find_profile(&self.users, &self.artists, id)
    }
}
